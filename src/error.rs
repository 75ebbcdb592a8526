//! Error types.
//!
//! Each layer has its own error enum; the host folds them into [`HostError`].

use std::io;

use thiserror::Error;

use crate::reactive::ScopeId;
use crate::reactive::scope::Key;

/// Errors from reading or writing an observable cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// The scope (or runtime) that owned the cell has been torn down.
    #[error("cell was disposed together with its owning scope")]
    Disposed,
    /// A validator refused the value. The previous value is retained.
    #[error("value rejected: {reason}")]
    Rejected { reason: String },
}

/// Errors raised while evaluating a view function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// The view function failed on its own.
    #[error("{0}")]
    Failed(String),
    /// A cell access inside the view failed.
    #[error(transparent)]
    Cell(#[from] CellError),
    /// Two child scopes at the same call site used the same key.
    #[error("duplicate key {0:?} among siblings")]
    DuplicateKey(Key),
    /// A nested scope failed.
    #[error("child scope {scope:?} failed: {source}")]
    Child {
        scope: ScopeId,
        #[source]
        source: Box<ViewError>,
    },
}

impl ViewError {
    /// Convenience constructor for ad-hoc view failures.
    pub fn failed(message: impl Into<String>) -> Self {
        ViewError::Failed(message.into())
    }

    /// The innermost error, skipping `Child` wrappers.
    pub fn root_cause(&self) -> &ViewError {
        match self {
            ViewError::Child { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type returned by view functions.
pub type ViewResult = Result<(), ViewError>;

/// Errors from a recompose pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecomposeError {
    /// A view function failed. The scope stays dirty and is retried next pass.
    #[error("view in scope {scope:?} failed: {source}")]
    View {
        scope: ScopeId,
        #[source]
        source: ViewError,
    },
    /// Views kept writing cells they depend on.
    #[error("recomposition did not settle after {passes} passes")]
    PassLimit { passes: u32 },
    /// `recompose` was called while a recompose was already running.
    #[error("recompose called from inside a view evaluation")]
    Reentrant,
}

/// Errors surfaced by the host mount point.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Recompose(#[from] RecomposeError),
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
}
