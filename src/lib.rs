//! # spark-compose
//!
//! Declarative, state-driven terminal UI for Rust.
//!
//! ## Architecture
//!
//! A view is a function from captured props and remembered state to a tree
//! of nodes. Reading an observable cell inside a view subscribes the
//! enclosing scope to it; writing the cell marks that scope for
//! re-evaluation. The host turns the resulting tree into terminal output:
//!
//! ```text
//! view fn ─► Ui builder ─► scope output ─► resolve ─► diff ─► layout ─► paint ─► surface
//!     ▲                                                                        │
//!     └──────────── handler writes cells (one batch per event) ◄── input ◄────┘
//! ```
//!
//! ## Modules
//!
//! - [`reactive`] - runtime, scopes, observable cells, scheduler
//! - [`view`] - nodes, modifiers, the [`Ui`] builder, tree diffing
//! - [`layout`] - Taffy flexbox layout and text measurement
//! - [`renderer`] - frame buffer, painting, ANSI output
//! - [`host`] - mounting, input dispatch, surfaces, configuration
//! - [`types`] - colours, attributes, cells, rectangles, border styles
//!
//! ## Example
//!
//! ```ignore
//! use spark_compose::prelude::*;
//!
//! fn counter(ui: &mut Ui) -> ViewResult {
//!     let count = ui.remember(|| 0);
//!     let label = format!("Clicked {} times", count.get());
//!     ui.button(move || count.update(|n| *n += 1), Modifier::new(), |ui| {
//!         ui.text(label);
//!         Ok(())
//!     })
//! }
//!
//! let mut handle = mount(counter, TerminalSurface::new(), HostConfig::from_env())?;
//! handle.run()?;
//! ```

pub mod error;
pub mod host;
pub mod layout;
pub mod reactive;
pub mod renderer;
pub mod types;
pub mod view;

pub use error::{CellError, HostError, RecomposeError, ViewError, ViewResult};
pub use host::{
    HostConfig, InputEvent, KeyCode, KeyInput, MemorySurface, MountHandle, RenderMode, Surface,
    TerminalSurface, mount,
};
pub use layout::{LayoutNode, compute_layout};
pub use reactive::{Key, Presence, RecomposeStats, Runtime, ScopeId, State};
pub use renderer::{Frame, FrameBuffer, paint};
pub use types::{Attr, BorderStyle, Rgba};
pub use view::{
    AlertDialog, Alignment, Arrangement, CardStyle, DialogButton, ImageShape, ImageStyle,
    Modifier, Patch, Stack, TextOverflow, TextStyle, Ui, ViewNode, diff,
};

/// Everything a view function usually needs.
pub mod prelude {
    pub use crate::error::{ViewError, ViewResult};
    pub use crate::host::{HostConfig, MemorySurface, RenderMode, TerminalSurface, mount};
    pub use crate::reactive::{Key, Presence, State};
    pub use crate::types::{Attr, BorderStyle, Rgba};
    pub use crate::view::{
        AlertDialog, Alignment, Arrangement, CardStyle, DialogButton, ImageShape, ImageStyle,
        Modifier, Stack, TextOverflow, TextStyle, Ui,
    };
}
