//! Layout Module
//!
//! Flexbox layout of resolved view trees using Taffy.
//!
//! # Architecture
//!
//! 1. Converts each [`ViewNode`](crate::view::ViewNode) and its modifier
//!    chain into a Taffy style
//! 2. Builds a Taffy tree mirroring the view tree
//! 3. Measures text through [`text_lines`] so layout and painting agree
//! 4. Extracts absolute rectangles into a [`LayoutNode`] tree
//!
//! # Example
//!
//! ```ignore
//! let tree = runtime.resolve(root);
//! let layout = compute_layout(&tree, 80, 24, true)?;
//! ```

mod taffy_bridge;
mod text_measure;
mod types;

pub use taffy_bridge::{compute_layout, dialog_width};
pub use text_measure::*;
pub use types::LayoutNode;
