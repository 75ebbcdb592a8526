//! Renderer Module
//!
//! Turns a laid-out view tree into terminal output.
//!
//! # Architecture
//!
//! 1. [`paint`] draws the tree into a [`FrameBuffer`] and records click
//!    targets in a [`HitGrid`], producing a [`Frame`]
//! 2. [`DiffRenderer`] (fullscreen) or [`InlineRenderer`] (inline) writes
//!    the frame as ANSI, through [`OutputBuffer`] and
//!    [`StatefulCellRenderer`]

pub mod ansi;
mod buffer;
mod diff;
mod hit_grid;
mod inline;
mod output;
mod paint;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
pub use hit_grid::HitGrid;
pub use inline::InlineRenderer;
pub use output::{OutputBuffer, StatefulCellRenderer};
pub use paint::{DialogRegion, Frame, paint};
