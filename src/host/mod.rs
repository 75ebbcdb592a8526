//! Host - mounting a view tree on a surface and running its event loop.

pub mod config;
pub mod input;
mod mount;
mod surface;

pub use config::{HostConfig, RenderMode};
pub use input::{InputEvent, KeyCode, KeyInput, Modifiers};
pub use mount::{MountHandle, mount};
pub use surface::{MemorySurface, Surface, TerminalSurface};
