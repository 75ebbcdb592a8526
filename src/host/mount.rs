//! Mount API - application lifecycle.
//!
//! [`mount`] builds a runtime around a root view, runs the first
//! recomposition and presents the first frame. The returned
//! [`MountHandle`] drives everything afterwards:
//!
//! ```text
//! input ─► handler (inside one batch) ─► recompose ─► resolve ─► diff
//!                                                       │
//!                          present ◄─ paint ◄─ layout ◄─┘ (if changed)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut handle = mount(app, TerminalSurface::new(), HostConfig::from_env())?;
//! handle.run()?;
//! handle.unmount()?;
//! ```

use tracing::{debug, trace, warn};

use super::config::{HostConfig, RenderMode};
use super::input::{InputEvent, KeyCode, KeyInput};
use super::surface::Surface;
use crate::error::{HostError, ViewResult};
use crate::layout::{LayoutNode, compute_layout};
use crate::reactive::{Runtime, ScopeId};
use crate::renderer::{Frame, paint};
use crate::view::{Handler, Ui, ViewNode, diff};

/// A mounted view tree on a surface.
pub struct MountHandle<S: Surface> {
    runtime: Runtime,
    root: ScopeId,
    surface: S,
    config: HostConfig,
    size: (u16, u16),
    tree: ViewNode,
    layout: LayoutNode,
    frame: Frame,
    running: bool,
    mounted: bool,
}

/// Mount `view` on `surface`.
///
/// Fails if the first recomposition fails; nothing is presented then.
pub fn mount<S: Surface>(
    view: impl Fn(&mut Ui) -> ViewResult + 'static,
    mut surface: S,
    config: HostConfig,
) -> Result<MountHandle<S>, HostError> {
    let size = match config.size {
        Some(size) => size,
        None => surface.size()?,
    };

    let runtime = Runtime::new();
    let root = runtime.create_root(view);
    let stats = runtime.recompose(config.max_passes)?;

    surface.begin(config.render_mode)?;
    let mut handle = MountHandle {
        runtime,
        root,
        surface,
        config,
        size,
        tree: ViewNode::root(Vec::new()),
        layout: LayoutNode::default(),
        frame: Frame::blank(size.0, size.1),
        running: true,
        mounted: true,
    };
    handle.render(true)?;

    debug!(
        width = size.0,
        height = size.1,
        mode = ?handle.config.render_mode,
        evaluations = stats.evaluations,
        "mounted"
    );
    Ok(handle)
}

impl<S: Surface> MountHandle<S> {
    // =========================================================================
    // Accessors
    // =========================================================================

    /// Last committed, resolved tree.
    pub fn tree(&self) -> &ViewNode {
        &self.tree
    }

    /// Last painted frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Re-evaluate dirty scopes and, if the tree changed, present a new frame.
    ///
    /// Returns whether a frame was presented. On failure the previous tree
    /// and frame stay in place and the failing scope is retried next time.
    pub fn recompose(&mut self) -> Result<bool, HostError> {
        let stats = self.runtime.recompose(self.config.max_passes)?;
        if stats.passes == 0 {
            return Ok(false);
        }
        self.render(false)
    }

    /// Resolve, diff against the committed tree, then lay out, paint and
    /// present when something changed (or when `force` is set).
    fn render(&mut self, force: bool) -> Result<bool, HostError> {
        let tree = self.runtime.resolve(self.root);
        let patches = diff(&self.tree, &tree);
        let (width, height) = self.size;

        if patches.is_empty() && !force {
            // Same shape and props; handlers may still be new closures.
            self.frame = paint(&tree, &self.layout, self.frame.width(), self.frame.height());
            self.tree = tree;
            trace!("tree unchanged, frame not presented");
            return Ok(false);
        }

        let fullscreen = self.config.render_mode == RenderMode::Fullscreen;
        let layout = compute_layout(&tree, width, height, fullscreen)?;
        let frame_height = if fullscreen {
            height
        } else {
            content_height(&layout).max(1)
        };
        let frame = paint(&tree, &layout, width, frame_height);
        self.surface.present(&frame)?;

        trace!(patches = patches.len(), "frame presented");
        self.tree = tree;
        self.layout = layout;
        self.frame = frame;
        Ok(true)
    }

    /// Run `handler` as one event: every write it makes lands in a single
    /// batch, followed by one recompose.
    fn fire(&mut self, handler: &Handler) -> Result<(), HostError> {
        self.runtime.batch(|| handler.call());
        self.recompose()?;
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Click at a cell.
    ///
    /// With a dialog open, a click outside the topmost dialog asks it to
    /// dismiss and nothing underneath receives the click.
    ///
    /// Returns whether anything handled the click.
    pub fn click(&mut self, x: u16, y: u16) -> Result<bool, HostError> {
        let target = match self.frame.topmost_dialog() {
            Some(dialog) if !dialog.rect.contains(x as i32, y as i32) => {
                trace!(x, y, "click outside dialog");
                Some(dialog.on_dismiss.clone())
            }
            _ => self.frame.handler_at(x, y).cloned(),
        };
        let Some(handler) = target else {
            return Ok(false);
        };
        self.fire(&handler)?;
        Ok(true)
    }

    /// Key press. `Esc` dismisses the topmost dialog; Ctrl+C stops the loop.
    pub fn key(&mut self, key: KeyInput) -> Result<bool, HostError> {
        if key.is_interrupt() {
            self.stop();
            return Ok(true);
        }
        if key.code == KeyCode::Esc {
            if let Some(dialog) = self.frame.topmost_dialog() {
                let dismiss = dialog.on_dismiss.clone();
                self.fire(&dismiss)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// New surface size; always presents a fresh frame.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), HostError> {
        debug!(width, height, "resize");
        self.size = (width, height);
        self.render(true)?;
        Ok(())
    }

    pub fn dispatch(&mut self, event: InputEvent) -> Result<bool, HostError> {
        match event {
            InputEvent::Click { x, y } => self.click(x, y),
            InputEvent::Key(key) => self.key(key),
            InputEvent::Resize { width, height } => self.resize(width, height).map(|()| true),
        }
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Handle at most one input event, then flush writes made outside any
    /// handler.
    ///
    /// A failed recomposition is logged and the loop carries on with the
    /// previous frame. Returns `Ok(false)` once stopped.
    pub fn tick(&mut self) -> Result<bool, HostError> {
        if !self.running {
            return Ok(false);
        }

        if let Some(event) = self.surface.poll_input(self.config.tick_interval)? {
            keep_going(self.dispatch(event))?;
        }
        if self.runtime.has_pending() {
            keep_going(self.recompose())?;
        }
        Ok(self.running)
    }

    /// Tick until stopped.
    pub fn run(&mut self) -> Result<(), HostError> {
        while self.tick()? {}
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Tear down every scope and restore the surface.
    pub fn unmount(mut self) -> Result<(), HostError> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), HostError> {
        if !self.mounted {
            return Ok(());
        }
        self.mounted = false;
        self.running = false;
        self.runtime.dispose_scope(self.root);
        self.surface.end()?;
        debug!("unmounted");
        Ok(())
    }
}

impl<S: Surface> Drop for MountHandle<S> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!(error = %err, "unmount on drop failed");
        }
    }
}

fn keep_going<T>(result: Result<T, HostError>) -> Result<(), HostError> {
    match result {
        Ok(_) => Ok(()),
        Err(HostError::Recompose(err)) => {
            warn!(error = %err, "recompose failed, keeping previous frame");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Rows needed to show the main tree and every overlay.
fn content_height(layout: &LayoutNode) -> u16 {
    let mut height = layout.extent().1;
    let mut stack = vec![layout];
    while let Some(node) = stack.pop() {
        if node.overlay {
            height = height.max(node.rect.bottom().clamp(0, u16::MAX as i32) as u16);
        }
        stack.extend(node.children.iter());
    }
    height
}
