//! The `Ui` builder handed to view functions.
//!
//! A view function describes its output by calling builder methods:
//! leaves (`text`, `spacer`, `image`) append a node, containers (`column`,
//! `row`, `card`, ...) run a nested closure whose nodes become children.
//!
//! Child scopes (`scope`, `keyed`, `show`, `lazy_column` items) are units of
//! recomposition. The builder only records them; the runtime evaluates them
//! after the current view returns, and their output is spliced in place of
//! the placeholder node at resolve time.
//!
//! # Identity
//!
//! Remembered cells and child scopes are identified by the source location
//! of the builder call plus an occurrence count, or by an explicit key. A
//! helper function called twice gets two independent sets of state.
//!
//! # Example
//!
//! ```ignore
//! fn clickable_text(ui: &mut Ui) -> ViewResult {
//!     let show_popup = ui.remember(|| false);
//!     ui.column(Stack::default(), Modifier::new().clickable({
//!         let show_popup = show_popup.clone();
//!         move || show_popup.set(true)
//!     }), |ui| {
//!         ui.text("Click to open the dialog");
//!         Ok(())
//!     })?;
//!     ui.show(show_popup.get(), move |ui| {
//!         let dismiss = show_popup.clone();
//!         ui.alert_dialog(AlertDialog::new("Congratulations!", move || dismiss.set(false)));
//!         Ok(())
//!     })
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::modifier::Modifier;
use super::node::{
    Alignment, Arrangement, CardStyle, DialogProps, Handler, ImageStyle, NodeKind, Stack,
    TextStyle, ViewNode,
};
use crate::error::{ViewError, ViewResult};
use crate::reactive::scope::{Slot, SlotKey};
use crate::reactive::{CallSite, Key, Presence, Runtime, ScopeId, State, ViewFn};
use crate::types::{Attr, BorderStyle, Rgba};

/// A child scope recorded during an evaluation.
pub(crate) struct ChildRequest {
    pub(crate) id: ScopeId,
    pub(crate) key: SlotKey,
    pub(crate) view: ViewFn,
}

/// Everything one evaluation produced.
pub(crate) struct Composed {
    pub(crate) output: Vec<ViewNode>,
    pub(crate) children: Vec<ChildRequest>,
    pub(crate) used_cells: HashSet<SlotKey>,
    pub(crate) on_unmount: Vec<Box<dyn FnOnce()>>,
}

/// Button inside an [`AlertDialog`].
#[derive(Clone)]
pub struct DialogButton {
    pub label: String,
    pub on_click: Handler,
}

impl DialogButton {
    pub fn new(label: impl Into<String>, on_click: impl Fn() + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Handler::new(on_click),
        }
    }
}

/// Modal alert: optional title, body text, up to two buttons.
///
/// `on_dismiss` fires on `Esc` or a click outside the dialog.
#[derive(Clone)]
pub struct AlertDialog {
    pub title: Option<String>,
    pub text: String,
    pub confirm: Option<DialogButton>,
    pub dismiss: Option<DialogButton>,
    pub on_dismiss: Handler,
    pub background: Rgba,
}

impl AlertDialog {
    pub fn new(text: impl Into<String>, on_dismiss: impl Fn() + 'static) -> Self {
        Self {
            title: None,
            text: text.into(),
            confirm: None,
            dismiss: None,
            on_dismiss: Handler::new(on_dismiss),
            background: Rgba::TERMINAL_DEFAULT,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn confirm(mut self, button: DialogButton) -> Self {
        self.confirm = Some(button);
        self
    }

    pub fn dismiss_button(mut self, button: DialogButton) -> Self {
        self.dismiss = Some(button);
        self
    }

    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }
}

/// View builder for one scope evaluation.
pub struct Ui {
    rt: Runtime,
    scope: ScopeId,
    first_run: bool,
    /// Open containers; the bottom entry collects the scope's top-level nodes.
    stack: Vec<ViewNode>,
    children: Vec<ChildRequest>,
    requested: HashSet<SlotKey>,
    scope_sites: HashMap<CallSite, u32>,
    cell_sites: HashMap<CallSite, u32>,
    used_cells: HashSet<SlotKey>,
    /// Held until the evaluation commits; a failed run registers nothing.
    on_unmount: Vec<Box<dyn FnOnce()>>,
}

fn bump(sites: &mut HashMap<CallSite, u32>, site: CallSite) -> u32 {
    let counter = sites.entry(site).or_insert(0);
    let occurrence = *counter;
    *counter += 1;
    occurrence
}

impl Ui {
    pub(crate) fn new(rt: Runtime, scope: ScopeId, first_run: bool) -> Self {
        Self {
            rt,
            scope,
            first_run,
            stack: vec![ViewNode::new(NodeKind::Root)],
            children: Vec::new(),
            requested: HashSet::new(),
            scope_sites: HashMap::new(),
            cell_sites: HashMap::new(),
            used_cells: HashSet::new(),
            on_unmount: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Composed {
        // Fold anything left open (a container whose closure panicked is the
        // only way) back into the bottom entry.
        while self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                self.push_node(node);
            }
        }
        let output = self.stack.pop().map(|root| root.children).unwrap_or_default();
        Composed {
            output,
            children: self.children,
            used_cells: self.used_cells,
            on_unmount: self.on_unmount,
        }
    }

    /// The scope being evaluated.
    pub fn scope_id(&self) -> ScopeId {
        self.scope
    }

    pub fn runtime(&self) -> &Runtime {
        &self.rt
    }

    /// Whether this is the scope's first evaluation.
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Run `f` when this scope is torn down. Only the first successful
    /// evaluation registers; later calls are ignored.
    pub fn on_unmount(&mut self, f: impl FnOnce() + 'static) {
        if self.first_run {
            self.on_unmount.push(Box::new(f));
        }
    }

    // =========================================================================
    // Remembered state
    // =========================================================================

    /// A cell created on the first evaluation and returned unchanged on every
    /// later one. Torn down with the scope.
    #[track_caller]
    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> State<T> {
        let site = CallSite::caller();
        let occurrence = bump(&mut self.cell_sites, site);
        self.remember_at(
            SlotKey {
                site,
                slot: Slot::Positional(occurrence),
            },
            init,
            None,
        )
    }

    /// Like [`remember`](Self::remember), identified by `key` instead of
    /// occurrence.
    #[track_caller]
    pub fn remember_keyed<T: 'static>(
        &mut self,
        key: impl Into<Key>,
        init: impl FnOnce() -> T,
    ) -> State<T> {
        let slot = SlotKey {
            site: CallSite::caller(),
            slot: Slot::Keyed(key.into()),
        };
        self.remember_at(slot, init, None)
    }

    /// A remembered cell whose writes go through `validator`.
    #[track_caller]
    pub fn remember_validated<T: 'static>(
        &mut self,
        init: impl FnOnce() -> T,
        validator: impl Fn(&T) -> Result<(), String> + 'static,
    ) -> State<T> {
        let site = CallSite::caller();
        let occurrence = bump(&mut self.cell_sites, site);
        self.remember_at(
            SlotKey {
                site,
                slot: Slot::Positional(occurrence),
            },
            init,
            Some(Box::new(validator)),
        )
    }

    /// A cell stored under `key` in the runtime's stable store. It survives
    /// unmounting of this scope; re-mounting finds the same value.
    pub fn remember_stable<T: 'static>(
        &mut self,
        key: impl Into<Key>,
        init: impl FnOnce() -> T,
    ) -> State<T> {
        let id = self.rt.stable_cell(key.into(), init);
        State::new(self.rt.downgrade(), id)
    }

    fn remember_at<T: 'static>(
        &mut self,
        slot: SlotKey,
        init: impl FnOnce() -> T,
        validator: Option<crate::reactive::Validator<T>>,
    ) -> State<T> {
        self.used_cells.insert(slot.clone());
        let id = self.rt.remember_cell(self.scope, slot, init, validator);
        State::new(self.rt.downgrade(), id)
    }

    // =========================================================================
    // Child scopes
    // =========================================================================

    /// Evaluate `f` in its own child scope, re-run independently of this one.
    #[track_caller]
    pub fn scope(&mut self, f: impl Fn(&mut Ui) -> ViewResult + 'static) -> ViewResult {
        let site = CallSite::caller();
        let occurrence = bump(&mut self.scope_sites, site);
        self.child(
            SlotKey {
                site,
                slot: Slot::Positional(occurrence),
            },
            None,
            Rc::new(f),
        )
    }

    /// Child scope identified by `key`. Changing the key discards the old
    /// scope's state.
    #[track_caller]
    pub fn keyed(
        &mut self,
        key: impl Into<Key>,
        f: impl Fn(&mut Ui) -> ViewResult + 'static,
    ) -> ViewResult {
        self.keyed_at(CallSite::caller(), key.into(), Rc::new(f))
    }

    fn keyed_at(&mut self, site: CallSite, key: Key, view: ViewFn) -> ViewResult {
        self.child(
            SlotKey {
                site,
                slot: Slot::Keyed(key.clone()),
            },
            Some(key),
            view,
        )
    }

    /// Mount `f` while `presence` is present. Going absent tears the subtree
    /// and its state down; coming back starts fresh.
    #[track_caller]
    pub fn show(
        &mut self,
        presence: impl Into<Presence>,
        f: impl Fn(&mut Ui) -> ViewResult + 'static,
    ) -> ViewResult {
        let site = CallSite::caller();
        let occurrence = bump(&mut self.scope_sites, site);
        if !presence.into().is_present() {
            return Ok(());
        }
        self.child(
            SlotKey {
                site,
                slot: Slot::Positional(occurrence),
            },
            None,
            Rc::new(f),
        )
    }

    /// Mount `then` while present, `otherwise` while absent. Each branch has
    /// its own scope.
    #[track_caller]
    pub fn show_else(
        &mut self,
        presence: impl Into<Presence>,
        then: impl Fn(&mut Ui) -> ViewResult + 'static,
        otherwise: impl Fn(&mut Ui) -> ViewResult + 'static,
    ) -> ViewResult {
        let site = CallSite::caller();
        let then_slot = bump(&mut self.scope_sites, site);
        let else_slot = bump(&mut self.scope_sites, site);
        let present = presence.into().is_present();
        let occurrence = if present { then_slot } else { else_slot };
        let view: ViewFn = if present {
            Rc::new(then)
        } else {
            Rc::new(otherwise)
        };
        self.child(
            SlotKey {
                site,
                slot: Slot::Positional(occurrence),
            },
            None,
            view,
        )
    }

    fn child(&mut self, slot: SlotKey, key: Option<Key>, view: ViewFn) -> ViewResult {
        if !self.requested.insert(slot.clone()) {
            let key = match &slot.slot {
                Slot::Keyed(key) => key.clone(),
                Slot::Positional(n) => Key::Index(*n as u64),
            };
            return Err(ViewError::DuplicateKey(key));
        }
        let id = self.rt.child_id(self.scope, &slot);
        self.children.push(ChildRequest {
            id,
            key: slot,
            view,
        });
        let mut placeholder = ViewNode::new(NodeKind::Scope(id));
        placeholder.key = key;
        self.push_node(placeholder);
        Ok(())
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    fn push_node(&mut self, node: ViewNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.stack.push(node),
        }
    }

    fn container(
        &mut self,
        node: ViewNode,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        self.stack.push(node);
        let result = f(self);
        if let Some(node) = self.stack.pop() {
            self.push_node(node);
        }
        result
    }

    /// Append a prebuilt node.
    pub fn node(&mut self, node: ViewNode) {
        self.push_node(node);
    }

    pub fn text(&mut self, content: impl Into<String>) {
        self.styled_text(content, TextStyle::default(), Modifier::new());
    }

    pub fn styled_text(&mut self, content: impl Into<String>, style: TextStyle, modifier: Modifier) {
        self.push_node(
            ViewNode::new(NodeKind::Text {
                content: content.into(),
                style,
            })
            .with_modifier(modifier),
        );
    }

    pub fn column(
        &mut self,
        stack: Stack,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        self.container(ViewNode::new(NodeKind::Column(stack)).with_modifier(modifier), f)
    }

    pub fn row(
        &mut self,
        stack: Stack,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        self.container(ViewNode::new(NodeKind::Row(stack)).with_modifier(modifier), f)
    }

    /// Plain container. With no children it is just its modifier chain,
    /// e.g. a sized background block.
    pub fn boxed(
        &mut self,
        alignment: Alignment,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        self.container(ViewNode::new(NodeKind::Box(alignment)).with_modifier(modifier), f)
    }

    /// Container filled with `color`.
    pub fn surface(
        &mut self,
        color: Rgba,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        self.container(
            ViewNode::new(NodeKind::Surface { color }).with_modifier(modifier),
            f,
        )
    }

    /// Filled container with a frame.
    pub fn card(
        &mut self,
        style: CardStyle,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        self.container(ViewNode::new(NodeKind::Card(style)).with_modifier(modifier), f)
    }

    /// Framed clickable container. The whole outer bounds take the click.
    pub fn button(
        &mut self,
        on_click: impl Fn() + 'static,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        let modifier = Modifier::new()
            .clickable_handler(Handler::new(on_click))
            .then(modifier);
        self.container(ViewNode::new(NodeKind::Button).with_modifier(modifier), f)
    }

    pub fn spacer(&mut self, modifier: Modifier) {
        self.push_node(ViewNode::new(NodeKind::Spacer).with_modifier(modifier));
    }

    pub fn image(&mut self, style: ImageStyle, modifier: Modifier) {
        self.push_node(ViewNode::new(NodeKind::Image(style)).with_modifier(modifier));
    }

    /// Overlay dialog, painted centred above the rest of the tree.
    pub fn alert_dialog(&mut self, dialog: AlertDialog) -> ViewResult {
        let AlertDialog {
            title,
            text,
            confirm,
            dismiss,
            on_dismiss,
            background,
        } = dialog;

        let node = ViewNode::new(NodeKind::Dialog(DialogProps {
            on_dismiss,
            background,
        }))
        .with_modifier(Modifier::new().padding_each(1, 0, 1, 0));

        self.container(node, move |ui| {
            ui.column(Stack::spaced_by(1), Modifier::new(), |ui| {
                if let Some(title) = title {
                    ui.styled_text(title, TextStyle::bold(), Modifier::new());
                }
                ui.text(text);
                if confirm.is_some() || dismiss.is_some() {
                    ui.row(
                        Stack::new(Arrangement::End, Alignment::Start),
                        Modifier::new().fill_max_width(1.0),
                        |ui| {
                            for button in dismiss.into_iter().chain(confirm) {
                                let handler = button.on_click.clone();
                                ui.button(
                                    move || handler.call(),
                                    Modifier::new().padding_each(1, 0, 1, 0),
                                    |ui| {
                                        ui.styled_text(
                                            button.label,
                                            TextStyle::default().attrs(Attr::BOLD),
                                            Modifier::new(),
                                        );
                                        Ok(())
                                    },
                                )?;
                            }
                            Ok(())
                        },
                    )?;
                }
                Ok(())
            })
        })
    }

    /// Vertical list with one keyed child scope per item, so per-item state
    /// follows its key when items move.
    #[track_caller]
    pub fn lazy_column<T, K>(
        &mut self,
        items: impl IntoIterator<Item = T>,
        key_fn: impl Fn(&T) -> K,
        stack: Stack,
        modifier: Modifier,
        item_fn: impl Fn(&mut Ui, &T) -> ViewResult + 'static,
    ) -> ViewResult
    where
        T: 'static,
        K: Into<Key>,
    {
        let site = CallSite::caller();
        let item_fn = Rc::new(item_fn);
        let node = ViewNode::new(NodeKind::LazyColumn(stack)).with_modifier(modifier);
        self.container(node, move |ui| {
            for item in items {
                let key = key_fn(&item).into();
                let item_fn = item_fn.clone();
                ui.keyed_at(site, key, Rc::new(move |ui: &mut Ui| item_fn(ui, &item)))?;
            }
            Ok(())
        })
    }

    /// Convenience: a rounded border frame around `f` with no fill.
    pub fn outlined(
        &mut self,
        color: Rgba,
        modifier: Modifier,
        f: impl FnOnce(&mut Ui) -> ViewResult,
    ) -> ViewResult {
        let modifier = modifier.border_style(BorderStyle::Rounded, color).padding(1);
        self.container(ViewNode::new(NodeKind::Box(Alignment::Start)).with_modifier(modifier), f)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::RecomposeError;

    const PASSES: u32 = 8;

    fn mount(view: impl Fn(&mut Ui) -> ViewResult + 'static) -> (Runtime, ScopeId) {
        let rt = Runtime::new();
        let root = rt.create_root(view);
        rt.recompose(PASSES).unwrap();
        (rt, root)
    }

    #[test]
    fn test_containers_nest_children() {
        let (rt, root) = mount(|ui| {
            ui.column(Stack::default(), Modifier::new(), |ui| {
                ui.text("Hello");
                ui.spacer(Modifier::new().height(2));
                ui.text("World");
                Ok(())
            })
        });
        let tree = rt.resolve(root);
        assert_eq!(tree.children.len(), 1);
        let column = &tree.children[0];
        assert_eq!(column.kind.name(), "column");
        assert_eq!(column.children.len(), 3);
        assert_eq!(tree.texts(), vec!["Hello", "World"]);
    }

    #[test]
    fn test_error_inside_container_still_closes_it() {
        let rt = Runtime::new();
        let root = rt.create_root(|ui| {
            ui.column(Stack::default(), Modifier::new(), |_ui| Err(ViewError::failed("inner")))
        });
        let err = rt.recompose(PASSES).unwrap_err();
        assert!(matches!(
            err,
            RecomposeError::View { source: ViewError::Failed(ref m), .. } if m == "inner"
        ));
        assert_eq!(rt.evaluation_count(root), Some(0));
    }

    #[test]
    fn test_helper_called_twice_gets_independent_state() {
        fn counter(ui: &mut Ui, start: i32) -> State<i32> {
            ui.remember(|| start)
        }
        let cells: Rc<RefCell<Vec<State<i32>>>> = Rc::new(RefCell::new(Vec::new()));
        let (_rt, _root) = mount({
            let cells = cells.clone();
            move |ui| {
                let a = counter(ui, 1);
                let b = counter(ui, 2);
                *cells.borrow_mut() = vec![a, b];
                Ok(())
            }
        });
        let cells = cells.borrow();
        assert_ne!(cells[0], cells[1]);
        assert_eq!(cells[0].get(), 1);
        assert_eq!(cells[1].get(), 2);
    }

    #[test]
    fn test_show_toggle_resets_state() {
        let visible = Rc::new(RefCell::new(None::<State<bool>>));
        let inner = Rc::new(RefCell::new(None::<State<i32>>));

        let (rt, root) = mount({
            let visible = visible.clone();
            let inner = inner.clone();
            move |ui| {
                let shown = ui.remember(|| true);
                *visible.borrow_mut() = Some(shown.clone());
                let inner = inner.clone();
                ui.show(shown.get(), move |ui| {
                    let count = ui.remember(|| 0);
                    ui.text(format!("count {}", count.get()));
                    *inner.borrow_mut() = Some(count);
                    Ok(())
                })
            }
        });
        let shown = visible.borrow().clone().unwrap();
        inner.borrow().clone().unwrap().set(5);
        rt.recompose(PASSES).unwrap();
        assert!(rt.resolve(root).contains_text("count 5"));

        shown.set(false);
        rt.recompose(PASSES).unwrap();
        assert!(!rt.resolve(root).contains_text("count"));

        shown.set(true);
        rt.recompose(PASSES).unwrap();
        assert!(rt.resolve(root).contains_text("count 0"));
    }

    #[test]
    fn test_stable_state_survives_toggle() {
        let visible = Rc::new(RefCell::new(None::<State<bool>>));
        let inner = Rc::new(RefCell::new(None::<State<i32>>));

        let (rt, root) = mount({
            let visible = visible.clone();
            let inner = inner.clone();
            move |ui| {
                let shown = ui.remember(|| true);
                *visible.borrow_mut() = Some(shown.clone());
                let inner = inner.clone();
                ui.show(shown.get(), move |ui| {
                    let count = ui.remember_stable("draft", || 0);
                    ui.text(format!("count {}", count.get()));
                    *inner.borrow_mut() = Some(count);
                    Ok(())
                })
            }
        });
        let shown = visible.borrow().clone().unwrap();
        inner.borrow().clone().unwrap().set(9);
        shown.set(false);
        rt.recompose(PASSES).unwrap();
        shown.set(true);
        rt.recompose(PASSES).unwrap();
        assert!(rt.resolve(root).contains_text("count 9"));
    }

    #[test]
    fn test_show_else_switches_branches() {
        let flag = Rc::new(RefCell::new(None::<State<bool>>));
        let (rt, root) = mount({
            let flag = flag.clone();
            move |ui| {
                let on = ui.remember(|| false);
                *flag.borrow_mut() = Some(on.clone());
                ui.show_else(
                    on.get(),
                    |ui| {
                        ui.text("on");
                        Ok(())
                    },
                    |ui| {
                        ui.text("off");
                        Ok(())
                    },
                )
            }
        });
        assert_eq!(rt.resolve(root).texts(), vec!["off"]);
        flag.borrow().clone().unwrap().set(true);
        rt.recompose(PASSES).unwrap();
        assert_eq!(rt.resolve(root).texts(), vec!["on"]);
        assert_eq!(rt.children_of(root).len(), 1);
    }

    #[test]
    fn test_lazy_column_state_follows_keys() {
        let items = Rc::new(RefCell::new(None::<State<Vec<&'static str>>>));
        let cells: Rc<RefCell<HashMap<&'static str, State<u32>>>> =
            Rc::new(RefCell::new(HashMap::new()));

        let (rt, root) = mount({
            let items = items.clone();
            let cells = cells.clone();
            move |ui| {
                let list = ui.remember(|| vec!["a", "b", "c"]);
                *items.borrow_mut() = Some(list.clone());
                let cells = cells.clone();
                ui.lazy_column(
                    list.get(),
                    |name| *name,
                    Stack::spaced_by(1),
                    Modifier::new(),
                    move |ui, name| {
                        let taps = ui.remember(|| 0u32);
                        cells.borrow_mut().insert(*name, taps.clone());
                        ui.text(format!("{name}:{}", taps.get()));
                        Ok(())
                    },
                )
            }
        });

        cells.borrow()["b"].set(7);
        rt.recompose(PASSES).unwrap();

        items.borrow().clone().unwrap().set(vec!["c", "b", "a"]);
        rt.recompose(PASSES).unwrap();

        let tree = rt.resolve(root);
        assert_eq!(tree.texts(), vec!["c:0", "b:7", "a:0"]);
        let list = &tree.children[0];
        assert_eq!(list.children[1].key, Some(Key::from("b")));
    }

    #[test]
    fn test_duplicate_list_key_fails() {
        let rt = Runtime::new();
        rt.create_root(|ui| {
            ui.lazy_column(
                vec![1u32, 1u32],
                |n| *n,
                Stack::default(),
                Modifier::new(),
                |ui, n| {
                    ui.text(n.to_string());
                    Ok(())
                },
            )
        });
        let err = rt.recompose(PASSES).unwrap_err();
        assert!(matches!(
            err,
            RecomposeError::View { source: ViewError::DuplicateKey(Key::Index(1)), .. }
        ));
    }

    #[test]
    fn test_alert_dialog_builds_overlay_node() {
        let (rt, root) = mount(|ui| {
            ui.alert_dialog(
                AlertDialog::new("Congratulations!", || {})
                    .title("Done")
                    .confirm(DialogButton::new("OK", || {})),
            )
        });
        let tree = rt.resolve(root);
        assert_eq!(tree.count(|n| matches!(n.kind, NodeKind::Dialog(_))), 1);
        assert_eq!(tree.count(|n| n.kind == NodeKind::Button), 1);
        assert_eq!(tree.texts(), vec!["Done", "Congratulations!", "OK"]);
    }
}
