//! Runtime - the context-owned store behind one mount point.
//!
//! Owns every scope, every observable cell, the dependency edges between
//! them, and the dirty set the scheduler drains. Nothing here is global:
//! two runtimes never share state, so independent mounts cannot interfere.
//!
//! # Evaluation order
//!
//! A scope's view function runs with the scope on top of the observer
//! stack, so every cell read during the run is recorded as a dependency.
//! Child scopes requested by the view are *not* evaluated inline. After the
//! parent's view returns, the runtime:
//!
//! 1. commits the parent's output,
//! 2. tears down children (and cells) the parent no longer reached,
//! 3. creates the newly requested children,
//! 4. evaluates every reached child in request order.
//!
//! Step 2 always runs before step 3, so a subtree that disappears from a
//! position is gone before anything new is initialised there.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use super::cell::State;
use super::scope::{CallSite, CellId, Key, ScopeId, SlotKey};
use crate::error::{CellError, RecomposeError, ViewError, ViewResult};
use crate::view::compose::{ChildRequest, Composed, Ui};
use crate::view::node::{NodeKind, ViewNode};

/// A view function: captured props in, nodes out through the [`Ui`] builder.
pub type ViewFn = Rc<dyn Fn(&mut Ui) -> ViewResult>;

/// Validator attached to a cell; `Err` carries the rejection reason.
pub type Validator<T> = Box<dyn Fn(&T) -> Result<(), String>>;

/// Typed storage for one cell, held behind `Rc<dyn Any>`.
pub(crate) struct CellBox<T> {
    pub(crate) value: RefCell<T>,
    pub(crate) validator: Option<Validator<T>>,
}

struct CellEntry {
    data: Rc<dyn Any>,
    /// `None` for free cells and stable cells, which live as long as the runtime.
    owner: Option<ScopeId>,
    dependents: BTreeSet<ScopeId>,
    version: u64,
}

struct ScopeEntry {
    parent: Option<ScopeId>,
    depth: u32,
    key: Option<SlotKey>,
    view: Option<ViewFn>,
    output: Vec<ViewNode>,
    children: Vec<ScopeId>,
    cells: HashMap<SlotKey, CellId>,
    reads: HashSet<CellId>,
    on_dispose: Vec<Box<dyn FnOnce()>>,
    evaluations: u64,
}

impl ScopeEntry {
    fn new(parent: Option<ScopeId>, depth: u32, key: Option<SlotKey>, view: Option<ViewFn>) -> Self {
        Self {
            parent,
            depth,
            key,
            view,
            output: Vec::new(),
            children: Vec::new(),
            cells: HashMap::new(),
            reads: HashSet::new(),
            on_dispose: Vec::new(),
            evaluations: 0,
        }
    }
}

#[derive(Default)]
pub(crate) struct RuntimeInner {
    next_id: Cell<u64>,
    cells: RefCell<HashMap<CellId, CellEntry>>,
    scopes: RefCell<HashMap<ScopeId, ScopeEntry>>,
    stable: RefCell<HashMap<Key, CellId>>,
    /// Evaluation stack. `None` entries suspend tracking (see [`Runtime::untrack`]).
    observers: RefCell<Vec<Option<ScopeId>>>,
    /// Dirty scopes ordered shallowest first.
    dirty: RefCell<BTreeSet<(u32, ScopeId)>>,
    pass_evaluated: RefCell<HashSet<ScopeId>>,
    batch_depth: Cell<u32>,
    recomposing: Cell<bool>,
    evaluations: Cell<u64>,
    writes: Cell<u64>,
}

/// Counters from one [`Runtime::recompose`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecomposeStats {
    /// Scheduler passes over the dirty set.
    pub passes: u32,
    /// View function evaluations, children included.
    pub evaluations: u64,
}

/// Handle to a reactive runtime. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("scopes", &self.scope_count())
            .field("cells", &self.cell_count())
            .field("dirty", &self.inner.dirty.borrow().len())
            .finish()
    }
}

impl Runtime {
    /// Create an empty runtime.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn downgrade(&self) -> Weak<RuntimeInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<RuntimeInner>) -> Option<Runtime> {
        weak.upgrade().map(|inner| Runtime { inner })
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        id
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    /// Create a root scope running `view`. It is evaluated by the next
    /// [`recompose`](Self::recompose).
    pub fn create_root(&self, view: impl Fn(&mut Ui) -> ViewResult + 'static) -> ScopeId {
        let id = ScopeId::from_raw(self.next_id());
        let view: ViewFn = Rc::new(view);
        self.inner
            .scopes
            .borrow_mut()
            .insert(id, ScopeEntry::new(None, 0, None, Some(view)));
        self.mark_dirty(id);
        debug!(scope = ?id, "root scope created");
        id
    }

    /// Whether `scope` is still mounted.
    pub fn is_alive(&self, scope: ScopeId) -> bool {
        self.inner.scopes.borrow().contains_key(&scope)
    }

    /// Number of live scopes.
    pub fn scope_count(&self) -> usize {
        self.inner.scopes.borrow().len()
    }

    /// Number of live cells (scoped, stable and free).
    pub fn cell_count(&self) -> usize {
        self.inner.cells.borrow().len()
    }

    /// How many times `scope`'s view has completed successfully.
    pub fn evaluation_count(&self, scope: ScopeId) -> Option<u64> {
        self.inner.scopes.borrow().get(&scope).map(|entry| entry.evaluations)
    }

    /// Child scopes of `scope` in the order its last evaluation reached them.
    pub fn children_of(&self, scope: ScopeId) -> Vec<ScopeId> {
        self.inner
            .scopes
            .borrow()
            .get(&scope)
            .map(|entry| entry.children.clone())
            .unwrap_or_default()
    }

    /// The parent of `scope`, if any.
    pub fn parent_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.inner.scopes.borrow().get(&scope).and_then(|entry| entry.parent)
    }

    /// The explicit key `scope` was created with, if any.
    pub fn key_of(&self, scope: ScopeId) -> Option<Key> {
        let scopes = self.inner.scopes.borrow();
        let entry = scopes.get(&scope)?;
        match &entry.key.as_ref()?.slot {
            super::scope::Slot::Keyed(key) => Some(key.clone()),
            super::scope::Slot::Positional(_) => None,
        }
    }

    /// Tear a scope down: its children first, then its dispose callbacks,
    /// then every cell it owns.
    pub fn dispose_scope(&self, scope: ScopeId) {
        let children = match self.inner.scopes.borrow().get(&scope) {
            Some(entry) => entry.children.clone(),
            None => return,
        };
        for child in children {
            self.dispose_scope(child);
        }

        let Some(entry) = self.inner.scopes.borrow_mut().remove(&scope) else {
            return;
        };
        trace!(scope = ?scope, cells = entry.cells.len(), "scope disposed");

        self.inner.dirty.borrow_mut().remove(&(entry.depth, scope));
        self.inner.pass_evaluated.borrow_mut().remove(&scope);

        if let Some(parent) = entry.parent {
            if let Some(parent_entry) = self.inner.scopes.borrow_mut().get_mut(&parent) {
                parent_entry.children.retain(|&child| child != scope);
            }
        }

        {
            let mut cells = self.inner.cells.borrow_mut();
            for cell in &entry.reads {
                if let Some(cell_entry) = cells.get_mut(cell) {
                    cell_entry.dependents.remove(&scope);
                }
            }
        }

        for callback in entry.on_dispose {
            callback();
        }

        for cell in entry.cells.into_values() {
            self.drop_cell(cell);
        }
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// Create a free cell owned by the runtime itself.
    ///
    /// Free cells are never torn down with a scope; use them for state shared
    /// with code outside the view tree.
    pub fn create_cell<T: 'static>(&self, value: T) -> State<T> {
        let id = self.alloc_cell(None, value, None);
        State::new(self.downgrade(), id)
    }

    /// Like [`create_cell`](Self::create_cell) with a validator.
    pub fn create_validated_cell<T: 'static>(
        &self,
        value: T,
        validator: impl Fn(&T) -> Result<(), String> + 'static,
    ) -> State<T> {
        let id = self.alloc_cell(None, value, Some(Box::new(validator)));
        State::new(self.downgrade(), id)
    }

    fn alloc_cell<T: 'static>(
        &self,
        owner: Option<ScopeId>,
        value: T,
        validator: Option<Validator<T>>,
    ) -> CellId {
        let id = CellId::from_raw(self.next_id());
        let data: Rc<dyn Any> = Rc::new(CellBox {
            value: RefCell::new(value),
            validator,
        });
        self.inner.cells.borrow_mut().insert(
            id,
            CellEntry {
                data,
                owner,
                dependents: BTreeSet::new(),
                version: 0,
            },
        );
        trace!(cell = ?id, owner = ?owner, "cell created");
        id
    }

    fn drop_cell(&self, cell: CellId) {
        let Some(entry) = self.inner.cells.borrow_mut().remove(&cell) else {
            return;
        };
        let mut scopes = self.inner.scopes.borrow_mut();
        for dependent in entry.dependents {
            if let Some(scope) = scopes.get_mut(&dependent) {
                scope.reads.remove(&cell);
            }
        }
    }

    /// Find or create the cell remembered at `key` inside `scope`.
    pub(crate) fn remember_cell<T: 'static>(
        &self,
        scope: ScopeId,
        key: SlotKey,
        init: impl FnOnce() -> T,
        validator: Option<Validator<T>>,
    ) -> CellId {
        let existing = self
            .inner
            .scopes
            .borrow()
            .get(&scope)
            .and_then(|entry| entry.cells.get(&key).copied());

        if let Some(id) = existing {
            if self.holds::<T>(id) {
                return id;
            }
            // Same slot, different type: the old value cannot be reused.
            self.drop_cell(id);
        }

        let id = self.alloc_cell(Some(scope), init(), validator);
        if let Some(entry) = self.inner.scopes.borrow_mut().get_mut(&scope) {
            entry.cells.insert(key, id);
        }
        id
    }

    /// Find or create the stable cell for `key`. Stable cells outlive the
    /// scopes that read them.
    pub(crate) fn stable_cell<T: 'static>(&self, key: Key, init: impl FnOnce() -> T) -> CellId {
        let existing = self.inner.stable.borrow().get(&key).copied();
        if let Some(id) = existing {
            if self.holds::<T>(id) {
                return id;
            }
            warn!(key = ?key, "stable key reused with a different value type; resetting");
            self.drop_cell(id);
        }
        let id = self.alloc_cell(None, init(), None);
        self.inner.stable.borrow_mut().insert(key, id);
        id
    }

    fn holds<T: 'static>(&self, cell: CellId) -> bool {
        self.inner
            .cells
            .borrow()
            .get(&cell)
            .is_some_and(|entry| (*entry.data).is::<CellBox<T>>())
    }

    pub(crate) fn cell_box<T: 'static>(&self, cell: CellId) -> Result<Rc<CellBox<T>>, CellError> {
        let data = self
            .inner
            .cells
            .borrow()
            .get(&cell)
            .map(|entry| entry.data.clone())
            .ok_or(CellError::Disposed)?;
        // A handle is only ever created for the type it was allocated with.
        data.downcast::<CellBox<T>>().map_err(|_| CellError::Disposed)
    }

    pub(crate) fn cell_version(&self, cell: CellId) -> Option<u64> {
        self.inner.cells.borrow().get(&cell).map(|entry| entry.version)
    }

    pub(crate) fn cell_owner(&self, cell: CellId) -> Option<ScopeId> {
        self.inner.cells.borrow().get(&cell).and_then(|entry| entry.owner)
    }

    /// Number of scopes currently depending on `cell`.
    pub(crate) fn dependent_count(&self, cell: CellId) -> usize {
        self.inner
            .cells
            .borrow()
            .get(&cell)
            .map_or(0, |entry| entry.dependents.len())
    }

    /// Record a read of `cell` by the scope currently evaluating, if any.
    pub(crate) fn track(&self, cell: CellId) {
        let Some(observer) = self.inner.observers.borrow().last().copied().flatten() else {
            return;
        };
        if let Some(entry) = self.inner.cells.borrow_mut().get_mut(&cell) {
            entry.dependents.insert(observer);
        }
        if let Some(scope) = self.inner.scopes.borrow_mut().get_mut(&observer) {
            scope.reads.insert(cell);
        }
    }

    /// A value-changing write landed in `cell`: bump its version and
    /// schedule every dependent.
    pub(crate) fn note_write(&self, cell: CellId) {
        let dependents: Vec<ScopeId> = {
            let mut cells = self.inner.cells.borrow_mut();
            let Some(entry) = cells.get_mut(&cell) else {
                return;
            };
            entry.version += 1;
            entry.dependents.iter().copied().collect()
        };
        self.inner.writes.set(self.inner.writes.get() + 1);
        trace!(cell = ?cell, dependents = dependents.len(), batched = self.in_batch(), "cell written");
        for scope in dependents {
            self.mark_dirty(scope);
        }
    }

    /// Total value-changing writes seen by this runtime.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.get()
    }

    /// Run `f` without recording dependencies for the current scope.
    pub fn untrack<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = ObserverGuard::push(&self.inner, None);
        f()
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Run `f` as one logical event. Writes inside only mark scopes dirty;
    /// the host runs a single recompose pass once the outermost batch ends.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        self.inner.batch_depth.set(self.inner.batch_depth.get() + 1);
        let _guard = BatchGuard(&self.inner);
        f()
    }

    /// Whether a batch is open.
    pub fn in_batch(&self) -> bool {
        self.inner.batch_depth.get() > 0
    }

    /// Whether any scope is waiting for re-evaluation.
    pub fn has_pending(&self) -> bool {
        !self.inner.dirty.borrow().is_empty()
    }

    /// Whether a recompose is currently running.
    pub fn is_recomposing(&self) -> bool {
        self.inner.recomposing.get()
    }

    pub(crate) fn mark_dirty(&self, scope: ScopeId) {
        let depth = match self.inner.scopes.borrow().get(&scope) {
            Some(entry) => entry.depth,
            None => return,
        };
        self.inner.dirty.borrow_mut().insert((depth, scope));
    }

    /// Re-evaluate every dirty scope, shallowest first, until nothing is
    /// dirty.
    ///
    /// Within one pass each scope runs at most once. A write made while a
    /// view evaluates (to a scope already evaluated in this pass) schedules
    /// another pass; more than `max_passes` passes fails with
    /// [`RecomposeError::PassLimit`].
    ///
    /// On failure the failing scope stays dirty and is retried by the next
    /// call.
    pub fn recompose(&self, max_passes: u32) -> Result<RecomposeStats, RecomposeError> {
        if self.inner.recomposing.get() {
            return Err(RecomposeError::Reentrant);
        }
        self.inner.recomposing.set(true);
        let _guard = RecomposeGuard(&self.inner);

        let start = self.inner.evaluations.get();
        let mut stats = RecomposeStats::default();

        while self.has_pending() {
            if stats.passes >= max_passes {
                warn!(passes = stats.passes, "recompose did not settle");
                return Err(RecomposeError::PassLimit { passes: stats.passes });
            }
            stats.passes += 1;
            self.inner.pass_evaluated.borrow_mut().clear();

            loop {
                let next = {
                    let dirty = self.inner.dirty.borrow();
                    let evaluated = self.inner.pass_evaluated.borrow();
                    dirty.iter().find(|(_, scope)| !evaluated.contains(scope)).copied()
                };
                let Some(entry) = next else { break };
                self.inner.dirty.borrow_mut().remove(&entry);

                let scope = entry.1;
                if let Err(source) = self.evaluate(scope) {
                    warn!(scope = ?scope, error = %source, "view evaluation failed");
                    return Err(RecomposeError::View { scope, source });
                }
            }
        }

        stats.evaluations = self.inner.evaluations.get() - start;
        if stats.passes > 0 {
            debug!(passes = stats.passes, evaluations = stats.evaluations, "recompose settled");
        }
        Ok(stats)
    }

    /// Evaluate one scope and, after it commits, its reached children.
    fn evaluate(&self, scope: ScopeId) -> Result<(), ViewError> {
        let view = {
            let scopes = self.inner.scopes.borrow();
            let Some(entry) = scopes.get(&scope) else {
                return Ok(());
            };
            self.inner.dirty.borrow_mut().remove(&(entry.depth, scope));
            entry.view.clone()
        };
        let Some(view) = view else { return Ok(()) };

        self.inner.pass_evaluated.borrow_mut().insert(scope);
        self.clear_reads(scope);

        let first_run = self.evaluation_count(scope) == Some(0);
        let mut ui = Ui::new(self.clone(), scope, first_run);
        let result = {
            let _guard = ObserverGuard::push(&self.inner, Some(scope));
            view(&mut ui)
        };

        if let Err(err) = result {
            self.mark_dirty(scope);
            return Err(err);
        }

        self.inner.evaluations.set(self.inner.evaluations.get() + 1);
        trace!(scope = ?scope, "scope evaluated");

        let requests = self.commit(scope, ui.finish());
        let children: Vec<ScopeId> = requests.iter().map(|request| request.id).collect();
        for (index, child) in children.iter().enumerate() {
            if let Err(source) = self.evaluate(*child) {
                // Siblings that never ran must not be forgotten on retry.
                for sibling in &children[index + 1..] {
                    self.mark_dirty(*sibling);
                }
                return Err(ViewError::Child {
                    scope: *child,
                    source: Box::new(source),
                });
            }
        }
        Ok(())
    }

    fn clear_reads(&self, scope: ScopeId) {
        let reads: Vec<CellId> = match self.inner.scopes.borrow_mut().get_mut(&scope) {
            Some(entry) => entry.reads.drain().collect(),
            None => return,
        };
        let mut cells = self.inner.cells.borrow_mut();
        for cell in reads {
            if let Some(entry) = cells.get_mut(&cell) {
                entry.dependents.remove(&scope);
            }
        }
    }

    /// Store a successful evaluation: output, unreached-child teardown, then
    /// creation of new children. Returns the children to evaluate, in order.
    fn commit(&self, scope: ScopeId, composed: Composed) -> Vec<ChildRequest> {
        let Composed {
            output,
            children,
            used_cells,
            on_unmount,
        } = composed;

        let reached: HashSet<ScopeId> = children.iter().map(|request| request.id).collect();

        let (stale_children, stale_cells, depth) = {
            let mut scopes = self.inner.scopes.borrow_mut();
            let Some(entry) = scopes.get_mut(&scope) else {
                return Vec::new();
            };
            entry.output = output;
            entry.evaluations += 1;
            entry.on_dispose.extend(on_unmount);

            let stale_children: Vec<ScopeId> = entry
                .children
                .iter()
                .copied()
                .filter(|child| !reached.contains(child))
                .collect();

            let stale_keys: Vec<SlotKey> = entry
                .cells
                .keys()
                .filter(|key| !used_cells.contains(*key))
                .cloned()
                .collect();
            let stale_cells: Vec<CellId> = stale_keys
                .iter()
                .filter_map(|key| entry.cells.remove(key))
                .collect();

            (stale_children, stale_cells, entry.depth)
        };

        for child in stale_children {
            self.dispose_scope(child);
        }
        for cell in stale_cells {
            self.drop_cell(cell);
        }

        {
            let mut scopes = self.inner.scopes.borrow_mut();
            for request in &children {
                match scopes.get_mut(&request.id) {
                    Some(existing) => existing.view = Some(request.view.clone()),
                    None => {
                        scopes.insert(
                            request.id,
                            ScopeEntry::new(
                                Some(scope),
                                depth + 1,
                                Some(request.key.clone()),
                                Some(request.view.clone()),
                            ),
                        );
                    }
                }
            }
            if let Some(entry) = scopes.get_mut(&scope) {
                entry.children = children.iter().map(|request| request.id).collect();
            }
        }

        children
    }

    /// Identify the child at `key` under `parent`, reserving a fresh id when
    /// none exists yet. The child entry itself is created at commit time.
    pub(crate) fn child_id(&self, parent: ScopeId, key: &SlotKey) -> ScopeId {
        let existing = {
            let scopes = self.inner.scopes.borrow();
            scopes.get(&parent).and_then(|entry| {
                entry.children.iter().copied().find(|child| {
                    scopes
                        .get(child)
                        .is_some_and(|child_entry| child_entry.key.as_ref() == Some(key))
                })
            })
        };
        existing.unwrap_or_else(|| ScopeId::from_raw(self.next_id()))
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Assemble the full tree under `root`, splicing every child scope's
    /// committed output in place of its placeholder.
    pub fn resolve(&self, root: ScopeId) -> ViewNode {
        let scopes = self.inner.scopes.borrow();
        let mut children = Vec::new();
        resolve_scope(&scopes, root, &mut children);
        ViewNode::root(children)
    }
}

fn resolve_scope(scopes: &HashMap<ScopeId, ScopeEntry>, scope: ScopeId, out: &mut Vec<ViewNode>) {
    let Some(entry) = scopes.get(&scope) else {
        return;
    };
    for node in &entry.output {
        resolve_node(scopes, node, out);
    }
}

fn resolve_node(scopes: &HashMap<ScopeId, ScopeEntry>, node: &ViewNode, out: &mut Vec<ViewNode>) {
    if let NodeKind::Scope(child) = node.kind {
        let start = out.len();
        resolve_scope(scopes, child, out);
        // Only a lone node can stand for the scope's key; several siblings
        // sharing it would be indistinguishable when diffed.
        if let (Some(key), [spliced]) = (&node.key, &mut out[start..]) {
            if spliced.key.is_none() {
                spliced.key = Some(key.clone());
            }
        }
        return;
    }

    let mut resolved = ViewNode {
        kind: node.kind.clone(),
        modifier: node.modifier.clone(),
        key: node.key.clone(),
        children: Vec::with_capacity(node.children.len()),
    };
    for child in &node.children {
        resolve_node(scopes, child, &mut resolved.children);
    }
    out.push(resolved);
}

// =============================================================================
// Guards
// =============================================================================

struct ObserverGuard<'a>(&'a RuntimeInner);

impl<'a> ObserverGuard<'a> {
    fn push(inner: &'a RuntimeInner, observer: Option<ScopeId>) -> Self {
        inner.observers.borrow_mut().push(observer);
        Self(inner)
    }
}

impl Drop for ObserverGuard<'_> {
    fn drop(&mut self) {
        self.0.observers.borrow_mut().pop();
    }
}

struct BatchGuard<'a>(&'a RuntimeInner);

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.0.batch_depth.set(self.0.batch_depth.get().saturating_sub(1));
    }
}

struct RecomposeGuard<'a>(&'a RuntimeInner);

impl Drop for RecomposeGuard<'_> {
    fn drop(&mut self) {
        self.0.recomposing.set(false);
    }
}

/// Current call site, for callers building [`SlotKey`]s by hand.
#[track_caller]
pub fn call_site() -> CallSite {
    CallSite::caller()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::reactive::Presence;

    const PASSES: u32 = 8;

    #[test]
    fn test_root_evaluates_on_first_recompose() {
        let rt = Runtime::new();
        let root = rt.create_root(|ui| {
            ui.text("hello");
            Ok(())
        });
        assert!(rt.has_pending());
        let stats = rt.recompose(PASSES).unwrap();
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.evaluations, 1);
        assert_eq!(rt.evaluation_count(root), Some(1));
        assert!(!rt.has_pending());
    }

    #[test]
    fn test_counter_increment_three_times_in_one_batch() {
        let rt = Runtime::new();
        let seen = Rc::new(Cell::new(-1));
        let counter = rt.create_cell(0);

        let root = rt.create_root({
            let counter = counter.clone();
            let seen = seen.clone();
            move |ui| {
                seen.set(counter.get());
                ui.text(format!("{}", counter.get()));
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        assert_eq!(seen.get(), 0);

        rt.batch(|| {
            for _ in 0..3 {
                counter.update(|value| *value += 1);
            }
        });
        let stats = rt.recompose(PASSES).unwrap();

        assert_eq!(stats.evaluations, 1);
        assert_eq!(seen.get(), 3);
        assert_eq!(rt.evaluation_count(root), Some(2));
    }

    #[test]
    fn test_equal_write_does_not_schedule() {
        let rt = Runtime::new();
        let flag = rt.create_cell(true);
        rt.create_root({
            let flag = flag.clone();
            move |_ui| {
                let _ = flag.get();
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();

        flag.set(false);
        assert!(rt.has_pending());
        rt.recompose(PASSES).unwrap();

        flag.set(false);
        assert!(!rt.has_pending());
    }

    #[test]
    fn test_read_outside_scope_tracks_nothing() {
        let rt = Runtime::new();
        let cell = rt.create_cell(5);
        assert_eq!(cell.get(), 5);
        assert_eq!(rt.dependent_count(cell.id()), 0);
        cell.set(6);
        assert!(!rt.has_pending());
    }

    #[test]
    fn test_untracked_read_inside_view_is_not_a_dependency() {
        let rt = Runtime::new();
        let cell = rt.create_cell(1);
        rt.create_root({
            let cell = cell.clone();
            let rt = rt.clone();
            move |_ui| {
                let _ = rt.untrack(|| cell.get());
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        cell.set(2);
        assert!(!rt.has_pending());
    }

    #[test]
    fn test_only_readers_are_reevaluated() {
        let rt = Runtime::new();
        let a = rt.create_cell(0);
        let b = rt.create_cell(0);
        let root = rt.create_root({
            let a = a.clone();
            let b = b.clone();
            move |ui| {
                let _ = a.get();
                let b = b.clone();
                ui.scope(move |_ui| {
                    let _ = b.get();
                    Ok(())
                })?;
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        let child = rt.children_of(root)[0];

        b.set(1);
        let stats = rt.recompose(PASSES).unwrap();
        assert_eq!(stats.evaluations, 1);
        assert_eq!(rt.evaluation_count(root), Some(1));
        assert_eq!(rt.evaluation_count(child), Some(2));

        a.set(1);
        let stats = rt.recompose(PASSES).unwrap();
        // Parent re-runs and takes its reached child along.
        assert_eq!(stats.evaluations, 2);
    }

    #[test]
    fn test_remembered_state_survives_reevaluation() {
        let rt = Runtime::new();
        let trigger = rt.create_cell(0);
        let captured: Rc<RefCell<Option<State<i32>>>> = Rc::new(RefCell::new(None));

        rt.create_root({
            let trigger = trigger.clone();
            let captured = captured.clone();
            move |ui| {
                let _ = trigger.get();
                let count = ui.remember(|| 10);
                *captured.borrow_mut() = Some(count);
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        let first = captured.borrow().clone().unwrap();
        first.set(11);

        trigger.set(1);
        rt.recompose(PASSES).unwrap();
        let second = captured.borrow().clone().unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(second.get(), 11);
    }

    #[test]
    fn test_unreached_child_is_torn_down_with_its_cells() {
        let rt = Runtime::new();
        let show = rt.create_cell(true);
        let inner: Rc<RefCell<Option<State<u8>>>> = Rc::new(RefCell::new(None));

        let root = rt.create_root({
            let show = show.clone();
            let inner = inner.clone();
            move |ui| {
                let inner = inner.clone();
                ui.show(show.get(), move |ui| {
                    *inner.borrow_mut() = Some(ui.remember(|| 1u8));
                    Ok(())
                })?;
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        let child = rt.children_of(root)[0];
        let cell = inner.borrow().clone().unwrap();
        assert!(cell.is_alive());

        show.set(false);
        rt.recompose(PASSES).unwrap();
        assert!(!rt.is_alive(child));
        assert!(!cell.is_alive());
        assert_eq!(cell.try_get(), Err(CellError::Disposed));
    }

    #[test]
    fn test_teardown_runs_before_new_scope_initialises() {
        let rt = Runtime::new();
        let which = rt.create_cell(0u32);
        let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        rt.create_root({
            let which = which.clone();
            let log = log.clone();
            move |ui| {
                let key = which.get();
                let log = log.clone();
                ui.keyed(key, move |ui| {
                    let first = ui.is_first_run();
                    if first {
                        log.borrow_mut().push(format!("init {key}"));
                        let log = log.clone();
                        ui.on_unmount(move || log.borrow_mut().push(format!("drop {key}")));
                    }
                    Ok(())
                })?;
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        which.set(1);
        rt.recompose(PASSES).unwrap();

        assert_eq!(*log.borrow(), vec!["init 0", "drop 0", "init 1"]);
    }

    #[test]
    fn test_failed_evaluation_stays_dirty() {
        let rt = Runtime::new();
        let fail = rt.create_cell(true);
        let root = rt.create_root({
            let fail = fail.clone();
            move |_ui| {
                if fail.get() {
                    return Err(ViewError::failed("not ready"));
                }
                Ok(())
            }
        });

        let err = rt.recompose(PASSES).unwrap_err();
        assert!(matches!(err, RecomposeError::View { scope, .. } if scope == root));
        assert!(rt.has_pending());
        assert_eq!(rt.evaluation_count(root), Some(0));

        fail.set(false);
        rt.recompose(PASSES).unwrap();
        assert_eq!(rt.evaluation_count(root), Some(1));
    }

    #[test]
    fn test_failed_first_run_registers_unmount_once() {
        let rt = Runtime::new();
        let fail = rt.create_cell(true);
        let unmounts = Rc::new(Cell::new(0));
        let root = rt.create_root({
            let fail = fail.clone();
            let unmounts = unmounts.clone();
            move |ui| {
                let unmounts = unmounts.clone();
                ui.on_unmount(move || unmounts.set(unmounts.get() + 1));
                if fail.get() {
                    return Err(ViewError::failed("not ready"));
                }
                Ok(())
            }
        });

        assert!(rt.recompose(PASSES).is_err());
        fail.set(false);
        rt.recompose(PASSES).unwrap();
        assert_eq!(rt.evaluation_count(root), Some(1));

        rt.dispose_scope(root);
        assert_eq!(unmounts.get(), 1);
    }

    #[test]
    fn test_self_feeding_write_hits_pass_limit() {
        let rt = Runtime::new();
        let cell = rt.create_cell(0u64);
        rt.create_root({
            let cell = cell.clone();
            move |_ui| {
                let value = cell.get();
                cell.set(value + 1);
                Ok(())
            }
        });
        let err = rt.recompose(4).unwrap_err();
        assert_eq!(err, RecomposeError::PassLimit { passes: 4 });
    }

    #[test]
    fn test_reentrant_write_that_settles_takes_two_passes() {
        let rt = Runtime::new();
        let cell = rt.create_cell(0u64);
        rt.create_root({
            let cell = cell.clone();
            move |_ui| {
                let _ = cell.get();
                cell.set(7);
                Ok(())
            }
        });
        let stats = rt.recompose(PASSES).unwrap();
        assert_eq!(stats.passes, 2);
        assert_eq!(cell.get(), 7);
    }

    #[test]
    fn test_recompose_inside_view_is_rejected() {
        let rt = Runtime::new();
        let nested: Rc<RefCell<Option<RecomposeError>>> = Rc::new(RefCell::new(None));
        rt.create_root({
            let rt = rt.clone();
            let nested = nested.clone();
            move |_ui| {
                if let Err(err) = rt.recompose(PASSES) {
                    *nested.borrow_mut() = Some(err);
                }
                Ok(())
            }
        });
        rt.recompose(PASSES).unwrap();
        assert_eq!(*nested.borrow(), Some(RecomposeError::Reentrant));
    }

    #[test]
    fn test_runtimes_are_independent() {
        let a = Runtime::new();
        let b = Runtime::new();
        let cell = a.create_cell(1);
        b.create_root({
            let cell = cell.clone();
            move |_ui| {
                let _ = cell.get();
                Ok(())
            }
        });
        b.recompose(PASSES).unwrap();
        // The read happened under `b`'s evaluation, but `a` had no observer.
        cell.set(2);
        assert!(!a.has_pending());
        assert!(!b.has_pending());
    }

    #[test]
    fn test_dispose_root_releases_everything_scoped() {
        let rt = Runtime::new();
        let root = rt.create_root(|ui| {
            let _ = ui.remember(|| 1);
            ui.show(Presence::Present, |ui| {
                let _ = ui.remember(|| 2);
                Ok(())
            })?;
            Ok(())
        });
        rt.recompose(PASSES).unwrap();
        assert_eq!(rt.scope_count(), 2);
        assert_eq!(rt.cell_count(), 2);

        rt.dispose_scope(root);
        assert_eq!(rt.scope_count(), 0);
        assert_eq!(rt.cell_count(), 0);
    }
}
