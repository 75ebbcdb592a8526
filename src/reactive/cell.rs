//! Observable cells.
//!
//! A [`State<T>`] is a cheap handle (runtime pointer + id) to a value stored
//! in a [`Runtime`]. Reads made while a scope evaluates subscribe that scope;
//! value-changing writes schedule every subscriber.
//!
//! # Example
//!
//! ```ignore
//! let count = ui.remember(|| 0);
//! ui.button(
//!     { let count = count.clone(); move || count.update(|c| *c += 1) },
//!     Modifier::new(),
//!     |ui| { ui.text(format!("clicked {}", count.get())); Ok(()) },
//! )?;
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use super::runtime::{CellBox, Runtime, RuntimeInner};
use super::scope::{CellId, ScopeId};
use crate::error::CellError;

/// Handle to an observable cell.
///
/// Handles are `Clone` and outlive nothing: once the owning scope is torn
/// down every access reports [`CellError::Disposed`].
pub struct State<T> {
    rt: Weak<RuntimeInner>,
    id: CellId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            rt: self.rt.clone(),
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&self.id).finish()
    }
}

impl<T> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.rt, &other.rt)
    }
}

impl<T: 'static> State<T> {
    pub(crate) fn new(rt: Weak<RuntimeInner>, id: CellId) -> Self {
        Self {
            rt,
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    fn open(&self) -> Result<(Runtime, Rc<CellBox<T>>), CellError> {
        let rt = Runtime::upgrade(&self.rt).ok_or(CellError::Disposed)?;
        let cell = rt.cell_box::<T>(self.id)?;
        Ok((rt, cell))
    }

    /// Whether the cell still exists.
    pub fn is_alive(&self) -> bool {
        self.open().is_ok()
    }

    /// Number of value-changing writes so far, or `None` once disposed.
    pub fn version(&self) -> Option<u64> {
        Runtime::upgrade(&self.rt).and_then(|rt| rt.cell_version(self.id))
    }

    /// The scope that owns this cell; `None` for free and stable cells.
    pub fn owner(&self) -> Option<ScopeId> {
        Runtime::upgrade(&self.rt).and_then(|rt| rt.cell_owner(self.id))
    }

    /// Read by reference, subscribing the evaluating scope.
    pub fn try_with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, CellError> {
        let (rt, cell) = self.open()?;
        rt.track(self.id);
        let value = cell.value.borrow();
        Ok(f(&value))
    }

    /// Read by reference.
    ///
    /// # Panics
    ///
    /// Panics if the cell has been disposed.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.try_with(f) {
            Ok(value) => value,
            Err(err) => panic!("read of {:?}: {err}", self.id),
        }
    }

    /// Read by reference without subscribing anyone.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, CellError> {
        let (_rt, cell) = self.open()?;
        let value = cell.value.borrow();
        Ok(f(&value))
    }
}

impl<T: Clone + 'static> State<T> {
    pub fn try_get(&self) -> Result<T, CellError> {
        self.try_with(T::clone)
    }

    /// Current value; subscribes the evaluating scope.
    ///
    /// # Panics
    ///
    /// Panics if the cell has been disposed.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Alias of [`get`](Self::get).
    pub fn read(&self) -> T {
        self.get()
    }

    pub fn get_untracked(&self) -> Result<T, CellError> {
        self.with_untracked(T::clone)
    }
}

impl<T: PartialEq + 'static> State<T> {
    /// Store `value`. Returns whether anything changed.
    ///
    /// Equal values are dropped without scheduling. A validator failure
    /// keeps the previous value.
    pub fn try_set(&self, value: T) -> Result<bool, CellError> {
        let (rt, cell) = self.open()?;
        if let Some(validate) = &cell.validator {
            validate(&value).map_err(|reason| CellError::Rejected { reason })?;
        }
        {
            let mut current = cell.value.borrow_mut();
            if *current == value {
                trace!(cell = ?self.id, "equal write ignored");
                return Ok(false);
            }
            *current = value;
        }
        rt.note_write(self.id);
        Ok(true)
    }

    /// Store `value`, logging instead of failing.
    ///
    /// # Panics
    ///
    /// Panics if the cell has been disposed; rejected values only warn.
    pub fn set(&self, value: T) {
        match self.try_set(value) {
            Ok(_) => {}
            Err(CellError::Rejected { reason }) => {
                warn!(cell = ?self.id, %reason, "write rejected by validator");
            }
            Err(err) => panic!("write to {:?}: {err}", self.id),
        }
    }

    /// Alias of [`set`](Self::set).
    pub fn write(&self, value: T) {
        self.set(value)
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    /// Mutate a copy of the value and store it if it changed.
    pub fn try_update(&self, f: impl FnOnce(&mut T)) -> Result<bool, CellError> {
        let next = {
            let (_rt, cell) = self.open()?;
            let mut next = cell.value.borrow().clone();
            f(&mut next);
            next
        };
        self.try_set(next)
    }

    /// # Panics
    ///
    /// Panics if the cell has been disposed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        match self.try_update(f) {
            Ok(_) => {}
            Err(CellError::Rejected { reason }) => {
                warn!(cell = ?self.id, %reason, "update rejected by validator");
            }
            Err(err) => panic!("update of {:?}: {err}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_counts_changes_only() {
        let rt = Runtime::new();
        let cell = rt.create_cell(String::from("a"));
        assert_eq!(cell.version(), Some(0));
        cell.set("b".into());
        cell.set("b".into());
        cell.update(|s| s.push('c'));
        assert_eq!(cell.get(), "bc");
        assert_eq!(cell.version(), Some(2));
    }

    #[test]
    fn test_validator_keeps_previous_value() {
        let rt = Runtime::new();
        let age = rt.create_validated_cell(30i32, |value| {
            if *value < 0 {
                Err(format!("{value} is negative"))
            } else {
                Ok(())
            }
        });

        assert_eq!(
            age.try_set(-1),
            Err(CellError::Rejected { reason: "-1 is negative".into() })
        );
        assert_eq!(age.get(), 30);

        age.set(-5);
        assert_eq!(age.get(), 30);
        assert_eq!(age.try_set(31), Ok(true));
    }

    #[test]
    fn test_disposed_after_runtime_dropped() {
        let rt = Runtime::new();
        let cell = rt.create_cell(1u8);
        drop(rt);
        assert!(!cell.is_alive());
        assert_eq!(cell.try_get(), Err(CellError::Disposed));
        assert_eq!(cell.try_set(2), Err(CellError::Disposed));
        assert_eq!(cell.version(), None);
    }

    #[test]
    #[should_panic]
    fn test_get_on_disposed_cell_panics() {
        let rt = Runtime::new();
        let cell = rt.create_cell(1u8);
        drop(rt);
        let _ = cell.get();
    }

    #[test]
    fn test_handles_compare_by_identity() {
        let rt = Runtime::new();
        let a = rt.create_cell(1);
        let b = rt.create_cell(1);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
