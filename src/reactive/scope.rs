//! Scope identity.
//!
//! A scope is the unit of evaluation and state ownership. Its identity inside
//! its parent is the call site that created it plus either an occurrence
//! count (how many times that call site ran earlier in the same evaluation)
//! or an explicit [`Key`]. The same scheme identifies remembered cells inside
//! a scope.

use std::fmt;
use std::panic::Location;
use std::rc::Rc;

/// Identifier of a scope inside one [`Runtime`](super::Runtime).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Identifier of an observable cell inside one runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u64);

impl CellId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Source location of a builder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    /// The location of the caller (through any `#[track_caller]` frames).
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

/// Explicit identity for a child scope, list item or stable cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(u64),
    /// Negative integers; non-negative ones become [`Key::Index`].
    Signed(i64),
    Name(Rc<str>),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Name(Rc::from(value))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Name(Rc::from(value))
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key::Index(value)
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Key::Index(value as u64)
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Index(value as u64)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        match u64::try_from(value) {
            Ok(index) => Key::Index(index),
            Err(_) => Key::Signed(value),
        }
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::from(i64::from(value))
    }
}

/// How an entry is told apart from its siblings at the same call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// N-th time the call site ran during this evaluation.
    Positional(u32),
    /// Explicit key; survives reordering.
    Keyed(Key),
}

/// Identity of a child scope or remembered cell inside its owning scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub site: CallSite,
    pub slot: Slot,
}

/// Whether a conditional subtree is mounted.
///
/// `Absent` tears the subtree's scope (and every cell it owns) down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    Present,
    #[default]
    Absent,
}

impl Presence {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }
}

impl From<bool> for Presence {
    fn from(value: bool) -> Self {
        if value { Presence::Present } else { Presence::Absent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_from_bool() {
        assert_eq!(Presence::from(true), Presence::Present);
        assert_eq!(Presence::from(false), Presence::Absent);
        assert!(!Presence::default().is_present());
    }

    #[test]
    fn test_call_sites_differ_per_line() {
        let a = CallSite::caller();
        let b = CallSite::caller();
        assert_ne!(a, b);
        assert_eq!(a.file, b.file);
    }

    #[test]
    fn test_key_conversions() {
        assert_eq!(Key::from(3usize), Key::Index(3));
        assert_eq!(Key::from("a"), Key::from(String::from("a")));
        assert_eq!(Key::from(7i32), Key::from(7usize));
    }

    #[test]
    fn test_negative_keys_stay_distinct() {
        assert_eq!(Key::from(-1i32), Key::Signed(-1));
        assert_ne!(Key::from(-1i32), Key::from(u64::MAX));
        assert_ne!(Key::from(-1i32), Key::from(1i32));
        assert_eq!(Key::from(-5i64), Key::from(-5i32));
    }
}
