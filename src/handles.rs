//! Integer handles for host-owned objects.
//!
//! The module cannot hold native references, so every host object it
//! creates is parked in a [`HandleTable`] slot and the module receives the
//! slot index. Slot 0 is never used, so 0 always means "no object".
//!
//! Freed slots are kept in an ordered set and the lowest one is reused
//! first. Slots are never compacted, so an outstanding handle keeps naming
//! the same slot for as long as it lives.

use crate::error::{BridgeError, HostResult};
use std::collections::BTreeSet;

/// Handle value handed to the module
pub type Handle = u32;

/// The handle that never names an object
pub const NULL_HANDLE: Handle = 0;

/// Registry mapping small integers to host objects
#[derive(Debug)]
pub struct HandleTable<T> {
    /// Slot 0 is reserved and always empty
    slots: Vec<Option<T>>,
    /// Empty slots below `slots.len()`, lowest first
    free: BTreeSet<Handle>,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            slots: vec![None],
            free: BTreeSet::new(),
        }
    }

    /// Store `object` in the lowest empty slot, growing when none is free
    pub fn allocate(&mut self, object: T) -> Handle {
        match self.free.pop_first() {
            Some(handle) => {
                self.slots[handle as usize] = Some(object);
                handle
            }
            None => {
                self.slots.push(Some(object));
                (self.slots.len() - 1) as Handle
            }
        }
    }

    /// Look up a handle; 0, freed and out-of-range handles give `None`
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle as usize).and_then(Option::as_ref)
    }

    /// Look up a handle that must name a live object
    pub fn resolve(&self, handle: Handle) -> HostResult<&T> {
        self.get(handle)
            .ok_or_else(|| BridgeError::invalid_handle(handle))
    }

    /// Look up a handle where 0 stands for "no object"
    pub fn resolve_optional(&self, handle: Handle) -> HostResult<Option<&T>> {
        match handle {
            NULL_HANDLE => Ok(None),
            _ => self.resolve(handle).map(Some),
        }
    }

    /// Empty a slot and return its object.
    ///
    /// Freeing 0, an empty slot or an unknown handle does nothing.
    pub fn free(&mut self, handle: Handle) -> Option<T> {
        let object = self.slots.get_mut(handle as usize)?.take()?;
        self.free.insert(handle);
        Some(object)
    }

    /// Free each handle in order, returning the objects that were live
    pub fn free_many(&mut self, handles: &[Handle]) -> Vec<T> {
        handles.iter().filter_map(|h| self.free(*h)).collect()
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.slots.len() - 1 - self.free.len()
    }

    /// Whether no object is live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: PartialEq> HandleTable<T> {
    /// Find the handle currently holding `object`
    pub fn find(&self, object: &T) -> Option<Handle> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(object))
            .map(|index| index as Handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use proptest::prelude::*;

    #[test]
    fn test_allocate_skips_slot_zero() {
        let mut table = HandleTable::new();
        assert_eq!(table.allocate("a"), 1);
        assert_eq!(table.allocate("b"), 2);
        assert_eq!(table.allocate("c"), 3);
        assert!(table.get(NULL_HANDLE).is_none());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut table = HandleTable::new();
        for name in ["a", "b", "c"] {
            table.allocate(name);
        }

        assert_eq!(table.free(2), Some("b"));
        assert_eq!(table.allocate("d"), 2);
        assert_eq!(table.allocate("e"), 4);
        assert_eq!(table.get(2), Some(&"d"));
    }

    #[test]
    fn test_lowest_free_slot_first() {
        let mut table = HandleTable::new();
        for i in 0..5 {
            table.allocate(i);
        }
        table.free(4);
        table.free(2);
        table.free(3);

        assert_eq!(table.allocate(10), 2);
        assert_eq!(table.allocate(11), 3);
        assert_eq!(table.allocate(12), 4);
        assert_eq!(table.allocate(13), 6);
    }

    #[test]
    fn test_double_free_is_noop() {
        let mut table = HandleTable::new();
        table.allocate("a");
        table.allocate("b");

        assert!(table.free(1).is_some());
        assert!(table.free(1).is_none());
        assert!(table.free(0).is_none());
        assert!(table.free(99).is_none());
        assert_eq!(table.len(), 1);

        // A single free yields a single reuse.
        assert_eq!(table.allocate("c"), 1);
        assert_eq!(table.allocate("d"), 3);
    }

    #[test]
    fn test_free_many_in_order() {
        let mut table = HandleTable::new();
        for name in ["a", "b", "c", "d"] {
            table.allocate(name);
        }

        let freed = table.free_many(&[3, 1, 3, 0]);
        assert_eq!(freed, vec!["c", "a"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_resolve() {
        let mut table = HandleTable::new();
        let h = table.allocate(42);

        assert_eq!(table.resolve(h).unwrap(), &42);
        assert_eq!(table.resolve(0).unwrap_err().code, ErrorCode::InvalidHandle);
        assert_eq!(table.resolve_optional(0).unwrap(), None);
        assert_eq!(table.resolve_optional(h).unwrap(), Some(&42));

        table.free(h);
        assert!(table.resolve_optional(h).is_err());
    }

    #[test]
    fn test_find_and_uniqueness() {
        let mut table = HandleTable::new();
        let a = table.allocate(String::from("shader-a"));
        let b = table.allocate(String::from("shader-b"));

        assert_eq!(table.find(&"shader-a".to_string()), Some(a));
        assert_eq!(table.find(&"shader-b".to_string()), Some(b));
        assert_eq!(table.find(&"missing".to_string()), None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Allocate,
        Free(Handle),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Allocate),
            2 => (0 as Handle..24).prop_map(Op::Free),
        ]
    }

    proptest! {
        #[test]
        fn test_reuse_follows_frees(ops in prop::collection::vec(op_strategy(), 0..128)) {
            let mut table = HandleTable::new();
            let mut live = BTreeSet::new();
            let mut freed = BTreeSet::new();
            let mut next: Handle = 1;
            let mut object = 0u64;

            for op in ops {
                match op {
                    Op::Allocate => {
                        object += 1;
                        let handle = table.allocate(object);
                        let expected = freed.pop_first().unwrap_or_else(|| {
                            next += 1;
                            next - 1
                        });
                        prop_assert_eq!(handle, expected);
                        prop_assert!(live.insert(handle));
                    }
                    Op::Free(handle) => {
                        let was_live = live.remove(&handle);
                        prop_assert_eq!(table.free(handle).is_some(), was_live);
                        if was_live {
                            freed.insert(handle);
                        }
                    }
                }
                prop_assert_eq!(table.len(), live.len());
            }

            let objects: Vec<u64> = live.iter().filter_map(|handle| table.get(*handle).copied()).collect();
            let distinct: BTreeSet<u64> = objects.iter().copied().collect();
            prop_assert_eq!(objects.len(), live.len());
            prop_assert_eq!(distinct.len(), objects.len());
        }
    }
}
