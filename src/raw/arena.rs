use alloc::vec::Vec;

use super::handle::Handle;

/// A slot either holds a live element or links to the next vacant slot.
#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<Handle> },
}

/// Node storage for the trees. Every node lives in exactly one slot and is
/// owned by exactly one link (a parent's child link or the tree's root);
/// a slot is released only once that link has been cleared.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    // Head of the intrusive free list threaded through vacant slots.
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        let handle = if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.to_index()];
            let Slot::Vacant { next_free } = *slot else {
                panic!("`Arena::alloc()` - free list points at an occupied slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            handle
        } else {
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            self.slots.push(Slot::Occupied(element));
            Handle::from_index(self.slots.len() - 1)
        };
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Removes the element and returns its slot to the free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[handle.to_index()], vacant) {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant { next_free } => {
                self.slots[handle.to_index()] = Slot::Vacant { next_free };
                panic!("`Arena::take()` - `handle` is invalid!");
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert!(arena.is_empty());
    }

    #[test]
    fn freed_slots_are_reused_last_in_first_out() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let _c = arena.alloc('c');

        assert_eq!(arena.take(a), 'a');
        assert_eq!(arena.take(b), 'b');
        assert_eq!(arena.alloc('d'), b);
        assert_eq!(arena.alloc('e'), a);
        assert_eq!(arena.len(), 3);
        assert_eq!(*arena.get(a), 'e');
    }

    #[test]
    fn full_arena_keeps_its_count() {
        let mut arena = Arena::new();
        for _ in 0..=Handle::MAX {
            arena.alloc(0u8);
        }
        assert_eq!(arena.len(), Handle::MAX + 1);

        let overflow = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| arena.alloc(0u8)));
        assert!(overflow.is_err());
        assert_eq!(arena.len(), Handle::MAX + 1);

        // A released slot is still reusable after the failed allocation.
        let handle = Handle::from_index(7);
        arena.take(handle);
        assert_eq!(arena.alloc(1u8), handle);
        assert_eq!(arena.len(), Handle::MAX + 1);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let handle = arena.alloc(1u8);
        arena.take(handle);
        let _ = arena.get(handle);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_take_panics() {
        let mut arena = Arena::new();
        let handle = arena.alloc(1u8);
        arena.take(handle);
        arena.take(handle);
    }

    #[derive(Clone, Debug)]
    enum Step {
        /// Store a node key.
        Store(u32),
        /// Release the live slot picked by the index (modulo the live count).
        Release(usize),
        /// Overwrite the live slot picked by the index.
        Rekey(usize, u32),
        Reset,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            8 => any::<u32>().prop_map(Step::Store),
            4 => any::<usize>().prop_map(Step::Release),
            2 => (any::<usize>(), any::<u32>()).prop_map(|(pick, key)| Step::Rekey(pick, key)),
            1 => Just(Step::Reset),
        ]
    }

    proptest! {
        /// Live slots keep their contents, and a store reuses the most
        /// recently released slot before growing the arena.
        #[test]
        fn released_slots_are_recycled(steps in prop::collection::vec(step(), 0..256)) {
            let mut arena: Arena<u32> = Arena::new();
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut released: Vec<Handle> = Vec::new();
            let mut high_water = 0;

            for step in steps {
                match step {
                    Step::Store(key) => {
                        let handle = arena.alloc(key);
                        match released.pop() {
                            Some(expected) => prop_assert_eq!(handle, expected),
                            None => {
                                prop_assert_eq!(handle.to_index(), high_water);
                                high_water += 1;
                            }
                        }
                        live.push((handle, key));
                    }
                    Step::Release(pick) if !live.is_empty() => {
                        let (handle, key) = live.swap_remove(pick % live.len());
                        prop_assert_eq!(arena.take(handle), key);
                        released.push(handle);
                    }
                    Step::Rekey(pick, key) if !live.is_empty() => {
                        let count = live.len();
                        let entry = &mut live[pick % count];
                        *arena.get_mut(entry.0) = key;
                        entry.1 = key;
                    }
                    Step::Reset => {
                        arena.clear();
                        live.clear();
                        released.clear();
                        high_water = 0;
                    }
                    Step::Release(_) | Step::Rekey(..) => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, key) in &live {
                    prop_assert_eq!(*arena.get(handle), key);
                }
            }
        }
    }
}
