use core::num::NonZero;

#[cfg(test)]
type HandleRepr = u16;
#[cfg(not(test))]
type HandleRepr = u32;

/// A stable address of a node slot inside an [`Arena`](super::arena::Arena).
///
/// Stored as `index + 1` so that `Option<Handle>` (an absent child or parent
/// link) costs no extra space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<HandleRepr>);

impl Handle {
    pub(crate) const MAX: usize = (HandleRepr::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let repr = (index + 1) as HandleRepr;
        match NonZero::new(repr) {
            Some(repr) => Self(repr),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Child and parent links are `Option<Handle>`; they must stay one word.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, HandleRepr);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn first_and_last_index() {
        assert_eq!(Handle::from_index(0).to_index(), 0);
        assert_eq!(Handle::from_index(Handle::MAX).to_index(), Handle::MAX);
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::from_index(index);
            prop_assert_eq!(handle.to_index(), index);
        }
    }
}
