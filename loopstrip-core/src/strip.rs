//! Clone-padded slide strip.
//!
//! A circular sequence of `N` originals presented as a linear, animatable
//! strip of `3N` slots: `[left clones | originals | right clones]`. Slot `s`
//! always shows original `s mod N`, so slots `s` and `s ± N` are visually
//! identical and the engine can jump between them without a visible seam.

use std::ops::Range;

/// Which third of the strip a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Slots `0..N`, mirroring the last originals.
    LeftClones,
    /// Slots `N..2N`, the true originals.
    Originals,
    /// Slots `2N..3N`.
    RightClones,
}

/// The tripled sequence of render handles.
///
/// `T` is whatever the host uses to address a slide (a DOM node handle, a
/// widget id, a texture key). Clones are produced with `Clone`, which gives
/// them identical content and, for handle types, a distinct identity.
#[derive(Debug, Clone)]
pub struct Strip<T> {
    slots: Vec<T>,
    originals: usize,
}

impl<T: Clone> Strip<T> {
    /// Build the strip from the host's original slides. Returns `None` when
    /// there is nothing to loop over.
    pub fn from_originals(originals: Vec<T>) -> Option<Self> {
        let n = originals.len();
        if n == 0 {
            return None;
        }
        let mut slots = Vec::with_capacity(n * 3);
        slots.extend(originals.iter().cloned());
        slots.extend(originals.iter().cloned());
        slots.extend(originals);
        Some(Self {
            slots,
            originals: n,
        })
    }
}

impl<T> Strip<T> {
    /// Number of original slides (`N`).
    pub fn originals(&self) -> usize {
        self.originals
    }

    /// Total number of slots (`3N`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Never true for a built strip.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots holding the true originals: `N..2N`.
    pub fn home_range(&self) -> Range<usize> {
        self.originals..self.originals * 2
    }

    /// Segment of `slot`, `None` past the end.
    pub fn segment(&self, slot: usize) -> Option<Segment> {
        let n = self.originals;
        match slot {
            s if s < n => Some(Segment::LeftClones),
            s if s < 2 * n => Some(Segment::Originals),
            s if s < 3 * n => Some(Segment::RightClones),
            _ => None,
        }
    }

    /// Index of the original slide a slot displays.
    pub fn original_of(&self, slot: usize) -> usize {
        slot % self.originals
    }

    /// Handle in `slot`.
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot)
    }

    /// All slots, left to right.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

/// Shift `index` by whole multiples of `n` so it lands in `n..2n`.
pub(crate) fn fold_into_home(index: i64, n: i64) -> i64 {
    n + index.rem_euclid(n)
}
