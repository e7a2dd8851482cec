//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::LineIndex;

impl LineIndex {
    #[inline]
    pub(crate) fn ensure_in_bounds(&self, offset: u32) {
        assert!(
            offset <= self.len,
            "LineIndex: offset {offset} is past the end of a {}-byte source",
            self.len
        );
    }
}
