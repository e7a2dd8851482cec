#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Sable front end.
//!
//! Nothing here knows about syntax trees:
//! - [`Position`] and [`LineIndex`] map byte offsets to lines and columns
//! - [`NumberSize`] is the catalogue of sized numeric types and their ranges

mod invariants;
pub mod numeric;
pub mod position;

#[cfg(test)]
mod numeric_tests;
#[cfg(test)]
mod position_tests;

pub use numeric::{NumberCategory, NumberSize, NumberValue};
pub use position::{LineIndex, Position};
