//! An exclusive range dictionary: a partition of an ordered key space into
//! disjoint half-open ranges, refined on demand by every query

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod attr;
pub mod dict;
pub mod error;
pub mod store;

pub use attr::{BlankAttribute, ListAttribute, RangeAttribute};
pub use dict::{Mode, RangeDict, Segment, Segments};
pub use error::Error;
pub use store::{RangeStore, Record};
