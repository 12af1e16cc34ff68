//! Copy versus move transfer of a value that owns heap storage.
//!
//! [`OwningValue`] keeps one scalar in its own allocation and
//! [`OwningArray`] a fixed-length run of elements. Both expose the full set
//! of transfers: copy construction ([`OwningValue::try_clone`]), move
//! construction ([`OwningValue::take`]), copy assignment, move assignment
//! and early destruction. A moved-from value is *empty*: it can be
//! destroyed or assigned to, and reading it panics.
//!
//! Allocation is fallible and reported as [`OwnError::AllocationFailure`].
//! Ownership transitions are emitted as `tracing` events; the [`demo`]
//! module narrates them for the binaries under `src/bin`.

pub mod array;
pub mod buffer;
pub mod config;
pub mod demo;
pub mod error;
pub mod trace;
pub mod value;

pub use array::OwningArray;
pub use buffer::{CopyOutcome, OwnedBuf};
pub use config::{ConfigError, DemoConfig};
pub use error::{OwnError, Result};
pub use value::{CheckedSum, OwningValue};
