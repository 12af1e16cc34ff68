use std::collections::TryReserveError;

use thiserror::Error;

/// Failures of the ownership operations.
///
/// Allocation is the only fallible transfer step; `Overflow` comes from
/// [`OwningValue::checked_add`](crate::OwningValue::checked_add). Reading an
/// empty handle is a programmer error and panics instead of producing a value
/// of this type.
#[derive(Error, Debug)]
pub enum OwnError {
    #[error("failed to allocate {requested} element(s) of {elem_size} byte(s)")]
    AllocationFailure {
        requested: usize,
        elem_size: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("sum of {lhs} and {rhs} does not fit in the value type")]
    Overflow { lhs: String, rhs: String },
}

impl OwnError {
    pub(crate) fn allocation<T>(requested: usize, source: TryReserveError) -> Self {
        Self::AllocationFailure {
            requested,
            elem_size: std::mem::size_of::<T>(),
            source,
        }
    }

    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::AllocationFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, OwnError>;
