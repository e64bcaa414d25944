use crate::id::Xid;
use thiserror::Error;

/// Violations of the assumptions the split layer is built on.
///
/// None of these are expected at runtime: they mean the server hands out ids
/// in the reserved range, or the layout matched far more resources than any
/// real configuration has. Callers at the ABI boundary treat them as fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("resource id {id:#x} already uses the reserved slice bits")]
    ReservedBitsSet { id: Xid },
    #[error("slice index {slice} does not fit the reserved id bits")]
    SliceOutOfRange { slice: u32 },
    #[error("resource list would grow to {len} entries (capacity {capacity})")]
    CapacityExceeded { len: usize, capacity: usize },
    #[error("invalid split layout: {0}")]
    InvalidLayout(&'static str),
}

/// Outcome of a failed façade call.
#[derive(Debug, Error)]
pub enum CallError<E> {
    /// The real library failed; pass the failure through unchanged.
    #[error("real RandR call failed: {0}")]
    Backend(E),
    #[error(transparent)]
    Split(#[from] SplitError),
}
