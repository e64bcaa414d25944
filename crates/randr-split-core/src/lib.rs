//! Core of randr-split: presents one wide RandR CRTC as several.
//!
//! The real CRTC whose size equals the configured signature is the split
//! one. Listing calls gain synthetic twins of it (and of the output it
//! drives), info calls on those twins report one slice of the raster each,
//! and configuration calls on twins are refused. Everything here is pure
//! over a [`RandrBackend`], so it runs without an X server.

pub mod augment;
pub mod backend;
pub mod detect;
mod error;
pub mod id;
mod layout;
pub mod splitter;
pub mod types;

#[cfg(test)]
mod fake;

pub use backend::RandrBackend;
pub use error::{CallError, SplitError};
pub use id::{SplitId, Xid};
pub use layout::SplitLayout;
pub use splitter::Splitter;
pub use types::*;
