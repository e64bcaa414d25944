//! Finding the physical resource that needs splitting.
//!
//! Nothing is cached: every check is a fresh round-trip. Display configuration
//! queries are rare and interactive, and the wide CRTC can be reconfigured
//! between any two calls.

use crate::backend::RandrBackend;
use crate::id::{decode, Xid};
use crate::types::{CrtcInfo, OutputInfo};
use crate::SplitLayout;
use tracing::debug;

/// Whether a fetched CRTC has the split signature.
pub fn crtc_info_is_split(layout: &SplitLayout, info: &CrtcInfo) -> bool {
    layout.matches(info.width, info.height)
}

/// Whether the CRTC behind `crtc` (real or synthetic) has the split signature.
///
/// A failed query counts as "not split".
pub fn is_crtc_split<B: RandrBackend>(backend: &B, layout: &SplitLayout, crtc: Xid) -> bool {
    let (real, _) = decode(crtc);
    match backend.crtc_info(real) {
        Ok(info) => crtc_info_is_split(layout, &info),
        Err(e) => {
            debug!(crtc = real, %e, "CRTC query failed during split detection");
            false
        }
    }
}

/// Whether a fetched output is driven by the split CRTC.
pub fn output_info_is_split<B: RandrBackend>(
    backend: &B,
    layout: &SplitLayout,
    info: &OutputInfo,
) -> bool {
    info.crtc != 0 && is_crtc_split(backend, layout, info.crtc)
}

/// Whether the output behind `output` (real or synthetic) is driven by the
/// split CRTC.
pub fn is_output_split<B: RandrBackend>(backend: &B, layout: &SplitLayout, output: Xid) -> bool {
    let (real, _) = decode(output);
    match backend.output_info(real) {
        Ok(info) => output_info_is_split(backend, layout, &info),
        Err(e) => {
            debug!(output = real, %e, "output query failed during split detection");
            false
        }
    }
}
