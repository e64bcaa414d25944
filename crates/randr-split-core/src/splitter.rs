//! The five intercepted RandR operations.

use crate::augment::{append_synthetic, augment_crtcs, augment_outputs, correct_modes};
use crate::backend::RandrBackend;
use crate::detect::{crtc_info_is_split, output_info_is_split};
use crate::id::{SplitId, Xid};
use crate::types::{ConfigStatus, CrtcConfig, CrtcInfo, OutputInfo, ResourceQuery, ScreenResources};
use crate::{CallError, SplitLayout};
use tracing::{debug, warn};

/// Longest slice of the real output name kept in a synthetic name.
const MAX_BASE_NAME: usize = 200;

/// Capacity of a synthetic output name, terminator included.
pub const MAX_OUTPUT_NAME: usize = 255;

/// Status returned when a caller tries to configure a synthetic resource.
///
/// This is what libXrandr reports when the server rejects an unknown CRTC or
/// output.
pub const REJECTED_CONFIG: ConfigStatus = ConfigStatus::Failed;

/// Rewrites what RandR callers observe so that the wide display appears as
/// several outputs.
///
/// Holds only the layout; all display state comes from the backend on each
/// call.
#[derive(Debug, Clone, Copy)]
pub struct Splitter {
    layout: SplitLayout,
}

impl Splitter {
    pub fn new(layout: SplitLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SplitLayout {
        &self.layout
    }

    /// `XRRGetScreenResources` / `XRRGetScreenResourcesCurrent`.
    pub fn screen_resources<B: RandrBackend>(
        &self,
        backend: &B,
        query: ResourceQuery,
    ) -> Result<ScreenResources, CallError<B::Error>> {
        let mut resources = backend
            .screen_resources(query)
            .map_err(CallError::Backend)?;

        augment_crtcs(backend, &self.layout, &mut resources.crtcs)?;
        augment_outputs(backend, &self.layout, &mut resources.outputs)?;
        correct_modes(&self.layout, &mut resources.modes);

        Ok(resources)
    }

    /// `XRRGetOutputInfo`.
    pub fn output_info<B: RandrBackend>(
        &self,
        backend: &B,
        output: Xid,
    ) -> Result<OutputInfo, CallError<B::Error>> {
        let id = SplitId::unpack(output);
        let mut info = backend.output_info(id.real).map_err(CallError::Backend)?;

        if !output_info_is_split(backend, &self.layout, &info) {
            if id.is_synthetic() {
                debug!(output, "synthetic output no longer driven by the split CRTC");
            }
            return Ok(info);
        }

        info.mm_width /= u64::from(self.layout.slices());

        if id.is_synthetic() {
            info.name = synthetic_name(&info.name, id.slice);
            append_synthetic(&mut info.crtcs, info.crtc, self.layout.extra_slices())?;
            info.crtc |= id.slice_bits();
        }

        Ok(info)
    }

    /// `XRRGetCrtcInfo`.
    pub fn crtc_info<B: RandrBackend>(
        &self,
        backend: &B,
        crtc: Xid,
    ) -> Result<CrtcInfo, CallError<B::Error>> {
        let id = SplitId::unpack(crtc);
        let mut info = backend.crtc_info(id.real).map_err(CallError::Backend)?;

        if crtc_info_is_split(&self.layout, &info) {
            info.width /= self.layout.slices();
            info.x = slice_offset(id.slice, info.width);
        }

        Ok(info)
    }

    /// `XRRSetCrtcConfig`.
    ///
    /// Synthetic CRTCs and outputs cannot be configured; such requests are
    /// refused without reaching the server.
    pub fn set_crtc_config<B: RandrBackend>(&self, backend: &B, config: &CrtcConfig) -> ConfigStatus {
        let synthetic = std::iter::once(&config.crtc)
            .chain(&config.outputs)
            .find(|&&id| SplitId::unpack(id).is_synthetic());

        if let Some(&id) = synthetic {
            warn!(crtc = config.crtc, id, "refusing to configure a synthetic resource");
            return REJECTED_CONFIG;
        }

        backend.set_crtc_config(config)
    }
}

/// Left edge of `slice` given the per-slice width.
///
/// Slice 0 sits at 0 and slice k >= 1 at `(k - 1) * width + width`.
fn slice_offset(slice: u32, width: u32) -> i32 {
    let x = if slice == 0 {
        0
    } else {
        u64::from(slice - 1) * u64::from(width) + u64::from(width)
    };
    i32::try_from(x).unwrap_or(i32::MAX)
}

/// `"<real>~<slice>"`, with the real part cut to fit the name capacity.
/// The cut counts bytes, not characters.
fn synthetic_name(real: &[u8], slice: u32) -> Vec<u8> {
    let mut name = real[..real.len().min(MAX_BASE_NAME)].to_vec();
    name.extend_from_slice(format!("~{slice}").as_bytes());
    debug_assert!(name.len() < MAX_OUTPUT_NAME);
    name
}
