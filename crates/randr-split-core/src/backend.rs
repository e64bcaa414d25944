use crate::id::Xid;
use crate::types::{ConfigStatus, CrtcConfig, CrtcInfo, OutputInfo, ResourceQuery, ScreenResources};

/// The real RandR operations the split layer wraps.
///
/// The shim implements this over the dynamically loaded libXrandr; tests
/// implement it over an in-memory display. Info queries are answered against
/// the snapshot the backend is bound to.
pub trait RandrBackend {
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Fetch a fresh snapshot and bind later info queries to it.
    fn screen_resources(&self, query: ResourceQuery) -> Result<ScreenResources, Self::Error>;

    /// Fetch info for a real CRTC id.
    fn crtc_info(&self, crtc: Xid) -> Result<CrtcInfo, Self::Error>;

    /// Fetch info for a real output id.
    fn output_info(&self, output: Xid) -> Result<OutputInfo, Self::Error>;

    /// Apply a configuration to a real CRTC.
    fn set_crtc_config(&self, config: &CrtcConfig) -> ConfigStatus;
}
