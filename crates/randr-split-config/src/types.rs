use randr_split_core::{SplitError, SplitLayout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Build-time defaults, the way a packager bakes a site configuration into
// the shim.
const DEFAULT_REAL_LIBRARY: &str = match option_env!("RANDR_SPLIT_REAL_LIBRARY") {
    Some(path) => path,
    None => "libXrandr.so.2",
};

fn build_default(value: Option<&'static str>, fallback: u32) -> u32 {
    value.and_then(|v| v.parse().ok()).unwrap_or(fallback)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// The libXrandr to forward to. A bare file name goes through the
    /// dynamic loader's search path.
    pub real_library: PathBuf,
    /// Width of the CRTC to split, in pixels.
    pub signature_width: u32,
    /// Height of the CRTC to split, in pixels.
    pub signature_height: u32,
    /// Virtual outputs added next to the real one (N - 1).
    pub extra_slices: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            real_library: PathBuf::from(DEFAULT_REAL_LIBRARY),
            signature_width: build_default(option_env!("RANDR_SPLIT_WIDTH"), 2048),
            signature_height: build_default(option_env!("RANDR_SPLIT_HEIGHT"), 768),
            extra_slices: build_default(option_env!("RANDR_SPLIT_EXTRA_SLICES"), 1),
        }
    }
}

impl SplitConfig {
    /// Validate the split geometry.
    pub fn layout(&self) -> Result<SplitLayout, SplitError> {
        SplitLayout::new(
            self.signature_width,
            self.signature_height,
            self.extra_slices,
        )
    }
}
