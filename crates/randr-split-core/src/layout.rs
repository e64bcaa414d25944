use crate::id::MAX_SLICE;
use crate::SplitError;

/// How the physical display is cut up.
///
/// The CRTC whose mode is exactly `width` x `height` is the wide one; it is
/// presented as `slices` side-by-side outputs of `width / slices` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitLayout {
    width: u32,
    height: u32,
    slices: u32,
}

impl SplitLayout {
    /// `extra_slices` is the number of synthetic twins per split resource.
    pub fn new(width: u32, height: u32, extra_slices: u32) -> Result<Self, SplitError> {
        if width == 0 || height == 0 {
            return Err(SplitError::InvalidLayout("signature must be non-zero"));
        }
        if extra_slices == 0 {
            return Err(SplitError::InvalidLayout("at least one extra slice is required"));
        }
        if extra_slices > MAX_SLICE {
            return Err(SplitError::SliceOutOfRange {
                slice: extra_slices,
            });
        }
        Ok(Self {
            width,
            height,
            slices: extra_slices + 1,
        })
    }

    pub fn signature(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of slices, N.
    pub fn slices(&self) -> u32 {
        self.slices
    }

    /// Synthetic twins per split resource, N - 1.
    pub fn extra_slices(&self) -> u32 {
        self.slices - 1
    }

    /// Whether a raster of this size is the split display.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        width == self.width && height == self.height
    }
}
