use crate::id::Xid;

/// X server timestamp.
pub type Time = u64;

/// Which libXrandr listing call produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceQuery {
    /// `XRRGetScreenResources`: may poll the hardware.
    All,
    /// `XRRGetScreenResourcesCurrent`: server's cached view only.
    Current,
}

/// One fetch of the screen's CRTCs, outputs and modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenResources {
    pub timestamp: Time,
    pub config_timestamp: Time,
    pub crtcs: Vec<Xid>,
    pub outputs: Vec<Xid>,
    pub modes: Vec<ModeInfo>,
}

/// Timing descriptor for a mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeInfo {
    pub id: Xid,
    pub width: u32,
    pub height: u32,
    /// Pixel clock in Hz.
    pub dot_clock: u64,
    pub h_sync_start: u32,
    pub h_sync_end: u32,
    pub h_total: u32,
    pub h_skew: u32,
    pub v_sync_start: u32,
    pub v_sync_end: u32,
    pub v_total: u32,
    /// Raw name bytes; not necessarily UTF-8.
    pub name: Vec<u8>,
    pub flags: u64,
}

/// Geometry and wiring of one CRTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrtcInfo {
    pub timestamp: Time,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub mode: Xid,
    pub rotation: u16,
    /// Outputs currently driven by this CRTC.
    pub outputs: Vec<Xid>,
    pub rotations: u16,
    /// Outputs this CRTC could drive.
    pub possible: Vec<Xid>,
}

/// State of one output connector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputInfo {
    pub timestamp: Time,
    /// Driving CRTC, 0 when the output is disabled.
    pub crtc: Xid,
    /// Raw name bytes as the server sent them.
    pub name: Vec<u8>,
    pub mm_width: u64,
    pub mm_height: u64,
    pub connection: u16,
    pub subpixel_order: u16,
    /// CRTCs able to drive this output.
    pub crtcs: Vec<Xid>,
    pub clones: Vec<Xid>,
    pub modes: Vec<Xid>,
    pub npreferred: i32,
}

/// Arguments of `XRRSetCrtcConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtcConfig {
    pub crtc: Xid,
    pub timestamp: Time,
    pub x: i32,
    pub y: i32,
    pub mode: Xid,
    pub rotation: u16,
    pub outputs: Vec<Xid>,
}

/// Reply status of a CRTC configuration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    Success,
    InvalidConfigTime,
    InvalidTime,
    Failed,
    /// A status this crate does not know about, passed through verbatim.
    Other(i32),
}

impl ConfigStatus {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Success,
            1 => Self::InvalidConfigTime,
            2 => Self::InvalidTime,
            3 => Self::Failed,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidConfigTime => 1,
            Self::InvalidTime => 2,
            Self::Failed => 3,
            Self::Other(raw) => raw,
        }
    }
}
