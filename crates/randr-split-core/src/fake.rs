//! In-memory display used by the unit tests.

use crate::backend::RandrBackend;
use crate::id::Xid;
use crate::types::{
    ConfigStatus, CrtcConfig, CrtcInfo, ModeInfo, OutputInfo, ResourceQuery, ScreenResources,
};
use std::cell::RefCell;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no such resource {0:#x}")]
pub struct BadResource(pub Xid);

pub struct FakeDisplay {
    pub crtcs: Vec<(Xid, CrtcInfo)>,
    pub outputs: Vec<(Xid, OutputInfo)>,
    pub modes: Vec<ModeInfo>,
    crtc_queries: RefCell<Vec<Xid>>,
    configs: RefCell<Vec<CrtcConfig>>,
    listings: RefCell<Vec<ResourceQuery>>,
}

impl FakeDisplay {
    pub const WIDE_CRTC: Xid = 0x3f;
    pub const SIDE_CRTC: Xid = 0x40;
    pub const SPARE_CRTC: Xid = 0x41;
    pub const WIDE_OUTPUT: Xid = 0x42;
    pub const SIDE_OUTPUT: Xid = 0x43;
    pub const OFF_OUTPUT: Xid = 0x44;
    pub const WIDE_MODE: Xid = 0x50;
    pub const SIDE_MODE: Xid = 0x51;

    /// A 2048x768 projector wall on DP-1 next to a 1024x768 monitor on HDMI-1.
    pub fn wall() -> Self {
        let all_outputs = vec![Self::WIDE_OUTPUT, Self::SIDE_OUTPUT, Self::OFF_OUTPUT];
        let all_crtcs = vec![Self::WIDE_CRTC, Self::SIDE_CRTC, Self::SPARE_CRTC];
        let crtc = |x, width, mode, output| CrtcInfo {
            timestamp: 7,
            x,
            y: 0,
            width,
            height: 768,
            mode,
            rotation: 1,
            outputs: vec![output],
            rotations: 0x3f,
            possible: all_outputs.clone(),
        };
        let output = |crtc, name: &str, mm_width, modes: Vec<Xid>| OutputInfo {
            timestamp: 7,
            crtc,
            name: name.as_bytes().to_vec(),
            mm_width,
            mm_height: 300,
            connection: if crtc == 0 { 1 } else { 0 },
            subpixel_order: 0,
            crtcs: all_crtcs.clone(),
            clones: Vec::new(),
            npreferred: modes.len().min(1) as i32,
            modes,
        };

        Self {
            crtcs: vec![
                (Self::WIDE_CRTC, crtc(0, 2048, Self::WIDE_MODE, Self::WIDE_OUTPUT)),
                (Self::SIDE_CRTC, crtc(2048, 1024, Self::SIDE_MODE, Self::SIDE_OUTPUT)),
                (
                    Self::SPARE_CRTC,
                    CrtcInfo {
                        timestamp: 7,
                        rotation: 1,
                        rotations: 0x3f,
                        possible: all_outputs.clone(),
                        ..CrtcInfo::default()
                    },
                ),
            ],
            outputs: vec![
                (Self::WIDE_OUTPUT, output(Self::WIDE_CRTC, "DP-1", 1200, vec![Self::WIDE_MODE])),
                (Self::SIDE_OUTPUT, output(Self::SIDE_CRTC, "HDMI-1", 340, vec![Self::SIDE_MODE])),
                (Self::OFF_OUTPUT, output(0, "VGA-1", 0, Vec::new())),
            ],
            modes: vec![
                ModeInfo {
                    id: Self::SIDE_MODE,
                    width: 1024,
                    height: 768,
                    dot_clock: 65_000_000,
                    h_sync_start: 1048,
                    h_sync_end: 1184,
                    h_total: 1344,
                    v_sync_start: 771,
                    v_sync_end: 777,
                    v_total: 806,
                    name: b"1024x768".to_vec(),
                    flags: 0xa,
                    ..ModeInfo::default()
                },
                ModeInfo {
                    id: Self::WIDE_MODE,
                    width: 2048,
                    height: 768,
                    dot_clock: 130_000_000,
                    h_sync_start: 2096,
                    h_sync_end: 2368,
                    h_total: 2688,
                    v_sync_start: 771,
                    v_sync_end: 777,
                    v_total: 806,
                    name: b"2048x768".to_vec(),
                    flags: 0x5,
                    ..ModeInfo::default()
                },
            ],
            crtc_queries: RefCell::new(Vec::new()),
            configs: RefCell::new(Vec::new()),
            listings: RefCell::new(Vec::new()),
        }
    }

    /// Every CRTC id passed to `crtc_info` so far.
    pub fn crtc_queries(&self) -> Vec<Xid> {
        self.crtc_queries.borrow().clone()
    }

    /// Every configuration forwarded to the "real" library.
    pub fn applied_configs(&self) -> Vec<CrtcConfig> {
        self.configs.borrow().clone()
    }

    pub fn listings(&self) -> Vec<ResourceQuery> {
        self.listings.borrow().clone()
    }

    pub fn crtc_mut(&mut self, id: Xid) -> &mut CrtcInfo {
        &mut self
            .crtcs
            .iter_mut()
            .find(|(crtc, _)| *crtc == id)
            .expect("unknown CRTC")
            .1
    }
}

impl RandrBackend for FakeDisplay {
    type Error = BadResource;

    fn screen_resources(&self, query: ResourceQuery) -> Result<ScreenResources, BadResource> {
        self.listings.borrow_mut().push(query);
        Ok(ScreenResources {
            timestamp: 7,
            config_timestamp: 5,
            crtcs: self.crtcs.iter().map(|(id, _)| *id).collect(),
            outputs: self.outputs.iter().map(|(id, _)| *id).collect(),
            modes: self.modes.clone(),
        })
    }

    fn crtc_info(&self, crtc: Xid) -> Result<CrtcInfo, BadResource> {
        self.crtc_queries.borrow_mut().push(crtc);
        self.crtcs
            .iter()
            .find(|(id, _)| *id == crtc)
            .map(|(_, info)| info.clone())
            .ok_or(BadResource(crtc))
    }

    fn output_info(&self, output: Xid) -> Result<OutputInfo, BadResource> {
        self.outputs
            .iter()
            .find(|(id, _)| *id == output)
            .map(|(_, info)| info.clone())
            .ok_or(BadResource(output))
    }

    fn set_crtc_config(&self, config: &CrtcConfig) -> ConfigStatus {
        if !self.crtcs.iter().any(|(id, _)| *id == config.crtc) {
            return ConfigStatus::Failed;
        }
        self.configs.borrow_mut().push(config.clone());
        ConfigStatus::Success
    }
}
