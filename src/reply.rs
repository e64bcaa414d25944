//! Conversion between libXrandr reply structs and the core's owned types.
//!
//! Xlib returns every reply as a single heap block: the struct first, then
//! its arrays, then its strings, released with one `XFree`. Replies built
//! here follow the same layout in a `calloc` block, so callers release them
//! with the ordinary `XRRFree*` functions.

use randr_split_core::{CrtcInfo, ModeInfo, OutputInfo, ScreenResources, Xid};
use std::mem::{align_of, size_of};
use std::os::raw::{c_char, c_int};
use std::{ptr, slice};
use x11::xlib::XID;
use x11::xrandr::{XRRCrtcInfo, XRRModeInfo, XRROutputInfo, XRRScreenResources};

/// Copy `count` ids starting at `ids`.
///
/// # Safety
///
/// `ids` must point to `count` readable ids unless `count <= 0`.
unsafe fn read_ids(ids: *const XID, count: c_int) -> Vec<Xid> {
    if ids.is_null() || count <= 0 {
        return Vec::new();
    }
    slice::from_raw_parts(ids, count as usize)
        .iter()
        .map(|&id| id as Xid)
        .collect()
}

/// # Safety
///
/// `name` must point to `len` readable bytes unless `len <= 0`.
unsafe fn read_name(name: *const c_char, len: c_int) -> Vec<u8> {
    if name.is_null() || len <= 0 {
        return Vec::new();
    }
    slice::from_raw_parts(name.cast::<u8>(), len as usize).to_vec()
}

/// # Safety
///
/// `res` must be a valid reply from `XRRGetScreenResources*`.
pub unsafe fn read_screen_resources(res: *const XRRScreenResources) -> ScreenResources {
    let res = &*res;
    let modes = if res.modes.is_null() || res.nmode <= 0 {
        Vec::new()
    } else {
        slice::from_raw_parts(res.modes, res.nmode as usize)
            .iter()
            .map(|mode| read_mode(mode))
            .collect()
    };

    ScreenResources {
        timestamp: res.timestamp as u64,
        config_timestamp: res.configTimestamp as u64,
        crtcs: read_ids(res.crtcs, res.ncrtc),
        outputs: read_ids(res.outputs, res.noutput),
        modes,
    }
}

unsafe fn read_mode(mode: &XRRModeInfo) -> ModeInfo {
    ModeInfo {
        id: mode.id as Xid,
        width: mode.width,
        height: mode.height,
        dot_clock: mode.dotClock as u64,
        h_sync_start: mode.hSyncStart,
        h_sync_end: mode.hSyncEnd,
        h_total: mode.hTotal,
        h_skew: mode.hSkew,
        v_sync_start: mode.vSyncStart,
        v_sync_end: mode.vSyncEnd,
        v_total: mode.vTotal,
        name: read_name(mode.name, mode.nameLength as c_int),
        flags: mode.modeFlags as u64,
    }
}

/// # Safety
///
/// `info` must be a valid reply from `XRRGetCrtcInfo`.
pub unsafe fn read_crtc_info(info: *const XRRCrtcInfo) -> CrtcInfo {
    let info = &*info;
    CrtcInfo {
        timestamp: info.timestamp as u64,
        x: info.x,
        y: info.y,
        width: info.width,
        height: info.height,
        mode: info.mode as Xid,
        rotation: info.rotation,
        outputs: read_ids(info.outputs, info.noutput),
        rotations: info.rotations,
        possible: read_ids(info.possible, info.npossible),
    }
}

/// # Safety
///
/// `info` must be a valid reply from `XRRGetOutputInfo`.
pub unsafe fn read_output_info(info: *const XRROutputInfo) -> OutputInfo {
    let info = &*info;
    OutputInfo {
        timestamp: info.timestamp as u64,
        crtc: info.crtc as Xid,
        name: read_name(info.name, info.nameLen),
        mm_width: info.mm_width as u64,
        mm_height: info.mm_height as u64,
        connection: info.connection,
        subpixel_order: info.subpixel_order,
        crtcs: read_ids(info.crtcs, info.ncrtc),
        clones: read_ids(info.clones, info.nclone),
        modes: read_ids(info.modes, info.nmode),
        npreferred: info.npreferred,
    }
}

/// Byte offsets of the pieces of one reply block.
struct BlockPlan {
    size: usize,
}

impl BlockPlan {
    fn new<T>() -> Self {
        Self {
            size: size_of::<T>(),
        }
    }

    /// Reserve room for `count` values of `T`; returns their offset.
    fn reserve<T>(&mut self, count: usize) -> usize {
        let align = align_of::<T>();
        let offset = (self.size + align - 1) & !(align - 1);
        self.size = offset + count * size_of::<T>();
        offset
    }

    /// Allocate the zeroed block. Null when out of memory, as Xlib returns.
    fn alloc(&self) -> *mut u8 {
        // SAFETY: calloc has no preconditions; a null result is handled by
        // every caller.
        unsafe { libc::calloc(1, self.size).cast::<u8>() }
    }
}

/// Copy `ids` to `base + offset` and return the array pointer.
///
/// # Safety
///
/// The block at `base` must have room for `ids` at `offset`.
unsafe fn write_ids(base: *mut u8, offset: usize, ids: &[Xid]) -> *mut XID {
    let dst = base.add(offset).cast::<XID>();
    for (i, &id) in ids.iter().enumerate() {
        dst.add(i).write(id as XID);
    }
    dst
}

/// Copy `name` to `base + offset`; the block is zeroed, so it stays
/// NUL-terminated.
///
/// # Safety
///
/// The block at `base` must have room for `name.len() + 1` bytes at `offset`.
unsafe fn write_name(base: *mut u8, offset: usize, name: &[u8]) -> *mut c_char {
    let dst = base.add(offset);
    ptr::copy_nonoverlapping(name.as_ptr(), dst, name.len());
    dst.cast::<c_char>()
}

/// Build an `XRRScreenResources` block the caller frees with
/// `XRRFreeScreenResources`.
pub fn alloc_screen_resources(res: &ScreenResources) -> *mut XRRScreenResources {
    let mut plan = BlockPlan::new::<XRRScreenResources>();
    let crtcs = plan.reserve::<XID>(res.crtcs.len());
    let outputs = plan.reserve::<XID>(res.outputs.len());
    let modes = plan.reserve::<XRRModeInfo>(res.modes.len());
    let names: Vec<usize> = res
        .modes
        .iter()
        .map(|mode| plan.reserve::<c_char>(mode.name.len() + 1))
        .collect();

    let base = plan.alloc();
    if base.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: every offset was reserved in `plan`, which sized the block.
    unsafe {
        let mode_dst = base.add(modes).cast::<XRRModeInfo>();
        for (i, (mode, &name)) in res.modes.iter().zip(&names).enumerate() {
            mode_dst.add(i).write(XRRModeInfo {
                id: mode.id as XID,
                width: mode.width,
                height: mode.height,
                dotClock: mode.dot_clock as _,
                hSyncStart: mode.h_sync_start,
                hSyncEnd: mode.h_sync_end,
                hTotal: mode.h_total,
                hSkew: mode.h_skew,
                vSyncStart: mode.v_sync_start,
                vSyncEnd: mode.v_sync_end,
                vTotal: mode.v_total,
                name: write_name(base, name, &mode.name),
                nameLength: mode.name.len() as _,
                modeFlags: mode.flags as _,
            });
        }

        let head = base.cast::<XRRScreenResources>();
        head.write(XRRScreenResources {
            timestamp: res.timestamp as _,
            configTimestamp: res.config_timestamp as _,
            ncrtc: res.crtcs.len() as c_int,
            crtcs: write_ids(base, crtcs, &res.crtcs),
            noutput: res.outputs.len() as c_int,
            outputs: write_ids(base, outputs, &res.outputs),
            nmode: res.modes.len() as c_int,
            modes: mode_dst,
        });
        head
    }
}

/// Build an `XRRCrtcInfo` block the caller frees with `XRRFreeCrtcInfo`.
pub fn alloc_crtc_info(info: &CrtcInfo) -> *mut XRRCrtcInfo {
    let mut plan = BlockPlan::new::<XRRCrtcInfo>();
    let outputs = plan.reserve::<XID>(info.outputs.len());
    let possible = plan.reserve::<XID>(info.possible.len());

    let base = plan.alloc();
    if base.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: every offset was reserved in `plan`, which sized the block.
    unsafe {
        let head = base.cast::<XRRCrtcInfo>();
        head.write(XRRCrtcInfo {
            timestamp: info.timestamp as _,
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
            mode: info.mode as XID,
            rotation: info.rotation,
            noutput: info.outputs.len() as c_int,
            outputs: write_ids(base, outputs, &info.outputs),
            rotations: info.rotations,
            npossible: info.possible.len() as c_int,
            possible: write_ids(base, possible, &info.possible),
        });
        head
    }
}

/// Build an `XRROutputInfo` block the caller frees with `XRRFreeOutputInfo`.
pub fn alloc_output_info(info: &OutputInfo) -> *mut XRROutputInfo {
    let mut plan = BlockPlan::new::<XRROutputInfo>();
    let crtcs = plan.reserve::<XID>(info.crtcs.len());
    let clones = plan.reserve::<XID>(info.clones.len());
    let modes = plan.reserve::<XID>(info.modes.len());
    let name = plan.reserve::<c_char>(info.name.len() + 1);

    let base = plan.alloc();
    if base.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: every offset was reserved in `plan`, which sized the block.
    unsafe {
        let head = base.cast::<XRROutputInfo>();
        head.write(XRROutputInfo {
            timestamp: info.timestamp as _,
            crtc: info.crtc as XID,
            name: write_name(base, name, &info.name),
            nameLen: info.name.len() as c_int,
            mm_width: info.mm_width as _,
            mm_height: info.mm_height as _,
            connection: info.connection,
            subpixel_order: info.subpixel_order,
            ncrtc: info.crtcs.len() as c_int,
            crtcs: write_ids(base, crtcs, &info.crtcs),
            nclone: info.clones.len() as c_int,
            clones: write_ids(base, clones, &info.clones),
            nmode: info.modes.len() as c_int,
            npreferred: info.npreferred,
            modes: write_ids(base, modes, &info.modes),
        });
        head
    }
}
