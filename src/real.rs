//! The real libXrandr, resolved at runtime.

use anyhow::{Context, Result};
use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_LAZY};
use std::os::raw::c_int;
use std::path::Path;
use tracing::info;
use x11::xlib::{Display, Time, Window};
use x11::xrandr::{RRCrtc, RRMode, RROutput, Rotation, XRRCrtcInfo, XRROutputInfo, XRRScreenResources};

pub type GetScreenResourcesFn =
    unsafe extern "C" fn(*mut Display, Window) -> *mut XRRScreenResources;
pub type GetOutputInfoFn =
    unsafe extern "C" fn(*mut Display, *mut XRRScreenResources, RROutput) -> *mut XRROutputInfo;
pub type GetCrtcInfoFn =
    unsafe extern "C" fn(*mut Display, *mut XRRScreenResources, RRCrtc) -> *mut XRRCrtcInfo;
pub type SetCrtcConfigFn = unsafe extern "C" fn(
    *mut Display,
    *mut XRRScreenResources,
    RRCrtc,
    Time,
    c_int,
    c_int,
    RRMode,
    Rotation,
    *mut RROutput,
    c_int,
) -> c_int;
pub type FreeScreenResourcesFn = unsafe extern "C" fn(*mut XRRScreenResources);
pub type FreeOutputInfoFn = unsafe extern "C" fn(*mut XRROutputInfo);
pub type FreeCrtcInfoFn = unsafe extern "C" fn(*mut XRRCrtcInfo);

/// Entry points of the real libXrandr that the shim wraps or relies on.
///
/// The function pointers stay valid for as long as `_lib` is loaded, which
/// is the life of this value.
pub struct RealRandr {
    pub get_screen_resources: GetScreenResourcesFn,
    pub get_screen_resources_current: GetScreenResourcesFn,
    pub get_output_info: GetOutputInfoFn,
    pub get_crtc_info: GetCrtcInfoFn,
    pub set_crtc_config: SetCrtcConfigFn,
    pub free_screen_resources: FreeScreenResourcesFn,
    pub free_output_info: FreeOutputInfoFn,
    pub free_crtc_info: FreeCrtcInfoFn,
    _lib: Library,
}

impl RealRandr {
    /// Load the library at `path` and resolve every entry point.
    pub fn open(path: &Path) -> Result<Self> {
        // SAFETY: libXrandr's initialisers have no preconditions.
        let lib = unsafe { Library::open(Some(path), RTLD_LAZY | RTLD_GLOBAL) }
            .with_context(|| format!("Failed to load {}", path.display()))?;

        // SAFETY: each name is paired with the C prototype declared in
        // <X11/extensions/Xrandr.h>.
        let real = unsafe {
            Self {
                get_screen_resources: symbol(&lib, b"XRRGetScreenResources\0")?,
                get_screen_resources_current: symbol(&lib, b"XRRGetScreenResourcesCurrent\0")?,
                get_output_info: symbol(&lib, b"XRRGetOutputInfo\0")?,
                get_crtc_info: symbol(&lib, b"XRRGetCrtcInfo\0")?,
                set_crtc_config: symbol(&lib, b"XRRSetCrtcConfig\0")?,
                free_screen_resources: symbol(&lib, b"XRRFreeScreenResources\0")?,
                free_output_info: symbol(&lib, b"XRRFreeOutputInfo\0")?,
                free_crtc_info: symbol(&lib, b"XRRFreeCrtcInfo\0")?,
                _lib: lib,
            }
        };

        info!(path = %path.display(), "Resolved real libXrandr");
        Ok(real)
    }
}

/// Copy a function pointer out of `lib`.
///
/// # Safety
///
/// `T` must be the function pointer type matching the symbol's definition.
unsafe fn symbol<T: Copy>(lib: &Library, name: &[u8]) -> Result<T> {
    let sym = lib.get::<T>(name).with_context(|| {
        format!(
            "Missing symbol {}",
            String::from_utf8_lossy(&name[..name.len() - 1])
        )
    })?;
    Ok(*sym)
}
