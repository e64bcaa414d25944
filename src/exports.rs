//! The libXrandr entry points this library overrides.
//!
//! Signatures match <X11/extensions/Xrandr.h> exactly. Everything else
//! resolves to the real library through the dynamic linker.

#![allow(non_snake_case)]

use crate::backend::XlibBackend;
use crate::{fatal, reply, runtime};
use randr_split_core::{CallError, CrtcConfig, ResourceQuery, Xid};
use std::fmt::Display;
use std::os::raw::c_int;
use std::{ptr, slice};
use tracing::debug;
use x11::xlib::{Display as XDisplay, Time, Window};
use x11::xrandr::{
    RRCrtc, RRMode, RROutput, Rotation, XRRCrtcInfo, XRROutputInfo, XRRScreenResources,
};

/// Unwrap a façade result: backend failures become a null reply, split
/// errors end the process.
fn settle<T, E: Display>(call: &'static str, result: Result<T, CallError<E>>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(CallError::Backend(e)) => {
            debug!(call, %e, "passing failure through");
            None
        }
        Err(CallError::Split(e)) => fatal(&e),
    }
}

fn list_resources(
    dpy: *mut XDisplay,
    window: Window,
    query: ResourceQuery,
) -> *mut XRRScreenResources {
    let rt = runtime();
    let backend = XlibBackend::for_window(&rt.real, dpy, window);
    let call = match query {
        ResourceQuery::All => "XRRGetScreenResources",
        ResourceQuery::Current => "XRRGetScreenResourcesCurrent",
    };
    settle(call, rt.splitter.screen_resources(&backend, query))
        .map_or(ptr::null_mut(), |res| reply::alloc_screen_resources(&res))
}

/// # Safety
///
/// Same contract as libXrandr's `XRRGetScreenResources`.
#[no_mangle]
pub unsafe extern "C" fn XRRGetScreenResources(
    dpy: *mut XDisplay,
    window: Window,
) -> *mut XRRScreenResources {
    list_resources(dpy, window, ResourceQuery::All)
}

/// # Safety
///
/// Same contract as libXrandr's `XRRGetScreenResourcesCurrent`.
#[no_mangle]
pub unsafe extern "C" fn XRRGetScreenResourcesCurrent(
    dpy: *mut XDisplay,
    window: Window,
) -> *mut XRRScreenResources {
    list_resources(dpy, window, ResourceQuery::Current)
}

/// # Safety
///
/// Same contract as libXrandr's `XRRGetOutputInfo`.
#[no_mangle]
pub unsafe extern "C" fn XRRGetOutputInfo(
    dpy: *mut XDisplay,
    resources: *mut XRRScreenResources,
    output: RROutput,
) -> *mut XRROutputInfo {
    let rt = runtime();
    let backend = XlibBackend::for_resources(&rt.real, dpy, resources);
    settle(
        "XRRGetOutputInfo",
        rt.splitter.output_info(&backend, output as Xid),
    )
    .map_or(ptr::null_mut(), |info| reply::alloc_output_info(&info))
}

/// # Safety
///
/// Same contract as libXrandr's `XRRGetCrtcInfo`.
#[no_mangle]
pub unsafe extern "C" fn XRRGetCrtcInfo(
    dpy: *mut XDisplay,
    resources: *mut XRRScreenResources,
    crtc: RRCrtc,
) -> *mut XRRCrtcInfo {
    let rt = runtime();
    let backend = XlibBackend::for_resources(&rt.real, dpy, resources);
    settle("XRRGetCrtcInfo", rt.splitter.crtc_info(&backend, crtc as Xid))
        .map_or(ptr::null_mut(), |info| reply::alloc_crtc_info(&info))
}

/// # Safety
///
/// Same contract as libXrandr's `XRRSetCrtcConfig`: `outputs` points to
/// `noutputs` ids.
#[no_mangle]
pub unsafe extern "C" fn XRRSetCrtcConfig(
    dpy: *mut XDisplay,
    resources: *mut XRRScreenResources,
    crtc: RRCrtc,
    timestamp: Time,
    x: c_int,
    y: c_int,
    mode: RRMode,
    rotation: Rotation,
    outputs: *mut RROutput,
    noutputs: c_int,
) -> c_int {
    let outputs = if outputs.is_null() || noutputs <= 0 {
        Vec::new()
    } else {
        slice::from_raw_parts(outputs, noutputs as usize)
            .iter()
            .map(|&id| id as Xid)
            .collect()
    };
    let config = CrtcConfig {
        crtc: crtc as Xid,
        timestamp: timestamp as u64,
        x,
        y,
        mode: mode as Xid,
        rotation,
        outputs,
    };

    let rt = runtime();
    let backend = XlibBackend::for_resources(&rt.real, dpy, resources);
    rt.splitter.set_crtc_config(&backend, &config).to_raw()
}
