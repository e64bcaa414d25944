use crate::real::RealRandr;
use crate::reply;
use randr_split_core::{
    ConfigStatus, CrtcConfig, CrtcInfo, OutputInfo, RandrBackend, ResourceQuery, ScreenResources,
    Xid,
};
use std::cell::Cell;
use std::ptr;
use thiserror::Error;
use x11::xlib::{Display, Window, XID};
use x11::xrandr::XRRScreenResources;

#[derive(Debug, Error)]
pub enum RandrError {
    #[error("{0} returned no reply")]
    NoReply(&'static str),
    #[error("no screen resources to query against")]
    NoSnapshot,
    #[error("no root window to list resources for")]
    NoWindow,
}

/// The snapshot info queries are issued against.
#[derive(Clone, Copy)]
enum Snapshot {
    None,
    /// Supplied by the caller; not ours to free.
    Borrowed(*mut XRRScreenResources),
    /// Fetched by this backend; freed when replaced or dropped.
    Owned(*mut XRRScreenResources),
}

impl Snapshot {
    fn as_ptr(self) -> *mut XRRScreenResources {
        match self {
            Self::None => ptr::null_mut(),
            Self::Borrowed(res) | Self::Owned(res) => res,
        }
    }
}

/// [`RandrBackend`] over the real libXrandr and one display connection.
pub struct XlibBackend<'a> {
    real: &'a RealRandr,
    dpy: *mut Display,
    window: Option<Window>,
    snapshot: Cell<Snapshot>,
}

impl<'a> XlibBackend<'a> {
    /// Backend for a listing call on `window`.
    pub fn for_window(real: &'a RealRandr, dpy: *mut Display, window: Window) -> Self {
        Self {
            real,
            dpy,
            window: Some(window),
            snapshot: Cell::new(Snapshot::None),
        }
    }

    /// Backend answering queries against a snapshot the caller holds.
    pub fn for_resources(
        real: &'a RealRandr,
        dpy: *mut Display,
        resources: *mut XRRScreenResources,
    ) -> Self {
        let snapshot = if resources.is_null() {
            Snapshot::None
        } else {
            Snapshot::Borrowed(resources)
        };
        Self {
            real,
            dpy,
            window: None,
            snapshot: Cell::new(snapshot),
        }
    }

    fn release(&self, snapshot: Snapshot) {
        if let Snapshot::Owned(res) = snapshot {
            // SAFETY: `res` came from the real XRRGetScreenResources* and is
            // no longer referenced.
            unsafe { (self.real.free_screen_resources)(res) };
        }
    }

    fn resources(&self) -> Result<*mut XRRScreenResources, RandrError> {
        match self.snapshot.get() {
            Snapshot::None => Err(RandrError::NoSnapshot),
            snapshot => Ok(snapshot.as_ptr()),
        }
    }
}

impl Drop for XlibBackend<'_> {
    fn drop(&mut self) {
        self.release(self.snapshot.replace(Snapshot::None));
    }
}

impl RandrBackend for XlibBackend<'_> {
    type Error = RandrError;

    fn screen_resources(&self, query: ResourceQuery) -> Result<ScreenResources, RandrError> {
        let window = self.window.ok_or(RandrError::NoWindow)?;
        let (fetch, name) = match query {
            ResourceQuery::All => (self.real.get_screen_resources, "XRRGetScreenResources"),
            ResourceQuery::Current => (
                self.real.get_screen_resources_current,
                "XRRGetScreenResourcesCurrent",
            ),
        };

        // SAFETY: `dpy` is the caller's open display.
        let res = unsafe { fetch(self.dpy, window) };
        if res.is_null() {
            return Err(RandrError::NoReply(name));
        }
        self.release(self.snapshot.replace(Snapshot::Owned(res)));

        // SAFETY: non-null replies are complete.
        Ok(unsafe { reply::read_screen_resources(res) })
    }

    fn crtc_info(&self, crtc: Xid) -> Result<CrtcInfo, RandrError> {
        let resources = self.resources()?;
        // SAFETY: `resources` is a live snapshot on `dpy`.
        let info = unsafe { (self.real.get_crtc_info)(self.dpy, resources, crtc as XID) };
        if info.is_null() {
            return Err(RandrError::NoReply("XRRGetCrtcInfo"));
        }
        // SAFETY: non-null replies are complete, and are freed exactly once.
        unsafe {
            let owned = reply::read_crtc_info(info);
            (self.real.free_crtc_info)(info);
            Ok(owned)
        }
    }

    fn output_info(&self, output: Xid) -> Result<OutputInfo, RandrError> {
        let resources = self.resources()?;
        // SAFETY: `resources` is a live snapshot on `dpy`.
        let info = unsafe { (self.real.get_output_info)(self.dpy, resources, output as XID) };
        if info.is_null() {
            return Err(RandrError::NoReply("XRRGetOutputInfo"));
        }
        // SAFETY: non-null replies are complete, and are freed exactly once.
        unsafe {
            let owned = reply::read_output_info(info);
            (self.real.free_output_info)(info);
            Ok(owned)
        }
    }

    fn set_crtc_config(&self, config: &CrtcConfig) -> ConfigStatus {
        let mut outputs: Vec<XID> = config.outputs.iter().map(|&id| id as XID).collect();
        let outputs_ptr = if outputs.is_empty() {
            ptr::null_mut()
        } else {
            outputs.as_mut_ptr()
        };

        // SAFETY: arguments mirror the caller's; `outputs` outlives the call.
        let status = unsafe {
            (self.real.set_crtc_config)(
                self.dpy,
                self.snapshot.get().as_ptr(),
                config.crtc as XID,
                config.timestamp as _,
                config.x,
                config.y,
                config.mode as XID,
                config.rotation,
                outputs_ptr,
                outputs.len() as _,
            )
        };
        ConfigStatus::from_raw(status)
    }
}
