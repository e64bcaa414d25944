//! randr-split: make one wide RandR output look like several.
//!
//! Built as a shared object and loaded with `LD_PRELOAD` ahead of libXrandr.
//! It overrides the five calls that list, describe and configure CRTCs and
//! outputs, forwards them to the real library, and rewrites the replies with
//! [`randr_split_core::Splitter`]. Every other libXrandr symbol resolves to
//! the real library untouched.
//!
//! Configuration is read once, on the first intercepted call; see
//! [`randr_split_config`]. Logs go to stderr, filtered by `RANDR_SPLIT_LOG`.

mod backend;
mod exports;
mod real;
mod reply;

use randr_split_config::SplitConfig;
use randr_split_core::Splitter;
use real::RealRandr;
use std::fmt::Display;
use std::sync::OnceLock;
use tracing::{error, info};

pub use exports::{
    XRRGetCrtcInfo, XRRGetOutputInfo, XRRGetScreenResources, XRRGetScreenResourcesCurrent,
    XRRSetCrtcConfig,
};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "RANDR_SPLIT_LOG";

/// Process-wide state, built on first use and never changed.
struct Runtime {
    real: RealRandr,
    splitter: Splitter,
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        init_logging();
        let config = randr_split_config::load_config_or_default();
        match build_runtime(&config) {
            Ok(rt) => rt,
            Err(e) => fatal(&format!("{e:#}")),
        }
    })
}

fn build_runtime(config: &SplitConfig) -> anyhow::Result<Runtime> {
    let layout = config.layout()?;
    let real = RealRandr::open(&config.real_library)?;
    let (width, height) = layout.signature();
    info!(
        width,
        height,
        slices = layout.slices(),
        "Splitting matching CRTC"
    );
    Ok(Runtime {
        real,
        splitter: Splitter::new(layout),
    })
}

/// Install a stderr subscriber unless the host application already has one.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log and abort. Used when the environment breaks an assumption the split
/// layer cannot work without.
fn fatal(err: &dyn Display) -> ! {
    error!(%err, "randr-split cannot continue");
    std::process::abort()
}
