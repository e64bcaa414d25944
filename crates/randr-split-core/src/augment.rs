//! Growing resource lists with synthetic twins.

use crate::backend::RandrBackend;
use crate::detect::{is_crtc_split, is_output_split};
use crate::id::{encode, Xid};
use crate::types::ModeInfo;
use crate::{SplitError, SplitLayout};
use tracing::debug;

/// Capacity of any list the split layer grows. A grown list must stay
/// strictly below it.
pub const MAX_RESOURCE_ENTRIES: usize = 255;

/// Append `encode(real, 1) ..= encode(real, extra)` to `ids`.
pub fn append_synthetic(ids: &mut Vec<Xid>, real: Xid, extra: u32) -> Result<(), SplitError> {
    let len = ids.len() + extra as usize;
    if len >= MAX_RESOURCE_ENTRIES {
        return Err(SplitError::CapacityExceeded {
            len,
            capacity: MAX_RESOURCE_ENTRIES,
        });
    }
    ids.reserve(extra as usize);
    for slice in 1..=extra {
        ids.push(encode(real, slice)?);
    }
    Ok(())
}

/// Add twins for the first split CRTC in `crtcs`. Returns the CRTC that was
/// split, if any.
pub fn augment_crtcs<B: RandrBackend>(
    backend: &B,
    layout: &SplitLayout,
    crtcs: &mut Vec<Xid>,
) -> Result<Option<Xid>, SplitError> {
    let Some(&real) = crtcs
        .iter()
        .find(|&&crtc| is_crtc_split(backend, layout, crtc))
    else {
        return Ok(None);
    };
    append_synthetic(crtcs, real, layout.extra_slices())?;
    debug!(crtc = real, count = crtcs.len(), "split CRTC");
    Ok(Some(real))
}

/// Add twins for the first output driven by the split CRTC.
pub fn augment_outputs<B: RandrBackend>(
    backend: &B,
    layout: &SplitLayout,
    outputs: &mut Vec<Xid>,
) -> Result<Option<Xid>, SplitError> {
    let Some(&real) = outputs
        .iter()
        .find(|&&output| is_output_split(backend, layout, output))
    else {
        return Ok(None);
    };
    append_synthetic(outputs, real, layout.extra_slices())?;
    debug!(output = real, count = outputs.len(), "split output");
    Ok(Some(real))
}

/// Narrow the first mode with the split signature to one slice.
///
/// Only what `xrandr` prints is adjusted: the horizontal timings, the pixel
/// clock and the name. Returns the id of the corrected mode.
pub fn correct_modes(layout: &SplitLayout, modes: &mut [ModeInfo]) -> Option<Xid> {
    let slices = layout.slices();
    let mode = modes
        .iter_mut()
        .find(|mode| layout.matches(mode.width, mode.height))?;

    mode.width /= slices;
    mode.h_sync_start /= slices;
    mode.h_sync_end /= slices;
    mode.h_total /= slices;
    mode.dot_clock /= u64::from(slices);

    let name = format!("{}x{}", mode.width, mode.height);
    debug!(mode = mode.id, %name, "narrowed split mode");
    mode.name = name.into_bytes();

    Some(mode.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeDisplay;
    use crate::id::decode;
    use crate::RandrBackend;
    use crate::ResourceQuery;

    fn layout(extra: u32) -> SplitLayout {
        SplitLayout::new(2048, 768, extra).unwrap()
    }

    #[test]
    fn append_adds_one_twin_per_extra_slice() {
        let mut ids = vec![0x3f, 0x40];
        append_synthetic(&mut ids, 0x3f, 3).unwrap();
        assert_eq!(ids.len(), 5);
        assert_eq!(decode(ids[2]), (0x3f, 1));
        assert_eq!(decode(ids[3]), (0x3f, 2));
        assert_eq!(decode(ids[4]), (0x3f, 3));
    }

    #[test]
    fn append_is_bounded() {
        let mut ids: Vec<Xid> = (1..=253).collect();
        append_synthetic(&mut ids, 1, 1).unwrap();
        assert_eq!(ids.len(), MAX_RESOURCE_ENTRIES - 1);

        let err = append_synthetic(&mut ids, 2, 1).unwrap_err();
        assert_eq!(
            err,
            SplitError::CapacityExceeded {
                len: MAX_RESOURCE_ENTRIES,
                capacity: MAX_RESOURCE_ENTRIES
            }
        );
        assert_eq!(ids.len(), MAX_RESOURCE_ENTRIES - 1);
    }

    #[test]
    fn append_refuses_synthetic_source() {
        let mut ids = Vec::new();
        let twin = encode(0x3f, 1).unwrap();
        assert!(matches!(
            append_synthetic(&mut ids, twin, 1),
            Err(SplitError::ReservedBitsSet { .. })
        ));
    }

    #[test]
    fn only_the_wide_crtc_gets_twins() {
        let display = FakeDisplay::wall();
        let mut crtcs = display.screen_resources(ResourceQuery::All).unwrap().crtcs;
        let split = augment_crtcs(&display, &layout(1), &mut crtcs).unwrap();

        assert_eq!(split, Some(FakeDisplay::WIDE_CRTC));
        assert_eq!(crtcs.len(), 4);
        assert_eq!(decode(crtcs[3]), (FakeDisplay::WIDE_CRTC, 1));
    }

    #[test]
    fn first_matching_crtc_wins() {
        let mut display = FakeDisplay::wall();
        display.crtc_mut(FakeDisplay::SIDE_CRTC).width = 2048;
        let mut crtcs = display.screen_resources(ResourceQuery::All).unwrap().crtcs;
        augment_crtcs(&display, &layout(2), &mut crtcs).unwrap();

        assert_eq!(crtcs.len(), 5);
        assert!(crtcs[3..]
            .iter()
            .all(|&id| decode(id).0 == FakeDisplay::WIDE_CRTC));
    }

    #[test]
    fn outputs_are_split_independently() {
        let display = FakeDisplay::wall();
        let mut outputs = display.screen_resources(ResourceQuery::All).unwrap().outputs;
        let split = augment_outputs(&display, &layout(2), &mut outputs).unwrap();

        assert_eq!(split, Some(FakeDisplay::WIDE_OUTPUT));
        assert_eq!(outputs.len(), 5);
        assert_eq!(decode(outputs[3]), (FakeDisplay::WIDE_OUTPUT, 1));
        assert_eq!(decode(outputs[4]), (FakeDisplay::WIDE_OUTPUT, 2));
    }

    #[test]
    fn nothing_matches_without_a_wide_crtc() {
        let mut display = FakeDisplay::wall();
        display.crtc_mut(FakeDisplay::WIDE_CRTC).width = 1920;
        let mut resources = display.screen_resources(ResourceQuery::All).unwrap();

        assert_eq!(augment_crtcs(&display, &layout(1), &mut resources.crtcs), Ok(None));
        assert_eq!(augment_outputs(&display, &layout(1), &mut resources.outputs), Ok(None));
        assert_eq!(resources.crtcs.len(), 3);
        assert_eq!(resources.outputs.len(), 3);
    }

    #[test]
    fn mode_is_narrowed_and_renamed() {
        let display = FakeDisplay::wall();
        let mut modes = display.modes.clone();
        let corrected = correct_modes(&layout(1), &mut modes);

        assert_eq!(corrected, Some(FakeDisplay::WIDE_MODE));
        let wide = &modes[1];
        assert_eq!(wide.width, 1024);
        assert_eq!(wide.height, 768);
        assert_eq!(wide.h_sync_start, 1048);
        assert_eq!(wide.h_sync_end, 1184);
        assert_eq!(wide.h_total, 1344);
        assert_eq!(wide.dot_clock, 65_000_000);
        assert_eq!(wide.name, b"1024x768");
        assert_eq!(wide.v_total, 806);
        assert_eq!(wide.flags, 0x5);

        assert_eq!(modes[0], display.modes[0]);
    }

    #[test]
    fn mode_divides_by_slice_count() {
        let mut modes = FakeDisplay::wall().modes;
        correct_modes(&layout(3), &mut modes);
        assert_eq!(modes[1].width, 512);
        assert_eq!(modes[1].h_total, 672);
        assert_eq!(modes[1].name, b"512x768");
    }

    #[test]
    fn custom_mode_name_is_replaced() {
        let mut modes = vec![ModeInfo {
            id: 0x60,
            width: 2048,
            height: 768,
            name: b"wall".to_vec(),
            ..ModeInfo::default()
        }];
        assert_eq!(correct_modes(&layout(1), &mut modes), Some(0x60));
        assert_eq!(modes[0].width, 1024);
        assert_eq!(modes[0].name, b"1024x768");
    }
}
