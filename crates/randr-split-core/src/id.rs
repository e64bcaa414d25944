//! Synthetic resource identifiers.
//!
//! The X server hands out RandR ids of the form `client_id | (xid_mask & n)`.
//! For RandR resources the client id is zero and the mask is `0x001F_FFFF`, so
//! bits 21..=30 are never set on a real CRTC or output. Those bits carry the
//! slice index of a synthetic twin; slice 0 is the real resource itself.

use crate::SplitError;

/// Raw X resource id as it crosses the libXrandr ABI.
pub type Xid = u64;

/// First bit of the reserved slice field.
pub const SLICE_SHIFT: u32 = 21;

/// Bits of an [`Xid`] that hold the slice index.
pub const SLICE_MASK: Xid = 0x7FE0_0000;

/// Largest slice index the reserved field can hold.
pub const MAX_SLICE: u32 = (SLICE_MASK >> SLICE_SHIFT) as u32;

/// A resource id split into its real part and its slice index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitId {
    /// Id as assigned by the server.
    pub real: Xid,
    /// 0 for the real resource, 1.. for synthetic twins.
    pub slice: u32,
}

impl SplitId {
    /// Tag `real` with `slice`, rejecting ids that already use the reserved bits.
    pub fn new(real: Xid, slice: u32) -> Result<Self, SplitError> {
        if real & SLICE_MASK != 0 {
            return Err(SplitError::ReservedBitsSet { id: real });
        }
        if slice > MAX_SLICE {
            return Err(SplitError::SliceOutOfRange { slice });
        }
        Ok(Self { real, slice })
    }

    /// Split a raw id into its parts. Never fails.
    pub fn unpack(id: Xid) -> Self {
        Self {
            real: id & !SLICE_MASK,
            slice: ((id & SLICE_MASK) >> SLICE_SHIFT) as u32,
        }
    }

    /// Raw id with the slice index in the reserved bits.
    pub fn pack(self) -> Xid {
        self.real | (Xid::from(self.slice) << SLICE_SHIFT)
    }

    pub fn is_synthetic(self) -> bool {
        self.slice != 0
    }

    /// The reserved bits of this id, ready to be OR-ed into a related id.
    pub fn slice_bits(self) -> Xid {
        Xid::from(self.slice) << SLICE_SHIFT
    }
}

/// Pack `slice` into the reserved bits of `real`.
pub fn encode(real: Xid, slice: u32) -> Result<Xid, SplitError> {
    SplitId::new(real, slice).map(SplitId::pack)
}

/// Recover `(real, slice)` from a possibly synthetic id.
pub fn decode(id: Xid) -> (Xid, u32) {
    let split = SplitId::unpack(id);
    (split.real, split.slice)
}

/// Whether `id` names a synthetic twin rather than a server resource.
pub fn is_synthetic(id: Xid) -> bool {
    id & SLICE_MASK != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode() {
        for real in [0x1, 0x3f, 0x42, 0x1F_FFFF, 0xdead_0000_0000_0012] {
            for slice in [1, 2, 7, MAX_SLICE] {
                let id = encode(real, slice).unwrap();
                assert_eq!(decode(id), (real, slice));
                assert!(is_synthetic(id));
            }
        }
    }

    #[test]
    fn real_ids_decode_to_slice_zero() {
        assert_eq!(decode(0x45), (0x45, 0));
        assert!(!is_synthetic(0x45));
        assert_eq!(encode(0x45, 0).unwrap(), 0x45);
    }

    #[test]
    fn slice_one_uses_bit_21() {
        assert_eq!(encode(0x45, 1).unwrap(), 0x45 | (1 << 21));
        assert_eq!(SplitId::unpack(0x45 | (3 << 21)).slice_bits(), 3 << 21);
    }

    #[test]
    fn reserved_bits_are_rejected() {
        let fake = encode(0x45, 1).unwrap();
        assert!(matches!(
            encode(fake, 1),
            Err(SplitError::ReservedBitsSet { id }) if id == fake
        ));
    }

    #[test]
    fn slice_must_fit_the_field() {
        assert_eq!(MAX_SLICE, 1023);
        assert!(matches!(
            encode(0x45, MAX_SLICE + 1),
            Err(SplitError::SliceOutOfRange { slice: 1024 })
        ));
    }
}
