//! Motorola Capacity+/Capacity Max dialect (FID 0x10).
//!
//! Opcode `0x3E` (Channel Status) needs multi-block reassembly and is
//! intercepted by [`crate::dispatch::Controller`] before it ever reaches
//! this module — see [`crate::mbc`] for its decode. Everything else here is
//! a single 96-bit CSBK.

use crate::bits::Bits;
use crate::constants::*;
use crate::csbk::event::CsbkEvent;
use crate::error::DmrError;

pub fn parse(bits: &Bits, opcode: u8) -> Result<CsbkEvent, DmrError> {
    match opcode {
        OP_CAP_PLUS_UNKNOWN_3A => Ok(CsbkEvent::CapPlusUnknown {
            raw: bits.as_slice().to_vec(),
        }),
        OP_CAP_PLUS_ADJACENT => parse_adjacent(bits),
        OP_MOTO_DATA_ANNOUNCE => Ok(CsbkEvent::MotoDataAnnounce {
            raw: bits.as_slice().to_vec(),
        }),
        OP_CAP_PLUS_CHANNEL_STATUS => Err(DmrError::UnknownOpcode {
            fid: FID_MOTOROLA_CAPACITY_PLUS,
            opcode,
        }),
        other => Err(DmrError::UnknownOpcode {
            fid: FID_MOTOROLA_CAPACITY_PLUS,
            opcode: other,
        }),
    }
}

/// Six `(nl, nr)` 4-bit pairs starting at bit 32.
fn parse_adjacent(bits: &Bits) -> Result<CsbkEvent, DmrError> {
    let mut entries = Vec::with_capacity(6);
    for i in 0..6 {
        let offset = 32 + i * 8;
        let nl = bits.read(offset, 4, "adjacent_nl")? as u8;
        let nr = bits.read(offset + 4, 4, "adjacent_nr")? as u8;
        entries.push((nl, nr));
    }
    Ok(CsbkEvent::CapPlusAdjacent { entries })
}
