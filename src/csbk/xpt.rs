//! Hytera XPT dialect (FID 0x68).
//!
//! XPT repurposes CSBK header bits 0–1 as a 2-bit sequence number on
//! opcodes `0x0A`/`0x0B` rather than `lb`/`pf` (spec.md §3, §4.H step 1);
//! callers are expected to have already forced `pf=0` before reaching here.

use crate::bits::Bits;
use crate::constants::*;
use crate::csbk::event::CsbkEvent;
use crate::error::DmrError;

pub fn parse(bits: &Bits, opcode: u8) -> Result<CsbkEvent, DmrError> {
    match opcode {
        OP_XPT_SITE_STATUS => parse_site_status(bits),
        OP_XPT_ADJACENT => parse_adjacent(bits),
        other => Err(DmrError::UnknownOpcode {
            fid: FID_HYTERA_XPT,
            opcode: other,
        }),
    }
}

fn parse_site_status(bits: &Bits) -> Result<CsbkEvent, DmrError> {
    let free_lcn = bits.read(16, 4, "free_lcn")? as u8;

    let mut lsn_state = [0u8; 6];
    for (i, state) in lsn_state.iter_mut().enumerate() {
        *state = bits.read(20 + i * 2, 2, "lsn_state")? as u8;
    }

    let mut lsn_target = [0u16; 6];
    for (i, target) in lsn_target.iter_mut().enumerate() {
        if lsn_state[i] != 0 {
            *target = bits.read(32 + i * 8, 8, "lsn_target")? as u16;
        }
    }

    // seq is the header's reinterpreted bits 0-1 (spec.md §3); recorded on
    // CsbkEvent::XptSiteStatus via the caller's own header extraction, not
    // re-derived here to avoid decoding the same bits twice.
    let seq = bits.read(0, 2, "xpt_seq")? as u8;

    Ok(CsbkEvent::XptSiteStatus {
        free_lcn,
        seq,
        lsn_state,
        lsn_target,
    })
}

/// Four 16-bit records: `id@5`, reserved@3, `free@4`, reserved@4, starting at bit 16.
fn parse_adjacent(bits: &Bits) -> Result<CsbkEvent, DmrError> {
    let mut entries = [(0u16, 0u8); 4];
    for (i, entry) in entries.iter_mut().enumerate() {
        let offset = 16 + i * 16;
        let id = bits.read(offset, 5, "adjacent_id")? as u16;
        let free = bits.read(offset + 8, 4, "adjacent_free")? as u8;
        *entry = (id, free);
    }
    Ok(CsbkEvent::XptAdjacent { entries })
}
