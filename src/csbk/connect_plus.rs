//! Motorola Connect+ dialect (FID 0x06).
//!
//! Connect+ reuses the 96-bit CSBK envelope with its own opcode space;
//! spec.md §4.C lists only two opcodes this crate needs to understand.

use crate::bits::Bits;
use crate::constants::*;
use crate::csbk::event::CsbkEvent;
use crate::error::DmrError;

pub fn parse(bits: &Bits, opcode: u8) -> Result<CsbkEvent, DmrError> {
    match opcode {
        OP_CONNECT_PLUS_NEIGHBORS => parse_neighbors(bits),
        OP_CONNECT_PLUS_GRANT => parse_grant(bits),
        other => Err(DmrError::UnknownOpcode {
            fid: FID_MOTOROLA_CONNECT_PLUS,
            opcode: other,
        }),
    }
}

/// Five 6-bit neighbour site ids, packed starting at byte 2 (bit 16).
fn parse_neighbors(bits: &Bits) -> Result<CsbkEvent, DmrError> {
    let mut ids = [0u8; 5];
    for (i, id) in ids.iter_mut().enumerate() {
        *id = bits.read(16 + i * 6, 6, "neighbor_id")? as u8;
    }
    Ok(CsbkEvent::ConnectPlusNeighbors { ids })
}

fn parse_grant(bits: &Bits) -> Result<CsbkEvent, DmrError> {
    let src = bits.read(16, 24, "src")? as u32;
    let grp = bits.read(40, 24, "grp")? as u32;
    let lcn = bits.read(64, 4, "lcn")? as u8;
    let slot = bits.read(68, 1, "slot")? as u8;
    Ok(CsbkEvent::ConnectPlusGrant { src, grp, lcn, slot })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_field(raw: &mut [u8], offset: usize, width: usize, value: u64) {
        for i in 0..width {
            let bit = (value >> (width - 1 - i)) & 1;
            raw[offset + i] = bit as u8;
        }
    }

    #[test]
    fn neighbors_reads_five_six_bit_ids() {
        let mut raw = vec![0u8; 96];
        for i in 0..5 {
            set_field(&mut raw, 16 + i * 6, 6, (i as u64) + 1);
        }
        let b = Bits::new(&raw);
        match parse(&b, OP_CONNECT_PLUS_NEIGHBORS).unwrap() {
            CsbkEvent::ConnectPlusNeighbors { ids } => assert_eq!(ids, [1, 2, 3, 4, 5]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn grant_reads_src_grp_lcn_slot() {
        let mut raw = vec![0u8; 96];
        set_field(&mut raw, 16, 24, 111222);
        set_field(&mut raw, 40, 24, 3101);
        set_field(&mut raw, 64, 4, 7);
        set_field(&mut raw, 68, 1, 1);
        let b = Bits::new(&raw);
        match parse(&b, OP_CONNECT_PLUS_GRANT).unwrap() {
            CsbkEvent::ConnectPlusGrant { src, grp, lcn, slot } => {
                assert_eq!(src, 111222);
                assert_eq!(grp, 3101);
                assert_eq!(lcn, 7);
                assert_eq!(slot, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_opcode_errors() {
        let raw = vec![0u8; 96];
        let b = Bits::new(&raw);
        assert_eq!(
            parse(&b, 0x7F),
            Err(DmrError::UnknownOpcode {
                fid: FID_MOTOROLA_CONNECT_PLUS,
                opcode: 0x7F
            })
        );
    }
}
