//! # CSBK Parser — ETSI dialect
//!
//! Implements the standard ETSI Tier II/III opcode table (`fid=0`). Vendor
//! dialects live in sibling modules and are reached through [`parse`]'s FID
//! dispatch. Every multi-bit field decode goes through [`Bits::read`], so a
//! truncated or corrupt PDU surfaces as [`DmrError::Malformed`] rather than
//! an out-of-bounds panic.

use crate::bits::Bits;
use crate::constants::*;
use crate::csbk::event::{
    BroadcastSubtype, CsbkEvent, GrantKind, MaintKind, ProtectKind, SiteIdentity,
};
use crate::csbk::{capacity_plus, connect_plus, xpt};
use crate::error::DmrError;

/// Absolute RX/TX parameters recovered from an appended MBC block
/// (spec.md §4.C "MBC absolute-parameters appendix").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcAppendix {
    Absolute {
        lpchannum: u16,
        tx_freq: u64,
        rx_freq: u64,
    },
    Unknown {
        cdeftype: u8,
    },
}

/// Top-level CSBK entry point. `bits` is the full PDU (96 bits minimum, or
/// 96+80 when an MBC appendix follows a grant). `dmr_mfid` is the site's
/// currently latched vendor dialect (spec.md §3 invariant: "If `fid != 0`,
/// `dmr_mfid` is set to `fid`"), needed to disambiguate the ETSI Preamble
/// opcode's XPT-branded field layout.
pub fn parse(bits: &Bits, fid: u8, opcode: u8, dmr_mfid: u8) -> Result<CsbkEvent, DmrError> {
    match fid {
        FID_ETSI => parse_etsi(bits, opcode, dmr_mfid),
        FID_MOTOROLA_CONNECT_PLUS => connect_plus::parse(bits, opcode),
        FID_MOTOROLA_CAPACITY_PLUS => capacity_plus::parse(bits, opcode),
        FID_HYTERA_XPT => xpt::parse(bits, opcode),
        other => Err(DmrError::UnknownFid(other)),
    }
}

/// Reads the `target@32(24)`, `source@56(24)` pair shared by most ETSI opcodes.
fn target_source(bits: &Bits) -> Result<(u32, u32), DmrError> {
    let target = bits.read(32, 24, "target")? as u32;
    let source = bits.read(56, 24, "source")? as u32;
    Ok((target, source))
}

fn parse_etsi(bits: &Bits, opcode: u8, dmr_mfid: u8) -> Result<CsbkEvent, DmrError> {
    match opcode {
        OP_UU_V_REQ => {
            let (target, source) = target_source(bits)?;
            Ok(CsbkEvent::UuVReq { target, source })
        }
        OP_UU_ANS_RSP => {
            let (target, source) = target_source(bits)?;
            Ok(CsbkEvent::UuAnsRsp { target, source })
        }
        OP_CT_CSBK => Ok(CsbkEvent::CtCsbk),
        OP_C_ALOHA_SYS_PARMS => parse_aloha(bits, dmr_mfid),
        OP_C_AHOY => {
            let group_flag = bits.read_bit(25, "gi")?;
            let service_kind = bits.read(28, 4, "svc_kind")? as u8;
            let (target, source) = target_source(bits)?;
            Ok(CsbkEvent::Ahoy {
                service_kind,
                target,
                source,
                group_flag,
            })
        }
        OP_C_ACKVIT | OP_C_RAND | OP_C_ACKD => Ok(CsbkEvent::CtCsbk),
        OP_NACK_RSP => {
            let (target, source) = target_source(bits)?;
            Ok(CsbkEvent::Nack { target, source })
        }
        OP_C_BCAST => {
            let a_type = bits.read(16, 5, "a_type")? as u8;
            Ok(CsbkEvent::Broadcast {
                subtype: BroadcastSubtype::from_bits(a_type),
            })
        }
        OP_P_MAINT => {
            let kind_bits = bits.read(28, 3, "pm_kind")? as u8;
            let kind = match kind_bits {
                0 => MaintKind::Disconnect,
                other => MaintKind::Reserved(other),
            };
            let (target, source) = target_source(bits)?;
            Ok(CsbkEvent::MaintenanceBeacon {
                kind,
                target,
                source,
            })
        }
        OP_P_CLEAR => Ok(CsbkEvent::Clear { reason: None }),
        OP_P_PROTECT => {
            let kind_bits = bits.read(28, 3, "p_kind")? as u8;
            let kind = match kind_bits {
                0 => ProtectKind::DisPtt,
                1 => ProtectKind::EnPtt,
                2 => ProtectKind::IllegallyParked,
                3 => ProtectKind::EnPttOneMs,
                other => ProtectKind::Reserved(other),
            };
            let group_flag = bits.read_bit(31, "gi")?;
            let (target, source) = target_source(bits)?;
            Ok(CsbkEvent::Protect {
                kind,
                group_flag,
                target,
                source,
            })
        }
        OP_GRANT_LO..=OP_GRANT_HI => parse_grant(bits, opcode),
        OP_C_MOVE => Ok(CsbkEvent::Move),
        OP_PREAMBLE => parse_preamble(bits, dmr_mfid),
        other => Err(DmrError::UnknownOpcode { fid: FID_ETSI, opcode: other }),
    }
}

/// Decodes C_ALOHA_SYS_PARMS. `dmr_mfid` is the site's latched vendor
/// dialect: Capacity+/Max (FID 0x10) overrides the model's usual site-bit
/// split with `n = 0` (spec.md §3, "CapMax override"), since that dialect's
/// site field is never sub-divided.
fn parse_aloha(bits: &Bits, dmr_mfid: u8) -> Result<CsbkEvent, DmrError> {
    let version = bits.read(19, 3, "version")? as u8;
    let mask = bits.read(24, 5, "mask")? as u8;
    let registration_required = bits.read_bit(35, "regreq")?;
    let model = DmrlaModel::from_bits(bits.read(40, 2, "dmrla_model")? as u8);
    let net_bits = model.net_bits() as usize;
    let site_bits = model.site_bits() as usize;
    let net = bits.read(42, net_bits, "dmrla_net")? as u16;
    let site = bits.read(42 + net_bits, site_bits, "dmrla_site")? as u16;
    // Site field always ends at bit 54 regardless of model (3+9 = 5+7 = 8+4 = 10+2).
    let category_bits = bits.read(54, 2, "category")? as u8;
    let n = if dmr_mfid == FID_MOTOROLA_CAPACITY_PLUS { 0 } else { site_bits as u32 };
    let (super_site, sub_site) = if n == 0 {
        (site + 1, 0)
    } else {
        ((site >> n) + 1, (site & ((1 << n) - 1)) + 1)
    };
    let target = bits.read(56, 24, "target")? as u32;

    Ok(CsbkEvent::Aloha {
        site_id: SiteIdentity {
            model,
            net,
            site,
            super_site,
            sub_site,
            category: SiteCategory::from_bits(category_bits),
        },
        registration_required,
        version,
        mask,
        target,
    })
}

fn parse_grant(bits: &Bits, opcode: u8) -> Result<CsbkEvent, DmrError> {
    let kind = match opcode {
        OP_PV_GRANT => GrantKind::Pv,
        OP_TV_GRANT => GrantKind::Tv,
        OP_BTV_GRANT => GrantKind::Btv,
        OP_PD_GRANT_SINGLE => GrantKind::PdSingle,
        OP_TD_GRANT_SINGLE => GrantKind::TdSingle,
        OP_PV_GRANT_DX => GrantKind::PvDx,
        OP_PD_GRANT_DX => GrantKind::PdDx,
        OP_PD_GRANT_MULTI => GrantKind::PdMulti,
        OP_TD_GRANT_MULTI_OR_BS_DWN_ACT => GrantKind::TdMulti,
        other => return Err(DmrError::UnknownOpcode { fid: FID_ETSI, opcode: other }),
    };
    let emergency = bits.read_bit(16, "emergency")?;
    let slot = bits.read(19, 1, "slot")? as u8;
    let lpchannum = bits.read(20, 12, "lpchannum")? as u16;
    let (target, source) = target_source(bits)?;
    Ok(CsbkEvent::ChannelGrant {
        kind,
        lpchannum,
        slot,
        target,
        source,
        emergency,
        freq: None,
    })
}

/// Distinguishes opcode 56 between `TD_GRANT` multi-item and `BS_Dwn_Act`,
/// per spec.md §4.C / §6: the PDU is `BS_Dwn_Act` only when `synctype`
/// indicates MS Data sync.
pub fn is_bs_dwn_act(opcode: u8, synctype: u8) -> bool {
    opcode == OP_TD_GRANT_MULTI_OR_BS_DWN_ACT && synctype == SYNCTYPE_MS_DATA
}

pub fn parse_bs_dwn_act(bits: &Bits) -> Result<CsbkEvent, DmrError> {
    let (target, source) = target_source(bits)?;
    Ok(CsbkEvent::BsDownActivation { target, source })
}

fn parse_preamble(bits: &Bits, dmr_mfid: u8) -> Result<CsbkEvent, DmrError> {
    let content_is_data = bits.read_bit(16, "content")?;
    let group_flag = bits.read_bit(17, "gi")?;
    let blocks = bits.read(24, 8, "blocks")? as u8;

    if dmr_mfid == FID_HYTERA_XPT {
        let target = bits.read(40, 16, "target")? as u32;
        let source = bits.read(64, 16, "source")? as u32;
        let target_hash = if !group_flag {
            Some(crc8(bits, 40, 16)?)
        } else {
            None
        };
        return Ok(CsbkEvent::Preamble {
            content_is_data,
            group_flag,
            target,
            source,
            blocks,
            target_hash,
        });
    }

    let (target, source) = target_source(bits)?;
    Ok(CsbkEvent::Preamble {
        content_is_data,
        group_flag,
        target,
        source,
        blocks,
        target_hash: None,
    })
}

/// Decodes the MBC absolute-parameters appendix following a grant whose
/// `lpchannum` was `0xFFF` (spec.md §4.C, bits 96–175 of the concatenated PDU).
pub fn parse_mbc_appendix(bits: &Bits) -> Result<MbcAppendix, DmrError> {
    let cdeftype = bits.read(112, 4, "cdeftype")? as u8;
    if cdeftype != 0 {
        return Ok(MbcAppendix::Unknown { cdeftype });
    }
    let lpchannum = bits.read(118, 12, "lpchannum")? as u16;
    let tx_int = bits.read(130, 10, "tx_int")?;
    let tx_step = bits.read(140, 13, "tx_step")?;
    let rx_int = bits.read(153, 10, "rx_int")?;
    let rx_step = bits.read(163, 13, "rx_step")?;
    Ok(MbcAppendix::Absolute {
        lpchannum,
        tx_freq: tx_int * 1_000_000 + tx_step * 125,
        rx_freq: rx_int * 1_000_000 + rx_step * 125,
    })
}

/// CRC-8/SMBUS (poly 0x07, init 0x00) over `width` bits starting at `offset`,
/// taken 8 bits at a time MSB-first. Used only for the XPT private-preamble
/// target hash (spec.md's original_source supplement); not a general-purpose
/// CRC facility, so it is hand-rolled here rather than pulled in as a dependency.
pub fn crc8(bits: &Bits, offset: usize, width: usize) -> Result<u8, DmrError> {
    let value = bits.read(offset, width, "target_hash_input")?;
    let bytes = value.to_be_bytes();
    let start = bytes.len() - width.div_ceil(8);
    let mut crc: u8 = 0;
    for &byte in &bytes[start..] {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
        }
    }
    Ok(crc)
}
