//! # CSBK Event Taxonomy
//!
//! The typed output of [`crate::csbk::parser::parse`] (spec.md §3). Keeping
//! this a pure data type — no `SiteModel`/`Tuner` access anywhere in this
//! module — is what lets [`crate::policy`] and [`crate::site`] be exercised
//! without constructing a radio at all (spec.md §9, "split into a pure parse
//! and an effectful apply").

use crate::constants::DmrlaModel;

/// Category of a channel grant, matching the CSBKO groupings in spec.md §4.C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    /// Private Voice Channel Grant (opcode 48).
    Pv,
    /// Talkgroup Voice Channel Grant (opcode 49).
    Tv,
    /// Broadcast Voice Channel Grant (opcode 50, treated as group per spec.md
    /// Open Questions — the ETSI appendix lists it under private, which this
    /// crate holds to be an error in the source document).
    Btv,
    /// Private Data Channel Grant: Single Item (opcode 51).
    PdSingle,
    /// Talkgroup Data Channel Grant: Single Item (opcode 52).
    TdSingle,
    /// Duplex Private Voice Channel Grant (opcode 53).
    PvDx,
    /// Duplex Private Data Channel Grant (opcode 54).
    PdDx,
    /// Private Data Channel Grant: Multi Item (opcode 55).
    PdMulti,
    /// Talkgroup Data Channel Grant: Multi Item (opcode 56, when not BS_Dwn_Act).
    TdMulti,
}

impl GrantKind {
    /// Whether this grant is a data-channel grant (spec.md §4.F "Data grants").
    pub fn is_data(self) -> bool {
        matches!(
            self,
            GrantKind::PdSingle
                | GrantKind::TdSingle
                | GrantKind::PdDx
                | GrantKind::PdMulti
                | GrantKind::TdMulti
        )
    }

    /// Whether this grant is a private (non-group) grant.
    pub fn is_private(self) -> bool {
        matches!(self, GrantKind::Pv | GrantKind::PvDx)
    }

    /// Whether this grant is a group (talkgroup) grant.
    pub fn is_group(self) -> bool {
        matches!(self, GrantKind::Tv | GrantKind::Btv)
    }
}

/// A decomposed DMRLA system code, as produced by C_ALOHA_SYS_PARMS
/// (spec.md §3 "Site identity").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteIdentity {
    pub model: DmrlaModel,
    pub net: u16,
    /// Raw `site` field before the super/sub split.
    pub site: u16,
    pub super_site: u16,
    pub sub_site: u16,
    pub category: crate::constants::SiteCategory,
}

/// Cause code recovered from the reference decoder's `P_CLEAR` handling
/// (spec.md §4.F; see SPEC_FULL.md's "Supplemented from original_source").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    NoActivity,
    OppositeSlotIdle,
    TgHoldMatch,
}

/// Kind of P_MAINT message (spec.md §4.C, "kind@28(3)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintKind {
    Disconnect,
    Reserved(u8),
}

/// Kind of P_PROTECT message (spec.md §4.C opcode 47 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectKind {
    DisPtt,
    EnPtt,
    IllegallyParked,
    EnPttOneMs,
    Reserved(u8),
}

/// Subtype of a C_BCAST announcement (spec.md §4.C opcode 40 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastSubtype {
    AnnounceWithdrawTscc,
    CallTimer,
    VoteNow,
    LocalTime,
    MassReg,
    ChanFreq,
    AdjacentSite,
    GenSiteParams,
    ManufacturerSpecific(u8),
    Reserved(u8),
}

impl BroadcastSubtype {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => BroadcastSubtype::AnnounceWithdrawTscc,
            1 => BroadcastSubtype::CallTimer,
            2 => BroadcastSubtype::VoteNow,
            3 => BroadcastSubtype::LocalTime,
            4 => BroadcastSubtype::MassReg,
            5 => BroadcastSubtype::ChanFreq,
            6 => BroadcastSubtype::AdjacentSite,
            7 => BroadcastSubtype::GenSiteParams,
            0x1E | 0x1F => BroadcastSubtype::ManufacturerSpecific(bits),
            other => BroadcastSubtype::Reserved(other),
        }
    }
}

/// Capacity+ per-LSN activity, as assembled and decoded by [`crate::mbc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapPlusStatus {
    pub rest_lsn: u8,
    /// LSN 1..16 group-call activity, indexed `[0]` = LSN 1.
    pub group_bits: [bool; 16],
    /// LSN 1..16 private/data-call activity, indexed `[0]` = LSN 1.
    pub private_bits: [bool; 16],
    /// Per-LSN talkgroup for group-active LSNs (`None` where `group_bits` is clear).
    pub group_targets: [Option<u8>; 16],
    /// Per-LSN 16-bit target for private/data-active LSNs.
    pub private_targets: [Option<u16>; 16],
}

/// A fully parsed DMR control-signalling event.
#[derive(Debug, Clone, PartialEq)]
pub enum CsbkEvent {
    ChannelGrant {
        kind: GrantKind,
        /// 12-bit logical physical channel number, or `0xFFF` if absolute
        /// parameters were appended as an MBC block.
        lpchannum: u16,
        /// TDMA slot (0 or 1), displayed to users as slot 1/2.
        slot: u8,
        target: u32,
        source: u32,
        emergency: bool,
        /// Resolved RX frequency in Hz, if known (from the MBC absolute
        /// block or from a future `trunk_chan_map` lookup).
        freq: Option<u64>,
    },
    Aloha {
        site_id: SiteIdentity,
        registration_required: bool,
        version: u8,
        mask: u8,
        target: u32,
    },
    Clear {
        reason: Option<ClearReason>,
    },
    Protect {
        kind: ProtectKind,
        group_flag: bool,
        target: u32,
        source: u32,
    },
    Broadcast {
        subtype: BroadcastSubtype,
    },
    Ahoy {
        service_kind: u8,
        target: u32,
        source: u32,
        group_flag: bool,
    },
    Preamble {
        content_is_data: bool,
        group_flag: bool,
        target: u32,
        source: u32,
        blocks: u8,
        /// CRC-8 over the truncated 16-bit target, recorded for private XPT
        /// preambles only (see SPEC_FULL.md supplement on XPT hashing).
        target_hash: Option<u8>,
    },
    ConnectPlusNeighbors {
        ids: [u8; 5],
    },
    ConnectPlusGrant {
        src: u32,
        grp: u32,
        lcn: u8,
        slot: u8,
    },
    CapPlusStatus(CapPlusStatus),
    CapPlusAdjacent {
        /// Up to six `(site, rest_channel)` pairs.
        entries: Vec<(u8, u8)>,
    },
    CapPlusUnknown {
        raw: Vec<u8>,
    },
    XptSiteStatus {
        free_lcn: u8,
        seq: u8,
        lsn_state: [u8; 6],
        lsn_target: [u16; 6],
    },
    XptAdjacent {
        /// Up to four `(site, free_lcn)` records.
        entries: [(u16, u8); 4],
    },
    BsDownActivation {
        target: u32,
        source: u32,
    },
    UuVReq {
        target: u32,
        source: u32,
    },
    UuAnsRsp {
        target: u32,
        source: u32,
    },
    CtCsbk,
    Move,
    MaintenanceBeacon {
        kind: MaintKind,
        target: u32,
        source: u32,
    },
    Nack {
        target: u32,
        source: u32,
    },
    MotoDataAnnounce {
        raw: Vec<u8>,
    },
    /// Header parsed, but the (FID, opcode) combination has no decoder.
    Unknown { fid: u8, opcode: u8 },
    /// A Capacity+ channel-status fragment was accepted into the reassembly
    /// buffer but the message is not yet complete.
    ReassemblyPending,
}
