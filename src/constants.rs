//! DMR Control Signalling Constants
//!
//! Feature-Set IDs, CSBK opcodes, and DMRLA model widths, based on ETSI TS
//! 102 361-4 and the vendor dialects layered on top of it.

/// Standard ETSI Tier II/III feature set.
pub const FID_ETSI: u8 = 0x00;
/// Motorola Connect+ feature set.
pub const FID_MOTOROLA_CONNECT_PLUS: u8 = 0x06;
/// Motorola Capacity+ / Capacity Max feature set.
pub const FID_MOTOROLA_CAPACITY_PLUS: u8 = 0x10;
/// Hytera XPT feature set.
pub const FID_HYTERA_XPT: u8 = 0x68;

// ETSI CSBKO opcodes (7.1.1 "Channel descriptor" in TS 102 361-4 CSBK table).
pub const OP_UU_V_REQ: u8 = 4;
pub const OP_UU_ANS_RSP: u8 = 5;
pub const OP_CT_CSBK: u8 = 7;
pub const OP_C_ALOHA_SYS_PARMS: u8 = 25;
pub const OP_C_AHOY: u8 = 28;
pub const OP_C_ACKVIT: u8 = 30;
pub const OP_C_RAND: u8 = 31;
pub const OP_C_ACKD: u8 = 33;
pub const OP_NACK_RSP: u8 = 38;
pub const OP_C_BCAST: u8 = 40;
pub const OP_P_MAINT: u8 = 42;
pub const OP_P_CLEAR: u8 = 46;
pub const OP_P_PROTECT: u8 = 47;
pub const OP_PV_GRANT: u8 = 48;
pub const OP_TV_GRANT: u8 = 49;
pub const OP_BTV_GRANT: u8 = 50;
pub const OP_PD_GRANT_SINGLE: u8 = 51;
pub const OP_TD_GRANT_SINGLE: u8 = 52;
pub const OP_PV_GRANT_DX: u8 = 53;
pub const OP_PD_GRANT_DX: u8 = 54;
pub const OP_PD_GRANT_MULTI: u8 = 55;
pub const OP_TD_GRANT_MULTI_OR_BS_DWN_ACT: u8 = 56;
pub const OP_C_MOVE: u8 = 57;
pub const OP_PREAMBLE: u8 = 61;

/// Lowest/highest channel-grant opcode (inclusive), ETSI 7.1.1.1.1.
pub const OP_GRANT_LO: u8 = 48;
pub const OP_GRANT_HI: u8 = 56;

/// `synctype` byte value meaning "MS Data sync", which disambiguates opcode
/// 56 between BS_Dwn_Act and a TD_GRANT multi-item grant.
pub const SYNCTYPE_MS_DATA: u8 = 33;

/// `lpchannum` sentinel meaning "see appended MBC absolute-parameters block".
pub const LPCHANNUM_ABSOLUTE: u16 = 0xFFF;

// Motorola Connect+ (FID 0x06) opcodes.
pub const OP_CONNECT_PLUS_NEIGHBORS: u8 = 0x01;
pub const OP_CONNECT_PLUS_GRANT: u8 = 0x03;

// Motorola Capacity+/Max (FID 0x10) opcodes.
pub const OP_CAP_PLUS_UNKNOWN_3A: u8 = 0x3A;
pub const OP_CAP_PLUS_ADJACENT: u8 = 0x3B;
pub const OP_CAP_PLUS_CHANNEL_STATUS: u8 = 0x3E;
pub const OP_MOTO_DATA_ANNOUNCE: u8 = 41;

// Hytera XPT (FID 0x68) opcodes.
pub const OP_XPT_SITE_STATUS: u8 = 0x0A;
pub const OP_XPT_ADJACENT: u8 = 0x0B;

/// Number of appended 7-byte (56-bit) continuation blocks a Capacity+
/// channel-status message may carry, capped per spec.md §4.D.
pub const CAP_PLUS_MAX_CONTINUATION_BLOCKS: usize = 6;
/// Size in bits of the assembled Capacity+ channel-status buffer once the
/// initial 80-bit block and all continuation blocks are in place.
pub const CAP_PLUS_ASSEMBLED_BITS: usize =
    80 + CAP_PLUS_MAX_CONTINUATION_BLOCKS * 56;

/// DMRLA (DMR Location Area) site-identity decomposition models, keyed by
/// the 2-bit `model` field of C_ALOHA_SYS_PARMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmrlaModel {
    Tiny,
    Small,
    Large,
    Huge,
}

impl DmrlaModel {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => DmrlaModel::Tiny,
            1 => DmrlaModel::Small,
            2 => DmrlaModel::Large,
            _ => DmrlaModel::Huge,
        }
    }

    /// Width in bits of the `net` field.
    pub fn net_bits(self) -> u32 {
        match self {
            DmrlaModel::Tiny => 9,
            DmrlaModel::Small => 7,
            DmrlaModel::Large => 4,
            DmrlaModel::Huge => 2,
        }
    }

    /// Width in bits of the `site` field, and the value of `n` used to split
    /// it into super-site/sub-site.
    pub fn site_bits(self) -> u32 {
        match self {
            DmrlaModel::Tiny => 3,
            DmrlaModel::Small => 5,
            DmrlaModel::Large => 8,
            DmrlaModel::Huge => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DmrlaModel::Tiny => "Tiny",
            DmrlaModel::Small => "Small",
            DmrlaModel::Large => "Large",
            DmrlaModel::Huge => "Huge",
        }
    }
}

/// Category field of C_ALOHA_SYS_PARMS (2 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteCategory {
    A,
    B,
    Ab,
    Reserved,
}

impl SiteCategory {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            1 => SiteCategory::A,
            2 => SiteCategory::B,
            3 => SiteCategory::Ab,
            _ => SiteCategory::Reserved,
        }
    }
}

/// Seconds of inactivity after which `active_channel[*]` is considered stale
/// (spec.md §3 invariants / §4.E).
pub const ACTIVE_CHANNEL_STALE_SECS: u64 = 3;

/// Seconds of voice-channel-sync freshness the policy engine requires
/// before it will consider a grant's channel "currently busy" (spec.md §4.F
/// step 5).
pub const VC_SYNC_FRESH_SECS: u64 = 2;
