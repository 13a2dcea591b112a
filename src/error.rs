//! # Error Handling
//!
//! This module defines the `DmrError` enum, which represents the different error
//! types that can occur while decoding DMR control signalling PDUs and driving
//! the trunking controller.

use thiserror::Error;

/// Represents the different error types that can occur in the crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DmrError {
    /// A bit-field decode ran past the end of the PDU or requested a width over 64 bits.
    #[error("malformed CSBK field `{field}`")]
    Malformed { field: &'static str },

    /// CSBKO not recognized under the given Feature-Set ID.
    #[error("unknown opcode {opcode} for FID 0x{fid:02X}")]
    UnknownOpcode { fid: u8, opcode: u8 },

    /// FID not one of the known vendor dialects.
    #[error("unknown FID 0x{0:02X}")]
    UnknownFid(u8),

    /// MBC absolute-parameters appendix carried a `cdeftype` other than 0.
    #[error("unknown MBC cdeftype {0}")]
    UnknownMbcCdefType(u8),

    /// `lpchannum` was zero, or absent from `trunk_chan_map`.
    #[error("unknown channel: lpchannum {lpchannum}")]
    UnknownChannel { lpchannum: u16 },

    /// The configured `Tuner` failed to execute a command.
    #[error("tuner failure: {0}")]
    TunerFailure(String),

    /// A configuration file failed to parse or contained an invalid value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
