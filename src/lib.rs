//! # dmr-trunkctl - a DMR control-signalling dispatcher and trunking controller
//!
//! This crate decodes DMR (ETSI TS 102 361-4) Control Signalling Block PDUs
//! — and their Motorola Connect+/Capacity+/Capacity Max and Hytera XPT
//! dialects — into typed events, and drives a simple trunking policy engine
//! on top of them: deciding when to retune a receiver onto a voice/data
//! channel and when to fall back to the control channel.
//!
//! ## Usage
//!
//! To use the dmr-trunkctl crate in your Rust project, add the following to
//! your Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! dmr-trunkctl = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! use dmr_trunkctl::{Controller, PolicyConfig, NullTuner};
//!
//! # async fn run() {
//! let _controller = Controller::new(PolicyConfig::default(), NullTuner::default());
//! # }
//! ```

pub mod address;
pub mod bits;
pub mod config;
pub mod constants;
pub mod csbk;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod mbc;
pub mod policy;
pub mod site;
pub mod tuner;

pub use bits::Bits;
pub use config::{Config, SiteData};
pub use csbk::{parse as parse_csbk, CsbkEvent};
pub use dispatch::{Controller, CsPdu, DropReason, ProcessOutcome};
pub use error::DmrError;
pub use logging::{init_logger, log_debug, log_error, log_info, log_warn};
pub use policy::{Decision, PolicyConfig};
pub use site::SiteModel;
pub use tuner::{NullTuner, Tuner};
