//! # Trunking Policy Engine
//!
//! Pure decision logic over a [`crate::site::SiteModel`] (spec.md §4.F).
//! `decide_grant`/`decide_clear` never touch a [`crate::tuner::Tuner`]
//! directly — they return a [`Decision`] that [`crate::dispatch::Controller`]
//! executes, so every branch here is testable without constructing a radio.

use std::time::Instant;

use crate::constants::{ACTIVE_CHANNEL_STALE_SECS, LPCHANNUM_ABSOLUTE, VC_SYNC_FRESH_SECS};
use crate::csbk::event::{ClearReason, GrantKind};
use crate::site::SiteModel;

/// Immutable policy knobs (spec.md §6 configuration knobs).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyConfig {
    pub trunk_enabled: bool,
    pub tune_group_calls: bool,
    pub tune_private_calls: bool,
    pub tune_data_calls: bool,
    pub use_allow_list: bool,
    pub hang_time: u64,
    pub setmod_bw: u32,
    pub dmr_dmrla_is_set: bool,
    pub dmr_dmrla_n: u8,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            trunk_enabled: true,
            tune_group_calls: true,
            tune_private_calls: true,
            tune_data_calls: false,
            use_allow_list: false,
            hang_time: 5,
            setmod_bw: 0,
            dmr_dmrla_is_set: false,
            dmr_dmrla_n: 0,
        }
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NoOp,
    Tune { freq: u64, slot: usize },
    RetuneToCc { reason: ClearReason },
}

/// Evaluates a channel grant against policy and site state (spec.md §4.F
/// "Grant handling"). `mbc_freq` is the RX frequency decoded from an MBC
/// absolute-parameters appendix, required when `lpchannum == 0xFFF`.
pub fn decide_grant(
    kind: GrantKind,
    lpchannum: u16,
    slot: u8,
    target: u32,
    mbc_freq: Option<u64>,
    cfg: &PolicyConfig,
    site: &mut SiteModel,
    now: Instant,
) -> Decision {
    let freq = if lpchannum == LPCHANNUM_ABSOLUTE {
        mbc_freq.unwrap_or(0)
    } else if lpchannum == 0 {
        0
    } else {
        *site.trunk_chan_map.get(&lpchannum).unwrap_or(&0)
    };
    if freq == 0 {
        return Decision::NoOp;
    }

    let kind = if kind == GrantKind::Btv { GrantKind::Tv } else { kind };

    if kind.is_group() && !cfg.tune_group_calls {
        return Decision::NoOp;
    }
    if kind.is_data() && !cfg.tune_data_calls {
        return Decision::NoOp;
    }
    if kind.is_private() && !cfg.tune_private_calls {
        return Decision::NoOp;
    }

    let mut mode = String::new();
    if cfg.use_allow_list {
        mode = "B".to_string();
    }
    if let Some(entry) = site.group_map.get(&target) {
        mode = entry.mode.clone();
    }
    if site.tg_hold != 0 {
        mode = if target == site.tg_hold { "A".to_string() } else { "B".to_string() };
        // TG-hold preemption: fall the freshness gate open for the held TG.
        if target == site.tg_hold {
            site.last_vc_sync[slot as usize] = None;
        }
    }

    if mode == "B" || mode == "DE" {
        return Decision::NoOp;
    }
    if !cfg.trunk_enabled || site.cc_freq == 0 {
        return Decision::NoOp;
    }

    let vc_stale = site.last_vc_sync[slot as usize]
        .map_or(true, |t| now.duration_since(t).as_secs() > VC_SYNC_FRESH_SECS);
    if !vc_stale {
        return Decision::NoOp;
    }

    site.is_tuned = false;
    site.vc_freq = [0, 0];

    Decision::Tune { freq, slot: slot as usize }
}

/// Evaluates a P_CLEAR (or equivalent dialect clear) against policy and site
/// state (spec.md §4.F "Clear handling"). `slot` is the slot the clearing
/// CSBK was heard on.
///
/// The reference decoder's clauses (b)/(c) key off the voice-frame decoder's
/// `dmrburstR` value, which is out of scope here (spec.md §1); this crate
/// approximates "opposite slot idle" using the same per-slot activity
/// timestamps the staleness sweep already tracks.
pub fn decide_clear(cfg: &PolicyConfig, site: &SiteModel, slot: usize, now: Instant) -> Decision {
    let opposite = 1 - slot;

    let hang_expired = !cfg.tune_data_calls
        && site.last_vc_sync[slot].map_or(true, |t| now.duration_since(t).as_secs() > cfg.hang_time);

    let is_recent = |t: Option<Instant>| {
        t.map_or(false, |t| now.duration_since(t).as_secs() <= ACTIVE_CHANNEL_STALE_SECS)
    };
    let opposite_slot_idle = is_recent(site.last_active[slot]) && !is_recent(site.last_active[opposite]);

    let tg_hold_match = site.tg_hold != 0 && site.lasttg[opposite] == Some(site.tg_hold);

    let reason = if hang_expired {
        Some(ClearReason::NoActivity)
    } else if opposite_slot_idle {
        Some(ClearReason::OppositeSlotIdle)
    } else if tg_hold_match {
        Some(ClearReason::TgHoldMatch)
    } else {
        None
    };

    match reason {
        Some(reason) if site.is_tuned && site.cc_freq != 0 && cfg.trunk_enabled => {
            Decision::RetuneToCc { reason }
        }
        _ => Decision::NoOp,
    }
}
