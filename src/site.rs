//! # Site-Model Store
//!
//! `SiteModel` is the process-wide mutable state `S` from spec.md §3. Every
//! method here is a pure mutator — no I/O, no tuner calls — so it can be
//! exercised without a [`crate::tuner::Tuner`] at all (spec.md §9's "replace
//! global mutable state" refactor note).

use std::collections::HashMap;
use std::time::Instant;

use crate::constants::ACTIVE_CHANNEL_STALE_SECS;
use crate::csbk::event::SiteIdentity;
use crate::mbc::ReassemblyBuffer;

/// A talkgroup's display name and tune-policy mode (spec.md §6 persisted state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    /// `""` (default), `"A"` (allow), `"B"` (block), `"DE"` (disabled/emergency-only), ...
    pub mode: String,
}

/// Process-wide trunking state. Mutated only by [`crate::dispatch::Controller`]
/// and the modules it calls (`E`/`F` in spec.md §2); read by the tuner and any
/// UI layer.
pub struct SiteModel {
    pub cc_freq: u64,
    pub vc_freq: [u64; 2],
    pub last_cc_sync: Option<Instant>,
    pub last_vc_sync: [Option<Instant>; 2],
    pub last_active: [Option<Instant>; 2],
    pub active_channel: [String; 2],
    pub rest_channel: Option<u16>,
    pub branding: Option<&'static str>,
    pub branding_sub: Option<&'static str>,
    pub site_parms: String,
    pub site_id: Option<SiteIdentity>,
    pub dmr_mfid: u8,
    pub is_tuned: bool,
    pub is_con_plus: bool,
    pub tg_hold: u32,
    pub group_map: HashMap<u32, GroupEntry>,
    pub trunk_chan_map: HashMap<u16, u64>,
    pub cap_plus_buffer: [ReassemblyBuffer; 2],
    pub lasttg: [Option<u32>; 2],
    pub lastsrc: [Option<u32>; 2],
}

impl Default for SiteModel {
    fn default() -> Self {
        SiteModel {
            cc_freq: 0,
            vc_freq: [0, 0],
            last_cc_sync: None,
            last_vc_sync: [None, None],
            last_active: [None, None],
            active_channel: [String::new(), String::new()],
            rest_channel: None,
            branding: None,
            branding_sub: None,
            site_parms: String::new(),
            site_id: None,
            dmr_mfid: 0,
            is_tuned: false,
            is_con_plus: false,
            tg_hold: 0,
            group_map: HashMap::new(),
            trunk_chan_map: HashMap::new(),
            cap_plus_buffer: [ReassemblyBuffer::default(), ReassemblyBuffer::default()],
            lasttg: [None, None],
            lastsrc: [None, None],
        }
    }
}

impl SiteModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly decoded site identity (spec.md §4.E `note_site`).
    pub fn note_site(&mut self, site_id: SiteIdentity) {
        self.site_id = Some(site_id);
    }

    /// Records a grant's target/source on the given slot (spec.md §4.E `note_grant`).
    pub fn note_grant(&mut self, slot: usize, target: u32, source: u32, now: Instant) {
        self.lasttg[slot] = Some(target);
        self.lastsrc[slot] = Some(source);
        self.last_active[slot] = Some(now);
    }

    /// Clears the given slot's call bookkeeping after a clear/retune
    /// (spec.md §4.E `note_clear`).
    pub fn note_clear(&mut self, slot: usize) {
        self.active_channel[slot].clear();
        self.lasttg[slot] = None;
        self.lastsrc[slot] = None;
        self.vc_freq = [0, 0];
        self.cap_plus_buffer[slot].reset();
    }

    /// Overwrites the rendered summary for `slot` (spec.md §4.E `note_active`
    /// / §9 "rendered summary" refactor note).
    pub fn note_active(&mut self, slot: usize, text: String, now: Instant) {
        self.active_channel[slot] = text;
        self.last_active[slot] = Some(now);
    }

    /// Records the outcome of a tune/retune attempt (spec.md §4.E `set_tuner_state`).
    pub fn set_tuner_state(&mut self, tuned: bool, freq: u64, slot: Option<usize>) {
        self.is_tuned = tuned;
        match slot {
            Some(s) => self.vc_freq[s] = freq,
            None => self.vc_freq = [freq, freq],
        }
    }

    /// Advances the control-channel sync timestamp; called on every
    /// well-formed CSBK (spec.md §4.E).
    pub fn note_cc_sync(&mut self, now: Instant) {
        self.last_cc_sync = Some(now);
    }

    /// If `fid != 0`, latches `dmr_mfid` for subsequent dialect interpretation
    /// (spec.md §3 invariant).
    pub fn note_fid(&mut self, fid: u8) {
        if fid != 0 {
            self.dmr_mfid = fid;
        }
    }

    /// Clears `active_channel[slot]` once both `last_active` and
    /// `last_vc_sync` are stale (spec.md §3 invariant, §4.E staleness rule).
    pub fn sweep_staleness(&mut self, now: Instant) {
        for slot in 0..2 {
            let active_age = self.last_active[slot].map(|t| now.duration_since(t).as_secs());
            let vc_age = self.last_vc_sync[slot].map(|t| now.duration_since(t).as_secs());
            let active_stale = active_age.map_or(true, |s| s > ACTIVE_CHANNEL_STALE_SECS);
            let vc_stale = vc_age.map_or(true, |s| s > ACTIVE_CHANNEL_STALE_SECS);
            if active_stale && vc_stale {
                self.active_channel[slot].clear();
            }
        }
    }
}
