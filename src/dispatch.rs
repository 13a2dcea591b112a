//! # Dispatch Loop
//!
//! `Controller` is the `Controller` value spec.md §9 calls for in place of
//! global mutable state: it owns the [`SiteModel`], the [`PolicyConfig`],
//! and the [`Tuner`], and every CSBK is processed by one call to
//! [`Controller::process`] (spec.md §4.H).

use std::time::Instant;

use crate::bits::Bits;
use crate::constants::*;
use crate::csbk::{
    self,
    event::{CsbkEvent, GrantKind},
};
use crate::error::DmrError;
use crate::logging::{log_debug, log_info, log_warn};
use crate::mbc;
use crate::policy::{self, Decision, PolicyConfig};
use crate::site::SiteModel;
use crate::tuner::Tuner;

/// A single control-signalling PDU as delivered by the physical layer
/// (spec.md §6 "Input PDU"). `bits` is at least 96 entries; a grant with
/// `lpchannum==0xFFF` requires 176 to cover the appended MBC block.
pub struct CsPdu {
    pub bits: Vec<u8>,
    pub crc_ok: bool,
    pub irrecoverable_errors: u32,
    pub synctype: u8,
    /// Physical TDMA timeslot the PDU was received on (0 or 1).
    pub slot: u8,
}

/// Why a PDU produced no event (spec.md §7 error disposition table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    CrcFailure,
    IrrecoverableErrors,
    Protected,
}

/// Result of one [`Controller::process`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Dropped(DropReason),
    Processed { event: CsbkEvent, decision: Decision },
}

pub struct Controller<T: Tuner> {
    pub site: SiteModel,
    pub cfg: PolicyConfig,
    pub tuner: T,
}

impl<T: Tuner> Controller<T> {
    pub fn new(cfg: PolicyConfig, tuner: T) -> Self {
        Controller { site: SiteModel::new(), cfg, tuner }
    }

    /// Implements spec.md §4.H's seven-step dispatch loop.
    pub async fn process(&mut self, pdu: &CsPdu, now: Instant) -> Result<ProcessOutcome, DmrError> {
        let view = Bits::new(&pdu.bits);
        let mut pf = view.read_bit(1, "pf")?;
        let opcode = view.read(2, 6, "opcode")? as u8;
        let fid = view.read(8, 8, "fid")? as u8;

        // Step 1: XPT exception — bits 0-1 are a sequence number, not lb/pf.
        if fid == FID_HYTERA_XPT && matches!(opcode, OP_XPT_SITE_STATUS | OP_XPT_ADJACENT) {
            pf = false;
        }

        // Step 2.
        if pdu.irrecoverable_errors != 0 {
            log_warn("dropping CSBK: irrecoverable errors");
            return Ok(ProcessOutcome::Dropped(DropReason::IrrecoverableErrors));
        }
        // Step 3.
        if !pdu.crc_ok {
            return Ok(ProcessOutcome::Dropped(DropReason::CrcFailure));
        }
        // Step 4.
        if pf {
            log_info("Protected CSBK: no state mutation beyond staleness sweep");
            self.site.sweep_staleness(now);
            self.site.note_cc_sync(now);
            return Ok(ProcessOutcome::Dropped(DropReason::Protected));
        }

        // Step 5.
        self.site.sweep_staleness(now);
        self.site.note_cc_sync(now);
        // Step 6.
        self.site.note_fid(fid);

        // Step 7, with the Capacity+ multi-block exception routed through D
        // before it ever reaches the ordinary parser.
        if fid == FID_MOTOROLA_CAPACITY_PLUS && opcode == OP_CAP_PLUS_CHANNEL_STATUS {
            return self.process_cap_plus_status(&view, pdu.slot, now).await;
        }

        // Opcode 56 is ambiguous between ETSI TD_GRANT (multi-item) and
        // BS_Dwn_Act; the synctype byte disambiguates (spec.md §4.C/§6).
        let mut event = if csbk::parser::is_bs_dwn_act(opcode, pdu.synctype) {
            csbk::parser::parse_bs_dwn_act(&view)?
        } else {
            csbk::parse(&view, fid, opcode, self.site.dmr_mfid)?
        };

        if let CsbkEvent::ChannelGrant { lpchannum, ref mut freq, .. } = event {
            if lpchannum == LPCHANNUM_ABSOLUTE {
                if let Ok(csbk::MbcAppendix::Absolute { rx_freq, .. }) =
                    csbk::parser::parse_mbc_appendix(&view)
                {
                    *freq = Some(rx_freq);
                }
            }
        }

        let decision = self.apply_event(&event, pdu.slot, now).await?;
        log_debug(&format!("{event:?} -> {decision:?}"));
        Ok(ProcessOutcome::Processed { event, decision })
    }

    async fn apply_event(
        &mut self,
        event: &CsbkEvent,
        slot: u8,
        now: Instant,
    ) -> Result<Decision, DmrError> {
        match event {
            CsbkEvent::ChannelGrant { kind, lpchannum, slot, target, source, freq, .. } => {
                self.site.note_grant(*slot as usize, *target, *source, now);
                let decision = policy::decide_grant(
                    *kind, *lpchannum, *slot, *target, *freq, &self.cfg, &mut self.site, now,
                );
                if let Decision::Tune { freq, slot } = decision {
                    self.execute_tune(freq, slot, now).await?;
                    self.site.note_active(slot, render_grant_label(*kind, *lpchannum, *target), now);
                }
                Ok(decision)
            }
            CsbkEvent::Clear { .. } => {
                let decision = policy::decide_clear(&self.cfg, &self.site, slot as usize, now);
                if let Decision::RetuneToCc { .. } = decision {
                    self.execute_retune_to_cc(slot as usize, now).await?;
                }
                Ok(decision)
            }
            CsbkEvent::Aloha { site_id, .. } => {
                self.site.note_site(*site_id);
                if self.site.dmr_mfid == FID_MOTOROLA_CAPACITY_PLUS {
                    self.site.branding = Some("Motorola");
                    self.site.branding_sub = Some("CapMax ");
                }
                Ok(Decision::NoOp)
            }
            CsbkEvent::ConnectPlusGrant { src, grp, lcn, slot } => {
                self.site.branding = Some("Motorola");
                self.site.branding_sub = Some("Con+ ");
                self.site.note_grant(*slot as usize, *grp, *src, now);
                let decision = policy::decide_grant(
                    GrantKind::Tv, *lcn as u16, *slot, *grp, None, &self.cfg, &mut self.site, now,
                );
                if let Decision::Tune { freq, slot } = decision {
                    self.execute_tune(freq, slot, now).await?;
                    self.site
                        .note_active(slot, format!("Active Group Ch: {lcn} TG: {grp}; "), now);
                }
                Ok(decision)
            }
            CsbkEvent::XptSiteStatus { free_lcn, lsn_state, lsn_target, .. } => {
                self.site.branding = Some("Hytera");
                self.site.branding_sub = Some("XPT ");
                self.site.site_parms = format!("Free LCN - {free_lcn} ");
                if self.site.cc_freq == 0 {
                    self.site.cc_freq = self.tuner.current_freq().await?;
                }

                let mut decision = Decision::NoOp;
                let mut displayed = false;
                for (i, &state) in lsn_state.iter().enumerate() {
                    // LSN status 1 ("Unk") has never been observed in the
                    // wild; tuning/display on it is disabled by default.
                    if state <= 1 {
                        continue;
                    }
                    let lsn = i + 1;
                    let tg = lsn_target[i];
                    if !displayed {
                        self.site
                            .note_active(slot as usize, format!("XPT LSN:{lsn} TG:{tg}; "), now);
                        displayed = true;
                    }
                    if matches!(decision, Decision::NoOp) {
                        let candidate = policy::decide_grant(
                            GrantKind::Tv, lsn as u16, slot, tg as u32, None, &self.cfg, &mut self.site, now,
                        );
                        if let Decision::Tune { freq, slot: tuned_slot } = candidate {
                            self.execute_tune(freq, tuned_slot, now).await?;
                            decision = candidate;
                        }
                    }
                }
                Ok(decision)
            }
            _ => Ok(Decision::NoOp),
        }
    }

    async fn execute_tune(&mut self, freq: u64, slot: usize, now: Instant) -> Result<(), DmrError> {
        if self.cfg.setmod_bw != 0 {
            self.tuner.set_bandwidth(self.cfg.setmod_bw).await?;
        }
        self.tuner.set_freq(freq).await?;
        self.site.vc_freq = [freq, freq];
        self.site.is_tuned = true;
        self.site.last_vc_sync[slot] = Some(now);
        self.site.cap_plus_buffer[slot].reset();
        Ok(())
    }

    async fn execute_retune_to_cc(&mut self, slot: usize, now: Instant) -> Result<(), DmrError> {
        self.site.note_clear(slot);
        self.tuner.set_freq(self.site.cc_freq).await?;
        self.site.is_tuned = false;
        self.site.last_cc_sync = Some(now);
        self.site.last_vc_sync[slot] = None;
        Ok(())
    }

    async fn process_cap_plus_status(
        &mut self,
        bits: &Bits<'_>,
        slot: u8,
        now: Instant,
    ) -> Result<ProcessOutcome, DmrError> {
        let fl = bits.read(16, 2, "fl")? as u8;
        let slot_idx = slot as usize;
        match fl {
            2 => self.site.cap_plus_buffer[slot_idx].start(bits, false)?,
            3 => self.site.cap_plus_buffer[slot_idx].start(bits, true)?,
            0 => self.site.cap_plus_buffer[slot_idx].append(bits, false)?,
            1 => self.site.cap_plus_buffer[slot_idx].append(bits, true)?,
            _ => return Err(DmrError::Malformed { field: "fl" }),
        }

        if !self.site.cap_plus_buffer[slot_idx].is_complete() {
            return Ok(ProcessOutcome::Processed {
                event: CsbkEvent::ReassemblyPending,
                decision: Decision::NoOp,
            });
        }

        let assembled: Vec<u8> = self.site.cap_plus_buffer[slot_idx].bits().as_slice().to_vec();
        let status = mbc::decode_channel_status(&Bits::new(&assembled))?;

        self.site.is_con_plus = true;
        self.site.branding = Some("Motorola");
        self.site.branding_sub = Some("Cap+ ");
        self.site.rest_channel = Some(status.rest_lsn as u16);
        if let Some(&freq) = self.site.trunk_chan_map.get(&(status.rest_lsn as u16)) {
            if freq != 0 {
                self.site.cc_freq = freq;
                self.site.is_tuned = true;
            }
        }

        let mut decision = Decision::NoOp;
        for (i, target) in status.group_targets.iter().enumerate() {
            let Some(tg) = target else { continue };
            let lsn = (i + 1) as u16;
            let candidate = policy::decide_grant(
                GrantKind::Tv, lsn, slot, *tg as u32, None, &self.cfg, &mut self.site, now,
            );
            if let Decision::Tune { freq, slot: tuned_slot } = candidate {
                self.execute_tune(freq, tuned_slot, now).await?;
                self.site
                    .note_active(tuned_slot, format!("Active Group Ch: {lsn} TG: {tg}; "), now);
                decision = candidate;
                break;
            }
        }

        Ok(ProcessOutcome::Processed {
            event: CsbkEvent::CapPlusStatus(status),
            decision,
        })
    }
}

fn render_grant_label(kind: GrantKind, lpchannum: u16, target: u32) -> String {
    let label = if kind.is_data() {
        "Data"
    } else if kind.is_private() {
        "Private"
    } else {
        "Group"
    };
    format!("Active {label} Ch: {lpchannum} TG: {target}; ")
}
