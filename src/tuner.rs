//! # Tuner Driver Interface
//!
//! `Tuner` is the external collaborator spec.md §1 treats as out of scope:
//! the rigctl-socket and RTL-SDR backends live in an application that embeds
//! this crate. Modeled as an async trait per the teacher's device-handle
//! convention, since tuner I/O is exactly the "blocking socket write / device
//! ioctl" spec.md §5 describes.

use async_trait::async_trait;

use crate::error::DmrError;
use crate::logging::log_info;

/// Capability to steer an SDR/rigctl tuner (spec.md §6 "Tuner interface").
#[async_trait]
pub trait Tuner: Send {
    /// Tunes to an absolute RX frequency in Hz.
    async fn set_freq(&mut self, hz: u64) -> Result<(), DmrError>;

    /// Sets demodulation bandwidth in Hz. Skipped by callers when the
    /// configured value is `0` (spec.md §6).
    async fn set_bandwidth(&mut self, hz: u32) -> Result<(), DmrError>;

    /// Reads back the tuner's current frequency, used to latch `cc_freq`
    /// when it is not otherwise known.
    async fn current_freq(&mut self) -> Result<u64, DmrError>;
}

/// A logging no-op tuner, used when no real backend is wired up (the
/// CLI's default).
#[derive(Debug, Default)]
pub struct NullTuner {
    last_freq: u64,
}

#[async_trait]
impl Tuner for NullTuner {
    async fn set_freq(&mut self, hz: u64) -> Result<(), DmrError> {
        log_info(&format!("null tuner: set_freq({hz})"));
        self.last_freq = hz;
        Ok(())
    }

    async fn set_bandwidth(&mut self, hz: u32) -> Result<(), DmrError> {
        log_info(&format!("null tuner: set_bandwidth({hz})"));
        Ok(())
    }

    async fn current_freq(&mut self) -> Result<u64, DmrError> {
        Ok(self.last_freq)
    }
}

/// Test-only tuner that records every call for assertion, mirroring the
/// teacher's serial-mock test doubles.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        SetFreq(u64),
        SetBandwidth(u32),
        CurrentFreq,
    }

    #[derive(Debug, Default)]
    pub struct MockTuner {
        pub calls: Mutex<Vec<Call>>,
        pub current: u64,
        pub fail_next_set_freq: Mutex<bool>,
    }

    impl MockTuner {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Tuner for MockTuner {
        async fn set_freq(&mut self, hz: u64) -> Result<(), DmrError> {
            if std::mem::take(&mut *self.fail_next_set_freq.lock().unwrap()) {
                return Err(DmrError::TunerFailure("injected failure".to_string()));
            }
            self.calls.lock().unwrap().push(Call::SetFreq(hz));
            self.current = hz;
            Ok(())
        }

        async fn set_bandwidth(&mut self, hz: u32) -> Result<(), DmrError> {
            self.calls.lock().unwrap().push(Call::SetBandwidth(hz));
            Ok(())
        }

        async fn current_freq(&mut self) -> Result<u64, DmrError> {
            self.calls.lock().unwrap().push(Call::CurrentFreq);
            Ok(self.current)
        }
    }
}
