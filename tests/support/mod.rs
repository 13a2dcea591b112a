//! Shared test-only `Tuner` double for the integration-test crates, in the
//! teacher's `mock_support.rs` style: a small hand-rolled double local to
//! `tests/`, rather than reaching into the library's own unit-test mocks.

use std::sync::Mutex;

use async_trait::async_trait;
use dmr_trunkctl::{DmrError, Tuner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetFreq(u64),
    SetBandwidth(u32),
    CurrentFreq,
}

#[derive(Debug, Default)]
pub struct MockTuner {
    calls: Mutex<Vec<Call>>,
    current: u64,
}

impl MockTuner {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tuner for MockTuner {
    async fn set_freq(&mut self, hz: u64) -> Result<(), DmrError> {
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

pub fn set_field(raw: &mut [u8], offset: usize, width: usize, value: u64) {
    for i in 0..width {
        let bit = (value >> (width - 1 - i)) & 1;
        raw[offset + i] = bit as u8;
    }
}
