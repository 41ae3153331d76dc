use heapless::Deque;

/// Number of round-trip samples kept per link.
pub const LATENCY_HISTORY: usize = 3;

/// Rolling round-trip estimate over the last few heartbeat samples.
#[derive(Debug, Clone)]
pub struct LatencyProbe {
    samples: Deque<u64, LATENCY_HISTORY>,
}

impl Default for LatencyProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyProbe {
    pub fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Records a sample and returns the updated average.
    pub fn record(&mut self, rtt_ms: u64) -> u64 {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.samples.push_back(rtt_ms);
        self.average()
    }

    /// Records the round trip of a pong echoing `sent_at`, both in ms.
    pub fn record_pong(&mut self, sent_at: u64, now: u64) -> u64 {
        self.record(now.saturating_sub(sent_at))
    }

    /// Integer mean of the kept samples, truncated. Zero when empty.
    pub fn average(&self) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        self.samples.iter().sum::<u64>() / self.samples.len() as u64
    }

    pub fn samples(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
