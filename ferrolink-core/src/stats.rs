//! Link statistics: counters, a high-water mark, and running averages

/// Coefficient for the exponentially weighted moving averages
const EWMA_ALPHA: f32 = 0.01;

/// A snapshot of link statistics
///
/// Counters accumulate as the link runs; `avg_retry_count` is derived
/// from them when the snapshot is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkStats {
    /// Frames received with a valid CRC
    pub rx_ok: u32,
    /// Completed frames dropped (truncated or CRC mismatch)
    pub rx_fail: u32,
    /// Messages acknowledged by the peer
    pub tx_ok: u32,
    /// Messages abandoned after exhausting retries
    pub tx_fail: u32,
    /// Retransmission timeouts fired, across all messages
    pub tx_retries_total: u32,
    /// Longest retry interval issued since startup, in microseconds
    pub max_retry_interval: u64,
    /// Average send-to-ack time of acknowledged messages, in microseconds
    pub avg_transmit_time: f32,
    /// Average pure wire time of acknowledged messages, in microseconds
    pub avg_wire_time: f32,
    /// Average retry timeouts per completed (acked or abandoned) message
    pub avg_retry_count: f32,
}

impl LinkStats {
    /// Fold a sample into a running average
    pub(crate) fn ewma(average: f32, sample: f32) -> f32 {
        average * (1.0 - EWMA_ALPHA) + sample * EWMA_ALPHA
    }

    /// Copy with the derived retry average filled in
    pub(crate) fn snapshot(&self) -> Self {
        let mut out = *self;
        let completed = self.tx_ok + self.tx_fail;
        if completed > 0 {
            out.avg_retry_count = self.tx_retries_total as f32 / completed as f32;
        }
        out
    }
}
