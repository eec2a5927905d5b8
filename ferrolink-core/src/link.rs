//! The link engine
//!
//! A single state machine drives framing, sequence/ack exchange,
//! retransmission with exponential backoff, and keepalive emission over a
//! non-blocking serial port. One call to [`LinkEngine::tick`] performs a
//! bounded unit of work: drain inbound bytes, handle completed frames,
//! load at most one outbound frame, and push bytes up to the port's
//! write capacity.
//!
//! Outbound lifecycle:
//!
//! ```text
//! idle ──send()──▶ pending ──tick──▶ awaiting ack ──ack match──▶ idle
//!                                         │
//!                                      timeout: re-emit with backoff,
//!                                      abandon after MAX_RETRIES
//! ```
//!
//! Inbound lifecycle:
//!
//! ```text
//! empty ──new sequence──▶ held ──read()──▶ empty (ack queued)
//!                           │
//!                           └─ duplicate sequence: re-ack once read
//! ```

use heapless::Vec;

use ferrolink_hal::{MicrosClock, SerialPort};
use ferrolink_protocol::{encode_frame, Frame, FrameParser, FRAME_BUFFER_SIZE, MAX_MESSAGE_SIZE};

use crate::clock::MicrosExtender;
use crate::stats::LinkStats;
use crate::timing::{LinkTiming, MAX_RETRIES};

/// First sequence number issued after boot
///
/// Nonzero so a peer's default-initialised ack (0) cannot spuriously
/// acknowledge the first message.
const INITIAL_SEQ: u8 = 12;

/// Reliable stop-and-wait datagram link over a serial port
///
/// At most one outgoing message is in flight and at most one received
/// message is held for the application. All buffers are fixed-size and
/// owned by the engine; nothing allocates.
///
/// The engine must be driven from a single execution context. Predicates
/// that consult the clock take `&mut self` because every sample advances
/// the 64-bit extension of the wrapping counter.
pub struct LinkEngine<S, C> {
    serial: S,
    clock: C,
    baudrate: u32,
    timing: LinkTiming,
    epoch: MicrosExtender,
    stats: LinkStats,

    // inbound: one message held for the application
    parser: FrameParser,
    inbound: Vec<u8, MAX_MESSAGE_SIZE>,
    inbound_seq: u8,
    ack_seq: u8,
    ack_required: bool,
    last_rx: u64,

    // outbound: one message in flight
    outbound: Vec<u8, MAX_MESSAGE_SIZE>,
    seq: u8,
    send_started: u64,
    last_send: u64,
    retry_timeout: u64,
    retry_count: u8,
    last_tx: u64,

    // frame currently streaming out
    tx_buf: [u8; FRAME_BUFFER_SIZE],
    tx_len: usize,
    tx_pos: usize,
}

impl<S: SerialPort, C: MicrosClock> LinkEngine<S, C> {
    /// Create an engine over the given port and clock
    pub fn new(serial: S, clock: C, baudrate: u32) -> Self {
        Self {
            serial,
            clock,
            baudrate,
            timing: LinkTiming::from_baudrate(baudrate),
            epoch: MicrosExtender::new(),
            stats: LinkStats::default(),
            parser: FrameParser::new(),
            inbound: Vec::new(),
            inbound_seq: 0,
            ack_seq: 0,
            ack_required: false,
            last_rx: 0,
            outbound: Vec::new(),
            seq: INITIAL_SEQ,
            send_started: 0,
            last_send: 0,
            retry_timeout: 0,
            retry_count: 0,
            last_tx: 0,
            tx_buf: [0; FRAME_BUFFER_SIZE],
            tx_len: 0,
            tx_pos: 0,
        }
    }

    /// One-time transport setup at the configured baudrate
    pub fn begin(&mut self) {
        self.serial.begin(self.baudrate);
    }

    fn now(&mut self) -> u64 {
        let raw = self.clock.micros();
        self.epoch.extend(raw)
    }

    /// True while the peer has been heard from within the liveness window
    pub fn is_open(&mut self) -> bool {
        let now = self.now();
        now < self.last_rx + self.timing.keepalive_rx
    }

    /// True when no outgoing message is pending acknowledgement
    pub fn clear_to_send(&self) -> bool {
        self.outbound.is_empty()
    }

    /// Queue a message for transmission.
    ///
    /// A no-op while a previous message is still in flight. `data` is
    /// truncated to [`MAX_MESSAGE_SIZE`]; an empty slice burns a sequence
    /// number but transmits nothing.
    pub fn send(&mut self, data: &[u8]) {
        if !self.clear_to_send() {
            return;
        }
        let len = data.len().min(MAX_MESSAGE_SIZE);
        self.outbound.clear();
        // truncated above
        let _ = self.outbound.extend_from_slice(&data[..len]);
        self.seq = self.seq.wrapping_add(1);
        self.send_started = self.now();
    }

    /// True when a received message is waiting to be read
    pub fn clear_to_read(&self) -> bool {
        !self.inbound.is_empty()
    }

    /// Copy the held message into `dst`, returning the number of bytes
    /// copied (0 when nothing is held).
    ///
    /// The message is truncated to `dst`. Reading clears the stash and
    /// commits the acknowledgement the peer is waiting for.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        if !self.clear_to_read() {
            return 0;
        }
        self.ack_seq = self.inbound_seq;
        self.ack_required = true;
        let len = self.inbound.len().min(dst.len());
        dst[..len].copy_from_slice(&self.inbound[..len]);
        self.inbound.clear();
        len
    }

    /// Statistics snapshot; the derived retry average is computed here
    pub fn stats(&self) -> LinkStats {
        self.stats.snapshot()
    }

    /// Drive one bounded unit of link work.
    ///
    /// Drains available inbound bytes, processes completed frames, loads
    /// at most one transmit frame, and pushes bytes up to the transport's
    /// write capacity.
    pub fn tick(&mut self) {
        self.pump_rx();
        self.pump_tx();
    }

    fn pump_rx(&mut self) {
        while self.serial.available() > 0 {
            let byte = self.serial.read();
            match self.parser.feed(byte) {
                Ok(Some(frame)) => {
                    self.stats.rx_ok += 1;
                    let now = self.now();
                    self.last_rx = now;
                    self.on_frame(frame, now);
                }
                Ok(None) => {}
                Err(_) => self.stats.rx_fail += 1,
            }
        }
    }

    fn on_frame(&mut self, frame: Frame, now: u64) {
        // ack first: it may clear the message in flight
        if !self.outbound.is_empty() && frame.ack_seq == self.seq {
            let elapsed = now - self.send_started;
            self.stats.avg_transmit_time =
                LinkStats::ewma(self.stats.avg_transmit_time, elapsed as f32);
            let wire_time = self.outbound.len() as u64 * self.timing.us_per_byte;
            self.stats.avg_wire_time = LinkStats::ewma(self.stats.avg_wire_time, wire_time as f32);
            self.stats.tx_ok += 1;
            self.reset_outbound();
        }

        if frame.message.is_empty() {
            return;
        }
        if frame.seq == self.inbound_seq {
            // retransmission: the peer missed our ack; re-ack unless the
            // stash is still waiting on the application
            if self.inbound.is_empty() {
                self.ack_required = true;
            }
        } else {
            self.inbound_seq = frame.seq;
            self.inbound.clear();
            // frame bodies never exceed the stash capacity
            let _ = self.inbound.extend_from_slice(&frame.message);
        }
    }

    fn pump_tx(&mut self) {
        if self.tx_len == 0 {
            let now = self.now();
            if !self.outbound.is_empty() && self.last_send == 0 {
                // initial emission of the pending message
                self.last_send = now;
                self.load_data_frame();
                self.ack_required = false;
                self.last_tx = now;
            } else if !self.outbound.is_empty() && now - self.last_send > self.retry_timeout {
                self.stats.tx_retries_total += 1;
                self.retry_count += 1;
                if self.retry_count > MAX_RETRIES {
                    self.stats.tx_fail += 1;
                    self.reset_outbound();
                } else {
                    self.last_send = now;
                    self.load_data_frame();
                    self.ack_required = false;
                    self.last_tx = now;
                }
            } else if self.ack_required {
                self.load_ack_frame();
                self.ack_required = false;
                self.last_tx = now;
            } else if now - self.last_tx > self.timing.keepalive_tx {
                self.load_ack_frame();
                self.last_tx = now;
            }
        }

        if self.tx_len > 0 {
            // the transport write path must not be preempted mid-push
            critical_section::with(|_| {
                let writable = self.serial.available_for_write();
                for _ in 0..writable {
                    self.serial.write(self.tx_buf[self.tx_pos]);
                    self.tx_pos += 1;
                    if self.tx_pos >= self.tx_len {
                        self.tx_pos = 0;
                        self.tx_len = 0;
                        break;
                    }
                }
            });
        }
    }

    fn load_data_frame(&mut self) {
        // stash and buffer sizing make this infallible
        if let Ok(len) = encode_frame(&self.outbound, self.ack_seq, self.seq, &mut self.tx_buf) {
            self.tx_len = len;
            self.tx_pos = 0;
            self.retry_timeout = self.timing.backoff(self.tx_len, self.retry_count);
            if self.retry_timeout > self.stats.max_retry_interval {
                self.stats.max_retry_interval = self.retry_timeout;
            }
        }
    }

    fn load_ack_frame(&mut self) {
        if let Ok(len) = encode_frame(&[], self.ack_seq, self.seq, &mut self.tx_buf) {
            self.tx_len = len;
            self.tx_pos = 0;
        }
    }

    fn reset_outbound(&mut self) {
        self.outbound.clear();
        self.last_send = 0;
        self.retry_count = 0;
    }
}
