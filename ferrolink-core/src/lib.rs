//! Reliable stop-and-wait datagram link over a byte serial port
//!
//! This crate contains the link engine and everything it needs that does
//! not belong to the wire format:
//!
//! - 64-bit extension of the transport's wrapping microsecond counter
//! - Baudrate-derived timing and the retransmission backoff schedule
//! - Link statistics (counters and running averages)
//! - The [`LinkEngine`] state machine and its public surface
//!
//! The engine is generic over a [`ferrolink_hal::SerialPort`] and a
//! [`ferrolink_hal::MicrosClock`] and is driven by repeated calls to
//! [`LinkEngine::tick`] from a single execution context, typically a
//! firmware super-loop.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod link;
pub mod stats;
pub mod timing;

pub use clock::MicrosExtender;
pub use link::LinkEngine;
pub use stats::LinkStats;
pub use timing::{LinkTiming, MAX_RETRIES};
