//! Wire format for the ferrolink serial link
//!
//! A frame on the wire is a COBS-encoded payload terminated by a single
//! 0x00 delimiter:
//!
//! ```text
//! ┌───────────────────────────────┬──────┐
//! │ COBS(payload)                 │ 0x00 │
//! └───────────────────────────────┴──────┘
//! ```
//!
//! where the payload, before encoding, is:
//!
//! ```text
//! ┌──────────────┬─────────┬─────┬────────┬────────┐
//! │ message      │ ack_seq │ seq │ crc_hi │ crc_lo │
//! │ 0–248B       │ 1B      │ 1B  │ 1B     │ 1B     │
//! └──────────────┴─────────┴─────┴────────┴────────┘
//! ```
//!
//! The CRC-16/CCITT covers everything before the CRC field and travels
//! big-endian. A zero-length message makes the frame an ack-only (or
//! keepalive) frame.

#![no_std]
#![deny(unsafe_code)]

pub mod cobs;
pub mod crc16;
pub mod frame;

pub use crc16::crc16_ccitt;
pub use frame::{
    encode_frame, Frame, FrameError, FrameParser, FRAME_BUFFER_SIZE, FRAME_TAIL_SIZE,
    MAX_MESSAGE_SIZE,
};
