//! Ferrolink Hardware Abstraction Layer
//!
//! This crate defines the traits the link engine consumes. They can be
//! implemented by chip-specific HALs (RP2040, STM32, ...) or by host-side
//! test doubles, so the same engine code runs on any platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (firmware super-loop)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrolink-core (link engine)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrolink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chip UART +   │       │ host-side     │
//! │ hardware timer│       │ test doubles  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialPort`] - Non-blocking byte serial port
//! - [`clock::MicrosClock`] - Free-running microsecond counter

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use clock::MicrosClock;
pub use serial::SerialPort;
