//! Non-blocking byte serial port abstraction
//!
//! Models a UART-like transport with per-direction flow inspection: the
//! caller checks how much may be read or written before touching the
//! stream, so no method ever blocks. Parity, framing errors, and flow
//! control below the byte layer are the implementation's concern.

/// Byte-oriented full-duplex serial port.
///
/// All methods are synchronous and non-blocking. `read` and `write` carry
/// availability preconditions instead of error returns; the engine checks
/// the corresponding query before every call.
pub trait SerialPort {
    /// One-time setup at the given baudrate
    fn begin(&mut self, baudrate: u32);

    /// Number of inbound bytes buffered and ready to read
    fn available(&self) -> usize;

    /// Consume one inbound byte
    ///
    /// Only called while [`available`](SerialPort::available) reports a
    /// nonzero count.
    fn read(&mut self) -> u8;

    /// Number of bytes that can be written without blocking
    fn available_for_write(&self) -> usize;

    /// Enqueue one outbound byte
    ///
    /// Only called while
    /// [`available_for_write`](SerialPort::available_for_write) reports a
    /// nonzero count.
    fn write(&mut self, byte: u8);
}
