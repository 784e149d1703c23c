//! The original hardware reached its EEPROM, USART, switches, photocell, and LED port through
//! global registers; here each collaborator is a trait injected into the deck, so the same
//! algorithm drives real peripherals on the device and in-memory fakes under test. Blocking
//! register polls become `async fn` contracts: "returns" means "resolves".

/// A byte-addressable persistent store.
///
/// The physical medium cannot overlap operations, so both calls resolve only once any in-flight
/// write cycle has completed. `write_byte` resolves when the *new* write cycle is initiated, not
/// when it finishes; back-to-back operations are serialized by the next call's completion wait.
/// Addressing is unchecked here; the deck stays inside [`tape::CAPACITY`](crate::tape::CAPACITY).
pub trait Store {
    /// Writes one byte, resolving once the write cycle is initiated.
    async fn write_byte(&mut self, address: u16, byte: u8);

    /// Reads one byte.
    async fn read_byte(&mut self, address: u16) -> u8;
}

/// The serial MIDI link. Raw bytes only; the 3-byte message grouping is assumed upstream.
pub trait MidiPort {
    /// Resolves with the next byte from the wire.
    ///
    /// There is no cancellation here; the deck races this against
    /// [`ModeSwitches::record_released`] when it needs an escape hatch.
    async fn recv(&mut self) -> u8;

    /// Queues one byte for transmission, resolving once the link accepts it.
    async fn send(&mut self, byte: u8);

    /// Discards buffered unread input, so a session never starts on bytes that arrived while
    /// nobody was listening.
    fn discard_input(&mut self);
}

/// The three mode switches. Levels are sampled directly: no debouncing, no edge latching.
pub trait ModeSwitches {
    /// Instantaneous level of the Record switch.
    fn record(&self) -> bool;

    /// Instantaneous level of the Play switch.
    fn play(&self) -> bool;

    /// Instantaneous level of the Modify switch.
    fn modify(&self) -> bool;

    /// Resolves once the Record switch reads off (immediately, if it already does).
    async fn record_released(&mut self);
}

/// Samples the playback-speed modifier voltage (a photocell divider on the device).
pub trait Sampler {
    /// Performs one conversion and maps it linearly onto `[0, 2)`: a half-scale reading is 1.0,
    /// full darkness can double a delay. No clamping beyond the converter's own range.
    async fn sample_normalized(&mut self) -> f32;
}

/// The 8-bit visible diagnostic output.
///
/// The deck mirrors the middle payload byte here during both modes and flashes the full port
/// after playback. A background task may blank the port on a fixed period; that task must touch
/// nothing but the port itself.
pub trait DiagnosticPort {
    /// Latches a value onto the port.
    fn set(&mut self, value: u8);
}
