//! The MIDI serial link: a buffered USART at the DIN rate.

use embassy_futures::poll_once;
use embassy_stm32::usart::{BufferedUart, BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use midigraph_lib::io::MidiPort;

/// MIDI DIN bit rate, 8 data bits, 1 stop bit, no parity.
pub const MIDI_BAUD: u32 = 31_250;

/// [`MidiPort`] over a buffered USART. The interrupt-fed ring buffers stand in for the original
/// receive/transmit data registers; a byte that arrives between sessions waits in the RX ring
/// until [`discard_input`](MidiPort::discard_input) throws it away.
pub struct SerialPort {
    rx: BufferedUartRx<'static>,
    tx: BufferedUartTx<'static>,
}

impl SerialPort {
    /// Splits a configured USART into the deck's byte port.
    pub fn new(uart: BufferedUart<'static>) -> Self {
        let (tx, rx) = uart.split();
        Self { rx, tx }
    }
}

impl MidiPort for SerialPort {
    async fn recv(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        // A failed or empty read is retried the way the original polled its
        // receive-complete flag; only a byte in hand resolves the call.
        loop {
            match self.rx.read(&mut byte).await {
                Ok(n) if n > 0 => return byte[0],
                _ => continue,
            }
        }
    }

    async fn send(&mut self, byte: u8) {
        // Resolves once the TX ring accepts the byte; a link error is silently
        // dropped, as the wire has no backchannel to report it on.
        let _ = self.tx.write_all(&[byte]).await;
    }

    fn discard_input(&mut self) {
        let mut byte = [0u8; 1];
        while poll_once(self.rx.read(&mut byte)).is_ready() {}
    }
}
