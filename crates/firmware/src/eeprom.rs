//! The tape's physical medium: a 24C08-class serial EEPROM on the I2C bus.
//!
//! The part stores 1024 bytes as four 256-byte blocks; the block index travels in the low bits
//! of the device address and the byte offset in a single word-address byte. While an internal
//! write cycle runs (a few milliseconds) the part NACKs every transfer, which is what stands in
//! for the original's EEPROM busy flag here.

use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Async;
use embassy_time::Timer;
use midigraph_lib::io::Store;

/// Seven-bit base address of the part; the low two bits select the 256-byte block.
const BASE_ADDR: u8 = 0x50;

/// Pause between address attempts while the part is mid write cycle.
const ACK_POLL_MICROS: u64 = 100;

/// [`Store`] over the EEPROM.
pub struct Eeprom {
    bus: I2c<'static, Async>,
}

impl Eeprom {
    /// Wraps a configured I2C bus.
    pub fn new(bus: I2c<'static, Async>) -> Self {
        Self { bus }
    }

    fn device_addr(address: u16) -> u8 {
        BASE_ADDR | ((address >> 8) as u8 & 0x03)
    }
}

impl Store for Eeprom {
    async fn write_byte(&mut self, address: u16, byte: u8) {
        let device = Self::device_addr(address);
        let frame = [address as u8, byte];
        // NACK means the previous write cycle is still running: reissue until the part
        // accepts. Returning after the accepted transfer means "write cycle initiated";
        // the next call's polling serializes against it.
        while self.bus.write(device, &frame).await.is_err() {
            Timer::after_micros(ACK_POLL_MICROS).await;
        }
    }

    async fn read_byte(&mut self, address: u16) -> u8 {
        let device = Self::device_addr(address);
        let word = [address as u8];
        let mut byte = [0u8; 1];
        while self.bus.write_read(device, &word, &mut byte).await.is_err() {
            Timer::after_micros(ACK_POLL_MICROS).await;
        }
        byte[0]
    }
}
