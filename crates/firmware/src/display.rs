//! The 8-bit diagnostic LED port.
//!
//! One task owns the pins. The deck latches values through a [`Signal`] and never touches the
//! hardware; a periodic tick blanks the port between updates, as the original's compare-match
//! interrupt did. The blanking path reads no deck state whatsoever; it exists only so a mirrored
//! byte reads as a blink rather than a latched pattern.

use embassy_futures::select::{Either, select};
use embassy_stm32::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use midigraph_lib::io::DiagnosticPort;

/// Blanking period of the background tick.
const BLANK_PERIOD: Duration = Duration::from_millis(800);

/// Latest value latched by the deck.
static PORT_VALUE: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// The deck's handle on the port: latching a value wakes the display task.
pub struct DiagnosticLeds;

impl DiagnosticPort for DiagnosticLeds {
    fn set(&mut self, value: u8) {
        PORT_VALUE.signal(value);
    }
}

/// Task that owns the LED pins: applies latched values as they arrive and blanks on the tick.
#[embassy_executor::task]
pub async fn display_task(mut pins: [Output<'static>; 8]) -> ! {
    let mut ticker = Ticker::every(BLANK_PERIOD);
    loop {
        let value = match select(PORT_VALUE.wait(), ticker.next()).await {
            Either::First(value) => value,
            Either::Second(()) => 0,
        };
        for (bit, pin) in pins.iter_mut().enumerate() {
            if value & (1 << bit) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }
}
