//! The three mode switches.

use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Input;
use midigraph_lib::io::ModeSwitches;

/// Level-sampled mode switches; a high line is an engaged switch. Only Record needs an EXTI
/// line: releasing it is what cancels a blocked receive, so the deck has to be able to await
/// that level rather than poll it.
pub struct Switches {
    record: ExtiInput<'static>,
    play: Input<'static>,
    modify: Input<'static>,
}

impl Switches {
    /// Bundles the three switch inputs.
    pub fn new(record: ExtiInput<'static>, play: Input<'static>, modify: Input<'static>) -> Self {
        Self {
            record,
            play,
            modify,
        }
    }
}

impl ModeSwitches for Switches {
    fn record(&self) -> bool {
        self.record.is_high()
    }

    fn play(&self) -> bool {
        self.play.is_high()
    }

    fn modify(&self) -> bool {
        self.modify.is_high()
    }

    async fn record_released(&mut self) {
        self.record.wait_for_low().await;
    }
}
