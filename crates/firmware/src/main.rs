//! MIDIgraph is [Embassy](https://embassy.dev)-based firmware for a device that records a MIDI
//! performance and plays it back: bytes arriving over the DIN serial link are written to an
//! EEPROM "tape" together with inter-message timing, and replayed later with that timing
//! reconstructed. The firmware runs on the [Nucleo-F767ZI development
//! board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html).
//!
//! Three switches drive it: Record fills the tape from the wire, Play drains the tape back onto
//! the wire, and Modify scales the replayed timing by the light falling on a photocell (cover
//! the cell to stretch a phrase, shine on it to compress one). An 8-LED port mirrors the middle
//! byte of whatever message last moved, mostly so a silent rig is debuggable by eye.
//!
//! All record/playback logic lives in the hardware-agnostic `midigraph_lib`; this crate only
//! wires real peripherals to the library's collaborator traits and starts the deck.

#![no_std]
#![no_main]

mod controls;
mod display;
mod eeprom;
mod photocell;
mod serial;

use crate::{
    controls::Switches, display::DiagnosticLeds, eeprom::Eeprom, photocell::Photocell,
    serial::SerialPort,
};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config, bind_interrupts,
    adc::Adc,
    exti::ExtiInput,
    gpio::{Input, Level, Output, Pull, Speed},
    i2c::{self, I2c},
    peripherals,
    time::Hertz,
    usart::{self, BufferedUart},
};
use midigraph_lib::{clock::TickClock, deck::Deck};
use static_cell::StaticCell;

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        USART6 => usart::BufferedInterruptHandler<peripherals::USART6>;
        I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
        I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
    }
);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing MIDIgraph");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            divq: None,
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
    }
    let p = embassy_stm32::init(config);

    // The MIDI link. The ring buffers are generous for a wire this slow; 64 bytes rides out a
    // dense burst of messages while the deck is mid EEPROM write.
    static SERIAL_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static SERIAL_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = serial::MIDI_BAUD;
    let uart = unwrap!(BufferedUart::new(
        p.USART6,
        Irqs,
        p.PC7,
        p.PC6,
        SERIAL_TX_BUF.init([0; 64]),
        SERIAL_RX_BUF.init([0; 64]),
        uart_config,
    ));
    let port = SerialPort::new(uart);

    // The tape: a 24C08 on I2C1.
    let bus = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        Irqs,
        p.DMA1_CH6,
        p.DMA1_CH0,
        Hertz(100_000),
        Default::default(),
    );
    let store = Eeprom::new(bus);

    // Mode switches, wired to 3V3 through the front-panel toggles.
    let record = ExtiInput::new(p.PF13, p.EXTI13, Pull::Down);
    let play = Input::new(p.PF14, Pull::Down);
    let modify = Input::new(p.PF15, Pull::Down);
    let switches = Switches::new(record, play, modify);

    let sampler = Photocell::new(Adc::new(p.ADC1), p.PA3);

    let leds = [
        Output::new(p.PE2, Level::Low, Speed::Low),
        Output::new(p.PE3, Level::Low, Speed::Low),
        Output::new(p.PE4, Level::Low, Speed::Low),
        Output::new(p.PE5, Level::Low, Speed::Low),
        Output::new(p.PE6, Level::Low, Speed::Low),
        Output::new(p.PE7, Level::Low, Speed::Low),
        Output::new(p.PE8, Level::Low, Speed::Low),
        Output::new(p.PE9, Level::Low, Speed::Low),
    ];
    unwrap!(spawner.spawn(display::display_task(leds)));

    let mut deck = Deck::new(
        store,
        port,
        switches,
        TickClock::new(),
        sampler,
        DiagnosticLeds,
    );

    info!("MIDIgraph ready");
    deck.run().await
}
