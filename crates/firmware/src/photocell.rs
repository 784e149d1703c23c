//! The playback-speed modifier input: a photocell divider on an ADC channel.

use embassy_stm32::adc::Adc;
use embassy_stm32::peripherals::{ADC1, PA3};
use midigraph_lib::io::Sampler;

/// Full scale of the 12-bit conversion.
const FULL_SCALE: f32 = 4096.0;

/// [`Sampler`] over the photocell. Half scale replays at recorded speed; covering the cell
/// stretches delays toward double, bright light compresses them toward zero.
pub struct Photocell {
    adc: Adc<'static, ADC1>,
    pin: PA3,
}

impl Photocell {
    /// Pairs the converter with its input pin.
    pub fn new(adc: Adc<'static, ADC1>, pin: PA3) -> Self {
        Self { adc, pin }
    }
}

impl Sampler for Photocell {
    async fn sample_normalized(&mut self) -> f32 {
        // One blocking conversion; the deck only asks between frames, and the
        // conversion is short against the intervals being scaled.
        let raw = self.adc.blocking_read(&mut self.pin);
        2.0 * f32::from(raw) / FULL_SCALE
    }
}
