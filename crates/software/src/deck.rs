//! The record/playback deck.
//!
//! One machine, three states: resting, filling the tape from the wire, or replaying the tape to
//! the wire. The deck owns its collaborators and is generic over all of them, so everything below
//! runs identically on the device and under test. Mode is re-evaluated on every pass of
//! [`run`](Deck::run); the switches are plain levels, so a session simply ends when its switch
//! reads off.

use crate::clock::{Clock, TICK_HZ};
use crate::io::{DiagnosticPort, MidiPort, ModeSwitches, Sampler, Store};
use crate::tape::{self, Frame};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};

/// Pause between mode polls while resting. Far below human switch timescales; its only job is to
/// keep the resting loop from starving other tasks.
const IDLE_POLL: Duration = Duration::from_millis(5);

/// Duration of the full-port flash that marks the end of playback: one second.
const DONE_FLASH_TICKS: u16 = TICK_HZ as u16;

/// What the deck should do with the current pass, given the switch levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Idle,
    Recording,
    Playing,
}

/// Record wins over Play; with both switches on, Play is skipped for the pass.
fn select_mode(record: bool, play: bool) -> Mode {
    if record {
        Mode::Recording
    } else if play {
        Mode::Playing
    } else {
        Mode::Idle
    }
}

/// Applies the Modify scalar to a stored interval.
///
/// The cast truncates toward zero and saturates at the 16-bit range, matching the clock's own
/// saturation; the modifier is never negative.
fn scale_interval(interval: u16, modifier: f32) -> u16 {
    (interval as f32 * modifier) as u16
}

/// The record/playback controller.
///
/// Owns the tape store, the MIDI link, the mode switches, the interval clock, the modifier
/// sampler, and the diagnostic port, and orchestrates them into the record and playback loops.
pub struct Deck<S, P, W, C, V, D> {
    store: S,
    port: P,
    switches: W,
    clock: C,
    sampler: V,
    diagnostic: D,
}

impl<S, P, W, C, V, D> Deck<S, P, W, C, V, D>
where
    S: Store,
    P: MidiPort,
    W: ModeSwitches,
    C: Clock,
    V: Sampler,
    D: DiagnosticPort,
{
    /// Assembles a deck from its collaborators.
    pub fn new(store: S, port: P, switches: W, clock: C, sampler: V, diagnostic: D) -> Self {
        Self {
            store,
            port,
            switches,
            clock,
            sampler,
            diagnostic,
        }
    }

    /// Runs the deck forever: poll the switches, enter whichever session is called for, return to
    /// rest with the diagnostic port cleared.
    pub async fn run(&mut self) -> ! {
        loop {
            match select_mode(self.switches.record(), self.switches.play()) {
                Mode::Recording => self.record_session().await,
                Mode::Playing => self.play_session().await,
                Mode::Idle => {}
            }
            self.diagnostic.set(0);
            Timer::after(IDLE_POLL).await;
        }
    }

    /// One recording session: truncate the tape, then capture frames until the Record switch
    /// releases or the tape fills.
    ///
    /// The count byte is rewritten only after a frame's five bytes have all landed, so a session
    /// interrupted mid-message leaves a tape holding exactly the frames that completed: a
    /// partial frame is discarded, never zero-padded into the count.
    pub async fn record_session(&mut self) {
        let mut frames: u8 = 0;
        self.port.discard_input();
        // Wholesale truncate: whatever the previous session left is gone even if this one
        // captures nothing.
        self.store.write_byte(tape::COUNT_ADDR, 0).await;
        self.clock.restart();

        'session: while frames < tape::MAX_FRAMES && self.switches.record() {
            let mut payload = [0u8; tape::PAYLOAD_LEN];
            for slot in payload.iter_mut() {
                match select(self.port.recv(), self.switches.record_released()).await {
                    Either::First(byte) => *slot = byte,
                    Either::Second(()) => break 'session,
                }
            }

            let frame = Frame {
                payload,
                interval: self.clock.elapsed_ticks(),
            };
            // The next gap is measured from here; the store writes below are not billed to it.
            self.clock.restart();

            let base = Frame::addr(frames);
            for (offset, byte) in frame.to_bytes().iter().enumerate() {
                self.store.write_byte(base + offset as u16, *byte).await;
            }
            frames += 1;
            self.store.write_byte(tape::COUNT_ADDR, frames).await;

            self.diagnostic.set(frame.payload[1]);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Recording stopped: {} frames on tape", frames);
    }

    /// One playback session: replay every stored frame in order, pacing each with its recorded
    /// interval (scaled by the sampler when Modify is on), then flash the port to say so.
    pub async fn play_session(&mut self) {
        let count = tape::clamp_count(self.store.read_byte(tape::COUNT_ADDR).await);
        let mut replayed: u8 = 0;
        self.port.discard_input();
        self.clock.restart();

        #[cfg(feature = "defmt")]
        defmt::info!("Replaying {} frames", count);

        while replayed < count && self.switches.play() {
            let mut bytes = [0u8; tape::FRAME_LEN];
            let base = Frame::addr(replayed);
            for (offset, slot) in bytes.iter_mut().enumerate() {
                *slot = self.store.read_byte(base + offset as u16).await;
            }
            let frame = Frame::from_bytes(&bytes);

            for byte in frame.payload {
                self.port.send(byte).await;
            }

            let interval = if self.switches.modify() {
                scale_interval(frame.interval, self.sampler.sample_normalized().await)
            } else {
                frame.interval
            };

            self.clock.restart();
            self.clock.wait_until(interval).await;

            self.diagnostic.set(frame.payload[1]);
            replayed += 1;
        }

        // End-of-tape flash, then dark.
        self.diagnostic.set(0xFF);
        self.clock.restart();
        self.clock.wait_until(DONE_FLASH_TICKS).await;
        self.diagnostic.set(0);
    }
}
