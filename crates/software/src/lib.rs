//! This crate contains architecture-agnostic logic for the MIDIgraph, a device which records a
//! [MIDI](https://midi.org/midi-1-0) byte stream arriving over a serial link onto an EEPROM "tape"
//! together with inter-event timing, and later replays it with reconstructed timing (optionally
//! scaled by a photocell-derived voltage).
//!
//! Hardware is reached exclusively through the traits in [`io`] and [`clock`], so the whole
//! record/playback machine in [`deck`] runs unmodified against real peripherals on the device and
//! against in-memory fakes on a development host.

#![deny(missing_docs)]
#![allow(async_fn_in_trait)]
#![no_std]

pub mod clock;

/// The record/playback state machine that fills the tape and replays it.
pub mod deck;

/// Trait seams between the deck and the hardware it drives.
pub mod io;

pub mod tape;
