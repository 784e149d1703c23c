//! The persisted tape format: how MIDI messages and their inter-arrival timing are framed into
//! EEPROM bytes.
//!
//! The layout is a compatibility surface. Frames sit back to back from address 0 with no padding,
//! so frame *i* occupies bytes `[i * FRAME_LEN, i * FRAME_LEN + FRAME_LEN)`; the last byte of the
//! part holds the number of frames captured by the most recent recording session. Existing
//! recordings must read back bit for bit, which is why all of the constants below are what they
//! are rather than something rounder.

/// Total capacity of the tape in bytes (a 24C08-class part).
pub const CAPACITY: u16 = 1024;

/// Address of the frame-count byte, the last byte of the part.
pub const COUNT_ADDR: u16 = CAPACITY - 1;

/// MIDI payload bytes per frame: one status byte plus two data bytes. The device never inspects
/// these beyond mirroring the middle one to the diagnostic port; grouping is assumed, not checked.
pub const PAYLOAD_LEN: usize = 3;

/// Persisted size of one frame: the payload followed by a little-endian `u16` interval.
pub const FRAME_LEN: usize = 5;

/// Whole frames that fit below the count byte. The division discards the tail bytes that could
/// hold a partial frame; a frame must never straddle the count byte.
pub const MAX_FRAMES: u8 = ((CAPACITY - 1) / FRAME_LEN as u16) as u8;

/// One recorded MIDI message and the clock ticks elapsed since the previous frame was captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// The raw 3-byte MIDI message.
    pub payload: [u8; PAYLOAD_LEN],
    /// Ticks between the capture of the previous frame and this one.
    pub interval: u16,
}

impl Frame {
    /// Serializes to the persisted layout: payload bytes in wire order, then the interval low
    /// byte, then the interval high byte.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let [lo, hi] = self.interval.to_le_bytes();
        [self.payload[0], self.payload[1], self.payload[2], lo, hi]
    }

    /// Reads a frame back from its persisted layout.
    pub fn from_bytes(bytes: &[u8; FRAME_LEN]) -> Self {
        Self {
            payload: [bytes[0], bytes[1], bytes[2]],
            interval: u16::from_le_bytes([bytes[3], bytes[4]]),
        }
    }

    /// Tape address of the first byte of frame `index`.
    pub fn addr(index: u8) -> u16 {
        u16::from(index) * FRAME_LEN as u16
    }
}

/// Bounds a stored frame count to the number of whole frames the tape can hold.
///
/// The count byte is trusted nowhere else; a stale or corrupt value larger than the data area
/// would otherwise send playback into bytes no session wrote.
pub fn clamp_count(raw: u8) -> u8 {
    raw.min(MAX_FRAMES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            payload: [0x90, 0x3C, 0x64],
            interval: 0x0203,
        }
    }

    #[test]
    fn persisted_layout_is_payload_then_little_endian_interval() {
        let expected = [0x90, 0x3C, 0x64, 0x03, 0x02];
        assert_eq!(
            expected,
            frame().to_bytes(),
            "Expected left but got right"
        );
    }

    #[test]
    fn from_bytes_reverses_to_bytes() {
        let expected = frame();
        let actual = Frame::from_bytes(&frame().to_bytes());
        assert_eq!(expected, actual, "Expected left but got right");
    }

    #[test]
    fn frames_sit_back_to_back() {
        assert_eq!(0, Frame::addr(0), "Expected left but got right");
        assert_eq!(5, Frame::addr(1), "Expected left but got right");
        assert_eq!(
            1015,
            Frame::addr(MAX_FRAMES - 1),
            "Last frame should start at 1015; expected left but got right"
        );
    }

    #[test]
    fn last_frame_stays_clear_of_the_count_byte() {
        assert_eq!(204, MAX_FRAMES, "Expected left but got right");
        let last_frame_end = Frame::addr(MAX_FRAMES - 1) + FRAME_LEN as u16;
        assert!(
            last_frame_end <= COUNT_ADDR,
            "Frame data must never straddle the count byte"
        );
    }

    #[test]
    fn clamp_count_bounds_a_runaway_count_byte() {
        assert_eq!(0, clamp_count(0), "Expected left but got right");
        assert_eq!(204, clamp_count(204), "Expected left but got right");
        assert_eq!(
            MAX_FRAMES,
            clamp_count(0xFF),
            "Counts past the data area should clamp; expected left but got right"
        );
    }
}
