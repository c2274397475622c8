//! Per-mode byte decoders mapping packed capture words to I/Q floats.
//!
//! Every decoder fills `out` with one complex sample per decoded input
//! sample, I in the real part and Q in the imaginary part, earliest
//! sample first. Quantized formats expand through symmetric level
//! ladders centered on zero; native-width formats are little-endian.

use crate::mode::AcquisitionMode;
use crate::plan::Channel;
use crate::ComplexSample;

/// 4-level ladder for 2-bit codes.
const LEVELS_2BIT: [f32; 4] = [-3.0, -1.0, 1.0, 3.0];

fn level4(code: u8) -> f32 {
    LEVELS_2BIT[(code & 0x3) as usize]
}

/// 16-level ladder for 4-bit codes: odd values -15 through 15.
fn level16(code: u8) -> f32 {
    2.0 * (code & 0xf) as f32 - 15.0
}

/// Decode one raw buffer into interleaved I/Q floats.
///
/// `out` must hold exactly the number of complex samples the buffer
/// packs for this mode; the transform plan guarantees that.
pub fn decode(mode: AcquisitionMode, channel: Channel, raw: &[u8], out: &mut [ComplexSample]) {
    debug_assert_eq!(
        out.len() as f64,
        raw.len() as f64 * mode.samples_per_word() / crate::WORD_SIZE as f64,
    );
    match mode {
        AcquisitionMode::TwoChanTwoBit => decode_2c2b(raw, out),
        AcquisitionMode::TwoChanFourBit => decode_2c4b(raw, out),
        AcquisitionMode::TwoChanEightBit | AcquisitionMode::SignedBytes => {
            decode_signed_bytes(raw, out)
        }
        AcquisitionMode::FourChanTwoBit => decode_4c2b(raw, channel, out),
        AcquisitionMode::FourChanFourBit => decode_4c4b(raw, channel, out),
        AcquisitionMode::SignedWords => decode_signed_words(raw, out),
        AcquisitionMode::Floats => decode_floats(raw, out),
    }
}

// Two complex samples per byte: [I0 Q0 I1 Q1], two bits each, MSB first.
fn decode_2c2b(raw: &[u8], out: &mut [ComplexSample]) {
    for (pair, byte) in out.chunks_exact_mut(2).zip(raw) {
        pair[0] = ComplexSample::new(level4(byte >> 6), level4(byte >> 4));
        pair[1] = ComplexSample::new(level4(byte >> 2), level4(*byte));
    }
}

// One complex sample per byte: I in the high nibble, Q in the low.
fn decode_2c4b(raw: &[u8], out: &mut [ComplexSample]) {
    for (sample, byte) in out.iter_mut().zip(raw) {
        *sample = ComplexSample::new(level16(byte >> 4), level16(*byte));
    }
}

// Interleaved signed bytes, I then Q.
fn decode_signed_bytes(raw: &[u8], out: &mut [ComplexSample]) {
    for (sample, pair) in out.iter_mut().zip(raw.chunks_exact(2)) {
        *sample = ComplexSample::new(pair[0] as i8 as f32, pair[1] as i8 as f32);
    }
}

// One byte holds the same time step for both polarizations:
// [I1 Q1 I2 Q2], two bits each, MSB first.
fn decode_4c2b(raw: &[u8], channel: Channel, out: &mut [ComplexSample]) {
    let (i_shift, q_shift) = match channel {
        Channel::One => (6, 4),
        Channel::Two => (2, 0),
    };
    for (sample, byte) in out.iter_mut().zip(raw) {
        *sample = ComplexSample::new(level4(byte >> i_shift), level4(byte >> q_shift));
    }
}

// Byte pairs hold the same time step for both polarizations, one byte
// per polarization with I in the high nibble.
fn decode_4c4b(raw: &[u8], channel: Channel, out: &mut [ComplexSample]) {
    for (sample, pair) in out.iter_mut().zip(raw.chunks_exact(2)) {
        let byte = pair[channel.index()];
        *sample = ComplexSample::new(level16(byte >> 4), level16(byte));
    }
}

fn decode_signed_words(raw: &[u8], out: &mut [ComplexSample]) {
    for (sample, bytes) in out.iter_mut().zip(raw.chunks_exact(4)) {
        let i = i16::from_le_bytes([bytes[0], bytes[1]]);
        let q = i16::from_le_bytes([bytes[2], bytes[3]]);
        *sample = ComplexSample::new(i as f32, q as f32);
    }
}

fn decode_floats(raw: &[u8], out: &mut [ComplexSample]) {
    for (sample, bytes) in out.iter_mut().zip(raw.chunks_exact(8)) {
        let i = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let q = f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        *sample = ComplexSample::new(i, q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bit_codes_span_the_four_level_ladder() {
        // 0b00_01_10_11: one sample at (-3, -1), one at (1, 3)
        let raw = [0b0001_1011u8];
        let mut out = [ComplexSample::default(); 2];
        decode(AcquisitionMode::TwoChanTwoBit, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(-3.0, -1.0));
        assert_eq!(out[1], ComplexSample::new(1.0, 3.0));
    }

    #[test]
    fn four_bit_codes_are_odd_symmetric_levels() {
        let raw = [0x0f, 0x87];
        let mut out = [ComplexSample::default(); 2];
        decode(AcquisitionMode::TwoChanFourBit, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(-15.0, 15.0));
        assert_eq!(out[1], ComplexSample::new(1.0, -1.0));
    }

    #[test]
    fn signed_bytes_pass_through() {
        let raw = [0x7f, 0x80, 0x00, 0xff];
        let mut out = [ComplexSample::default(); 2];
        decode(AcquisitionMode::SignedBytes, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(127.0, -128.0));
        assert_eq!(out[1], ComplexSample::new(0.0, -1.0));
    }

    #[test]
    fn dual_pol_two_bit_selects_the_requested_channel() {
        // Channel one at (3, 3), channel two at (-3, -3)
        let raw = [0b1111_0000u8];
        let mut out = [ComplexSample::default(); 1];
        decode(AcquisitionMode::FourChanTwoBit, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(3.0, 3.0));
        decode(AcquisitionMode::FourChanTwoBit, Channel::Two, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(-3.0, -3.0));
    }

    #[test]
    fn dual_pol_four_bit_selects_the_requested_byte() {
        let raw = [0xff, 0x00];
        let mut out = [ComplexSample::default(); 1];
        decode(AcquisitionMode::FourChanFourBit, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(15.0, 15.0));
        decode(AcquisitionMode::FourChanFourBit, Channel::Two, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(-15.0, -15.0));
    }

    #[test]
    fn native_words_and_floats_decode_little_endian() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&(-1234i16).to_le_bytes());
        raw.extend_from_slice(&(5678i16).to_le_bytes());
        let mut out = [ComplexSample::default(); 1];
        decode(AcquisitionMode::SignedWords, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(-1234.0, 5678.0));

        let mut raw = Vec::new();
        raw.extend_from_slice(&1.5f32.to_le_bytes());
        raw.extend_from_slice(&(-0.25f32).to_le_bytes());
        decode(AcquisitionMode::Floats, Channel::One, &raw, &mut out);
        assert_eq!(out[0], ComplexSample::new(1.5, -0.25));
    }
}
