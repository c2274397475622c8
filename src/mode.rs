//! Acquisition modes of the sampler and their packing parameters.

use std::fmt;
use std::str::FromStr;

/// Closed set of supported capture formats, keyed by the numeric mode ids
/// the sampler firmware uses. Anything else is rejected before allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Mode 1: single pol, 2-bit I and Q
    TwoChanTwoBit,
    /// Mode 2: single pol, 4-bit I and Q
    TwoChanFourBit,
    /// Mode 3: single pol, 8-bit I and Q
    TwoChanEightBit,
    /// Mode 5: dual pol, 2-bit I and Q
    FourChanTwoBit,
    /// Mode 6: dual pol, 4-bit I and Q
    FourChanFourBit,
    /// Mode 8: raw signed bytes, interleaved I/Q
    SignedBytes,
    /// Mode 16: raw signed 16-bit words, interleaved I/Q
    SignedWords,
    /// Mode 32: raw 32-bit floats, interleaved I/Q
    Floats,
}

impl AcquisitionMode {
    /// Numeric id as used on the command line and in capture headers.
    pub fn id(&self) -> u32 {
        match self {
            AcquisitionMode::TwoChanTwoBit => 1,
            AcquisitionMode::TwoChanFourBit => 2,
            AcquisitionMode::TwoChanEightBit => 3,
            AcquisitionMode::FourChanTwoBit => 5,
            AcquisitionMode::FourChanFourBit => 6,
            AcquisitionMode::SignedBytes => 8,
            AcquisitionMode::SignedWords => 16,
            AcquisitionMode::Floats => 32,
        }
    }

    /// Single-pol complex samples packed into one 4-byte word.
    /// Fractional for formats wider than a word per sample.
    pub fn samples_per_word(&self) -> f64 {
        match self {
            AcquisitionMode::TwoChanTwoBit => 8.0,
            AcquisitionMode::TwoChanFourBit => 4.0,
            AcquisitionMode::TwoChanEightBit => 2.0,
            AcquisitionMode::FourChanTwoBit => 4.0,
            AcquisitionMode::FourChanFourBit => 2.0,
            AcquisitionMode::SignedBytes => 2.0,
            AcquisitionMode::SignedWords => 1.0,
            AcquisitionMode::Floats => 0.5,
        }
    }

    /// Polarizations interleaved in the packed stream.
    pub fn polarizations(&self) -> usize {
        match self {
            AcquisitionMode::FourChanTwoBit | AcquisitionMode::FourChanFourBit => 2,
            _ => 1,
        }
    }

    /// The native-width formats arrive pre-expanded and skip the coherent
    /// summer; requesting downsampling for them is a configuration error.
    pub fn supports_downsampling(&self) -> bool {
        !matches!(
            self,
            AcquisitionMode::SignedWords | AcquisitionMode::Floats
        )
    }
}

impl FromStr for AcquisitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(AcquisitionMode::TwoChanTwoBit),
            "2" => Ok(AcquisitionMode::TwoChanFourBit),
            "3" => Ok(AcquisitionMode::TwoChanEightBit),
            "5" => Ok(AcquisitionMode::FourChanTwoBit),
            "6" => Ok(AcquisitionMode::FourChanFourBit),
            "8" => Ok(AcquisitionMode::SignedBytes),
            "16" => Ok(AcquisitionMode::SignedWords),
            "32" => Ok(AcquisitionMode::Floats),
            other => Err(format!(
                "invalid mode {other}; valid modes are 1 (2c2b), 2 (2c4b), 3 (2c8b), \
                 5 (4c2b), 6 (4c4b), 8 (signed bytes), 16 (signed 16bit), 32 (32bit floats)"
            )),
        }
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquisitionMode::TwoChanTwoBit => "2c2b",
            AcquisitionMode::TwoChanFourBit => "2c4b",
            AcquisitionMode::TwoChanEightBit => "2c8b",
            AcquisitionMode::FourChanTwoBit => "4c2b",
            AcquisitionMode::FourChanFourBit => "4c4b",
            AcquisitionMode::SignedBytes => "signed bytes",
            AcquisitionMode::SignedWords => "signed 16bit",
            AcquisitionMode::Floats => "32bit floats",
        };
        write!(f, "{name}")
    }
}
