//! Run configuration and derivation of the transform plan from the
//! physical acquisition settings.

use crate::mode::AcquisitionMode;
use crate::WORD_SIZE;

/// Which polarization to process for dual-pol capture formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    One,
    Two,
}

impl Channel {
    /// Position of this polarization within an interleaved group.
    pub fn index(&self) -> usize {
        match self {
            Channel::One => 0,
            Channel::Two => 1,
        }
    }
}

/// Closed frequency interval in Hz, relative to band center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqBand {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl FreqBand {
    pub fn contains(&self, freq_hz: f32) -> bool {
        freq_hz >= self.min_hz && freq_hz <= self.max_hz
    }
}

/// Immutable settings for one processing run, assembled from the command
/// line and threaded through every stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: AcquisitionMode,
    /// Sampling frequency of the capture, MHz.
    pub fsamp_mhz: f64,
    /// Desired frequency resolution, Hz.
    pub freq_res_hz: f64,
    /// Coherent pre-transform sum factor.
    pub downsample: usize,
    /// Incoherent post-transform sum count.
    pub sum: usize,
    pub channel: Channel,
    pub time_series: bool,
    pub db_output: bool,
    pub invert_iq: bool,
    /// Restrict emitted bins to this interval; `None` emits everything.
    pub freq_filter: Option<FreqBand>,
    /// Reference sub-band for sigma scaling; `None` passes power through.
    pub rms_band: Option<FreqBand>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("sampling frequency must be positive, got {0} MHz")]
    InvalidSamplingFrequency(f64),
    #[error("frequency resolution must be positive, got {0} Hz")]
    InvalidResolution(f64),
    #[error("downsampling factor must be at least 1")]
    InvalidDownsample,
    #[error("sum count must be at least 1")]
    InvalidSum,
    #[error("mode {0} carries native-width samples and cannot be downsampled")]
    DownsampleUnsupported(AcquisitionMode),
    #[error("derived transform length {0} is not an even length of at least 2")]
    InvalidTransformLength(i64),
    #[error("transform of {0} samples does not pack into whole bytes for mode {1}")]
    UnalignedTransform(i64, AcquisitionMode),
}

/// Buffer geometry for one constituent transform, derived once from the
/// run configuration and immutable for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformPlan {
    /// Transform length after downsampling, complex samples.
    pub fft_len: usize,
    /// Complex samples unpacked from one raw buffer.
    pub unpacked_len: usize,
    /// Bytes of packed input consumed per constituent transform.
    pub raw_buf_len: usize,
}

impl TransformPlan {
    /// Derive the transform geometry, rejecting any configuration whose
    /// buffers would be malformed. Pure; nothing is allocated here.
    pub fn derive(cfg: &RunConfig) -> Result<TransformPlan, ConfigError> {
        if !(cfg.fsamp_mhz > 0.0) {
            return Err(ConfigError::InvalidSamplingFrequency(cfg.fsamp_mhz));
        }
        if !(cfg.freq_res_hz > 0.0) {
            return Err(ConfigError::InvalidResolution(cfg.freq_res_hz));
        }
        if cfg.downsample == 0 {
            return Err(ConfigError::InvalidDownsample);
        }
        if cfg.sum == 0 {
            return Err(ConfigError::InvalidSum);
        }
        if cfg.downsample > 1 && !cfg.mode.supports_downsampling() {
            return Err(ConfigError::DownsampleUnsupported(cfg.mode));
        }

        // Pre-downsample transform length sets the bytes read per transform;
        // the coherent sum then shortens the transform itself.
        let pre_len = (cfg.fsamp_mhz / cfg.freq_res_hz * 1e6).round() as i64;
        if pre_len <= 0 {
            return Err(ConfigError::InvalidTransformLength(pre_len));
        }

        let raw_bytes = pre_len as f64 * WORD_SIZE as f64 / cfg.mode.samples_per_word();
        if raw_bytes.fract() != 0.0 {
            return Err(ConfigError::UnalignedTransform(pre_len, cfg.mode));
        }

        let fft_len = pre_len / cfg.downsample as i64;
        // DC-bin interpolation and the frequency swap both index relative
        // to fft_len/2, so the length must be even and at least 2.
        if fft_len < 2 || fft_len % 2 != 0 {
            return Err(ConfigError::InvalidTransformLength(fft_len));
        }

        Ok(TransformPlan {
            fft_len: fft_len as usize,
            unpacked_len: pre_len as usize,
            raw_buf_len: raw_bytes as usize,
        })
    }

    /// Total bandwidth covered by the transform, Hz.
    pub fn processed_bandwidth_hz(&self, cfg: &RunConfig) -> f64 {
        cfg.freq_res_hz * self.fft_len as f64
    }

    /// Wall-clock time of data integrated into one output cycle, seconds.
    pub fn integration_time_s(&self, cfg: &RunConfig) -> f64 {
        cfg.sum as f64 / cfg.freq_res_hz
    }
}
