//! Mean and sigma estimation over an optional reference sub-band.

use tracing::warn;

use crate::plan::FreqBand;

/// Scaling applied to every emitted value. The default is a pass-through
/// (mean 0, sigma 1) so unscaled output equals raw accumulated power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStats {
    pub mean: f32,
    pub sigma: f32,
}

impl Default for BandStats {
    fn default() -> Self {
        BandStats {
            mean: 0.0,
            sigma: 1.0,
        }
    }
}

impl BandStats {
    /// Estimate mean and sigma of the accumulated power over exactly the
    /// bins whose center-relative frequency falls inside `band`. Without
    /// a band the spectrum passes through unscaled. An empty band or a
    /// degenerate sigma also falls back to pass-through, with a warning.
    pub fn over(power: &[f32], freq_res_hz: f64, band: Option<&FreqBand>) -> BandStats {
        let band = match band {
            Some(band) => band,
            None => return BandStats::default(),
        };

        let half = (power.len() / 2) as isize;
        let mut mean = 0f64;
        let mut var = 0f64;
        let mut n = 0u32;
        for (i, &p) in power.iter().enumerate() {
            let freq = ((i as isize - half) as f64 * freq_res_hz) as f32;
            if band.contains(freq) {
                mean += p as f64;
                var += p as f64 * p as f64;
                n += 1;
            }
        }
        if n == 0 {
            warn!(
                min_hz = band.min_hz,
                max_hz = band.max_hz,
                "no bins fall inside the rms band, leaving spectrum unscaled"
            );
            return BandStats::default();
        }

        mean /= n as f64;
        var /= n as f64;
        let sigma = (var - mean * mean).sqrt();
        if !(sigma > 0.0) {
            warn!("rms band has zero variance, leaving spectrum unscaled");
            return BandStats::default();
        }

        BandStats {
            mean: mean as f32,
            sigma: sigma as f32,
        }
    }

    pub fn normalize(&self, power: f32) -> f32 {
        (power - self.mean) / self.sigma
    }
}
