//! Sample-domain and bin-domain kernels of the spectral pipeline.

use crate::ComplexSample;

/// Coherently sum groups of `factor` consecutive complex samples into
/// `out`, simulating a lower sampling rate. Phase is preserved, so
/// amplitude grows linearly with `factor` (the post-transform power sum
/// only grows with its square root).
pub fn downsample_sum(input: &[ComplexSample], out: &mut [ComplexSample], factor: usize) {
    debug_assert!(input.len() >= out.len() * factor);
    for (bin, group) in out.iter_mut().zip(input.chunks_exact(factor)) {
        let mut acc = ComplexSample::default();
        for sample in group {
            acc += *sample;
        }
        *bin = acc;
    }
}

/// Exchange the I and Q component of every sample, mirroring the
/// frequency axis of the subsequent transform. Used when the physical
/// wiring reverses the phase sense.
pub fn swap_iq(buf: &mut [ComplexSample]) {
    for sample in buf.iter_mut() {
        *sample = ComplexSample::new(sample.im, sample.re);
    }
}

/// Exchange the positive- and negative-frequency halves of the bin array
/// so that index `len/2` is DC, index 0 the most negative frequency and
/// index `len-1` one step below Nyquist. The length must be even.
pub fn swap_freq(buf: &mut [ComplexSample]) {
    let half = buf.len() / 2;
    debug_assert_eq!(half * 2, buf.len());
    for i in 0..half {
        buf.swap(i, i + half);
    }
}

/// Detect each bin to power and add it into the accumulator. Summing
/// power across independent transforms is incoherent and improves the
/// SNR of noise-like signals by the square root of the count.
pub fn accumulate_power(bins: &[ComplexSample], accum: &mut [f32]) {
    for (acc, bin) in accum.iter_mut().zip(bins) {
        *acc += bin.norm_sqr();
    }
}

/// Replace the DC bin with the mean of its two neighbors. The true DC
/// value is dominated by digitizer offset, not signal power. With only
/// two bins the single neighbor stands in for both.
pub fn interpolate_dc(accum: &mut [f32]) {
    debug_assert!(accum.len() >= 2 && accum.len() % 2 == 0);
    let dc = accum.len() / 2;
    accum[dc] = if accum.len() >= 4 {
        (accum[dc - 1] + accum[dc + 1]) / 2.0
    } else {
        accum[dc - 1]
    };
}
