//! The per-cycle processing loop: read, unpack, downsample, transform,
//! accumulate, normalize, emit.
//!
//! Everything runs single-threaded and strictly in sequence. All working
//! buffers are allocated once from the transform plan and reused; the
//! input buffers are refilled per constituent transform and the
//! accumulator is zeroed once per output cycle.

use std::io::{ErrorKind, Read, Write};

use rustfft::FftPlanner;
use tracing::debug;

use crate::plan::{RunConfig, TransformPlan};
use crate::stats::BandStats;
use crate::{dsp, exfil, unpack, ComplexSample};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A read returned less than a full raw buffer, including clean EOF.
    #[error("input ended after {records} complete records")]
    ReadUnderrun { records: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What a completed run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Output cycles emitted: one for a spectrum table, one per record
    /// for a time series.
    pub records: u64,
}

/// Run the pipeline to completion.
///
/// In spectrum-table mode one sum is accumulated and emitted, then the
/// run ends. In time-series mode records are emitted back to back until
/// the first incomplete read, which surfaces as [`PipelineError::ReadUnderrun`]
/// carrying the number of complete records already written.
pub fn run<R, W>(
    cfg: &RunConfig,
    plan: &TransformPlan,
    input: &mut R,
    output: &mut W,
) -> Result<RunReport, PipelineError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let fft = FftPlanner::new().plan_fft_forward(plan.fft_len);

    // Allocated once, reused every cycle.
    let mut raw = vec![0u8; plan.raw_buf_len];
    let mut unpacked = vec![ComplexSample::default(); plan.unpacked_len];
    let mut fft_buf = vec![ComplexSample::default(); plan.fft_len];
    let mut scratch = vec![ComplexSample::default(); fft.get_inplace_scratch_len()];
    let mut accum = vec![0f32; plan.fft_len];

    let mut records = 0u64;
    loop {
        accum.fill(0.0);
        for _ in 0..cfg.sum {
            if let Err(e) = input.read_exact(&mut raw) {
                return Err(match e.kind() {
                    ErrorKind::UnexpectedEof => PipelineError::ReadUnderrun { records },
                    _ => PipelineError::Io(e),
                });
            }
            unpack::decode(cfg.mode, cfg.channel, &raw, &mut unpacked);
            dsp::downsample_sum(&unpacked, &mut fft_buf, cfg.downsample);
            if cfg.invert_iq {
                dsp::swap_iq(&mut fft_buf);
            }
            fft.process_with_scratch(&mut fft_buf, &mut scratch);
            dsp::swap_freq(&mut fft_buf);
            dsp::accumulate_power(&fft_buf, &mut accum);
        }
        dsp::interpolate_dc(&mut accum);

        let stats = BandStats::over(&accum, cfg.freq_res_hz, cfg.rms_band.as_ref());
        if cfg.time_series {
            for bin in accum.iter_mut() {
                *bin = stats.normalize(*bin);
            }
            exfil::write_record(output, &accum)?;
            records += 1;
            debug!(records, "record written");
        } else {
            exfil::write_table(
                output,
                &accum,
                cfg.freq_res_hz,
                &stats,
                cfg.freq_filter.as_ref(),
                cfg.db_output,
            )?;
            return Ok(RunReport { records: 1 });
        }
    }
}
