//! Output-side glue: emitting normalized spectra, either as back-to-back
//! binary records or as a frequency/value table.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use byte_slice_cast::AsByteSlice;

use crate::plan::FreqBand;
use crate::stats::BandStats;

/// Open the output sink; `-` selects standard output.
pub fn open_output(path: &str) -> io::Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(BufWriter::new(io::stdout())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

/// Write one normalized accumulator as a fixed-length binary record of
/// native-endian 32-bit floats, flushed so a consumer tailing the sink
/// only ever sees whole records. Any short write is fatal.
pub fn write_record<W: Write + ?Sized>(sink: &mut W, record: &[f32]) -> io::Result<()> {
    sink.write_all(record.as_byte_slice())?;
    sink.flush()
}

/// Write the spectrum as one `<frequency> <value>` line per emitted bin.
///
/// Frequency is the bin's offset from band center. Bins outside `filter`
/// are skipped; without a filter every bin is emitted. Values are sigma
/// units, or `10 log10` of sigma units in dB mode.
pub fn write_table<W: Write + ?Sized>(
    sink: &mut W,
    power: &[f32],
    freq_res_hz: f64,
    stats: &BandStats,
    filter: Option<&FreqBand>,
    db: bool,
) -> io::Result<()> {
    let half = (power.len() / 2) as isize;
    for (i, &p) in power.iter().enumerate() {
        let freq = ((i as isize - half) as f64 * freq_res_hz) as f32;
        if let Some(band) = filter {
            if !band.contains(freq) {
                continue;
            }
        }
        let value = stats.normalize(p);
        if db {
            writeln!(sink, "{:.3} {}", freq, 10.0 * value.log10())?;
        } else {
            writeln!(sink, "{:.3} {:.1}", freq, value)?;
        }
    }
    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_lines(
        power: &[f32],
        stats: &BandStats,
        filter: Option<&FreqBand>,
        db: bool,
    ) -> Vec<String> {
        let mut sink = Vec::new();
        write_table(&mut sink, power, 1000.0, stats, filter, db).unwrap();
        String::from_utf8(sink)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn records_round_trip_through_bytes() {
        let mut sink = Vec::new();
        write_record(&mut sink, &[1.0f32, -2.5, 0.0]).unwrap();
        assert_eq!(sink.len(), 12);
        let values: Vec<f32> = sink
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes(b.try_into().unwrap()))
            .collect();
        assert_eq!(values, [1.0, -2.5, 0.0]);
    }

    #[test]
    fn table_lines_carry_frequency_and_linear_value() {
        let lines = table_lines(&[4.0, 8.0, 15.0, 16.0], &BandStats::default(), None, false);
        assert_eq!(
            lines,
            ["-2000.000 4.0", "-1000.000 8.0", "0.000 15.0", "1000.000 16.0"]
        );
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let band = FreqBand {
            min_hz: -1000.0,
            max_hz: 0.0,
        };
        let lines = table_lines(
            &[4.0, 8.0, 15.0, 16.0],
            &BandStats::default(),
            Some(&band),
            false,
        );
        assert_eq!(lines, ["-1000.000 8.0", "0.000 15.0"]);
    }

    #[test]
    fn db_values_match_log10_of_the_linear_value() {
        let lines = table_lines(&[4.0, 100.0], &BandStats::default(), None, true);
        assert_eq!(lines[0], format!("-1000.000 {}", 10.0 * 4.0f32.log10()));
        assert_eq!(lines[1], format!("0.000 {}", 10.0 * 100.0f32.log10()));
    }

    #[test]
    fn normalization_applies_to_every_emitted_value() {
        let stats = BandStats {
            mean: 2.0,
            sigma: 4.0,
        };
        let lines = table_lines(&[4.0, 10.0], &stats, None, false);
        assert_eq!(lines, ["-1000.000 0.5", "0.000 2.0"]);
    }
}
