//! Argument parsing for running from the command line

use clap::Parser;

use crate::mode::AcquisitionMode;
use crate::plan::{Channel, FreqBand, RunConfig};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Acquisition mode of the capture: 1 (2c2b), 2 (2c4b), 3 (2c8b),
    /// 5 (4c2b), 6 (4c4b), 8 (signed bytes), 16 (signed 16bit), 32 (32bit floats)
    #[clap(short, value_parser = valid_mode)]
    pub mode: AcquisitionMode,
    /// Sampling frequency in MHz
    #[clap(short = 'f')]
    pub fsamp: f64,
    /// Desired frequency resolution in Hz
    #[clap(short = 'r', default_value_t = 1.0)]
    pub freqres: f64,
    /// Downsampling factor (coherent sum before the transform)
    #[clap(short = 'd', default_value_t = 1)]
    #[clap(value_parser = clap::value_parser!(u32).range(1..))]
    pub downsample: u32,
    /// Number of transforms to sum incoherently after the transform
    #[clap(short = 'n', default_value_t = 1)]
    #[clap(value_parser = clap::value_parser!(u32).range(1..))]
    pub sum: u32,
    /// Write dB instead of linear sigma units
    #[clap(short = 'l', conflicts_with = "time-series")]
    pub db: bool,
    /// Write binary records back to back until the input runs dry
    #[clap(short = 't')]
    pub time_series: bool,
    /// Only emit bins with frequency in min,max Hz (0,0 emits everything)
    #[clap(short = 'x', value_parser = valid_band, conflicts_with = "time-series")]
    #[clap(allow_hyphen_values = true)]
    pub freq_filter: Option<FreqBand>,
    /// Scale to sigmas using the rms over min,max Hz
    #[clap(short = 's', value_parser = valid_band, conflicts_with = "time-series")]
    #[clap(allow_hyphen_values = true)]
    pub rms_band: Option<FreqBand>,
    /// Channel to process for dual-pol modes (1 or 2)
    #[clap(short = 'c', default_value = "1", value_parser = valid_channel)]
    pub channel: Channel,
    /// Swap I and Q before the transform (inverts the frequency axis)
    #[clap(short = 'i')]
    pub invert: bool,
    /// Output file, standard output by default
    #[clap(short = 'o', default_value = "-")]
    pub outfile: String,
    /// Input file, standard input by default
    #[clap(default_value = "-")]
    pub infile: String,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

impl Args {
    /// Assemble the immutable run configuration. The `0,0` range
    /// sentinel the hardware tooling has always used means "disabled"
    /// and maps to `None` here.
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            mode: self.mode,
            fsamp_mhz: self.fsamp,
            freq_res_hz: self.freqres,
            downsample: self.downsample as usize,
            sum: self.sum as usize,
            channel: self.channel,
            time_series: self.time_series,
            db_output: self.db,
            invert_iq: self.invert,
            freq_filter: enabled(self.freq_filter),
            rms_band: enabled(self.rms_band),
        }
    }
}

fn enabled(band: Option<FreqBand>) -> Option<FreqBand> {
    band.filter(|b| b.min_hz != 0.0 || b.max_hz != 0.0)
}

/// Match verbosity filter with tracing subscriber log levels
pub fn convert_filter(filter: log::LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    match filter {
        log::LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF,
        log::LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        log::LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        log::LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
        log::LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        log::LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    }
}

fn valid_mode(s: &str) -> Result<AcquisitionMode, String> {
    s.parse()
}

fn valid_channel(s: &str) -> Result<Channel, String> {
    match s.trim() {
        "1" => Ok(Channel::One),
        "2" => Ok(Channel::Two),
        other => Err(format!("invalid channel {other}; must be 1 or 2")),
    }
}

fn valid_band(s: &str) -> Result<FreqBand, String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| "require comma between min,max".to_string())?;
    let min_hz = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid min frequency {min}"))?;
    let max_hz = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid max frequency {max}"))?;
    Ok(FreqBand { min_hz, max_hz })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("spectra_slurper").chain(argv.iter().copied()))
    }

    #[test]
    fn minimal_invocation_takes_defaults() {
        let args = parse(&["-m", "1", "-f", "1.0"]).unwrap();
        let cfg = args.to_config();
        assert_eq!(cfg.mode, AcquisitionMode::TwoChanTwoBit);
        assert_eq!(cfg.freq_res_hz, 1.0);
        assert_eq!(cfg.downsample, 1);
        assert_eq!(cfg.sum, 1);
        assert_eq!(cfg.channel, Channel::One);
        assert!(cfg.freq_filter.is_none());
        assert!(cfg.rms_band.is_none());
        assert_eq!(args.infile, "-");
        assert_eq!(args.outfile, "-");
    }

    #[test]
    fn sampling_frequency_and_mode_are_required() {
        assert!(parse(&["-f", "1.0"]).is_err());
        assert!(parse(&["-m", "1"]).is_err());
    }

    #[test]
    fn ranges_require_a_comma() {
        assert!(parse(&["-m", "1", "-f", "1.0", "-x", "100"]).is_err());
        assert!(parse(&["-m", "1", "-f", "1.0", "-s", "a,b"]).is_err());
        let args = parse(&["-m", "1", "-f", "1.0", "-x", "-100,250.5"]).unwrap();
        assert_eq!(
            args.to_config().freq_filter,
            Some(FreqBand {
                min_hz: -100.0,
                max_hz: 250.5
            })
        );
    }

    #[test]
    fn zero_zero_disables_a_range() {
        let args = parse(&["-m", "1", "-f", "1.0", "-x", "0,0", "-s", "0,0"]).unwrap();
        let cfg = args.to_config();
        assert!(cfg.freq_filter.is_none());
        assert!(cfg.rms_band.is_none());
    }

    #[test]
    fn time_series_conflicts_with_table_options() {
        assert!(parse(&["-m", "1", "-f", "1.0", "-t", "-l"]).is_err());
        assert!(parse(&["-m", "1", "-f", "1.0", "-t", "-x", "0,100"]).is_err());
        assert!(parse(&["-m", "1", "-f", "1.0", "-t", "-s", "0,100"]).is_err());
        assert!(parse(&["-m", "1", "-f", "1.0", "-t"]).is_ok());
    }

    #[test]
    fn invalid_channel_and_mode_are_rejected() {
        assert!(parse(&["-m", "1", "-f", "1.0", "-c", "3"]).is_err());
        assert!(parse(&["-m", "4", "-f", "1.0"]).is_err());
    }

    #[test]
    fn factor_floors_are_enforced() {
        assert!(parse(&["-m", "1", "-f", "1.0", "-d", "0"]).is_err());
        assert!(parse(&["-m", "1", "-f", "1.0", "-n", "0"]).is_err());
    }
}
