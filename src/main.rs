use anyhow::Context;
use clap::{CommandFactory, Parser};
use spectra_slurper::args::{convert_filter, Args};
use spectra_slurper::pipeline::{self, PipelineError};
use spectra_slurper::plan::TransformPlan;
use spectra_slurper::{capture, exfil};

fn main() -> anyhow::Result<()> {
    // The tool contract is exit code 1 for any bad invocation, so parse
    // errors cannot go through clap's own exit path.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .init();

    let cfg = args.to_config();
    let plan = match TransformPlan::derive(&cfg) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", Args::command().render_usage());
            std::process::exit(1);
        }
    };

    // Diagnostic header on stderr before any data moves, so a run is
    // auditable even when the spectrum goes to stdout.
    eprintln!();
    eprintln!("FFT length                     : {}", plan.fft_len);
    eprintln!("Frequency resolution           : {:e} Hz", cfg.freq_res_hz);
    eprintln!(
        "Processed bandwidth            : {:e} Hz",
        plan.processed_bandwidth_hz(&cfg)
    );
    eprintln!();
    eprintln!("Data required for one transform: {} bytes", plan.raw_buf_len);
    eprintln!("Number of transforms to add    : {}", cfg.sum);
    eprintln!(
        "Data required for one sum      : {} bytes",
        cfg.sum * plan.raw_buf_len
    );
    eprintln!(
        "Integration time for one sum   : {:e} s",
        plan.integration_time_s(&cfg)
    );
    eprintln!();

    let mut input = capture::open_input(&args.infile)
        .with_context(|| format!("opening input {}", args.infile))?;
    let mut output = exfil::open_output(&args.outfile)
        .with_context(|| format!("opening output {}", args.outfile))?;

    match pipeline::run(&cfg, &plan, input.as_mut(), output.as_mut()) {
        Ok(_) => Ok(()),
        Err(e) => {
            if let PipelineError::ReadUnderrun { records } = e {
                if cfg.time_series {
                    eprintln!("Wrote {records} transforms");
                }
            }
            Err(e.into())
        }
    }
}
