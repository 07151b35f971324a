//! # bbp-pi: Concurrent BBP-series Approximation of Pi
//!
//! ## Usage
//! ```bash
//! # 1000 terms at the default 64 bits
//! bbp-pi 1000
//!
//! # 256 bits, 8 workers, with span timings
//! bbp-pi -p 256 --nthreads 8 --profile 1000
//! ```

use std::io::{self, Write};
use std::time::Instant;

use bbp_pi::config::Config;
use bbp_pi::io::write_report;
use bbp_pi::pipelines::BbpPipeline;
use bbp_pi::utils::telemetry::{HeartbeatConfig, HeartbeatHandle, TelemetryBlackboard};
use bbp_pi::Result;

fn main() {
    if let Err(e) = run() {
        if e.is_usage() {
            eprintln!("{}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber for hierarchical profiling output
fn init_profiling() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime()),
        )
        .init();
}

fn run() -> Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate()?;

    if config.profile {
        init_profiling();
    }

    let settings = config.settings()?;
    tracing::info!(
        rounds = config.rounds(),
        precision = settings.precision.bits(),
        workers = settings.workers.get(),
        powers = ?settings.powers,
        order = ?settings.order,
        "starting computation"
    );

    let mut pipeline = BbpPipeline::new(settings);
    let heartbeat = if config.progress {
        let telemetry = TelemetryBlackboard::new();
        pipeline = pipeline.with_telemetry(telemetry.clone());
        Some(HeartbeatHandle::spawn(telemetry, HeartbeatConfig::default())?)
    } else {
        None
    };

    let result = pipeline.run(config.rounds());
    if let Some(heartbeat) = heartbeat {
        heartbeat.shutdown();
    }
    let approx = result?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &approx, config.digits())?;
    out.flush()?;

    tracing::info!(elapsed_secs = start.elapsed().as_secs_f64(), "completed");
    Ok(())
}
