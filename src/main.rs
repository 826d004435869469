use anyhow::{Context, Result};
use daylight_controller::{config, simulation, telemetry};
use config::{Config, OutputFormat};
use simulation::{CsvSink, JsonSink, ResultSink, Simulation};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

fn open_sink(cfg: &Config) -> Result<Box<dyn ResultSink + Send>> {
    let sink: Box<dyn ResultSink + Send> = match (&cfg.run.output_path, cfg.run.output_format) {
        (Some(path), OutputFormat::Csv) => Box::new(CsvSink::create(path)?),
        (Some(path), OutputFormat::Json) => Box::new(JsonSink::create(path, true)?),
        (None, OutputFormat::Csv) => Box::new(CsvSink::stdout()),
        (None, OutputFormat::Json) => Box::new(JsonSink::stdout(true)),
    };
    Ok(sink)
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = Config::load(config_path.as_deref()).context("loading configuration")?;
    let setup = cfg.build().context("invalid configuration")?;

    let mut sink = open_sink(&cfg)?;
    info!(
        format = %cfg.run.output_format,
        path = ?cfg.run.output_path,
        "starting daylight simulation"
    );

    let sim = Simulation::new(setup.params, setup.layout)?;
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let mut worker = tokio::task::spawn_blocking(move || {
        sim.run_until_cancelled(&mut *sink, &worker_cancel)
    });

    let report = tokio::select! {
        res = &mut worker => res??,
        _ = telemetry::shutdown_signal() => {
            cancel.cancel();
            worker.await??
        }
    };

    if report.cancelled {
        warn!(steps = report.stats.steps, "run cancelled, partial results written");
    }
    if let Some(err) = report.series.mean_tracking_error_lux() {
        info!(
            mean_tracking_error_lux = err,
            full_samples = report.stats.full_samples,
            partial_samples = report.stats.partial_samples,
            "run complete"
        );
    }

    Ok(())
}
