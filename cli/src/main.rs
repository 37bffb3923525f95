//! `ukftrack` CLI: run a recorded sensor log through the CTRV UKF and
//! report estimation accuracy.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dataset::parser::load_log;
use dataset::replay::{load_estimates, save_estimates, EstimateLog, EstimateRecord};
use std::path::PathBuf;
use ukf_core::{EstimationMetrics, UkfConfig, UnscentedKalmanFilter};

#[derive(Parser)]
#[command(name = "ukftrack", about = "CTRV UKF sensor-fusion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sensor log through the filter and output RMSE.
    Run {
        /// Path to the whitespace-separated sensor log
        input: PathBuf,
        /// Output metrics to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also save the full per-sample estimate log
        #[arg(long)]
        save_estimates: Option<PathBuf>,
        /// Ignore laser measurements
        #[arg(long)]
        no_laser: bool,
        /// Ignore radar measurements
        #[arg(long)]
        no_radar: bool,
        /// Longitudinal acceleration noise std (m/s²)
        #[arg(long, default_value_t = 2.0)]
        std_a: f64,
        /// Yaw acceleration noise std (rad/s²)
        #[arg(long, default_value_t = 0.7)]
        std_yawdd: f64,
    },
    /// Summarize a previously saved estimate log.
    Show {
        /// Path to an estimate log JSON file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            save_estimates: estimates_path,
            no_laser,
            no_radar,
            std_a,
            std_yawdd,
        } => {
            let config = filter_config(no_laser, no_radar, std_a, std_yawdd);
            run_log(&input, config, output.as_deref(), estimates_path.as_deref())?;
        }
        Commands::Show { input } => {
            show_estimates(&input)?;
        }
    }

    Ok(())
}

/// Map the `run` flags onto a filter configuration.
fn filter_config(no_laser: bool, no_radar: bool, std_a: f64, std_yawdd: f64) -> UkfConfig {
    UkfConfig {
        use_laser: !no_laser,
        use_radar: !no_radar,
        std_a,
        std_yawdd,
        ..Default::default()
    }
}

fn run_log(
    input: &std::path::Path,
    config: UkfConfig,
    output_path: Option<&std::path::Path>,
    estimates_path: Option<&std::path::Path>,
) -> Result<()> {
    let records = load_log(input)?;
    println!(
        "Running {} ({} measurements, laser={}, radar={})...",
        input.display(),
        records.len(),
        config.use_laser,
        config.use_radar,
    );

    let mut filter = UnscentedKalmanFilter::new(config);
    let mut metrics = EstimationMetrics::default();
    let mut estimates: Vec<EstimateRecord> = Vec::with_capacity(records.len());

    let start = std::time::Instant::now();
    for record in &records {
        let kind = record.measurement.kind();
        if !filter.accepts(kind) {
            continue;
        }
        filter.process_measurement(&record.measurement)?;
        if !filter.is_initialized() {
            continue;
        }

        metrics.accumulate(filter.state(), &record.ground_truth);
        let s = filter.state();
        estimates.push(EstimateRecord {
            timestamp_us: record.measurement.timestamp_us,
            sensor: kind,
            state: [s[0], s[1], s[2], s[3], s[4]],
            nis: filter.nis(kind),
            ground_truth: record.ground_truth,
        });
    }
    let elapsed = start.elapsed();

    let rmse = metrics.rmse();
    println!(
        "Done: {} samples fused in {:.1} ms",
        metrics.n_samples,
        elapsed.as_secs_f64() * 1e3,
    );
    println!(
        "RMSE [px, py, vx, vy] = [{:.4}, {:.4}, {:.4}, {:.4}]",
        rmse[0], rmse[1], rmse[2], rmse[3],
    );
    let s = filter.state();
    println!(
        "Final state: px={:.3} py={:.3} v={:.3} yaw={:.3} yaw_rate={:.3}",
        s[0], s[1], s[2], s[3], s[4],
    );

    if let Some(path) = estimates_path {
        let log = EstimateLog {
            dataset: input.display().to_string(),
            records: estimates,
            rmse,
        };
        save_estimates(&log, path)?;
        println!("Estimates saved to {}", path.display());
    }

    if let Some(path) = output_path {
        let json = serde_json::json!({
            "dataset": input.display().to_string(),
            "samples": metrics.n_samples,
            "elapsed_s": elapsed.as_secs_f64(),
            "rmse": rmse,
            "rmse_position": metrics.rmse_position(),
            "rmse_velocity": metrics.rmse_velocity(),
        });
        std::fs::write(path, serde_json::to_string_pretty(&json)?)?;
        println!("Metrics saved to {}", path.display());
    }

    Ok(())
}

fn show_estimates(input: &std::path::Path) -> Result<()> {
    let log = load_estimates(input)?;
    println!(
        "{}: {} estimates, RMSE [px, py, vx, vy] = [{:.4}, {:.4}, {:.4}, {:.4}]",
        log.dataset,
        log.records.len(),
        log.rmse[0],
        log.rmse[1],
        log.rmse[2],
        log.rmse[3],
    );

    if let (Some(first), Some(last)) = (log.records.first(), log.records.last()) {
        let span = (last.timestamp_us - first.timestamp_us) as f64 / 1e6;
        println!(
            "Span {:.1} s, final estimate px={:.3} py={:.3} v={:.3}",
            span, last.state[0], last.state[1], last.state[2],
        );
    }

    Ok(())
}
