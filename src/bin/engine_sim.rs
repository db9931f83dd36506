//! Standalone sensor-engine simulator.
//!
//! Stands in for the real Sentinel-V acquisition engine: five vibration
//! sensors producing random readings smoothed over a 3-sample window,
//! rewritten to the telemetry file at 10 Hz. Lets the monitor be
//! exercised end to end without hardware.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

use sentinel_v::monitor::KNOWN_ASSETS;

/// Samples averaged into the smoothed reading.
const SMOOTHING_WINDOW: usize = 3;

/// The engine's own naive danger thresholds, emitted for reference in the
/// isDanger column. The monitor ignores them; its classifier decides.
const DANGER_FREQ_HZ: f64 = 350.0;
const DANGER_MAG_GS: f64 = 5.0;

#[derive(Parser, Debug)]
#[command(name = "sentinel-sim")]
#[command(about = "Simulated Sentinel-V sensor engine writing telemetry at 10 Hz")]
struct Args {
    /// Telemetry file to rewrite each tick
    #[arg(short, long, default_value = "live_stream.csv")]
    out: PathBuf,

    /// How long to run, in seconds
    #[arg(short, long, default_value = "60")]
    seconds: u64,

    /// Tick in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,
}

/// One simulated vibration sensor with a smoothing window.
struct VibrationSensor {
    name: &'static str,
    freq_window: VecDeque<f64>,
    mag_window: VecDeque<f64>,
}

struct Reading {
    raw_freq: f64,
    smooth_freq: f64,
    raw_mag: f64,
    smooth_mag: f64,
}

impl VibrationSensor {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            freq_window: VecDeque::with_capacity(SMOOTHING_WINDOW),
            mag_window: VecDeque::with_capacity(SMOOTHING_WINDOW),
        }
    }

    /// Take one reading: frequency 10-500 Hz, magnitude 0-10 Gs, smoothed
    /// over the trailing window.
    fn take_reading(&mut self, rng: &mut impl Rng) -> Reading {
        let raw_freq = rng.gen_range(10.0..500.0);
        let raw_mag = rng.gen_range(0.0..10.0);

        push_bounded(&mut self.freq_window, raw_freq);
        push_bounded(&mut self.mag_window, raw_mag);

        Reading {
            raw_freq,
            smooth_freq: average(&self.freq_window),
            raw_mag,
            smooth_mag: average(&self.mag_window),
        }
    }
}

fn push_bounded(window: &mut VecDeque<f64>, value: f64) {
    window.push_back(value);
    if window.len() > SMOOTHING_WINDOW {
        window.pop_front();
    }
}

fn average(window: &VecDeque<f64>) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<f64>() / window.len() as f64
}

fn main() -> Result<()> {
    let args = Args::parse();
    let tick = Duration::from_millis(args.tick_ms);
    let ticks = args.seconds * 1000 / args.tick_ms.max(1);

    let mut sensors: Vec<VibrationSensor> =
        KNOWN_ASSETS.iter().map(|&name| VibrationSensor::new(name)).collect();
    let mut rng = rand::thread_rng();

    println!(
        "--- SENTINEL-V ENGINE SIMULATOR: {} assets -> {} at {} ms ---",
        sensors.len(),
        args.out.display(),
        args.tick_ms
    );

    for iteration in 0..ticks {
        let mut content = String::from(
            "device_name,timestamp,raw_freq,smooth_freq,raw_mag,smooth_mag,isDanger\n",
        );
        for sensor in &mut sensors {
            let reading = sensor.take_reading(&mut rng);
            let is_danger = u8::from(
                reading.smooth_freq >= DANGER_FREQ_HZ || reading.smooth_mag >= DANGER_MAG_GS,
            );
            writeln!(
                content,
                "{},{},{:.4},{:.4},{:.4},{:.4},{}",
                sensor.name,
                iteration,
                reading.raw_freq,
                reading.smooth_freq,
                reading.raw_mag,
                reading.smooth_mag,
                is_danger
            )?;
        }

        // Write-then-rename so a reader polling the file never sees a
        // half-written batch.
        let tmp = args.out.with_extension("tmp");
        fs::write(&tmp, &content)
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &args.out)
            .with_context(|| format!("replacing {}", args.out.display()))?;

        thread::sleep(tick);
    }

    println!("--- SIMULATOR FINISHED ({} ticks) ---", ticks);
    Ok(())
}
