use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;
use wavebend::audio::StereoBuffers;
use wavebend::config::Pattern;
use wavebend::distort::{distort_or_passthrough, DistortionParams, RngJitter};
use wavebend::engine::TickOutput;
use wavebend::present::compose;
use wavebend::waveform::project_stereo;
use wavebend::video::{VideoClip, VideoSource};

const DEFAULT_SEED: u64 = 0xF10_3E12;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "benchmark",
    version,
    about = "Time synthetic distortion ticks without audio or terminal"
)]
pub(crate) struct Cli {
    #[arg(long, default_value_t = 320)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = 180)]
    pub(crate) height: usize,

    #[arg(long, default_value_t = 240)]
    pub(crate) ticks: usize,

    #[arg(long, default_value_t = 1024)]
    pub(crate) buffer_len: usize,

    /// Benchmark a single pattern instead of all of them.
    #[arg(long, value_enum)]
    pub(crate) pattern: Option<Pattern>,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,

    #[arg(long, default_value_t = false)]
    pub(crate) ci_smoke: bool,

    #[arg(long, default_value_t = 20.0)]
    pub(crate) max_ms: f64,
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.ticks == 0 {
        bail!("--ticks must be >= 1");
    }
    if args.buffer_len == 0 {
        bail!("--buffer-len must be >= 1");
    }
    if args.max_ms.is_nan() || args.max_ms <= 0.0 {
        bail!("--max-ms must be > 0");
    }
    Ok(())
}

/// Two detuned sines with a slow tremolo; the right channel is phase-shifted.
pub(crate) fn synth_stereo(tick: usize, len: usize) -> Option<StereoBuffers> {
    let t0 = tick as f32 / 60.0;
    let amp = 0.35 + 0.3 * (t0 * 1.7).sin().abs();
    let mut left = Vec::with_capacity(len);
    let mut right = Vec::with_capacity(len);
    for i in 0..len {
        let p = i as f32 / len.max(1) as f32;
        left.push(amp * (TAU * (3.0 * p + t0)).sin());
        right.push(amp * (TAU * (5.0 * p + t0) + 0.8).sin());
    }
    StereoBuffers::new(left, right).ok()
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Timings {
    pub(crate) distort: Duration,
    pub(crate) project: Duration,
    pub(crate) present: Duration,
}

pub(crate) fn bench_pattern(args: &Cli, pattern: Pattern) -> Result<Timings> {
    let params = DistortionParams::default();
    let mut jitter = RngJitter::seeded(args.seed);
    let mut clip = VideoClip::new(pattern, 240);
    let display = (args.width as f32, args.height as f32);
    let mut timings = Timings::default();

    for tick in 0..args.ticks {
        let audio = synth_stereo(tick, args.buffer_len);
        let frame = clip.current_frame(args.width, args.height);

        let start = Instant::now();
        let surface = frame.as_ref().map(|f| {
            distort_or_passthrough(f, audio.as_ref().map(StereoBuffers::left), &params, &mut jitter)
        });
        timings.distort += start.elapsed();

        let start = Instant::now();
        let waveform = audio.as_ref().map(|a| project_stereo(a, display.0, display.1));
        timings.project += start.elapsed();

        if surface.is_none() || waveform.is_none() {
            tracing::warn!(tick, "benchmark tick is missing an input");
        }
        let output = TickOutput {
            surface,
            waveform,
            issues: Vec::new(),
        };

        let start = Instant::now();
        let canvas = compose(&output, args.width, args.height, true)?;
        timings.present += start.elapsed();

        let _ = std::hint::black_box(canvas);
    }
    Ok(timings)
}

fn per_tick_ms(d: Duration, ticks: usize) -> f64 {
    d.as_secs_f64() * 1000.0 / ticks.max(1) as f64
}

fn main() -> Result<()> {
    wavebend::telemetry::init_stderr();
    let args = Cli::parse();
    validate_args(&args)?;

    let patterns = match args.pattern {
        Some(p) => vec![p],
        None => vec![Pattern::Bars, Pattern::Plasma, Pattern::Checker],
    };

    println!(
        "benchmark: ticks={} size={}x{} buffer_len={} seed={:#x}",
        args.ticks, args.width, args.height, args.buffer_len, args.seed
    );

    let mut slow = Vec::new();
    for pattern in patterns {
        let t = bench_pattern(&args, pattern)?;
        let distort_ms = per_tick_ms(t.distort, args.ticks);
        let project_ms = per_tick_ms(t.project, args.ticks);
        let present_ms = per_tick_ms(t.present, args.ticks);
        let total = distort_ms + project_ms + present_ms;
        println!(
            "{:<8} distort {:>8.3} ms  project {:>8.3} ms  present {:>8.3} ms  total {:>8.3} ms",
            pattern.label(),
            distort_ms,
            project_ms,
            present_ms,
            total
        );
        if args.ci_smoke && total > args.max_ms {
            slow.push((pattern.label(), total));
        }
    }

    if args.ci_smoke {
        if !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            for (name, ms) in slow {
                eprintln!("  slow pattern: {} ({:.3} ms/tick > {:.3})", name, ms, args.max_ms);
            }
            bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }
    Ok(())
}
