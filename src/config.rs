use crate::distort::{DistortionParams, DEFAULT_ALPHA_SCALE, DEFAULT_MAX_DISPLACEMENT};
use anyhow::bail;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const MAX_DISPLACEMENT_LIMIT: f32 = 1000.0;
pub const ALPHA_SCALE_LIMIT: f32 = 64.0;

#[derive(Parser, Debug, Clone)]
#[command(name = "wavebend", version, about = "Audio-driven column glitch over a looping clip, in the terminal")]
pub struct Config {
    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    #[arg(long)]
    pub device: Option<String>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Peak per-column shift in pixels for a full-scale sample.
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLACEMENT, allow_negative_numbers = true)]
    pub max_displacement: f32,

    /// Loudness to alpha multiplier.
    #[arg(long, default_value_t = DEFAULT_ALPHA_SCALE, allow_negative_numbers = true)]
    pub alpha_scale: f32,

    /// Frames per channel in each capture snapshot.
    #[arg(long, default_value_t = 1024)]
    pub buffer_len: usize,

    #[arg(long, value_enum, default_value_t = Pattern::Plasma)]
    pub pattern: Pattern,

    #[arg(long, default_value_t = 240)]
    pub loop_frames: u32,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub waveform: bool,

    /// Fixed jitter seed; entropy-seeded when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    #[value(alias = "smpte")]
    Bars,
    Plasma,
    Checker,
}

impl Pattern {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Plasma => "plasma",
            Self::Checker => "checker",
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fps == 0 {
            bail!("--fps must be >= 1");
        }
        if self.buffer_len == 0 {
            bail!("--buffer-len must be >= 1");
        }
        if self.loop_frames == 0 {
            bail!("--loop-frames must be >= 1");
        }
        if !self.max_displacement.is_finite() || self.max_displacement < 0.0 {
            bail!("--max-displacement must be a finite value >= 0");
        }
        if !self.alpha_scale.is_finite() || self.alpha_scale < 0.0 {
            bail!("--alpha-scale must be a finite value >= 0");
        }
        Ok(())
    }

    pub fn distortion_params(&self) -> DistortionParams {
        DistortionParams {
            max_displacement: self.max_displacement.min(MAX_DISPLACEMENT_LIMIT),
            alpha_scale: self.alpha_scale.min(ALPHA_SCALE_LIMIT),
        }
    }
}

/// Live adjustments bound to the arrow keys.
pub fn nudge_max_displacement(params: &mut DistortionParams, delta: f32) {
    params.max_displacement = (params.max_displacement + delta).clamp(0.0, MAX_DISPLACEMENT_LIMIT);
}

pub fn nudge_alpha_scale(params: &mut DistortionParams, delta: f32) {
    params.alpha_scale = (params.alpha_scale + delta).clamp(0.0, ALPHA_SCALE_LIMIT);
}
