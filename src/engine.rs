use crate::audio::StereoBuffers;
use crate::distort::{
    distort_or_passthrough, map_columns, DisplacementField, DistortionParams, Jitter, RngJitter,
};
use crate::surface::PixelSurface;
use crate::waveform::{project_stereo, Polyline};
use std::fmt;

/// Why a tick produced less than a full frame. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickIssue {
    MissingAudioInput,
    MissingVideoFrame,
}

impl fmt::Display for TickIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAudioInput => write!(f, "no live audio input"),
            Self::MissingVideoFrame => write!(f, "no video frame available"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Distorted frame, or the source unchanged when audio is missing.
    pub surface: Option<PixelSurface>,
    /// `(left, right)` overlay lines in display coordinates.
    pub waveform: Option<(Polyline, Polyline)>,
    pub issues: Vec<TickIssue>,
}

impl TickOutput {
    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }
}

pub struct GlitchEngine {
    params: DistortionParams,
    jitter: Box<dyn Jitter>,
}

impl GlitchEngine {
    pub fn new(params: DistortionParams, seed: Option<u64>) -> Self {
        let jitter = match seed {
            Some(seed) => RngJitter::seeded(seed),
            None => RngJitter::new(),
        };
        Self::with_jitter(params, Box::new(jitter))
    }

    pub fn with_jitter(params: DistortionParams, jitter: Box<dyn Jitter>) -> Self {
        Self { params, jitter }
    }

    pub fn params(&self) -> DistortionParams {
        self.params
    }

    pub fn params_mut(&mut self) -> &mut DistortionParams {
        &mut self.params
    }

    pub fn reseed(&mut self, seed: u64) {
        tracing::debug!(seed, "jitter reseeded");
        self.jitter.reseed(seed);
    }

    /// Per-column shifts for a surface of `width` columns.
    pub fn displacement_field(&mut self, width: usize, audio: &StereoBuffers) -> DisplacementField {
        map_columns(width, audio.left(), &self.params, &mut *self.jitter)
    }

    /// One full recompute. `display` is the `(width, height)` the waveform is laid out in.
    pub fn tick(
        &mut self,
        audio: Option<&StereoBuffers>,
        frame: Option<&PixelSurface>,
        display: (f32, f32),
    ) -> TickOutput {
        let mut out = TickOutput::default();

        if let Some(frame) = frame {
            out.surface = Some(distort_or_passthrough(
                frame,
                audio.map(StereoBuffers::left),
                &self.params,
                &mut *self.jitter,
            ));
        }

        match audio {
            Some(audio) => out.waveform = Some(project_stereo(audio, display.0, display.1)),
            None => out.issues.push(TickIssue::MissingAudioInput),
        }
        if frame.is_none() {
            out.issues.push(TickIssue::MissingVideoFrame);
        }
        out
    }
}
