use crate::config::Pattern;
use crate::surface::PixelSurface;
use std::f32::consts::TAU;

/// Native resolution clips are generated at before being resized for display.
pub const CLIP_WIDTH: usize = 160;
pub const CLIP_HEIGHT: usize = 90;

/// Anything that can hand over the current frame at the requested display size.
pub trait VideoSource {
    fn current_frame(&mut self, width: usize, height: usize) -> Option<PixelSurface>;
}

/// Procedurally generated looping clip.
pub struct VideoClip {
    pattern: Pattern,
    loop_frames: u32,
    cursor: u32,
    paused: bool,
}

impl VideoClip {
    pub fn new(pattern: Pattern, loop_frames: u32) -> Self {
        Self {
            pattern,
            loop_frames: loop_frames.max(1),
            cursor: 0,
            paused: false,
        }
    }

    pub fn position(&self) -> u32 {
        self.cursor
    }

    pub fn loop_frames(&self) -> u32 {
        self.loop_frames
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Advance one frame; past the last frame the clip seeks back to the start.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }
        self.cursor += 1;
        if self.cursor >= self.loop_frames {
            self.cursor = 0;
        }
    }

    /// The frame under the cursor at native resolution.
    pub fn native_frame(&self) -> Option<PixelSurface> {
        let phase = self.cursor as f32 / self.loop_frames as f32;
        let mut rgba = vec![0u8; CLIP_WIDTH * CLIP_HEIGHT * 4];
        for y in 0..CLIP_HEIGHT {
            for x in 0..CLIP_WIDTH {
                let u = x as f32 / CLIP_WIDTH as f32;
                let v = y as f32 / CLIP_HEIGHT as f32;
                let rgb = match self.pattern {
                    Pattern::Bars => bars(u, v, phase),
                    Pattern::Plasma => plasma(u, v, phase),
                    Pattern::Checker => checker(u, v, phase),
                };
                let i = (y * CLIP_WIDTH + x) * 4;
                rgba[i..i + 3].copy_from_slice(&rgb);
                rgba[i + 3] = 255;
            }
        }
        PixelSurface::from_rgba(CLIP_WIDTH, CLIP_HEIGHT, rgba).ok()
    }
}

impl VideoSource for VideoClip {
    fn current_frame(&mut self, width: usize, height: usize) -> Option<PixelSurface> {
        let frame = self
            .native_frame()
            .and_then(|f| f.resized(width, height).ok());
        self.step();
        frame
    }
}

const BAR_COLORS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

fn bars(u: f32, v: f32, phase: f32) -> [u8; 3] {
    if v > 0.75 {
        // Scrolling luma ramp under the bars so the loop is visible.
        let l = ((u + phase).fract() * 255.0) as u8;
        return [l, l, l];
    }
    let idx = ((u * BAR_COLORS.len() as f32) as usize).min(BAR_COLORS.len() - 1);
    BAR_COLORS[idx]
}

fn plasma(u: f32, v: f32, phase: f32) -> [u8; 3] {
    let t = phase * TAU;
    let a = (u * 10.0 + t).sin();
    let b = (v * 8.0 - t).sin();
    let c = ((u + v) * 6.0 + t * 2.0).sin();
    let d = (((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt() * 14.0 - t).sin();
    let f = (a + b + c + d) * 0.25;
    let r = 0.5 + 0.5 * (f * 3.0).sin();
    let g = 0.5 + 0.5 * (f * 3.0 + TAU / 3.0).sin();
    let bl = 0.5 + 0.5 * (f * 3.0 + 2.0 * TAU / 3.0).sin();
    [(r * 255.0) as u8, (g * 255.0) as u8, (bl * 255.0) as u8]
}

fn checker(u: f32, v: f32, phase: f32) -> [u8; 3] {
    let cells = 8.0;
    let cx = ((u + phase) * cells).floor() as i32;
    let cy = (v * cells * 0.5625).floor() as i32;
    if (cx + cy).rem_euclid(2) == 0 {
        [236, 236, 236]
    } else {
        [24, 28, 40]
    }
}
