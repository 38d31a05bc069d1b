//! Turn a tick's output into an opaque RGBA frame for the terminal renderers.
//!
//! The distorted surface is blended over black by its own alpha, then both waveform
//! polylines are stroked on top.

use crate::engine::TickOutput;
use crate::surface::{PixelSurface, SurfaceError};
use crate::waveform::{Point, Polyline};

pub const LEFT_WAVE_RGB: [u8; 3] = [240, 244, 255];
pub const RIGHT_WAVE_RGB: [u8; 3] = [255, 120, 200];

/// Opaque `width` x `height` frame: black, then the tick's surface, then the waveform.
pub fn compose(
    output: &TickOutput,
    width: usize,
    height: usize,
    show_waveform: bool,
) -> Result<PixelSurface, SurfaceError> {
    let mut canvas = match &output.surface {
        Some(s) if s.width() == width && s.height() == height => flatten_over_black(s),
        Some(s) => flatten_over_black(&s.resized(width, height)?),
        None => PixelSurface::new(width, height)?,
    };
    if show_waveform {
        if let Some((left, right)) = &output.waveform {
            stroke_polyline(&mut canvas, left, LEFT_WAVE_RGB);
            stroke_polyline(&mut canvas, right, RIGHT_WAVE_RGB);
        }
    }
    Ok(canvas)
}

/// Straight (non-premultiplied) alpha over an opaque black background.
pub fn flatten_over_black(surface: &PixelSurface) -> PixelSurface {
    let mut out = surface.clone();
    for px in out.as_rgba_mut().chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
        px[3] = 255;
    }
    out
}

/// Draw every segment of `line`, skipping whatever falls outside the surface.
pub fn stroke_polyline(surface: &mut PixelSurface, line: &Polyline, rgb: [u8; 3]) {
    if line.len() == 1 {
        let p = line.points[0];
        plot(surface, p.x, p.y, rgb);
        return;
    }
    for (a, b) in line.segments() {
        stroke_segment(surface, a, b, rgb);
    }
}

fn stroke_segment(surface: &mut PixelSurface, a: Point, b: Point, rgb: [u8; 3]) {
    let max_x = surface.width() as f32 - 1.0;
    let max_y = surface.height() as f32 - 1.0;
    let Some((a, b)) = clip_segment(a, b, max_x, max_y) else {
        return;
    };

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        plot(surface, a.x + dx * t, a.y + dy * t, rgb);
    }
}

fn plot(surface: &mut PixelSurface, x: f32, y: f32, rgb: [u8; 3]) {
    if !x.is_finite() || !y.is_finite() {
        return;
    }
    let (x, y) = (x.round(), y.round());
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= surface.width() || y >= surface.height() {
        return;
    }
    surface.set_pixel(x, y, [rgb[0], rgb[1], rgb[2], 255]);
}

/// Liang-Barsky clip against `[0, max_x] x [0, max_y]`.
fn clip_segment(a: Point, b: Point, max_x: f32, max_y: f32) -> Option<(Point, Point)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let checks = [
        (-dx, a.x),
        (dx, max_x - a.x),
        (-dy, a.y),
        (dy, max_y - a.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        Point {
            x: a.x + dx * t0,
            y: a.y + dy * t0,
        },
        Point {
            x: a.x + dx * t1,
            y: a.y + dy * t1,
        },
    ))
}
