use crate::audio::{SampleBuffer, StereoBuffers};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Spread `N` samples across `display_w` and map each to `(s - 1) * -(display_h / 2)`.
///
/// A sample of 1.0 lands at y = 0 and 0.0 lands at half height. Nothing is clamped,
/// so loud transients can leave the visible area.
pub fn project(samples: &SampleBuffer, display_w: f32, display_h: f32) -> Polyline {
    let n = samples.len();
    if n == 0 {
        return Polyline::default();
    }
    let scale = display_w / n as f32;
    let half_h = display_h / 2.0;
    let points = samples
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &s)| Point {
            x: i as f32 * scale,
            y: (s - 1.0) * -half_h,
        })
        .collect();
    Polyline { points }
}

pub fn project_stereo(
    buffers: &StereoBuffers,
    display_w: f32,
    display_h: f32,
) -> (Polyline, Polyline) {
    (
        project(buffers.left(), display_w, display_h),
        project(buffers.right(), display_w, display_h),
    )
}
