use super::{DistortionParams, Jitter, SILENCE_BIAS};
use crate::audio::SampleBuffer;

/// Displacement and the amplitude that produced it, for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnShift {
    pub displacement: i32,
    pub magnitude: f32,
}

/// One [`ColumnShift`] per surface column, computed once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementField {
    columns: Vec<ColumnShift>,
}

impl DisplacementField {
    /// Every column shifted by `displacement` with the given magnitude.
    pub fn uniform(width: usize, displacement: i32, magnitude: f32) -> Self {
        Self {
            columns: vec![
                ColumnShift {
                    displacement,
                    magnitude,
                };
                width
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnShift] {
        &self.columns
    }

    /// Missing columns read as "no shift, silent".
    pub fn get(&self, col: usize) -> ColumnShift {
        self.columns.get(col).copied().unwrap_or(ColumnShift {
            displacement: 0,
            magnitude: 0.0,
        })
    }
}

/// Column `col` of a `width`-wide surface mapped onto a buffer of `len` samples.
pub fn sample_index(col: usize, width: usize, len: usize) -> usize {
    if width == 0 || len == 0 {
        return 0;
    }
    let percent = col as f64 / width as f64;
    let idx = (percent * len as f64).floor();
    (idx.max(0.0) as usize).min(len - 1)
}

/// `round((magnitude + bias) * jitter * max)`. Negative for sufficiently negative samples.
pub fn displacement_for(magnitude: f32, jitter: f32, max_displacement: f32) -> i32 {
    let d = ((magnitude + SILENCE_BIAS) * jitter * max_displacement).round();
    if d.is_finite() {
        d.clamp(i32::MIN as f32, i32::MAX as f32) as i32
    } else {
        0
    }
}

/// Draws one jitter value per column, left to right.
pub fn map_columns(
    width: usize,
    left: &SampleBuffer,
    params: &DistortionParams,
    jitter: &mut dyn Jitter,
) -> DisplacementField {
    let len = left.len();
    let columns = (0..width)
        .map(|col| {
            let magnitude = left.get_clamped(sample_index(col, width, len));
            let displacement = displacement_for(magnitude, jitter.next(), params.max_displacement);
            ColumnShift {
                displacement,
                magnitude,
            }
        })
        .collect();
    DisplacementField { columns }
}
