use super::{map_columns, DisplacementField, DistortionParams, Jitter};
use crate::audio::SampleBuffer;
use crate::surface::PixelSurface;

/// `clamp(magnitude * scale * 255, 0, 255)`. Loud input saturates quickly.
pub fn alpha_for(magnitude: f32, alpha_scale: f32) -> u8 {
    let a = magnitude * alpha_scale * 255.0;
    if a.is_nan() {
        return 0;
    }
    a.clamp(0.0, 255.0) as u8
}

/// Fresh surface where each pixel is read from `(col, row + displacement(col))`.
///
/// Only the row is clamped; the column never moves. Alpha comes from the column's
/// magnitude, not from the sampled pixel. Columns past the field's width are copied
/// through unshifted with zero alpha.
pub fn composite(
    source: &PixelSurface,
    field: &DisplacementField,
    params: &DistortionParams,
) -> PixelSurface {
    let w = source.width();
    let h = source.height();
    let src = source.as_rgba();
    let mut out = source.clone();

    let shifts = (0..w)
        .map(|col| {
            let shift = field.get(col);
            (shift.displacement, alpha_for(shift.magnitude, params.alpha_scale))
        })
        .collect::<Vec<_>>();

    let dst = out.as_rgba_mut();
    for row in 0..h {
        let dst_row = &mut dst[row * w * 4..(row + 1) * w * 4];
        for (col, &(dy, alpha)) in shifts.iter().enumerate() {
            let sy = source.clamp_row(row as i64 + dy as i64);
            let si = (sy * w + col) * 4;
            let di = col * 4;
            dst_row[di..di + 3].copy_from_slice(&src[si..si + 3]);
            dst_row[di + 3] = alpha;
        }
    }

    out
}

/// Distort when a left channel is present, otherwise hand back an untouched copy.
pub fn distort_or_passthrough(
    source: &PixelSurface,
    left: Option<&SampleBuffer>,
    params: &DistortionParams,
    jitter: &mut dyn Jitter,
) -> PixelSurface {
    match left {
        Some(left) if !left.is_empty() => {
            let field = map_columns(source.width(), left, params, jitter);
            composite(source, &field, params)
        }
        _ => source.clone(),
    }
}
