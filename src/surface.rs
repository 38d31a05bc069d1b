use std::fmt;

/// RGBA8 pixel grid, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    ZeroSized { width: usize, height: usize },
    BadLength { expected: usize, got: usize },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSized { width, height } => {
                write!(f, "surface must be at least 1x1 (got {width}x{height})")
            }
            Self::BadLength { expected, got } => {
                write!(f, "rgba length mismatch (expected {expected} bytes, got {got})")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

impl PixelSurface {
    /// Opaque black surface.
    pub fn new(width: usize, height: usize) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }
        let mut rgba = vec![0u8; width * height * 4];
        for px in rgba.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn from_rgba(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(SurfaceError::BadLength {
                expected,
                got: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Raw bytes for in-place rewrites that keep the dimensions.
    pub(crate) fn as_rgba_mut(&mut self) -> &mut [u8] {
        &mut self.rgba
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, px: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.rgba[i..i + 4].copy_from_slice(&px);
    }

    /// Clamp a signed row coordinate into `[0, height)`.
    pub fn clamp_row(&self, y: i64) -> usize {
        y.clamp(0, self.height as i64 - 1) as usize
    }

    /// Nearest-neighbour resample into a fresh surface.
    pub fn resized(&self, width: usize, height: usize) -> Result<Self, SurfaceError> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let mut out = Self::new(width, height)?;
        for y in 0..height {
            let sy = (y * self.height / height).min(self.height - 1);
            for x in 0..width {
                let sx = (x * self.width / width).min(self.width - 1);
                out.set_pixel(x, y, self.pixel(sx, sy));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sized_and_short_buffers() {
        assert!(matches!(
            PixelSurface::new(0, 4),
            Err(SurfaceError::ZeroSized { .. })
        ));
        let err = PixelSurface::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            SurfaceError::BadLength {
                expected: 16,
                got: 15
            }
        );
    }

    #[test]
    fn row_clamp_never_leaves_surface() {
        let s = PixelSurface::new(3, 5).unwrap();
        assert_eq!(s.clamp_row(-10_000), 0);
        assert_eq!(s.clamp_row(10_000), 4);
        assert_eq!(s.clamp_row(2), 2);
    }

    #[test]
    fn resize_picks_nearest_source_pixel() {
        let mut s = PixelSurface::new(2, 1).unwrap();
        s.set_pixel(0, 0, [10, 0, 0, 255]);
        s.set_pixel(1, 0, [20, 0, 0, 255]);
        let r = s.resized(4, 2).unwrap();
        assert_eq!(r.pixel(0, 0)[0], 10);
        assert_eq!(r.pixel(1, 1)[0], 10);
        assert_eq!(r.pixel(2, 0)[0], 20);
        assert_eq!(r.pixel(3, 1)[0], 20);
    }
}
