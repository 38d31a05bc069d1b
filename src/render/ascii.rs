use crate::render::{frame_begin, frame_end, luma_u8, Frame, Renderer};
use std::io::Write;

pub struct AsciiRenderer {
    last_fg: Option<[u8; 3]>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { last_fg: None }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 1)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame_begin(frame, 1, 1, out)? {
            return Ok(());
        }
        self.last_fg = None;

        // Dark -> bright ramp.
        const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";

        for y in 0..frame.visual_rows as usize {
            for x in 0..frame.term_cols as usize {
                let [r, g, b, _] = frame.surface.pixel(x, y);
                let l = luma_u8(r, g, b) as usize;
                let ch = RAMP[l * (RAMP.len() - 1) / 255];

                let fg = [r, g, b];
                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", r, g, b)?;
                    self.last_fg = Some(fg);
                }
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, out)
    }
}
