use crate::render::{frame_begin, frame_end, Frame, Renderer};
use std::io::Write;

/// Two pixel rows per cell: upper half as foreground, lower half as background.
pub struct HalfBlockRenderer {
    last_fg: Option<[u8; 3]>,
    last_bg: Option<[u8; 3]>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame_begin(frame, 1, 2, out)? {
            return Ok(());
        }
        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: char = '\u{2580}';
        let surface = frame.surface;

        for row in 0..frame.visual_rows as usize {
            for x in 0..frame.term_cols as usize {
                let [tr, tg, tb, _] = surface.pixel(x, row * 2);
                let [br, bg, bb, _] = surface.pixel(x, row * 2 + 1);
                let fg = [tr, tg, tb];
                let bg_rgb = [br, bg, bb];

                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", tr, tg, tb)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg_rgb) {
                    write!(out, "\x1b[48;2;{};{};{}m", br, bg, bb)?;
                    self.last_bg = Some(bg_rgb);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        frame_end(frame, out)
    }
}
