mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use crate::surface::PixelSurface;
use std::io::Write;

/// Everything a renderer needs to paint one tick. `surface` is already opaque.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub surface: &'a PixelSurface,
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Pixels per terminal cell as `(columns, rows)`.
    fn cell_pixels(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Rec. 601 luma.
pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Start a frame: sync-update bracket, home cursor, autowrap off.
///
/// Returns `false` when the surface does not match the grid, in which case nothing is painted.
pub(crate) fn frame_begin(
    frame: &Frame<'_>,
    cell_w: usize,
    cell_h: usize,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    let cols = frame.term_cols as usize;
    let rows = frame.visual_rows as usize;
    if cols == 0 || rows == 0 {
        return Ok(false);
    }
    if frame.surface.width() != cols * cell_w || frame.surface.height() != rows * cell_h {
        // Resize raced the tick; the next tick will match.
        return Ok(false);
    }

    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    out.write_all(b"\x1b[H\x1b[0m")?;
    // Full-width rows would otherwise wrap on the last column in some terminals.
    out.write_all(b"\x1b[?7l")?;
    Ok(true)
}

/// HUD, optional popup, then undo what `frame_begin` enabled.
pub(crate) fn frame_end(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let visual_rows = frame.visual_rows as usize;

    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
        if let Some(line) = hud_lines.next() {
            let clipped = line.chars().take(cols).collect::<String>();
            write!(out, "{clipped}")?;
        }
    }

    if let Some(text) = frame.overlay {
        draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }

    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(6).max(1);
    let lines = text
        .lines()
        .map(|l| l.chars().take(max_inner_w).collect::<String>())
        .collect::<Vec<_>>();

    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, max_inner_w);
    let box_w = inner_w + 4;
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_h = body_h + 2;

    let start_col = (cols.saturating_sub(box_w)) / 2 + 1;
    let start_row = (rows.saturating_sub(box_h)) / 2 + 1;
    let horiz = "-".repeat(box_w - 2);
    let blank = " ".repeat(inner_w);

    out.write_all(b"\x1b[0m\x1b[38;2;236;242;255m\x1b[48;2;10;14;24m")?;
    write!(out, "\x1b[{};{}H+{}+", start_row, start_col, horiz)?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = start_row + 1 + i;
        write!(out, "\x1b[{};{}H| {} |", row, start_col, blank)?;
        write!(out, "\x1b[{};{}H{}", row, start_col + 2, line)?;
    }
    write!(out, "\x1b[{};{}H+{}+", start_row + box_h - 1, start_col, horiz)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
