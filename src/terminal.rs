use anyhow::Context;
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Stdout, Write};

/// Raw mode + alternate screen for as long as it lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Guard exists from here on so Drop restores the terminal if setup fails below.
        let guard = Self { _private: () };

        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;

        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}

/// Terminal cells split into a picture area and HUD rows, with the matching pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub cols: u16,
    pub rows: u16,
    pub visual_rows: u16,
    pub hud_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
}

impl Grid {
    pub fn new(size: (u16, u16), hud_rows: u16, cell_pixels: (usize, usize)) -> Option<Self> {
        let (cols, rows) = size;
        let hud_rows = hud_rows.min(rows.saturating_sub(1));
        let visual_rows = rows.saturating_sub(hud_rows);
        if cols == 0 || visual_rows == 0 {
            return None;
        }
        Some(Self {
            cols,
            rows,
            visual_rows,
            hud_rows,
            pixel_width: cols as usize * cell_pixels.0,
            pixel_height: visual_rows as usize * cell_pixels.1,
        })
    }
}
