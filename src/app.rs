use crate::audio::{AudioCapture, AudioSource, NoAudio};
use crate::config::{nudge_alpha_scale, nudge_max_displacement, Config, RendererMode};
use crate::engine::{GlitchEngine, TickIssue};
use crate::present::compose;
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::terminal::{Grid, TerminalGuard};
use crate::video::{VideoClip, VideoSource};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

const HELP_TEXT: &str = "wavebend\n\
Up/Down     max displacement +/-10\n\
Right/Left  alpha scale +/-0.5\n\
w           toggle waveform\n\
space       pause clip\n\
r           reseed jitter\n\
i           toggle HUD\n\
?/h         toggle this help\n\
q/Esc       quit";

/// Mutable view state driven by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub show_waveform: bool,
    pub show_hud: bool,
    pub show_help: bool,
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    cfg.validate()?;
    if let Some(path) = cfg.log_file.as_deref() {
        crate::telemetry::init_file(path)?;
    }

    let mut capture = open_audio(cfg.device.as_deref(), cfg.buffer_len);
    let mut clip = VideoClip::new(cfg.pattern, cfg.loop_frames);
    let mut engine = GlitchEngine::new(cfg.distortion_params(), cfg.seed);

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    };

    tracing::info!(
        renderer = renderer.name(),
        pattern = cfg.pattern.label(),
        fps = cfg.fps,
        max_displacement = engine.params().max_displacement,
        alpha_scale = engine.params().alpha_scale,
        "starting"
    );

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut view = ViewState {
        show_waveform: cfg.waveform,
        show_hud: true,
        show_help: false,
    };
    let mut size = crossterm::terminal::size().context("get terminal size")?;
    let frame_budget = Duration::from_secs_f64(1.0 / cfg.fps as f64);
    let mut last_issues: Vec<TickIssue> = Vec::new();
    let mut tick_ms = 0.0f32;

    loop {
        let tick_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(k.code, k.modifiers, &mut engine, &mut clip, &mut view) {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => {
                    size = (c, r);
                    tracing::debug!(cols = c, rows = r, "terminal resized");
                }
                _ => {}
            }
        }

        let hud_rows = if view.show_hud { 1 } else { 0 };
        let Some(grid) = Grid::new(size, hud_rows, renderer.cell_pixels()) else {
            std::thread::sleep(frame_budget);
            continue;
        };

        let audio = capture.latest_buffers();
        let video = clip.current_frame(grid.pixel_width, grid.pixel_height);
        let output = engine.tick(
            audio.as_ref(),
            video.as_ref(),
            (grid.pixel_width as f32, grid.pixel_height as f32),
        );

        if output.issues != last_issues {
            for issue in output.issues.iter().filter(|i| !last_issues.contains(i)) {
                tracing::warn!("degraded tick: {issue}");
            }
            if output.issues.is_empty() {
                tracing::info!("inputs available, full frames resumed");
            }
            last_issues = output.issues.clone();
        }

        let canvas = compose(&output, grid.pixel_width, grid.pixel_height, view.show_waveform)
            .context("compose frame")?;

        let hud = hud_line(&engine, &clip, &view, &output.issues, tick_ms);
        let frame = Frame {
            term_cols: grid.cols,
            term_rows: grid.rows,
            visual_rows: grid.visual_rows,
            surface: &canvas,
            hud: &hud,
            hud_rows: grid.hud_rows,
            overlay: view.show_help.then_some(HELP_TEXT),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out).context("render frame")?;

        let elapsed = tick_start.elapsed();
        tick_ms = elapsed.as_secs_f32() * 1000.0;
        if let Some(rest) = frame_budget.checked_sub(elapsed) {
            std::thread::sleep(rest);
        }
    }
}

/// Live capture when a device opens, otherwise a silent source so the clip still plays.
pub fn open_audio(device: Option<&str>, buffer_len: usize) -> Box<dyn AudioSource> {
    match AudioCapture::new(device, buffer_len) {
        Ok(capture) => Box::new(capture),
        Err(err) => {
            tracing::warn!(?device, "audio unavailable, playing undistorted: {err:#}");
            Box::new(NoAudio)
        }
    }
}

/// Returns true when the app should exit.
pub fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    engine: &mut GlitchEngine,
    clip: &mut VideoClip,
    view: &mut ViewState,
) -> bool {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return true;
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Up => nudge_max_displacement(engine.params_mut(), 10.0),
        KeyCode::Down => nudge_max_displacement(engine.params_mut(), -10.0),
        KeyCode::Right => nudge_alpha_scale(engine.params_mut(), 0.5),
        KeyCode::Left => nudge_alpha_scale(engine.params_mut(), -0.5),
        KeyCode::Char('w') | KeyCode::Char('W') => view.show_waveform = !view.show_waveform,
        KeyCode::Char(' ') => clip.toggle_pause(),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            engine.reseed(fastrand::u64(..));
        }
        KeyCode::Char('i') | KeyCode::Char('I') => view.show_hud = !view.show_hud,
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
            view.show_help = !view.show_help;
        }
        _ => {}
    }
    false
}

fn hud_line(
    engine: &GlitchEngine,
    clip: &VideoClip,
    view: &ViewState,
    issues: &[TickIssue],
    tick_ms: f32,
) -> String {
    let p = engine.params();
    let status = match issues.first() {
        Some(issue) => issue.to_string(),
        None => "live".to_string(),
    };
    format!(
        "{} | disp {:.0}px | alpha x{:.1} | {} {}/{}{} | wave {} | {:.1} ms | ? help",
        status,
        p.max_displacement,
        p.alpha_scale,
        clip.pattern().label(),
        clip.position(),
        clip.loop_frames(),
        if clip.is_paused() { " (paused)" } else { "" },
        if view.show_waveform { "on" } else { "off" },
        tick_ms,
    )
}
