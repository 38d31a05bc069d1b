use wavebend::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use wavebend::surface::PixelSurface;

/// Build a solid-color surface.
fn solid(w: usize, h: usize, r: u8, g: u8, b: u8) -> PixelSurface {
    let mut s = PixelSurface::new(w, h).expect("valid size");
    for y in 0..h {
        for x in 0..w {
            s.set_pixel(x, y, [r, g, b, 255]);
        }
    }
    s
}

fn make_frame<'a>(cols: u16, visual_rows: u16, surface: &'a PixelSurface, sync: bool) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 1,
        visual_rows,
        surface,
        hud: "live | disp 100px",
        hud_rows: 1,
        overlay: None,
        sync_updates: sync,
    }
}

#[test]
fn halfblock_renders_top_and_bottom_colors() {
    let mut s = solid(4, 4, 10, 20, 30);
    for x in 0..4 {
        s.set_pixel(x, 1, [200, 100, 50, 255]);
    }
    let frame = make_frame(4, 2, &s, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("38;2;10;20;30"), "missing FG");
    assert!(text.contains("48;2;200;100;50"), "missing BG");
    assert!(text.contains('\u{2580}'));
    assert!(text.contains("live | disp"), "HUD text missing");
    assert!(text.contains("\x1b[?7l") && text.contains("\x1b[?7h"));
}

#[test]
fn halfblock_skips_mismatched_surface() {
    let s = solid(4, 3, 1, 2, 3);
    let frame = make_frame(4, 2, &s, true);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn sync_updates_wrap_the_frame() {
    let s = solid(3, 2, 0, 0, 0);
    let frame = make_frame(3, 2, &s, true);
    let mut out = Vec::new();
    AsciiRenderer::new().render(&frame, &mut out).unwrap();
    let text = String::from_utf8_lossy(&out);
    assert!(text.starts_with("\x1b[?2026h"));
    assert!(text.ends_with("\x1b[?2026l"));
}

#[test]
fn ascii_maps_luma_to_ramp() {
    let s = solid(2, 1, 255, 255, 255);
    let frame = make_frame(2, 1, &s, false);
    let mut out = Vec::new();
    AsciiRenderer::new().render(&frame, &mut out).unwrap();
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("@@"));
}

#[test]
fn overlay_popup_is_drawn() {
    let s = solid(20, 6, 0, 0, 0);
    let mut frame = make_frame(20, 6, &s, false);
    frame.term_rows = 7;
    frame.overlay = Some("help\nq quit");
    let mut out = Vec::new();
    AsciiRenderer::new().render(&frame, &mut out).unwrap();
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("q quit"));
    assert!(text.contains("+----"));
}

#[test]
fn renderer_names_and_cells() {
    assert_eq!(HalfBlockRenderer::new().name(), "halfblock");
    assert_eq!(HalfBlockRenderer::new().cell_pixels(), (1, 2));
    assert_eq!(AsciiRenderer::new().name(), "ascii");
    assert_eq!(AsciiRenderer::new().cell_pixels(), (1, 1));
}
