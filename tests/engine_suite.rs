use wavebend::audio::{AudioSource, BufferError, NoAudio, SampleWindow, StereoBuffers};
use wavebend::distort::{DistortionParams, FixedJitter};
use wavebend::engine::{GlitchEngine, TickIssue};
use wavebend::present::compose;
use wavebend::surface::PixelSurface;

fn gradient(w: usize, h: usize) -> PixelSurface {
    let mut s = PixelSurface::new(w, h).expect("valid size");
    for y in 0..h {
        for x in 0..w {
            s.set_pixel(x, y, [(y * 10) as u8, (x * 10) as u8, 99, 255]);
        }
    }
    s
}

fn engine_with(jitter: f32) -> GlitchEngine {
    GlitchEngine::with_jitter(DistortionParams::default(), Box::new(FixedJitter(jitter)))
}

#[test]
fn full_tick_distorts_and_projects() {
    let mut engine = engine_with(1.0);
    let audio = StereoBuffers::new(vec![0.04; 16], vec![-0.5; 16]).expect("stereo");
    let src = gradient(8, 12);

    let out = engine.tick(Some(&audio), Some(&src), (8.0, 12.0));
    assert!(out.issues.is_empty());
    assert!(!out.is_degraded());

    // (0.04 + 0.01) * 1.0 * 100 = 5 rows down, alpha = 0.04 * 13.7 * 255 = 139.74
    let surface = out.surface.expect("surface");
    assert_eq!(surface.pixel(3, 0), [50, 30, 99, 139]);
    assert_eq!(surface.pixel(3, 10), [110, 30, 99, 139]);

    let (l, r) = out.waveform.expect("waveform");
    assert_eq!(l.len(), 16);
    assert_eq!(r.len(), 16);
}

#[test]
fn missing_audio_passes_frame_through() {
    let mut engine = engine_with(1.0);
    let src = gradient(4, 4);
    let out = engine.tick(None, Some(&src), (4.0, 4.0));
    assert_eq!(out.surface.as_ref(), Some(&src));
    assert!(out.waveform.is_none());
    assert_eq!(out.issues, vec![TickIssue::MissingAudioInput]);
}

#[test]
fn unavailable_device_keeps_the_clip_playing() {
    let mut engine = engine_with(1.0);
    let mut source: Box<dyn AudioSource> = Box::new(NoAudio);
    let src = gradient(6, 5);

    for _ in 0..3 {
        let audio = source.latest_buffers();
        let out = engine.tick(audio.as_ref(), Some(&src), (6.0, 5.0));
        assert_eq!(out.surface.as_ref(), Some(&src));
        assert!(out.waveform.is_none());
        assert_eq!(out.issues, vec![TickIssue::MissingAudioInput]);
    }
}

#[test]
fn missing_frame_still_projects_waveform() {
    let mut engine = engine_with(1.0);
    let audio = StereoBuffers::new(vec![0.0; 4], vec![0.0; 4]).expect("stereo");
    let out = engine.tick(Some(&audio), None, (4.0, 4.0));
    assert!(out.surface.is_none());
    assert!(out.waveform.is_some());
    assert_eq!(out.issues, vec![TickIssue::MissingVideoFrame]);
}

#[test]
fn params_can_change_between_ticks() {
    let mut engine = engine_with(1.0);
    let audio = StereoBuffers::new(vec![0.99; 4], vec![0.0; 4]).expect("stereo");
    engine.params_mut().max_displacement = 2.0;
    let field = engine.displacement_field(4, &audio);
    assert!(field.columns().iter().all(|c| c.displacement == 2));
}

#[test]
fn stereo_buffers_reject_bad_captures() {
    assert_eq!(
        StereoBuffers::new(vec![0.0; 3], vec![0.0; 4]).unwrap_err(),
        BufferError::LengthMismatch { left: 3, right: 4 }
    );
    assert_eq!(
        StereoBuffers::new(Vec::new(), Vec::new()).unwrap_err(),
        BufferError::Empty
    );
}

#[test]
fn sample_buffer_lookup_is_clamped() {
    let bufs = StereoBuffers::new(vec![0.1, 0.2, 0.3], vec![0.0; 3]).expect("stereo");
    assert_eq!(bufs.left().get_clamped(0), 0.1);
    assert_eq!(bufs.left().get_clamped(2), 0.3);
    assert_eq!(bufs.left().get_clamped(usize::MAX), 0.3);
}

#[test]
fn window_is_absent_until_filled_then_rolls() {
    let mut w = SampleWindow::new(3);
    assert!(w.snapshot().is_none());
    w.push([1.0, -1.0]);
    w.push([2.0, -2.0]);
    assert!(w.snapshot().is_none());
    w.push([3.0, -3.0]);
    let snap = w.snapshot().expect("filled");
    assert_eq!(snap.left().as_slice(), &[1.0, 2.0, 3.0]);
    assert_eq!(snap.right().as_slice(), &[-1.0, -2.0, -3.0]);

    w.push([4.0, -4.0]);
    let next = w.snapshot().expect("filled");
    assert_eq!(next.left().as_slice(), &[2.0, 3.0, 4.0]);
    // Earlier snapshot is untouched.
    assert_eq!(snap.left().as_slice(), &[1.0, 2.0, 3.0]);
}

#[test]
fn compose_blends_over_black_and_draws_waveform() {
    let mut engine = engine_with(0.0);
    let audio = StereoBuffers::new(vec![0.0; 4], vec![1.0; 4]).expect("stereo");
    let src = gradient(4, 4);
    let out = engine.tick(Some(&audio), Some(&src), (4.0, 4.0));

    // Silent left channel -> alpha 0 -> black everywhere the waveform isn't.
    let no_wave = compose(&out, 4, 4, false).expect("compose");
    assert!(no_wave.as_rgba().chunks_exact(4).all(|p| p == [0u8, 0, 0, 255]));

    let with_wave = compose(&out, 4, 4, true).expect("compose");
    // Left (silence) sits on row 2; right (1.0) on row 0.
    assert_ne!(with_wave.pixel(1, 2), [0, 0, 0, 255]);
    assert_ne!(with_wave.pixel(1, 0), [0, 0, 0, 255]);
}

#[test]
fn compose_without_anything_is_black() {
    let mut engine = engine_with(0.5);
    let out = engine.tick(None, None, (3.0, 3.0));
    let canvas = compose(&out, 3, 3, true).expect("compose");
    assert!(canvas.as_rgba().chunks_exact(4).all(|p| p == [0u8, 0, 0, 255]));
}
