use wavebend::audio::{SampleBuffer, StereoBuffers};
use wavebend::present::{stroke_polyline, LEFT_WAVE_RGB};
use wavebend::surface::PixelSurface;
use wavebend::waveform::{project, project_stereo};

#[test]
fn point_count_matches_sample_count() {
    for n in [1usize, 2, 5, 512, 1024] {
        let buf = SampleBuffer::from(vec![0.3; n]);
        let line = project(&buf, 640.0, 480.0);
        assert_eq!(line.len(), n);
    }
}

#[test]
fn x_never_decreases() {
    let samples = (0..300).map(|i| (i as f32 * 0.1).sin()).collect::<Vec<_>>();
    let line = project(&SampleBuffer::from(samples), 123.0, 77.0);
    for pair in line.points.windows(2) {
        assert!(pair[1].x >= pair[0].x);
    }
    assert_eq!(line.points[0].x, 0.0);
    assert!(line.points.last().unwrap().x < 123.0);
}

#[test]
fn vertical_center_of_two_hundred() {
    // Half-height 200: 1.0 sits on the top edge, 0.0 at the centre, -1.0 at the bottom.
    let buf = SampleBuffer::from(vec![0.0, 0.5, 1.0, -1.0]);
    let line = project(&buf, 4.0, 400.0);
    let ys = line.points.iter().map(|p| p.y).collect::<Vec<_>>();
    assert_eq!(ys, vec![200.0, 100.0, 0.0, 400.0]);
}

#[test]
fn loud_transients_are_not_clamped() {
    let buf = SampleBuffer::from(vec![3.0, -4.0]);
    let line = project(&buf, 2.0, 100.0);
    assert_eq!(line.points[0].y, -100.0);
    assert_eq!(line.points[1].y, 250.0);
}

#[test]
fn empty_buffer_projects_to_nothing() {
    let line = project(&SampleBuffer::from(Vec::new()), 10.0, 10.0);
    assert!(line.is_empty());
}

#[test]
fn stereo_projection_keeps_channels_apart() {
    let bufs = StereoBuffers::new(vec![1.0, 1.0], vec![0.0, 0.0]).expect("equal lengths");
    let (l, r) = project_stereo(&bufs, 10.0, 20.0);
    assert!(l.points.iter().all(|p| p.y == 0.0));
    assert!(r.points.iter().all(|p| p.y == 10.0));
    assert_eq!(l.points[1].x, r.points[1].x);
}

#[test]
fn stroked_line_lands_on_the_surface() {
    let mut s = PixelSurface::new(8, 8).expect("valid size");
    let line = project(&SampleBuffer::from(vec![0.5; 8]), 8.0, 8.0);
    stroke_polyline(&mut s, &line, LEFT_WAVE_RGB);
    // (0.5 - 1) * -4 = 2
    for x in 0..7 {
        assert_eq!(s.pixel(x, 2)[..3], LEFT_WAVE_RGB, "x={x}");
    }
}
