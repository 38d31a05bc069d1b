use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat};
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer as _, Producer as _, Split as _};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Consecutive polls without fresh frames before a filled window counts as stale.
pub const STALE_AFTER_POLLS: u32 = 15;

/// One channel of one capture. Immutable once built; the next capture replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    samples: Arc<[f32]>,
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Index clamped into `[0, len-1]`. Returns 0.0 for an empty buffer.
    pub fn get_clamped(&self, index: usize) -> f32 {
        match self.samples.len() {
            0 => 0.0,
            n => self.samples[index.min(n - 1)],
        }
    }
}

impl From<Vec<f32>> for SampleBuffer {
    fn from(v: Vec<f32>) -> Self {
        Self { samples: v.into() }
    }
}

impl From<&[f32]> for SampleBuffer {
    fn from(v: &[f32]) -> Self {
        Self { samples: v.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    Empty,
    LengthMismatch { left: usize, right: usize },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "capture has no samples"),
            Self::LengthMismatch { left, right } => {
                write!(f, "channel lengths differ (left {left}, right {right})")
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Left/right pair from a single capture. Both sides always have the same, non-zero length.
#[derive(Clone, Debug, PartialEq)]
pub struct StereoBuffers {
    left: SampleBuffer,
    right: SampleBuffer,
}

impl StereoBuffers {
    pub fn new(
        left: impl Into<SampleBuffer>,
        right: impl Into<SampleBuffer>,
    ) -> Result<Self, BufferError> {
        let left = left.into();
        let right = right.into();
        if left.len() != right.len() {
            return Err(BufferError::LengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        if left.is_empty() {
            return Err(BufferError::Empty);
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &SampleBuffer {
        &self.left
    }

    pub fn right(&self) -> &SampleBuffer {
        &self.right
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }
}

/// Anything that can hand over the latest stereo capture. `None` until audio has arrived.
pub trait AudioSource {
    fn latest_buffers(&mut self) -> Option<StereoBuffers>;
}

/// Stands in for a capture device that could not be opened. Never has audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAudio;

impl AudioSource for NoAudio {
    fn latest_buffers(&mut self) -> Option<StereoBuffers> {
        None
    }
}

/// Rolling per-channel window of the most recent `len` frames.
pub struct SampleWindow {
    left: Vec<f32>,
    right: Vec<f32>,
    write_pos: usize,
    filled: usize,
}

impl SampleWindow {
    pub fn new(len: usize) -> Self {
        let len = len.max(1);
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
            write_pos: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.left.len()
    }

    pub fn push(&mut self, frame: [f32; 2]) {
        let n = self.left.len();
        self.left[self.write_pos] = frame[0];
        self.right[self.write_pos] = frame[1];
        self.write_pos = (self.write_pos + 1) % n;
        if self.filled < n {
            self.filled += 1;
        }
    }

    /// Oldest-to-newest copy of the window, once it has been filled at least once.
    pub fn snapshot(&self) -> Option<StereoBuffers> {
        let n = self.left.len();
        if self.filled < n {
            return None;
        }
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        for i in 0..n {
            let idx = (self.write_pos + i) % n;
            left.push(self.left[idx]);
            right.push(self.right[idx]);
        }
        StereoBuffers::new(left, right).ok()
    }
}

pub fn list_input_devices() -> anyhow::Result<()> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .context("enumerate input devices")?;

    let mut out = io::stdout();
    writeln!(out, "Input devices:")?;
    for dev in devices {
        let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}

/// [`SampleWindow`] fed from a capture ring that goes quiet when the stream does.
pub struct LiveWindow {
    window: SampleWindow,
    idle_polls: u32,
}

impl LiveWindow {
    pub fn new(len: usize) -> Self {
        Self {
            window: SampleWindow::new(len),
            idle_polls: 0,
        }
    }

    /// Drain `cons` into the window and return the current snapshot.
    ///
    /// `None` until the window first fills, after the stream reports an error, or once
    /// [`STALE_AFTER_POLLS`] polls in a row found the ring empty. Fresh frames end either
    /// condition.
    pub fn poll(
        &mut self,
        cons: &mut ringbuf::HeapCons<[f32; 2]>,
        stream_failed: &AtomicBool,
    ) -> Option<StereoBuffers> {
        let mut drained = 0usize;
        while let Some(frame) = cons.try_pop() {
            self.window.push(frame);
            drained += 1;
        }

        if drained > 0 {
            self.idle_polls = 0;
            stream_failed.store(false, Ordering::Relaxed);
        } else {
            self.idle_polls = self.idle_polls.saturating_add(1);
        }

        if stream_failed.load(Ordering::Relaxed) || self.idle_polls >= STALE_AFTER_POLLS {
            return None;
        }
        self.window.snapshot()
    }
}

/// Live input stream feeding a [`LiveWindow`].
pub struct AudioCapture {
    // Dropping the stream stops capture, so it lives as long as the capture does.
    _stream: cpal::Stream,
    cons: ringbuf::HeapCons<[f32; 2]>,
    window: LiveWindow,
    stream_failed: Arc<AtomicBool>,
    pub sample_rate_hz: u32,
    pub channels: usize,
}

impl AudioCapture {
    pub fn new(device_query: Option<&str>, window_len: usize) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = select_input_device(&host, device_query)?;
        let supported = device
            .default_input_config()
            .context("get default input config")?;
        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.clone().into();

        let rb_capacity = (sample_rate_hz as usize).max(window_len).saturating_mul(2);
        let rb = HeapRb::<[f32; 2]>::new(rb_capacity);
        let (mut prod, cons) = rb.split();

        let stream_failed = Arc::new(AtomicBool::new(false));
        let err_flag = Arc::clone(&stream_failed);
        let err_fn = move |err: cpal::StreamError| {
            tracing::warn!("audio stream error: {err}");
            err_flag.store(true, Ordering::Relaxed);
        };

        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _| push_stereo(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _| push_stereo(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_input_stream(
                &config,
                move |data: &[u16], _| push_stereo(data, channels, &mut prod),
                err_fn,
                None,
            )?,
            fmt => return Err(anyhow!("unsupported sample format: {fmt:?}")),
        };

        stream.play().context("start input stream")?;

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "<unknown>".to_string()),
            sample_rate_hz,
            channels,
            window_len,
            "audio capture started"
        );

        Ok(Self {
            _stream: stream,
            cons,
            window: LiveWindow::new(window_len),
            stream_failed,
            sample_rate_hz,
            channels,
        })
    }
}

impl AudioSource for AudioCapture {
    fn latest_buffers(&mut self) -> Option<StereoBuffers> {
        self.window.poll(&mut self.cons, &self.stream_failed)
    }
}

fn select_input_device(
    host: &cpal::Host,
    device_query: Option<&str>,
) -> anyhow::Result<cpal::Device> {
    let devices = host
        .input_devices()
        .context("enumerate input devices")?
        .collect::<Vec<_>>();

    let want = device_query.map(|s| s.to_lowercase());
    if let Some(want) = want.as_deref() {
        if let Some(dev) = devices.iter().find(|d| {
            d.name()
                .map(|n| n.to_lowercase().contains(want))
                .unwrap_or(false)
        }) {
            return Ok(dev.clone());
        }
        return Err(anyhow!("no input device matching: {want}"));
    }

    host.default_input_device()
        .ok_or_else(|| anyhow!("no default input device found"))
}

/// Split an interleaved callback buffer into `[left, right]` frames.
pub(crate) fn split_stereo<T: Sample<Float = f32> + Copy>(
    data: &[T],
    channels: usize,
) -> impl Iterator<Item = [f32; 2]> + '_ {
    let channels = channels.max(1);
    data.chunks_exact(channels).map(move |frame| {
        let l = frame[0].to_float_sample();
        let r = if channels > 1 {
            frame[1].to_float_sample()
        } else {
            l
        };
        [l, r]
    })
}

fn push_stereo<T: Sample<Float = f32> + Copy>(
    data: &[T],
    channels: usize,
    prod: &mut ringbuf::HeapProd<[f32; 2]>,
) {
    for frame in split_stereo(data, channels) {
        let _ = prod.try_push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::traits::{Producer as _, Split as _};

    fn ring(capacity: usize) -> (ringbuf::HeapProd<[f32; 2]>, ringbuf::HeapCons<[f32; 2]>) {
        HeapRb::<[f32; 2]>::new(capacity).split()
    }

    #[test]
    fn live_window_goes_quiet_when_the_ring_starves() {
        let (mut prod, mut cons) = ring(16);
        let failed = AtomicBool::new(false);
        let mut live = LiveWindow::new(2);

        prod.try_push([0.5, -0.5]).unwrap();
        prod.try_push([0.25, -0.25]).unwrap();
        assert!(live.poll(&mut cons, &failed).is_some());

        for _ in 1..STALE_AFTER_POLLS {
            assert!(live.poll(&mut cons, &failed).is_some());
        }
        for _ in 0..1000 {
            assert!(live.poll(&mut cons, &failed).is_none());
        }

        prod.try_push([1.0, -1.0]).unwrap();
        let snap = live.poll(&mut cons, &failed).expect("recovered");
        assert_eq!(snap.left().as_slice(), &[0.25, 1.0]);
    }

    #[test]
    fn live_window_drops_out_on_stream_error_until_frames_return() {
        let (mut prod, mut cons) = ring(16);
        let failed = AtomicBool::new(false);
        let mut live = LiveWindow::new(1);

        prod.try_push([0.1, 0.1]).unwrap();
        assert!(live.poll(&mut cons, &failed).is_some());

        failed.store(true, Ordering::Relaxed);
        assert!(live.poll(&mut cons, &failed).is_none());

        prod.try_push([0.2, 0.2]).unwrap();
        assert!(live.poll(&mut cons, &failed).is_some());
        assert!(!failed.load(Ordering::Relaxed));
    }

    #[test]
    fn no_audio_never_yields_buffers() {
        let mut src = NoAudio;
        assert!(src.latest_buffers().is_none());
    }

    #[test]
    fn mono_input_duplicates_into_both_channels() {
        let data = [0.25f32, -0.5];
        let frames = split_stereo(&data, 1).collect::<Vec<_>>();
        assert_eq!(frames, vec![[0.25, 0.25], [-0.5, -0.5]]);
    }

    #[test]
    fn surround_input_keeps_front_pair() {
        let data = [0.1f32, 0.2, 0.9, 0.9, 0.3, 0.4, 0.9, 0.9];
        let frames = split_stereo(&data, 4).collect::<Vec<_>>();
        assert_eq!(frames, vec![[0.1, 0.2], [0.3, 0.4]]);
    }

    #[test]
    fn integer_samples_are_normalised() {
        let data = [i16::MIN, 0i16];
        let frames = split_stereo(&data, 2).collect::<Vec<_>>();
        assert!((frames[0][0] + 1.0).abs() < 1e-6);
        assert_eq!(frames[0][1], 0.0);
    }
}
