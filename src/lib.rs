pub mod app;
pub mod audio;
pub mod config;
pub mod distort;
pub mod engine;
pub mod present;
pub mod render;
pub mod surface;
pub mod telemetry;
pub mod terminal;
pub mod video;
pub mod waveform;
