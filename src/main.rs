use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = wavebend::config::Config::parse();
    if cfg.list_devices {
        wavebend::audio::list_input_devices()?;
        return Ok(());
    }

    wavebend::app::run(cfg)
}
