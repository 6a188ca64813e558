// src/main.rs
mod config;
mod drivers;
mod preview;
use anyhow::Context;
use config::StackPlotConfig;
use drivers::{save_pdf, BinaryFileSource, StackPlotPipeline};
// Entry point: load, preview, save
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = StackPlotConfig::default();
    config.validate().context("invalid plot settings")?;
    let input = config.input_path();
    let output = config.output_path();
    let show = config.show;
    let mut pipeline = StackPlotPipeline::new(BinaryFileSource::new(&input), config);
    let figure = pipeline
        .prepare()
        .with_context(|| format!("preparing plot from {}", input.display()))?;
    if show {
        if preview::display_available() {
            if let Err(err) = preview::show(&figure) {
                log::warn!("preview unavailable: {err}");
            }
        } else {
            log::warn!("no display detected, skipping preview");
        }
    }
    save_pdf(&figure, &output).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}
