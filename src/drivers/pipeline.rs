use crate::config::StackPlotConfig;
use crate::drivers::error::StackPlotError;
use crate::drivers::figure::StackFigure;
use crate::drivers::range::SharedLimits;
use crate::drivers::source::WaveformSource;
use crate::drivers::table::{load_table, TimeAxis, WaveformTable};
use crate::drivers::ticks::ScratchFigure;
/// Load, derive and assemble: everything up to the point of drawing.
pub struct StackPlotPipeline<S: WaveformSource> {
    source: S,
    config: StackPlotConfig,
}
impl<S: WaveformSource> StackPlotPipeline<S> {
    pub fn new(source: S, config: StackPlotConfig) -> Self {
        Self { source, config }
    }
    pub fn load(&mut self) -> Result<WaveformTable, StackPlotError> {
        let time = TimeAxis::new(
            self.config.time_start_ms,
            self.config.time_end_ms,
            self.config.ms_per_sample,
        )?;
        load_table(&mut self.source, self.config.channel_count, time)
    }
    pub fn prepare(&mut self) -> Result<StackFigure, StackPlotError> {
        let table = self.load()?;
        let config = &self.config;
        let events = config.event_schedule().offsets(table.channels());
        log::debug!("event offsets {events:?}");
        let limits = SharedLimits::from_table(&table, config.y_multiplier, config.color_multiplier)?;
        let ticks = ScratchFigure::with_font_size(config.font_size).x_ticks(config.x_window());
        StackFigure::build(&table, &events, limits, &ticks, config)
    }
}
