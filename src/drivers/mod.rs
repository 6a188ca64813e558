// src/drivers/mod.rs
pub mod colormap;
pub mod error;
pub mod events;
pub mod figure;
pub mod pdf;
pub mod pipeline;
pub mod plot;
pub mod range;
pub mod source;
pub mod table;
pub mod ticks;
pub mod title;
// Re-exports for main and the preview window
pub use error::StackPlotError;
pub use figure::{Panel, StackFigure};
pub use pipeline::StackPlotPipeline;
pub use plot::save_pdf;
pub use source::BinaryFileSource;
