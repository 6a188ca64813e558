use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum StackPlotError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{values} values cannot be reshaped into {channels} channels")]
    ShapeMismatch { values: usize, channels: usize },
    #[error("waveform table is empty")]
    EmptyTable,
    #[error("peak magnitude is not finite: {0}")]
    NonFinitePeak(f64),
    #[error("unknown colormap '{0}'")]
    UnknownColormap(String),
    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("interactive display failed: {0}")]
    Display(String),
}
impl StackPlotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StackPlotError::Io {
            path: path.into(),
            source,
        }
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for StackPlotError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        StackPlotError::Plot(format!("{value:?}"))
    }
}
