use std::fs;
use std::path::{Path, PathBuf};
use crate::drivers::StackPlotError;
const F64_BYTES: usize = std::mem::size_of::<f64>();
/// Trait representing something that can yield the flat waveform values on demand.
pub trait WaveformSource {
    fn read_values(&mut self) -> Result<Vec<f64>, StackPlotError>;
    fn describe(&self) -> String;
}
/// Flat binary file of little-endian IEEE-754 doubles.
pub struct BinaryFileSource {
    path: PathBuf,
}
impl BinaryFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl WaveformSource for BinaryFileSource {
    fn read_values(&mut self) -> Result<Vec<f64>, StackPlotError> {
        let bytes = fs::read(&self.path).map_err(|e| StackPlotError::io(&self.path, e))?;
        let values = decode_f64_le(&bytes);
        let trailing = bytes.len() % F64_BYTES;
        if trailing != 0 {
            log::warn!(
                "{}: ignoring {trailing} trailing bytes that do not form a whole f64",
                self.path.display()
            );
        }
        log::info!(
            "read {} values from {}",
            values.len(),
            self.path.display()
        );
        Ok(values)
    }
    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}
/// In-memory source useful for tests and synthetic data.
pub struct ManualSource {
    values: Option<Vec<f64>>,
}
impl ManualSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: Some(values),
        }
    }
}
impl WaveformSource for ManualSource {
    fn read_values(&mut self) -> Result<Vec<f64>, StackPlotError> {
        Ok(self.values.take().unwrap_or_default())
    }
    fn describe(&self) -> String {
        "in-memory values".into()
    }
}
pub fn decode_f64_le(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(F64_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; F64_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    fn encode_f64_le(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
    #[test]
    fn decode_ignores_partial_trailing_value() {
        let mut bytes = encode_f64_le(&[1.5, -2.25]);
        bytes.extend_from_slice(&[0xff, 0x00, 0x01]);
        assert_eq!(decode_f64_le(&bytes), vec![1.5, -2.25]);
    }
    #[test]
    fn missing_file_reports_path() {
        let mut source = BinaryFileSource::new("definitely/not/here/MERP_S0.bin");
        let err = source.read_values().unwrap_err();
        match err {
            StackPlotError::Io { path, .. } => {
                assert!(path.ends_with("MERP_S0.bin"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    #[test]
    fn manual_source_yields_once() {
        let mut source = ManualSource::new(vec![1.0, 2.0]);
        assert_eq!(source.read_values().unwrap(), vec![1.0, 2.0]);
        assert!(source.read_values().unwrap().is_empty());
    }
}
