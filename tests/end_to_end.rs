use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stack-plot-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}
fn write_recording(dir: &Path, subject: u32, rows: usize, channels: usize) {
    let bytes: Vec<u8> = (0..rows * channels)
        .map(|i| {
            let (channel, row) = (i / rows, i % rows);
            ((row as f64) / 25.0 + channel as f64).sin() * 6.5
        })
        .flat_map(|v| v.to_le_bytes())
        .collect();
    fs::write(dir.join(format!("MERP_S{subject}.bin")), bytes).unwrap();
}
fn run_in(dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_colored-stack-plot"))
        .current_dir(dir)
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .output()
        .unwrap()
}
#[test]
fn default_recording_produces_pdf() {
    let dir = scratch_dir("default");
    write_recording(&dir, 7, 1001, 14);
    let output = run_in(&dir);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let pdf = fs::read(dir.join("colored_stack_plot_S7_coolwarm.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&pdf).contains("%%EOF"));
    fs::remove_dir_all(&dir).unwrap();
}
#[test]
fn short_recording_uses_the_default_axis() {
    let dir = scratch_dir("short");
    // 750 rows pair with the first 750 of the 1001 default time values.
    write_recording(&dir, 7, 750, 14);
    let output = run_in(&dir);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let pdf = fs::read(dir.join("colored_stack_plot_S7_coolwarm.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    fs::remove_dir_all(&dir).unwrap();
}
#[test]
fn settings_file_is_ignored() {
    let dir = scratch_dir("ignored-settings");
    write_recording(&dir, 7, 1001, 14);
    fs::write(dir.join("stack_plot.json"), r#"{"subject_id": 3, "colormap": "bwr"}"#).unwrap();
    let output = run_in(&dir);
    assert!(output.status.success());
    assert!(dir.join("colored_stack_plot_S7_coolwarm.pdf").exists());
    assert!(!dir.join("colored_stack_plot_S3_bwr.pdf").exists());
    fs::remove_dir_all(&dir).unwrap();
}
#[test]
fn malformed_recording_fails_without_output() {
    let dir = scratch_dir("malformed");
    let bytes: Vec<u8> = (0..43).flat_map(|i| (i as f64).to_le_bytes()).collect();
    fs::write(dir.join("MERP_S7.bin"), bytes).unwrap();
    let output = run_in(&dir);
    assert!(!output.status.success());
    assert!(!dir.join("colored_stack_plot_S7_coolwarm.pdf").exists());
    fs::remove_dir_all(&dir).unwrap();
}
#[test]
fn missing_recording_names_the_file() {
    let dir = scratch_dir("missing");
    let output = run_in(&dir);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MERP_S7.bin"));
    fs::remove_dir_all(&dir).unwrap();
}
