// Black-box tests for the `tamp` binary: compress/decompress dispatch, file
// and stdio plumbing, and exit codes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Locate the `tamp` binary produced by Cargo.
fn tamp_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_tamp") {
        return PathBuf::from(path);
    }
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("tamp");
    path
}

fn make_temp_input() -> (TempDir, PathBuf, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    let content = "the quick brown fox jumps over the lazy dog\n"
        .repeat(128)
        .into_bytes();
    fs::write(&input, &content).unwrap();
    (dir, input, content)
}

#[test]
fn file_round_trip() {
    let (dir, input, original) = make_temp_input();
    let compressed = dir.path().join("output.tamp");
    let restored = dir.path().join("restored.txt");

    let status = Command::new(tamp_bin())
        .args(["compress", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&compressed)
        .status()
        .expect("failed to run tamp compress");
    assert!(status.success(), "compress should exit 0");
    let compressed_len = fs::metadata(&compressed).unwrap().len();
    assert!(compressed_len > 0 && compressed_len < original.len() as u64);

    let status = Command::new(tamp_bin())
        .args(["decompress", "-i"])
        .arg(&compressed)
        .arg("-o")
        .arg(&restored)
        .status()
        .expect("failed to run tamp decompress");
    assert!(status.success(), "decompress should exit 0");
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn round_trip_with_explicit_parameters() {
    let (dir, input, original) = make_temp_input();
    let compressed = dir.path().join("output.tamp");
    let restored = dir.path().join("restored.txt");

    let status = Command::new(tamp_bin())
        .args(["compress", "-w", "12", "-l", "7", "--extended", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&compressed)
        .status()
        .unwrap();
    assert!(status.success());

    let status = Command::new(tamp_bin())
        .args(["decompress", "-i"])
        .arg(&compressed)
        .arg("-o")
        .arg(&restored)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn stdio_round_trip() {
    let payload = b"piped through standard input and output, twice over".to_vec();

    let mut compress = Command::new(tamp_bin())
        .arg("compress")
        .arg("-q")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    compress
        .stdin
        .take()
        .unwrap()
        .write_all(&payload)
        .unwrap();
    let compressed = compress.wait_with_output().unwrap();
    assert!(compressed.status.success());

    let mut decompress = Command::new(tamp_bin())
        .arg("decompress")
        .arg("-q")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    decompress
        .stdin
        .take()
        .unwrap()
        .write_all(&compressed.stdout)
        .unwrap();
    let decompressed = decompress.wait_with_output().unwrap();
    assert!(decompressed.status.success());
    assert_eq!(decompressed.stdout, payload);
}

#[test]
fn out_of_range_window_is_rejected() {
    let output = Command::new(tamp_bin())
        .args(["compress", "-w", "16"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn missing_input_file_fails_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(tamp_bin())
        .args(["compress", "-i"])
        .arg(dir.path().join("does-not-exist"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open input"), "stderr: {stderr}");
}

#[test]
fn garbage_input_fails_decompression() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("garbage");
    // Header asks for the unimplemented extension bit.
    fs::write(&input, [0x59u8, 0x00, 0x00]).unwrap();
    let output = Command::new(tamp_bin())
        .args(["decompress", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn version_flag() {
    let output = Command::new(tamp_bin()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("tamp"));
}
