// e2e/cli_integration.rs: CLI integration tests
//
// Drives the `hufflz` binary as a black box with std::process::Command.
// Covers the table and verify subcommands, accelerator buffer dumps written
// the way the device writes them, exit codes, and argument errors.

#[path = "../tests/common/mod.rs"]
mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use common::{lorem, SoftwareAccelerator};
use hufflz::verify::{Accelerator, AcceleratorOutput, Verifier};
use hufflz::{CodeTable, TableConfig, CODE_TABLE_BYTES};

/// Locate the `hufflz` binary produced by Cargo.
fn hufflz_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_hufflz") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("hufflz");
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(hufflz_bin())
        .args(args)
        .output()
        .expect("failed to run hufflz")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

/// Input file of `size` bytes of text in a fresh temp dir.
fn make_temp_input(size: usize) -> (TempDir, PathBuf, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.txt");
    let data = lorem(size);
    fs::write(&path, &data).unwrap();
    (dir, path, data)
}

/// Run the software accelerator on `data` and dump its word buffer the way
/// the device does: little-endian u16 words.
fn dump_accelerator_output(dir: &Path, name: &str, data: &[u8], fvp: usize) -> (PathBuf, AcceleratorOutput) {
    let verifier = Verifier::new(data, &TableConfig::default()).unwrap();
    let book = verifier.book();
    let output = match (SoftwareAccelerator { fvp }).compress(verifier.processed_input(), book.table(), book.marker()) {
        Ok(o) => o,
        Err(never) => match never {},
    };
    let raw: Vec<u8> = output.words.iter().flat_map(|w| w.to_le_bytes()).collect();
    let path = dir.join(name);
    fs::write(&path, raw).unwrap();
    (path, output)
}

// ── 1. table ──────────────────────────────────────────────────────────────────

#[test]
fn test_cli_table_writes_1024_bytes() {
    let (dir, input, data) = make_temp_input(4096);
    let table_path = dir.path().join("table.bin");

    let out = run(&["table", path_str(&input), "-o", path_str(&table_path)]);
    assert!(out.status.success(), "table should exit 0");

    let bytes = fs::read(&table_path).unwrap();
    assert_eq!(bytes.len(), CODE_TABLE_BYTES);

    let book = hufflz::build_table(&data).unwrap();
    let mut words = [0u32; 256];
    for (w, c) in words.iter_mut().zip(bytes.chunks(4)) {
        *w = u32::from_le_bytes(c.try_into().unwrap());
    }
    assert_eq!(&CodeTable::from_words(&words), book.table());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(&format!("Marker: {}", book.marker())));
}

#[test]
fn test_cli_table_prints_words_without_output_file() {
    let (_dir, input, _) = make_temp_input(512);
    let out = run(&["table", path_str(&input)]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    // 256 table lines plus the marker line
    assert_eq!(stdout.lines().count(), 257);
}

#[test]
fn test_cli_table_writes_tree() {
    let (dir, input, data) = make_temp_input(2000);
    let tree_path = dir.path().join("tree.bin");
    let out = run(&["-q", "table", path_str(&input), "--tree", path_str(&tree_path)]);
    assert!(out.status.success());

    let tree = hufflz::recover_tree(&fs::read(&tree_path).unwrap()).unwrap();
    let book = hufflz::build_table(&data).unwrap();
    assert_eq!(tree.leaf_count(), book.tree().leaf_count());
}

#[test]
fn test_cli_table_marker_boost_changes_table() {
    let (dir, input, _) = make_temp_input(6000);
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    assert!(run(&["table", path_str(&input), "-o", path_str(&a)]).status.success());
    assert!(run(&["table", path_str(&input), "-o", path_str(&b), "--marker-boost", "0"])
        .status
        .success());
    assert_ne!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_cli_table_verbose_dumps_tree() {
    let (_dir, input, _) = make_temp_input(300);
    let out = run(&["-vv", "table", path_str(&input)]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("HUFFTABLE:"));
    assert!(stderr.contains("Level: 0"));
}

// ── 2. verify ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_verify_passes() {
    let (dir, input, data) = make_temp_input(10_000 + 7);
    let (dump, output) = dump_accelerator_output(dir.path(), "engine0.bin", &data, 3);

    let out = run(&[
        "verify",
        path_str(&input),
        path_str(&dump),
        "--lz-size",
        &output.lz_size.to_string(),
        "--huffman-size",
        &output.huffman_size.to_string(),
        "--fvp",
        "3",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("PASSED, no errors"));
}

#[test]
fn test_cli_verify_default_huffman_size() {
    let (dir, input, data) = make_temp_input(4096);
    let (dump, output) = dump_accelerator_output(dir.path(), "engine0.bin", &data, 0);
    let out = run(&[
        "verify",
        path_str(&input),
        path_str(&dump),
        "--lz-size",
        &output.lz_size.to_string(),
    ]);
    assert!(out.status.success());
}

#[test]
fn test_cli_verify_multiple_engines() {
    let (dir, input, data) = make_temp_input(8192);
    let (a, out_a) = dump_accelerator_output(dir.path(), "a.bin", &data, 16);
    let (b, out_b) = dump_accelerator_output(dir.path(), "b.bin", &data, 16);
    assert_eq!(out_a.lz_size, out_b.lz_size);

    let out = run(&[
        "verify",
        path_str(&input),
        path_str(&a),
        path_str(&b),
        "--lz-size",
        &out_a.lz_size.to_string(),
        "--fvp",
        "16",
        "-T",
        "2",
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.matches("PASSED").count(), 2);
}

#[test]
fn test_cli_verify_corrupt_buffer_fails() {
    let (dir, input, data) = make_temp_input(8192);
    let (dump, output) = dump_accelerator_output(dir.path(), "engine0.bin", &data, 0);
    let mut raw = fs::read(&dump).unwrap();
    let mid = raw.len() / 2;
    for b in &mut raw[mid..mid + 32] {
        *b = !*b;
    }
    fs::write(&dump, raw).unwrap();

    let out = run(&[
        "verify",
        path_str(&input),
        path_str(&dump),
        "--lz-size",
        &output.lz_size.to_string(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("FAILED"));
}

// ── 3. Errors ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_nonexistent_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let out = run(&["table", path_str(&missing)]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("cannot read"));
}

#[test]
fn test_cli_verify_requires_lz_size() {
    let (dir, input, data) = make_temp_input(256);
    let (dump, _) = dump_accelerator_output(dir.path(), "engine0.bin", &data, 0);
    let out = run(&["verify", path_str(&input), path_str(&dump)]);
    assert!(!out.status.success());
}

#[test]
fn test_cli_verify_rejects_bad_fvp() {
    let (dir, input, data) = make_temp_input(256);
    let (dump, output) = dump_accelerator_output(dir.path(), "engine0.bin", &data, 0);
    let out = run(&[
        "verify",
        path_str(&input),
        path_str(&dump),
        "--lz-size",
        &output.lz_size.to_string(),
        "--fvp",
        "40",
    ]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("first valid position"));
}

#[test]
fn test_cli_help_and_version() {
    let out = run(&["--help"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("table"));
    assert!(stdout.contains("verify"));

    let out = run(&["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}
