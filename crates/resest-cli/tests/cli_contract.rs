use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn tmp_dir(prefix: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    path.push(format!("{}_{}_{}", prefix, std::process::id(), nanos));
    fs::create_dir_all(&path).expect("create tmp dir");
    path
}

fn write_population(dir: &Path, levels: impl IntoIterator<Item = i64>) -> PathBuf {
    let path = dir.join("resources.txt");
    let text: String = levels.into_iter().map(|l| format!("{l}\n")).collect();
    fs::write(&path, text).expect("write population");
    path
}

fn resest() -> Command {
    Command::new(env!("CARGO_BIN_EXE_resest"))
}

#[test]
fn help_lists_commands() {
    let output = resest().arg("--help").output().expect("run resest --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["estimate", "sweep", "table"] {
        assert!(stdout.contains(cmd), "help should mention `{cmd}`");
    }
}

#[test]
fn estimate_constant_population_is_exact() {
    let dir = tmp_dir("resest_estimate");
    let population = write_population(&dir, std::iter::repeat(10).take(300));
    let output = resest()
        .args(["--seed", "4", "estimate"])
        .arg(&population)
        .args(["--nodes", "300", "--format", "json"])
        .output()
        .expect("run resest estimate");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let size = &report["sizes"][0];
    assert_eq!(size["nodes"], 300);
    assert_eq!(size["status"], "completed");
    assert_eq!(size["histogram_error"], 0.0);
    assert_eq!(size["average_hops"], 10.0);
    assert_eq!(report["parameters"]["seed"], 4);
    assert_eq!(report["parameters"]["classes"], "five");
}

#[test]
fn estimate_reads_only_requested_nodes() {
    let dir = tmp_dir("resest_prefix");
    let population = write_population(&dir, (0..2000).map(|i| (i % 50) + 1));
    let output = resest()
        .args(["--seed", "9", "estimate"])
        .arg(&population)
        .args(["--nodes", "1200", "--format", "json"])
        .output()
        .expect("run resest estimate");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sizes"][0]["nodes"], 1200);
}

#[test]
fn sweep_continues_past_inconclusive_sizes() {
    let dir = tmp_dir("resest_sweep");
    let mut levels = vec![10; 10];
    levels.push(100);
    levels.extend(std::iter::repeat(10).take(989));
    let population = write_population(&dir, levels);
    let artifacts = dir.join("logs");

    let output = resest()
        .args(["--seed", "1", "sweep"])
        .arg(&population)
        .args(["--sizes", "11,1000", "--artifacts"])
        .arg(&artifacts)
        .output()
        .expect("run resest sweep");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("11 nodes – INCONCLUSIVE"), "stdout: {stdout}");
    assert!(stdout.contains("1000 nodes – Histogram error"), "stdout: {stdout}");

    let size_dir = artifacts
        .join("90confLevel")
        .join("0.15maxErr")
        .join("1000nodes");
    assert!(size_dir.join("real.json").exists());
    assert!(size_dir.join("obtained0.json").exists());
    assert!(size_dir.join("obtained9.json").exists());
    assert!(!artifacts
        .join("90confLevel")
        .join("0.15maxErr")
        .join("11nodes")
        .join("real.json")
        .exists());

    let real: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(size_dir.join("real.json")).unwrap()).unwrap();
    assert_eq!(real["10"], 999);
    assert_eq!(real["100"], 1);
}

#[test]
fn table_file_overrides_builtin() {
    let dir = tmp_dir("resest_table");
    let table = dir.join("t.txt");
    let text: String = (1..=31).map(|i| format!("{}\n", 40 - i)).collect();
    fs::write(&table, text).unwrap();

    let output = resest()
        .args(["table", "--format", "json", "--table"])
        .arg(&table)
        .output()
        .expect("run resest table");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["t"][0], 39.0);
    assert_eq!(value["t"].as_array().unwrap().len(), 30);
    assert_eq!(value["z"], 9.0);
}

#[test]
fn builtin_table_text() {
    let output = resest()
        .args(["table", "--confidence", "95"])
        .output()
        .expect("run resest table");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1\t12.706"));
    assert!(stdout.contains("z\t1.96"));
}

#[test]
fn rejects_bad_inputs() {
    let dir = tmp_dir("resest_bad");
    let population = dir.join("bad.txt");
    fs::write(&population, "1\n2\nthree\n").unwrap();
    let output = resest()
        .arg("estimate")
        .arg(&population)
        .output()
        .expect("run resest estimate");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("three"));

    let output = resest()
        .args(["table", "--confidence", "80"])
        .output()
        .expect("run resest table");
    assert!(!output.status.success());

    let good = write_population(&dir, 1..=100);
    let output = resest()
        .arg("estimate")
        .arg(&good)
        .args(["--near", "0.6", "--far", "0.5"])
        .output()
        .expect("run resest estimate");
    assert!(!output.status.success());
}
