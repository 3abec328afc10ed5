//! CLI subprocess integration tests.
//!
//! These tests invoke the `aciforge` binary as a subprocess and verify
//! exit codes, stdout content, and JSON output stability.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

fn aciforge_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aciforge"));
    cmd.env_remove("ACIFORGE_LOG");
    cmd
}

fn write_spec(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("aci-manifest.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn pack_aci(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join("image.aci");
    let encoder =
        flate2::write::GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *content).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
    path
}

#[test]
fn cli_version_exits_zero() {
    let output = aciforge_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "aciforge --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("aciforge"), "version output: {stdout}");
}

#[test]
fn cli_help_lists_commands() {
    let output = aciforge_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("write-manifest"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("fullname"));
}

#[test]
fn write_then_inspect_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(
        dir.path(),
        r#"
name = "example.com/app:1.2.3"
[aci.app]
exec = ["/bin/app"]
"#,
    );
    let manifest = dir.path().join("manifest");

    let output = aciforge_bin()
        .args([
            "write-manifest",
            &spec.to_string_lossy(),
            "-o",
            &manifest.to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "write-manifest must exit 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = std::fs::read(&manifest).unwrap();
    let aci = pack_aci(dir.path(), &[("manifest", &content)]);

    let output = aciforge_bin()
        .args(["fullname", &aci.to_string_lossy()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "example.com/app:1.2.3"
    );

    let output = aciforge_bin()
        .args(["inspect", "--json", &aci.to_string_lossy()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["name"], "example.com/app");
    assert_eq!(parsed["app"]["exec"][0], "/bin/app");
    assert_eq!(parsed["app"]["eventHandlers"][0]["name"], "pre-start");
}

#[test]
fn write_manifest_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), "name = \"example.com/app:2\"\n");
    let manifest = dir.path().join("manifest");

    let output = aciforge_bin()
        .args([
            "--json",
            "write-manifest",
            &spec.to_string_lossy(),
            "--output",
            &manifest.to_string_lossy(),
            "--name",
            "example.com/renamed",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["name"], "example.com/renamed");
    assert_eq!(parsed["version"], "2");
    assert_eq!(parsed["status"], "written");
}

#[test]
fn fullname_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = br#"{
  "acKind": "ImageManifest",
  "acVersion": "0.8.11",
  "name": "example.com/app",
  "labels": [{"name": "version", "value": "3.1"}]
}"#;
    let aci = pack_aci(dir.path(), &[("manifest", manifest)]);

    let output = aciforge_bin()
        .args(["fullname", "--json", &aci.to_string_lossy()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["full_name"], "example.com/app:3.1");
}

#[test]
fn invalid_name_exits_with_spec_code() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path(), "name = \"Example App\"\n");
    let manifest = dir.path().join("manifest");

    let output = aciforge_bin()
        .args([
            "write-manifest",
            &spec.to_string_lossy(),
            "-o",
            &manifest.to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Example App"));
    assert!(!manifest.exists());
}

#[test]
fn archive_without_manifest_exits_with_archive_code() {
    let dir = tempfile::tempdir().unwrap();
    let aci = pack_aci(dir.path(), &[("rootfs/etc/hostname", b"box\n")]);

    let output = aciforge_bin()
        .args(["inspect", &aci.to_string_lossy()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no manifest entry"));
}

#[test]
fn missing_spec_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = aciforge_bin()
        .args([
            "write-manifest",
            &dir.path().join("absent.toml").to_string_lossy(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}
