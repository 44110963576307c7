/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GEMFILE_LOCK: &str = "GEM
  remote: https://rubygems.org/
  specs:
    rack (3.0.8)
    rake (13.0.6)

PLATFORMS
  ruby
";

const MIX_LOCK: &str = r#"%{
  "plug": {:hex, :plug, "1.15.2", "94cf1fa375526f30ff8770837cb804798e0045fd97185f0bb9e5fcd858c792a3", [:mix], [], "hexpm", "02731fa0c2dcb03d8d21a1d941bdbbe99c2946c0db098eee31008e04c6283615"},
}
"#;

const OS_RELEASE: &str = r#"NAME="Alpine Linux"
ID=alpine
VERSION_ID=3.19.1
PRETTY_NAME="Alpine Linux v3.19"
"#;

fn create_test_root(dir: &Path) {
    fs::create_dir_all(dir.join("etc")).unwrap();
    fs::create_dir_all(dir.join("app/web")).unwrap();
    fs::write(dir.join("etc/os-release"), OS_RELEASE).unwrap();
    fs::write(dir.join("app/Gemfile.lock"), GEMFILE_LOCK).unwrap();
    fs::write(dir.join("app/web/mix.lock"), MIX_LOCK).unwrap();
}

fn scan_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cargo_bin_cmd!("bomtrace")
        .args(["-q", "scan", dir.to_str().unwrap()])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn artifact_names(doc: &serde_json::Value) -> Vec<String> {
    let mut names: Vec<String> = doc["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - normal execution
    #[test]
    fn test_exit_code_success() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        cargo_bin_cmd!("bomtrace")
            .args(["-q", "scan", dir.path().to_str().unwrap()])
            .assert()
            .code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("bomtrace").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("bomtrace").arg("--version").assert().code(0);
    }

    /// Exit code 1: one worker failed, the inventory is still written
    #[test]
    fn test_exit_code_partial_failure() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        fs::write(dir.path().join("app/Cargo.lock"), "[[package]\nname = ").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args(["-q", "scan", dir.path().to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("\"name\": \"rack\""))
            .stderr(predicate::str::contains("1 of 5 workers failed"))
            .stderr(predicate::str::contains("rust-cargo-lock-cataloger"));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("bomtrace")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("bomtrace")
            .args(["scan", ".", "-o", "invalid_format"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - non-existent scan path
    #[test]
    fn test_exit_code_application_error_nonexistent_path() {
        cargo_bin_cmd!("bomtrace")
            .args(["scan", "/nonexistent/path/that/does/not/exist"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid source path"));
    }

    /// Exit code 3: Application error - path is a file, not a directory
    #[test]
    fn test_exit_code_application_error_file_not_directory() {
        cargo_bin_cmd!("bomtrace")
            .args(["scan", "Cargo.toml"])
            .assert()
            .code(3);
    }

    /// Exit code 3: no cataloger matches the selection
    #[test]
    fn test_exit_code_unknown_cataloger() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("bomtrace")
            .args(["scan", dir.path().to_str().unwrap(), "--catalogers", "cobol"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("catalogers"));
    }
}

mod scan_tests {
    use super::*;

    #[test]
    fn test_scan_json_output() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());

        let doc = scan_json(dir.path(), &[]);

        assert_eq!(artifact_names(&doc), vec!["plug", "rack", "rake"]);
        assert_eq!(doc["schema"]["version"], "1.0.0");
        assert_eq!(doc["source"]["type"], "directory");
        assert!(doc["distro"].is_object());
        assert!(doc["artifactRelationships"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r["type"] == "evident-by"));
    }

    #[test]
    fn test_scan_output_is_reproducible() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());

        let first = scan_json(dir.path(), &[]);
        let second = scan_json(dir.path(), &["--parallelism", "1"]);
        assert_eq!(first["artifacts"], second["artifacts"]);
        assert_eq!(first["artifactRelationships"], second["artifactRelationships"]);
    }

    #[test]
    fn test_scan_table_output() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());

        cargo_bin_cmd!("bomtrace")
            .args(["-q", "scan", dir.path().to_str().unwrap(), "-o", "table"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("NAME"))
            .stdout(predicate::str::contains("plug"))
            .stdout(predicate::str::contains("gem"));
    }

    #[test]
    fn test_scan_cataloger_selection() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());

        let doc = scan_json(dir.path(), &["--catalogers", "ruby"]);
        assert_eq!(artifact_names(&doc), vec!["rack", "rake"]);
    }

    #[test]
    fn test_scan_to_file() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        let out_dir = TempDir::new().unwrap();
        let out = out_dir.path().join("inventory.json");

        cargo_bin_cmd!("bomtrace")
            .args([
                "-q",
                "scan",
                dir.path().to_str().unwrap(),
                "--file",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("\"name\": \"rake\""));
    }

    #[test]
    fn test_scan_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());

        cargo_bin_cmd!("bomtrace")
            .args([
                "-q",
                "scan",
                dir.path().to_str().unwrap(),
                "--file",
                "/nonexistent/dir/inventory.json",
            ])
            .assert()
            .code(3);
    }

    #[test]
    fn test_progress_goes_to_stderr() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());

        cargo_bin_cmd!("bomtrace")
            .args(["scan", dir.path().to_str().unwrap(), "-o", "table"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("NAME"))
            .stdout(predicate::str::contains("ruby-gemfile-cataloger").not())
            .stderr(predicate::str::contains("Cataloged"))
            .stderr(predicate::str::contains("ruby-gemfile-cataloger"));
    }
}

mod convert_tests {
    use super::*;

    #[test]
    fn test_convert_json_to_table() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        let out_dir = TempDir::new().unwrap();
        let inventory = out_dir.path().join("inventory.json");

        cargo_bin_cmd!("bomtrace")
            .args([
                "-q",
                "scan",
                dir.path().to_str().unwrap(),
                "--file",
                inventory.to_str().unwrap(),
            ])
            .assert()
            .success();

        cargo_bin_cmd!("bomtrace")
            .args(["convert", inventory.to_str().unwrap(), "-o", "table"])
            .assert()
            .success()
            .stdout(predicate::str::contains("rack"))
            .stdout(predicate::str::contains("1.15.2"));
    }

    #[test]
    fn test_convert_keeps_document_ids() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.json");
        fs::write(
            &input,
            r#"{"artifacts": [{"id": "pkg-1", "name": "rack", "version": "3.0.8", "type": "gem"}],
                "artifactRelationships": []}"#,
        )
        .unwrap();

        cargo_bin_cmd!("bomtrace")
            .args(["convert", input.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"id\": \"pkg-1\""));
    }

    #[test]
    fn test_convert_unrecognized_document() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "NAME VERSION TYPE\n").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args(["convert", input.to_str().unwrap()])
            .assert()
            .code(3);
    }
}

// ============================================================================
// Config File Tests
// ============================================================================

mod config_file_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_applies_catalogers() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        fs::write(
            dir.path().join("bomtrace.config.yml"),
            "catalogers:\n  - elixir\n",
        )
        .unwrap();

        let output = cargo_bin_cmd!("bomtrace")
            .current_dir(dir.path())
            .args(["-q", "scan", "."])
            .output()
            .unwrap();

        assert!(output.status.success());
        let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(artifact_names(&doc), vec!["plug"]);
    }

    #[test]
    fn test_explicit_config_format() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        let config = dir.path().join("custom-config.yml");
        fs::write(&config, "output: table\n").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args([
                "-q",
                "scan",
                dir.path().to_str().unwrap(),
                "-c",
                config.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("NAME"));
    }

    #[test]
    fn test_cli_format_overrides_config() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        let config = dir.path().join("custom-config.yml");
        fs::write(&config, "output: table\n").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args([
                "-q",
                "scan",
                dir.path().to_str().unwrap(),
                "-c",
                config.to_str().unwrap(),
                "-o",
                "json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"artifacts\""));
    }

    #[test]
    fn test_explicit_config_nonexistent_file_error() {
        cargo_bin_cmd!("bomtrace")
            .args(["scan", ".", "-c", "nonexistent-config.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_yaml_syntax_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("bad.yml");
        fs::write(&config, "invalid: yaml: [[[broken").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args(["scan", ".", "-c", config.to_str().unwrap()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_parallelism_in_config_rejected() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("zero.yml");
        fs::write(&config, "parallelism: 0\n").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args(["scan", ".", "-c", config.to_str().unwrap()])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("parallelism"));
    }

    #[test]
    fn test_unknown_field_warns() {
        let dir = TempDir::new().unwrap();
        create_test_root(dir.path());
        let config = dir.path().join("extra.yml");
        fs::write(&config, "output: json\nexclude_packages: [rack]\n").unwrap();

        cargo_bin_cmd!("bomtrace")
            .args([
                "-q",
                "scan",
                dir.path().to_str().unwrap(),
                "-c",
                config.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stderr(predicate::str::contains("exclude_packages"));
    }
}
