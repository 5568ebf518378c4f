//! Integration tests for the sk CLI
//!
//! These tests require a running S3-compatible server.
//!
//! Run with:
//! ```bash
//! docker run -d --name minio -p 9000:9000 \
//!     -e MINIO_ROOT_USER=accesskey \
//!     -e MINIO_ROOT_PASSWORD=secretkey \
//!     minio/minio server /data
//!
//! TEST_S3_ENDPOINT=http://localhost:9000 \
//! TEST_S3_ACCESS_KEY=accesskey \
//! TEST_S3_SECRET_KEY=secretkey \
//! cargo test --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::{Command, Output};
use std::time::Duration;
use tempfile::TempDir;

/// Get the path to the sk binary
fn sk_binary() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_sk") {
        return std::path::PathBuf::from(path);
    }

    // Try debug first, then release
    let debug = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/debug/sk");

    if debug.exists() {
        return debug;
    }

    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/release/sk")
}

/// Run sk with an isolated config directory
fn run_sk(args: &[&str], config_dir: &std::path::Path) -> Output {
    let mut cmd = Command::new(sk_binary());
    cmd.args(args);
    cmd.env("SK_CONFIG_DIR", config_dir);
    cmd.output().expect("Failed to execute sk command")
}

/// Wait for the S3 service to respond to list requests
fn wait_for_s3_ready(config_dir: &std::path::Path) -> bool {
    for _ in 0..30 {
        let output = run_sk(&["ls", "test", "--json"], config_dir);
        if output.status.success() {
            return true;
        }
        std::thread::sleep(Duration::from_secs(1));
    }
    false
}

/// Get S3 test configuration from environment
fn get_test_config() -> Option<(String, String, String)> {
    let endpoint = std::env::var("TEST_S3_ENDPOINT").ok()?;
    let access_key = std::env::var("TEST_S3_ACCESS_KEY").ok()?;
    let secret_key = std::env::var("TEST_S3_SECRET_KEY").ok()?;
    Some((endpoint, access_key, secret_key))
}

/// Generate unique suffix for test resources
fn uuid_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}", duration.as_nanos() % 0xFFFFFFFF)
}

/// Test helper: set up the alias and wait for the server
fn setup_alias_only() -> Option<TempDir> {
    let (endpoint, access_key, secret_key) = get_test_config()?;
    let config_dir = tempfile::tempdir().ok()?;

    let output = run_sk(
        &[
            "alias",
            "set",
            "test",
            &endpoint,
            &access_key,
            &secret_key,
            "--bucket-lookup",
            "path",
        ],
        config_dir.path(),
    );

    if !output.status.success() {
        eprintln!(
            "Failed to set alias: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    if !wait_for_s3_ready(config_dir.path()) {
        eprintln!("S3 service did not become ready in time");
        return None;
    }

    Some(config_dir)
}

/// Test helper: alias plus a fresh bucket
fn setup_with_bucket(prefix: &str) -> Option<(TempDir, String)> {
    let config_dir = setup_alias_only()?;
    let bucket_name = format!("test-{}-{}", prefix, uuid_suffix());

    let output = run_sk(&["mb", &format!("test/{bucket_name}")], config_dir.path());
    if !output.status.success() {
        eprintln!(
            "Failed to create bucket: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    Some((config_dir, bucket_name))
}

/// Cleanup helper: delete bucket and all blobs
fn cleanup_bucket(config_dir: &std::path::Path, bucket: &str) {
    let _ = run_sk(&["rb", "--force", &format!("test/{bucket}")], config_dir);
}

mod alias_operations {
    use super::*;

    #[test]
    fn test_alias_set_list_remove() {
        let (endpoint, access_key, secret_key) = match get_test_config() {
            Some(c) => c,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let config_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let output = run_sk(
            &["alias", "set", "myalias", &endpoint, &access_key, &secret_key],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Failed to set alias: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let output = run_sk(&["alias", "list", "--json"], config_dir.path());
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("myalias"));
        assert!(stdout.contains(&endpoint));

        let output = run_sk(&["alias", "remove", "myalias"], config_dir.path());
        assert!(output.status.success());

        let output = run_sk(&["alias", "list", "--json"], config_dir.path());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains("myalias"));
    }

    #[test]
    fn test_unknown_alias_exits_not_found() {
        if get_test_config().is_none() {
            eprintln!("Skipping: S3 test config not available");
            return;
        }

        let config_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let output = run_sk(&["ls", "nosuchalias"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
    }
}

mod bucket_operations {
    use super::*;

    #[test]
    fn test_create_stat_and_delete_bucket() {
        let config_dir = match setup_alias_only() {
            Some(d) => d,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let bucket_name = format!("test-bucket-{}", uuid_suffix());

        let output = run_sk(
            &["mb", &format!("test/{bucket_name}"), "--json"],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Failed to create bucket: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("success"));
        assert!(stdout.contains(&bucket_name));

        let output = run_sk(&["ls", "test", "--json"], config_dir.path());
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(&bucket_name), "Bucket not found in listing");

        // Metadata record carries the bucket name and its labels map
        let output = run_sk(&["stat", &format!("test/{bucket_name}")], config_dir.path());
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(&bucket_name));
        assert!(stdout.contains("labels"));

        let output = run_sk(&["rb", &format!("test/{bucket_name}")], config_dir.path());
        assert!(output.status.success());

        let output = run_sk(&["ls", "test", "--json"], config_dir.path());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains(&bucket_name));
    }

    #[test]
    fn test_duplicate_bucket_conflicts() {
        let (config_dir, bucket_name) = match setup_with_bucket("dup") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let output = run_sk(&["mb", &format!("test/{bucket_name}")], config_dir.path());
        assert_eq!(output.status.code(), Some(6));

        cleanup_bucket(config_dir.path(), &bucket_name);
    }

    #[test]
    fn test_invalid_storage_class_rejected_locally() {
        let config_dir = match setup_alias_only() {
            Some(d) => d,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let output = run_sk(
            &[
                "mb",
                "test/never-created",
                "--class",
                "GLACIER",
                "--validate-class",
            ],
            config_dir.path(),
        );
        assert_eq!(output.status.code(), Some(2));
    }
}

mod label_operations {
    use super::*;

    #[test]
    fn test_label_set_list_clear() {
        let (config_dir, bucket_name) = match setup_with_bucket("label") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };
        let target = format!("test/{bucket_name}");

        let output = run_sk(
            &["label", "set", &target, "env=prod", "team=data"],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Failed to set labels: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let output = run_sk(&["label", "list", &target, "--json"], config_dir.path());
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("prod"));
        assert!(stdout.contains("data"));

        let output = run_sk(&["label", "clear", &target], config_dir.path());
        assert!(output.status.success());

        let output = run_sk(&["label", "list", &target, "--json"], config_dir.path());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(!stdout.contains("prod"));

        cleanup_bucket(config_dir.path(), &bucket_name);
    }

    #[test]
    fn test_label_with_uppercase_rejected() {
        let (config_dir, bucket_name) = match setup_with_bucket("badlabel") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };
        let target = format!("test/{bucket_name}");

        let output = run_sk(&["label", "set", &target, "Env=prod"], config_dir.path());
        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("lowercase"));

        cleanup_bucket(config_dir.path(), &bucket_name);
    }
}

mod blob_operations {
    use super::*;
    use std::fs;

    #[test]
    fn test_put_stat_get_rm_roundtrip() {
        let (config_dir, bucket_name) = match setup_with_bucket("blob") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = work_dir.path().join("hello.csv");
        fs::write(&source, "a,b\n1,2\n").expect("Failed to write source file");

        let remote = format!("test/{bucket_name}/data/hello.csv");

        let output = run_sk(
            &["put", source.to_str().unwrap(), &remote],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Upload failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        // csv gets its fixed content type
        let output = run_sk(&["stat", &remote], config_dir.path());
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("text/csv"));
        assert!(stdout.contains("hello.csv"));

        // Download mirrors the blob name under the folder
        let dest = work_dir.path().join("downloads");
        fs::create_dir(&dest).expect("Failed to create download dir");
        let output = run_sk(
            &["get", &remote, dest.to_str().unwrap()],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Download failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let downloaded = fs::read_to_string(dest.join("data/hello.csv"))
            .expect("Downloaded file missing");
        assert_eq!(downloaded, "a,b\n1,2\n");

        let output = run_sk(&["rm", &remote], config_dir.path());
        assert!(output.status.success());

        let output = run_sk(&["stat", &remote], config_dir.path());
        assert_eq!(output.status.code(), Some(5));

        cleanup_bucket(config_dir.path(), &bucket_name);
    }

    #[test]
    fn test_get_range_writes_slice() {
        let (config_dir, bucket_name) = match setup_with_bucket("range") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = work_dir.path().join("alphabet.txt");
        fs::write(&source, "abcdefghijklmnopqrstuvwxyz").expect("Failed to write source file");

        let remote = format!("test/{bucket_name}/alphabet.txt");
        let output = run_sk(
            &["put", source.to_str().unwrap(), &remote],
            config_dir.path(),
        );
        assert!(output.status.success());

        let dest = work_dir.path().join("out");
        fs::create_dir(&dest).expect("Failed to create download dir");
        let output = run_sk(
            &["get", &remote, dest.to_str().unwrap(), "--range", "0-4"],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Range download failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let slice = fs::read_to_string(dest.join("alphabet.txt")).expect("Slice file missing");
        assert_eq!(slice, "abcde");

        let _ = run_sk(&["rm", &remote], config_dir.path());
        cleanup_bucket(config_dir.path(), &bucket_name);
    }

    #[test]
    fn test_pull_downloads_whole_bucket() {
        let (config_dir, bucket_name) = match setup_with_bucket("pull") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        for name in ["one.txt", "two.txt"] {
            let source = work_dir.path().join(name);
            fs::write(&source, name).expect("Failed to write source file");
            let output = run_sk(
                &[
                    "put",
                    source.to_str().unwrap(),
                    &format!("test/{bucket_name}/{name}"),
                ],
                config_dir.path(),
            );
            assert!(output.status.success());
        }

        let dest = work_dir.path().join("mirror");
        fs::create_dir(&dest).expect("Failed to create download dir");
        let output = run_sk(
            &[
                "pull",
                &format!("test/{bucket_name}"),
                dest.to_str().unwrap(),
            ],
            config_dir.path(),
        );
        assert!(
            output.status.success(),
            "Pull failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(dest.join("one.txt").exists());
        assert!(dest.join("two.txt").exists());

        for name in ["one.txt", "two.txt"] {
            let _ = run_sk(&["rm", &format!("test/{bucket_name}/{name}")], config_dir.path());
        }
        cleanup_bucket(config_dir.path(), &bucket_name);
    }

    #[test]
    fn test_get_missing_folder_fails_before_transfer() {
        let (config_dir, bucket_name) = match setup_with_bucket("nofolder") {
            Some(v) => v,
            None => {
                eprintln!("Skipping: S3 test config not available");
                return;
            }
        };

        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = work_dir.path().join("f.txt");
        fs::write(&source, "x").expect("Failed to write source file");
        let remote = format!("test/{bucket_name}/f.txt");
        let output = run_sk(
            &["put", source.to_str().unwrap(), &remote],
            config_dir.path(),
        );
        assert!(output.status.success());

        let missing = work_dir.path().join("does-not-exist");
        let output = run_sk(
            &["get", &remote, missing.to_str().unwrap()],
            config_dir.path(),
        );
        assert_eq!(output.status.code(), Some(5));

        let _ = run_sk(&["rm", &remote], config_dir.path());
        cleanup_bucket(config_dir.path(), &bucket_name);
    }
}
