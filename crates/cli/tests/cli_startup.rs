use std::io::Write;
use std::net::TcpListener;
use std::process::Output;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::time::timeout;

/// Find a local port with nothing listening on it
fn get_closed_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Config pointing the catalog at a closed local port
fn unreachable_catalog_config() -> NamedTempFile {
    let port = get_closed_port();
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(
        temp_file,
        r#"
[catalog]
base_url = "http://127.0.0.1:{}"
timeout_secs = 2
"#,
        port
    )
    .unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Run the binary with `args` and wait for it to exit
async fn run_cli(config: Option<&std::path::Path>, args: &[&str]) -> Output {
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_bookshelf"));
    command.args(args).env("RUST_LOG", "error").env_remove("BOOKSHELF_CONFIG");
    if let Some(path) = config {
        command.env("BOOKSHELF_CONFIG", path);
    }

    timeout(Duration::from_secs(20), command.output())
        .await
        .expect("Command timed out")
        .expect("Failed to execute command")
}

#[tokio::test]
async fn test_cover_prints_url() {
    let result = run_cli(None, &["cover", "12345", "--size", "M"]).await;

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(
        stdout.trim(),
        "https://covers.openlibrary.org/b/id/12345-M.jpg"
    );
}

#[tokio::test]
async fn test_cover_unknown_size_falls_back_to_small() {
    let result = run_cli(None, &["cover", "12345", "--size", "X"]).await;

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.trim().ends_with("12345-S.jpg"));
}

#[tokio::test]
async fn test_cover_sentinel_has_no_url() {
    let result = run_cli(None, &["cover", "-1"]).await;

    assert!(result.status.success());
    assert_eq!(String::from_utf8_lossy(&result.stdout).trim(), "no cover");
}

#[tokio::test]
async fn test_search_without_criteria_exits_with_error() {
    let result = run_cli(None, &["search", "--title", "   "]).await;

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_search_with_unreachable_catalog_uses_fallback() {
    let config = unreachable_catalog_config();
    let result = run_cli(Some(config.path()), &["--json", "search", "--title", "gatsby"]).await;

    assert!(result.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&result.stdout).expect("Failed to parse JSON");
    assert_eq!(json["fallback"], true);
    assert_eq!(json["numFound"], 1);
    assert_eq!(json["docs"][0]["title"], "The Great Gatsby");
}

#[tokio::test]
async fn test_details_with_unreachable_catalog_fails() {
    let config = unreachable_catalog_config();
    let result = run_cli(Some(config.path()), &["details", "OL468431W"]).await;

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_env_overrides_apply_without_config_file() {
    let workdir = tempfile::tempdir().unwrap();
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_bookshelf"));
    command
        .args(["cover", "42"])
        .current_dir(workdir.path())
        .env("RUST_LOG", "error")
        .env_remove("BOOKSHELF_CONFIG")
        .env("BOOKSHELF_CATALOG__COVERS_URL", "http://covers.local");

    let result = timeout(Duration::from_secs(20), command.output())
        .await
        .expect("Command timed out")
        .expect("Failed to execute command");

    assert!(result.status.success());
    assert_eq!(
        String::from_utf8_lossy(&result.stdout).trim(),
        "http://covers.local/b/id/42-S.jpg"
    );
}

#[tokio::test]
async fn test_search_rejects_zero_limit() {
    let result = run_cli(None, &["search", "--title", "Dune", "--limit", "0"]).await;

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = run_cli(
        Some(std::path::Path::new("/nonexistent/bookshelf.toml")),
        &["cover", "1"],
    )
    .await;

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[catalog]\ntimeout_secs = 0\n")
        .unwrap();
    temp_file.flush().unwrap();

    let result = run_cli(Some(temp_file.path()), &["cover", "1"]).await;

    assert!(!result.status.success());
}
