//! test-support: helpers for robust, nextest-friendly tests of `gitlab-label-report`.
//!
//! Added as a dev-dependency in the top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support", features = ["serde"] }
//! ```
//!
//! Then in tests:
//! ```rust,ignore
//! use test_support::{init_tracing, cmd_bin, write_config};
//!
//! #[test]
//! fn example() {
//!     init_tracing();
//!     let td = test_support::tempdir();
//!     let cfg = write_config(td.path(), &[("Web", "42")]);
//!     let _cmd = cmd_bin("gitlab-label-report");
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// Uses the support crate's manifest dir (`<repo>/tests/support`), so it's stable
/// regardless of the runner's working directory (cargo vs nextest).
pub fn fixtures_dir() -> PathBuf {
    let support_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    support_dir
        .parent()
        .map(|tests| tests.join("fixtures"))
        .unwrap_or_else(|| support_dir.join("fixtures"))
}

/// Read a fixture file as UTF-8 text.
pub fn read_fixture_string<P: AsRef<Path>>(rel_path: P) -> String {
    let path = fixtures_dir().join(rel_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Deserialize a JSON fixture into `T` (enable `serde` feature).
#[cfg(feature = "serde")]
pub fn read_fixture_json<T, P>(rel_path: P) -> T
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = fixtures_dir().join(rel_path);
    let file = std::fs::File::open(&path)
        .unwrap_or_else(|e| panic!("failed to open fixture {}: {e}", path.display()));
    serde_json::from_reader::<_, T>(file)
        .unwrap_or_else(|e| panic!("failed to parse JSON fixture {}: {e}", path.display()))
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Write a minimal `config.toml` into `dir` with the given `(display key, project id)` pairs.
///
/// Integer-looking ids are written as TOML integers, anything else as strings.
pub fn write_config(dir: &Path, projects: &[(&str, &str)]) -> PathBuf {
    let mut text = String::from(
        "[gitlab]\nurl = \"https://gitlab.invalid\"\napi_token = \"test-token\"\n\n\
         [gsheets]\nspreadsheet_url = \"https://docs.google.com/spreadsheets/d/test-sheet-id/edit\"\n\n\
         [projects]\n",
    );
    for (key, id) in projects {
        if id.parse::<i64>().is_ok() {
            text.push_str(&format!("\"{key}\" = {id}\n"));
        } else {
            text.push_str(&format!("\"{key}\" = \"{id}\"\n"));
        }
    }
    let path = dir.join("config.toml");
    std::fs::write(&path, text).expect("write config.toml");
    path
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
///
/// Example:
/// ```ignore
/// use test_support::cmd_bin;
///
/// let mut cmd = cmd_bin("gitlab-label-report");
/// cmd.arg("--help").assert().success();
/// ```
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    let mut cmd = assert_cmd::Command::cargo_bin(bin).expect("binary target not found");
    // Keep real credentials and fixtures from the developer's shell out of CLI tests.
    cmd.env_remove("GOOGLE_OAUTH_ACCESS_TOKEN");
    cmd.env_remove("GLR_TEST_GITLAB_JSON");
    cmd.env_remove("GLR_TEST_SHEET_OUT");
    cmd
}
