use anyhow::Context as _;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

#[allow(unused_imports)]
pub use unrelated_test_support::KillOnDrop;

#[allow(dead_code)]
pub fn pick_unused_port() -> anyhow::Result<u16> {
    unrelated_test_support::pick_unused_port()
}

#[allow(dead_code)]
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    unrelated_test_support::wait_http_ok(url, timeout_dur).await
}

pub fn explorer_command(spec_path: &Path) -> Command {
    let bin = env!("CARGO_BIN_EXE_unrelated-openapi-explorer-mcp");
    let mut cmd = Command::new(bin);
    cmd.arg(spec_path)
        .arg("--log-level")
        .arg("info")
        .env_remove("RUST_LOG");
    cmd
}

#[allow(dead_code)]
pub fn spawn_explorer_http(
    spec_path: &Path,
    port: u16,
    extra_args: &[&str],
) -> anyhow::Result<Child> {
    explorer_command(spec_path)
        .arg("--transport")
        .arg("http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .args(extra_args)
        .stdin(Stdio::null())
        .spawn()
        .context("spawn explorer")
}

/// Start the explorer over HTTP and wait until `/health` answers.
#[allow(dead_code)]
pub async fn start_explorer_http(
    spec_path: &Path,
    extra_args: &[&str],
) -> anyhow::Result<(String, KillOnDrop)> {
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_explorer_http(spec_path, port, extra_args)?);

    let base_url = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base_url}/health"), Duration::from_secs(20)).await?;
    Ok((base_url, child))
}
