use anyhow::Context as _;
use serde_json::{Value, json};
use std::process::Stdio;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};
use tokio::process::{ChildStdin, ChildStdout, Command};
use unrelated_test_support::{TASKS_SPEC_YAML, write_spec};

struct StdioSession {
    stdin: ChildStdin,
    stdout: tokio::io::Lines<BufReader<ChildStdout>>,
}

impl StdioSession {
    async fn send(&mut self, msg: Value) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(&msg)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn response(&mut self, id: u64) -> anyhow::Result<Value> {
        loop {
            let line = tokio::time::timeout(Duration::from_secs(10), self.stdout.next_line())
                .await
                .context("timeout waiting for stdio response")??
                .context("explorer closed stdout")?;
            let msg: Value = serde_json::from_str(&line).context("parse stdio message")?;
            if msg.get("id") == Some(&json!(id)) {
                return Ok(msg);
            }
        }
    }

    async fn request(&mut self, id: u64, method: &str, params: Value) -> anyhow::Result<Value> {
        self.send(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .await?;
        self.response(id).await
    }
}

#[tokio::test]
async fn stdio_initialize_and_read() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let spec = write_spec(dir.path(), "tasks.yaml", TASKS_SPEC_YAML)?;

    let mut child = Command::new(env!("CARGO_BIN_EXE_unrelated-openapi-explorer-mcp"))
        .arg(&spec)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .context("spawn explorer")?;

    let mut session = StdioSession {
        stdin: child.stdin.take().context("child stdin")?,
        stdout: BufReader::new(child.stdout.take().context("child stdout")?).lines(),
    };

    let init = session
        .request(
            0,
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "unrelated-openapi-explorer-integration-tests", "version": "0" }
            }),
        )
        .await?;
    assert_eq!(
        init["result"]["serverInfo"]["name"],
        json!("unrelated-openapi-explorer-mcp")
    );
    assert!(init["result"]["capabilities"]["resources"].is_object());

    session
        .send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
        .await?;

    let msg = session
        .request(
            1,
            "resources/read",
            json!({ "uri": "openapi://endpoint/get,post/tasks" }),
        )
        .await?;
    let contents = msg["result"]["contents"]
        .as_array()
        .context("resources/read missing result.contents")?;
    let uris: Vec<&str> = contents.iter().filter_map(|c| c["uri"].as_str()).collect();
    assert_eq!(
        uris,
        ["openapi://endpoint/get/tasks", "openapi://endpoint/post/tasks"]
    );

    let post: Value = serde_json::from_str(
        contents[1]["text"]
            .as_str()
            .context("endpoint detail missing text")?,
    )?;
    assert_eq!(post["method"], json!("POST"));
    assert_eq!(
        post["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        json!("openapi://schema/CreateTaskRequest")
    );

    Ok(())
}
