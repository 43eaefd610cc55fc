//! Helpers shared by the integration suites: process lifetime, ports, readiness polling and
//! fixture documents.

use anyhow::Context as _;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::time::{Duration, Instant};

/// A small task-tracking API exercising nested paths, batches and schema references.
pub const TASKS_SPEC_YAML: &str = r##"openapi: "3.0.3"
info:
  title: Task API
  version: "1.0.0"
paths:
  /tasks:
    get:
      summary: List tasks
      operationId: listTasks
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/TaskList"
    post:
      summary: Create a task
      operationId: createTask
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/CreateTaskRequest"
      responses:
        "201":
          description: Created
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Task"
  /api/v1/organizations/{orgId}/projects/{projectId}/tasks:
    get:
      operationId: listProjectTasks
      parameters:
        - name: orgId
          in: path
          required: true
          schema:
            type: string
        - name: projectId
          in: path
          required: true
          schema:
            type: string
      responses:
        "200":
          description: OK
components:
  schemas:
    Task:
      type: object
      required: [id, title]
      properties:
        id:
          type: string
        title:
          type: string
    TaskList:
      type: array
      items:
        $ref: "#/components/schemas/Task"
    CreateTaskRequest:
      type: object
      required: [title]
      properties:
        title:
          type: string
"##;

/// A Swagger 2.0 document: loads, but every request reports the unsupported version.
pub const SWAGGER_V2_JSON: &str = r#"{
  "swagger": "2.0",
  "info": { "title": "Legacy", "version": "1.0" },
  "paths": {}
}"#;

pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process to bind it
/// before you do.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
/// local address cannot be read.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status (2xx/3xx).
///
/// # Errors
///
/// Returns an error if the timeout elapses before the endpoint returns a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

/// Write a fixture document into `dir` and return its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_spec(dir: &Path, file_name: &str, content: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
