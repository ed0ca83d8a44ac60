// CLI commands talking to a running CodeJudge API
use anyhow::{bail, Context, Result};
use codejudge_common::review::ReviewReport;
use codejudge_common::types::{
    ErrorBody, Language, ReviewEnvelope, ReviewRequest, RunRequest, RunResult,
};
use reqwest::Client;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::render;

/// Explicit `--language` wins; otherwise infer from the file extension
pub fn resolve_language(file: &Path, explicit: Option<&str>) -> Result<String> {
    if let Some(lang) = explicit {
        return Ok(lang.to_ascii_lowercase());
    }

    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match Language::from_extension(ext) {
        Some(lang) => Ok(lang.to_string()),
        None => bail!(
            "Cannot infer language from '{}', pass --language (one of: {})",
            file.display(),
            Language::ALL
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn read_source(file: &Path) -> Result<String> {
    let code = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if code.trim().is_empty() {
        bail!("{} is empty", file.display());
    }
    Ok(code)
}

fn endpoint(server: &str, path: &str) -> String {
    format!("{}{}", server.trim_end_matches('/'), path)
}

/// Turn an error body from the API into an error
fn api_failure(status: reqwest::StatusCode, body: &Value) -> anyhow::Error {
    match serde_json::from_value::<ErrorBody>(body.clone()) {
        Ok(err) => match err.message {
            Some(message) => anyhow::anyhow!("{} ({}): {}", err.error, status, message),
            None => anyhow::anyhow!("{} ({})", err.error, status),
        },
        Err(_) => anyhow::anyhow!("Server returned {}: {}", status, body),
    }
}

async fn post_json<T: serde::Serialize>(
    client: &Client,
    url: &str,
    body: &T,
) -> Result<(reqwest::StatusCode, Value)> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("Could not connect to backend server at {}", url))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("Backend returned a non-JSON response")?;
    Ok((status, body))
}

/// GET / on the server and list its endpoints
pub async fn health(client: &Client, server: &str) -> Result<()> {
    let url = endpoint(server, "/");
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Could not connect to backend server at {}", url))?;

    if !response.status().is_success() {
        bail!("Health check failed: {}", response.status());
    }

    let body: Value = response.json().await.context("Invalid health response")?;
    println!(
        "✅ {}",
        body.get("message").and_then(Value::as_str).unwrap_or("Backend is running")
    );
    if let Some(endpoints) = body.get("endpoints").and_then(Value::as_object) {
        for (name, desc) in endpoints {
            println!("  {:<8} {}", name, desc.as_str().unwrap_or_default());
        }
    }
    Ok(())
}

/// Execute a source file through the server's `/run` proxy
pub async fn run_file(
    client: &Client,
    server: &str,
    file: &Path,
    language: Option<&str>,
    input: String,
    raw_json: bool,
) -> Result<()> {
    let language = resolve_language(file, language)?;
    let code = read_source(file)?;

    if !raw_json {
        println!("🚀 Running {} ({})...", file.display(), language);
    }

    let request = RunRequest {
        language: Some(language),
        code: Some(code),
        input: Some(input),
    };
    let (status, body) = post_json(client, &endpoint(server, "/run"), &request).await?;

    if raw_json {
        println!("{}", serde_json::to_string_pretty(&body)?);
        if !status.is_success() {
            return Err(api_failure(status, &body));
        }
        return Ok(());
    }

    if !status.is_success() {
        return Err(api_failure(status, &body));
    }

    let result: RunResult =
        serde_json::from_value(body).context("Unexpected execution result shape")?;
    let (text, ok) = render::render_run(&result);
    println!("{}", text);

    if !ok {
        bail!("❌ Execution failed");
    }
    Ok(())
}

/// Ask the server's `/review` proxy for an AI review of a source file
pub async fn review_file(
    client: &Client,
    server: &str,
    file: &Path,
    language: Option<&str>,
    problem: Option<String>,
    raw_json: bool,
) -> Result<()> {
    let language = resolve_language(file, language)?;
    let code = read_source(file)?;

    if !raw_json {
        println!("🤖 Sending {} for AI review...", file.display());
    }

    let request = ReviewRequest {
        language: Some(language),
        code: Some(code),
        problem_statement: problem,
    };
    let (status, body) = post_json(client, &endpoint(server, "/review"), &request).await?;

    if !status.is_success() {
        if raw_json {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        return Err(api_failure(status, &body));
    }

    if raw_json {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let envelope: ReviewEnvelope =
        serde_json::from_value(body).context("Unexpected review response shape")?;

    match serde_json::from_value::<ReviewReport>(envelope.review.clone()) {
        Ok(report) => {
            println!("{}", render::render_review(&report, &envelope.metadata)?);
        }
        Err(e) => {
            // The model strayed from the schema; show what it said
            eprintln!("⚠️  Review does not match the expected layout ({}), raw output:", e);
            println!("{}", serde_json::to_string_pretty(&envelope.review)?);
        }
    }
    Ok(())
}
