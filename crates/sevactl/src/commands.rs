//! Command implementations: thin HTTP calls against the daemon.

use anyhow::{anyhow, Context, Result};
use owo_colors::OwoColorize;
use serde::Deserialize;
use seva_common::types::UnansweredConversation;

fn base_url(addr: &str) -> String {
    format!("http://{}", addr)
}

fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .context("failed to create HTTP client")
}

#[derive(Deserialize)]
struct ChatResponse {
    answer: String,
}

pub async fn ask(addr: &str, message: &str) -> Result<()> {
    let response = client()?
        .post(format!("{}/v1/chat", base_url(addr)))
        .json(&serde_json::json!({ "message": message }))
        .send()
        .await
        .context("is sevad running?")?;

    if !response.status().is_success() {
        return Err(anyhow!("daemon returned HTTP {}", response.status()));
    }

    let chat: ChatResponse = response.json().await?;
    println!("{}", chat.answer);
    Ok(())
}

#[derive(Deserialize)]
struct UnansweredResponse {
    conversations: Vec<UnansweredConversation>,
}

pub async fn unanswered_list(addr: &str) -> Result<()> {
    let response = client()?
        .get(format!("{}/v1/unanswered", base_url(addr)))
        .send()
        .await
        .context("is sevad running?")?;

    if !response.status().is_success() {
        return Err(anyhow!("daemon returned HTTP {}", response.status()));
    }

    let body: UnansweredResponse = response.json().await?;
    if body.conversations.is_empty() {
        println!("{}", "No unanswered conversations.".green());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} unanswered conversation(s):", body.conversations.len()).bold()
    );
    for conv in body.conversations {
        println!(
            "  {} [{}] {}",
            format!("#{}", conv.id).cyan(),
            conv.timestamp.format("%Y-%m-%d %H:%M"),
            conv.query
        );
        if let Some(answer) = conv.answer {
            let preview: String = answer.chars().take(120).collect();
            println!("      {} {}", "best effort:".dimmed(), preview.dimmed());
        }
    }
    Ok(())
}

pub async fn unanswered_clear(addr: &str, id: i64) -> Result<()> {
    let response = client()?
        .delete(format!("{}/v1/unanswered/{}", base_url(addr), id))
        .send()
        .await
        .context("is sevad running?")?;

    let status = response.status();
    if status.is_success() {
        println!("{}", format!("Cleared entry #{}.", id).green());
        Ok(())
    } else if status == reqwest::StatusCode::NOT_FOUND {
        Err(anyhow!("no unanswered entry with id {}", id))
    } else {
        Err(anyhow!("daemon returned HTTP {}", status))
    }
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

pub async fn health(addr: &str) -> Result<()> {
    let response = client()?
        .get(format!("{}/v1/health", base_url(addr)))
        .send()
        .await
        .context("is sevad running?")?;

    let body: HealthResponse = response.json().await?;
    println!(
        "{} sevad v{} ({}), up {}s",
        "OK".green().bold(),
        body.version,
        body.status,
        body.uptime_secs
    );
    Ok(())
}
