//! Console output for engine messages
//!
//! `Pretty` prints the familiar one-line progress log
//! (`Calling: ... offset=0`, `Result: ...`, `Finished ... (N total)`, with `?`
//! for a missing or zero total);
//! `Json` prints one timestamped JSON object per message.

use crate::engine::{LogLevel, Message};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress lines
    #[default]
    Pretty,
    /// JSON output (one message per line)
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    message: &'a Message,
}

/// Writes engine messages to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput {
    format: OutputFormat,
}

impl ConsoleOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render one message as a single line
    pub fn render(&self, message: &Message) -> String {
        match self.format {
            OutputFormat::Pretty => render_pretty(message),
            OutputFormat::Json => serde_json::to_string(&JsonLine {
                timestamp: Utc::now(),
                message,
            })
            .unwrap_or_default(),
        }
    }

    /// Print one message
    pub fn emit(&self, message: &Message) {
        println!("{}", self.render(message));
    }
}

fn render_pretty(message: &Message) -> String {
    match message {
        Message::Request {
            method,
            url,
            offset: Some(offset),
        } if method == "GET" => format!("Calling: {url} offset={offset}"),
        Message::Request { method, url, .. } => format!("{method}: {url}"),
        Message::PageResult { summary, .. } => format!("Result: {summary}"),
        Message::ActionResult { body, .. } => format!("Result: {body}"),
        Message::Finished {
            endpoint, total, ..
        } => {
            let total = total
                .filter(|t| *t > 0)
                .map_or_else(|| "?".to_string(), |t| t.to_string());
            format!("Finished {endpoint} ({total} total)")
        }
        Message::Log {
            level: LogLevel::Info,
            message,
        } => format!("==> {message}"),
        Message::Log {
            level: LogLevel::Warn,
            message,
        } => format!("warning: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(
        Message::request("GET", "https://app.example.com/api/cron/instagram-refresh", Some(40)),
        "Calling: https://app.example.com/api/cron/instagram-refresh offset=40" ; "paginated request"
    )]
    #[test_case(
        Message::request("POST", "https://app.example.com/api/cron/backfill-accrual", None),
        "POST: https://app.example.com/api/cron/backfill-accrual" ; "action request"
    )]
    #[test_case(
        Message::page_result("/api/cron/instagram-refresh", 0, "No IG usernames"),
        "Result: No IG usernames" ; "page result"
    )]
    #[test_case(
        Message::action_result("/api/cron/backfill-accrual", 200, r#"{"ok":true}"#),
        r#"Result: {"ok":true}"# ; "action result"
    )]
    #[test_case(
        Message::finished("/api/cron/instagram-refresh", Some(137), 7),
        "Finished /api/cron/instagram-refresh (137 total)" ; "finished with total"
    )]
    #[test_case(
        Message::finished("/api/cron/instagram-refresh", None, 1),
        "Finished /api/cron/instagram-refresh (? total)" ; "finished without total"
    )]
    #[test_case(
        Message::finished("/api/cron/instagram-refresh", Some(0), 1),
        "Finished /api/cron/instagram-refresh (? total)" ; "finished with zero total"
    )]
    #[test_case(Message::info("Job 1/2: /x"), "==> Job 1/2: /x" ; "info log")]
    #[test_case(Message::warn("slow"), "warning: slow" ; "warn log")]
    fn test_render_pretty(message: Message, expected: &str) {
        assert_eq!(ConsoleOutput::default().render(&message), expected);
    }

    #[test]
    fn test_render_json() {
        let output = ConsoleOutput::new(OutputFormat::Json);
        let line = output.render(&Message::finished("/api/cron/x", Some(3), 2));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["type"], "finished");
        assert_eq!(value["endpoint"], "/api/cron/x");
        assert_eq!(value["total"], 3);
        assert_eq!(value["pages"], 2);
        assert!(value["timestamp"].is_string());
    }
}
