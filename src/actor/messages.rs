//! Message types for the build stream.
//!
//! Inbound [`ChannelEvent`]s arrive from the deployment's channel;
//! outbound [`LifecycleEvent`]s go to whoever subscribed to the logger.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Kind of a log entry, from its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LogKind {
    /// A build command being started.
    Command,
    /// Standard output of the running command.
    Stdout,
    /// Standard error of the running command.
    Stderr,
    /// A tag this crate does not render.
    Other(String),
}

impl From<String> for LogKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "command" => Self::Command,
            "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            _ => Self::Other(tag),
        }
    }
}

/// One `{type, data}` unit of build output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEntry {
    /// What the payload is.
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// The payload, possibly spanning several lines.
    #[serde(default)]
    pub data: String,
}

impl LogEntry {
    /// Create an entry.
    pub fn new(kind: LogKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// A command echo entry.
    pub fn command(data: impl Into<String>) -> Self {
        Self::new(LogKind::Command, data)
    }

    /// A stdout chunk.
    pub fn stdout(data: impl Into<String>) -> Self {
        Self::new(LogKind::Stdout, data)
    }

    /// A stderr chunk.
    pub fn stderr(data: impl Into<String>) -> Self {
        Self::new(LogKind::Stderr, data)
    }
}

/// Point-in-time description of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StateSnapshot {
    /// Deployment identifier; `None` when the deployment does not exist.
    #[serde(default, deserialize_with = "identifier")]
    pub id: Option<String>,
    /// The deployment reported an error.
    #[serde(default, deserialize_with = "truthy")]
    pub error: bool,
    /// The build already finished and its backend is ready.
    #[serde(default, deserialize_with = "truthy")]
    pub backend: bool,
    /// Log entries produced so far.
    #[serde(default)]
    pub logs: Option<Vec<LogEntry>>,
}

impl StateSnapshot {
    /// A snapshot of an existing deployment with no flags set.
    pub fn found(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Attach a batch of log entries.
    #[must_use]
    pub fn with_logs(mut self, logs: Vec<LogEntry>) -> Self {
        self.logs = Some(logs);
        self
    }
}

/// Events delivered by a deployment channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The transport reported a problem. Advisory only.
    TransportError(String),
    /// A status snapshot.
    State(StateSnapshot),
    /// A single log entry.
    Logs(LogEntry),
    /// The build finished and the artifact is ready.
    Backend,
}

/// Why a deployment run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentFailure {
    /// The channel has no deployment for the host.
    NotFound,
    /// The deployment reported an error.
    Errored,
}

impl DeploymentFailure {
    /// The message printed to stderr for this failure.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "> Deployment not found",
            Self::Errored => "> Deployment error",
        }
    }
}

/// Notifications the logger emits to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The deployment was not found or reported an error.
    Error(DeploymentFailure),
    /// The build finished and the channel was released.
    Close,
}

/// Read a flag with JavaScript truthiness.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// Read an identifier, treating empty and falsy values as missing.
fn identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !is_truthy(&value) {
        return Ok(None);
    }
    Ok(Some(match value {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_kind_from_tag() {
        assert_eq!(LogKind::from("command".to_string()), LogKind::Command);
        assert_eq!(LogKind::from("stdout".to_string()), LogKind::Stdout);
        assert_eq!(LogKind::from("stderr".to_string()), LogKind::Stderr);
        assert_eq!(
            LogKind::from("progress".to_string()),
            LogKind::Other("progress".to_string())
        );
    }

    #[test]
    fn test_log_entry_decodes_type_tag() {
        let entry: LogEntry = serde_json::from_str(r#"{"type":"stdout","data":"ok\ndone"}"#).unwrap();
        assert_eq!(entry, LogEntry::stdout("ok\ndone"));
    }

    #[test]
    fn test_log_entry_data_defaults_empty() {
        let entry: LogEntry = serde_json::from_str(r#"{"type":"command"}"#).unwrap();
        assert_eq!(entry.data, "");
    }

    #[test]
    fn test_snapshot_missing_id() {
        let snapshot: StateSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.id, None);
        assert!(!snapshot.error);
        assert!(!snapshot.backend);
    }

    #[test]
    fn test_snapshot_empty_id_is_missing() {
        let snapshot: StateSnapshot = serde_json::from_str(r#"{"id":""}"#).unwrap();
        assert_eq!(snapshot.id, None);
    }

    #[test]
    fn test_snapshot_numeric_id() {
        let snapshot: StateSnapshot = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(snapshot.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_snapshot_flags_are_truthy() {
        let snapshot: StateSnapshot =
            serde_json::from_str(r#"{"id":"dpl_1","error":"boom","backend":{"url":"x"}}"#).unwrap();
        assert!(snapshot.error);
        assert!(snapshot.backend);

        let snapshot: StateSnapshot =
            serde_json::from_str(r#"{"id":"dpl_1","error":null,"backend":0}"#).unwrap();
        assert!(!snapshot.error);
        assert!(!snapshot.backend);
    }

    #[test]
    fn test_snapshot_logs() {
        let snapshot: StateSnapshot = serde_json::from_str(
            r#"{"id":"dpl_1","logs":[{"type":"command","data":"npm install"}]}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot,
            StateSnapshot::found("dpl_1").with_logs(vec![LogEntry::command("npm install")])
        );
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(DeploymentFailure::NotFound.message(), "> Deployment not found");
        assert_eq!(DeploymentFailure::Errored.message(), "> Deployment error");
    }
}
