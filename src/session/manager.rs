use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use crate::session::history::{MessageRecord, Sender};

/// The in-memory conversation log. Nothing here touches disk except
/// [`SessionManager::export`].
#[derive(Debug, Default)]
pub struct SessionManager {
    messages: Vec<MessageRecord>,
}

impl SessionManager {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(MessageRecord {
            sender,
            text: text.into(),
            timestamp_ms: Utc::now().timestamp_millis(),
        });
    }

    pub fn clear(&mut self) { self.messages.clear(); }

    pub fn messages(&self) -> &[MessageRecord] { &self.messages }

    pub fn len(&self) -> usize { self.messages.len() }

    pub fn is_empty(&self) -> bool { self.messages.is_empty() }

    /// Writes the log as pretty JSON to `dir/session-<millis>.json`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        if self.is_empty() {
            anyhow::bail!("No messages yet.");
        }
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create export directory at {}", dir.display()))?;
        }
        let path = dir.join(export_file_name(Utc::now().timestamp_millis()));
        let content = serde_json::to_string_pretty(&self.messages)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write session log at {}", path.display()))?;
        debug!(path = %path.display(), count = self.len(), "exported session");
        Ok(path)
    }
}

pub fn export_file_name(millis: i64) -> String {
    format!("session-{}.json", millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_clear_empties() {
        let mut s = SessionManager::new();
        s.push(Sender::User, "a");
        s.push(Sender::Assistant, "b");
        assert_eq!(s.len(), 2);
        assert_eq!(s.messages()[0].sender, Sender::User);
        assert_eq!(s.messages()[1].text, "b");
        assert!(s.messages()[0].timestamp_ms <= s.messages()[1].timestamp_ms);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn empty_log_is_not_exported() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionManager::new().export(dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "No messages yet.");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_writes_full_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = SessionManager::new();
        s.push(Sender::User, "hello");
        s.push(Sender::Assistant, "Hi there");
        let path = s.export(&dir.path().join("logs")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("session-") && name.ends_with(".json"));
        let back: Vec<MessageRecord> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, s.messages());
    }
}
