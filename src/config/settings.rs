use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = ".chatpost";
pub const CONFIG_FILE_NAME: &str = "chatpost.toml";
pub const ENDPOINT_ENV: &str = "CHATPOST_ENDPOINT";

pub const DEFAULT_REPLY_FIELDS: [&str; 4] = ["reply", "message", "response", "text"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheme and host of the chat server
    pub base_url: String,
    /// Route appended to `base_url`
    pub path: String,
    /// HTTP method used for both the JSON attempt and the form fallback
    pub method: String,
    /// Name of the single body field carrying the prompt
    pub field_name: String,
    /// Response keys checked, in order, for the reply text
    pub reply_fields: Vec<String>,
    /// Where `/export` writes session logs
    pub export_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            path: "/chat".to_string(),
            method: "POST".to_string(),
            field_name: "message".to_string(),
            reply_fields: DEFAULT_REPLY_FIELDS.iter().map(|s| s.to_string()).collect(),
            export_dir: None,
        }
    }
}

impl Settings {
    pub fn load_with(project_root: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(project_root, explicit)?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let value: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config TOML at {}", path.display()))?;
        Ok(value)
    }

    pub fn save_with(&self, project_root: Option<&Path>, explicit: Option<&Path>) -> Result<()> {
        let (dir, path) = resolve_config_dir_and_file(project_root, explicit)?;
        if !dir.exists() {
            fs::create_dir_all(&dir).with_context(|| format!(
                "Failed to create config directory at {}",
                dir.display()
            ))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    pub fn init_scoped(force: bool, project_root: Option<&Path>) -> Result<PathBuf> {
        let (_, file) = resolve_config_dir_and_file(project_root, None)?;
        if file.exists() && !force {
            anyhow::bail!("Config already exists at {} (use --force to overwrite)", file.display());
        }
        Self::default().save_with(project_root, None)?;
        Ok(file)
    }

    /// Explicit path, else `./chatpost.toml` when present, else the user file.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(p) = explicit {
            return Ok(p.to_path_buf());
        }
        let project = std::env::current_dir()?.join(CONFIG_FILE_NAME);
        if project.exists() {
            return Ok(project);
        }
        resolve_config_path(None, None)
    }

    /// Full URL the dispatcher posts to. `CHATPOST_ENDPOINT` wins over the file.
    pub fn endpoint(&self) -> String {
        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            if !url.trim().is_empty() {
                return url.trim().to_string();
            }
        }
        build_endpoint(&self.base_url, &self.path)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base-url" | "base_url" => self.base_url = value.to_owned(),
            "path" => self.path = value.to_owned(),
            "method" => self.method = value.to_uppercase(),
            "field" | "field-name" | "field_name" => self.field_name = value.to_owned(),
            "reply-fields" | "reply_fields" => {
                self.reply_fields = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect();
            }
            "export-dir" | "export_dir" => self.export_dir = Some(value.to_owned()),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}

pub fn build_endpoint(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return base_url.to_string();
    }
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn config_dir_path() -> Result<PathBuf> {
    let home = home_dir().context("Cannot resolve home directory")?;
    Ok(home.join(APP_DIR_NAME))
}

fn resolve_config_path(project_root: Option<&Path>, explicit: Option<&Path>) -> Result<PathBuf> {
    Ok(resolve_config_dir_and_file(project_root, explicit)?.1)
}

fn resolve_config_dir_and_file(project_root: Option<&Path>, explicit: Option<&Path>) -> Result<(PathBuf, PathBuf)> {
    if let Some(p) = explicit {
        let dir = p.parent().unwrap_or_else(|| Path::new("."));
        return Ok((dir.to_path_buf(), p.to_path_buf()));
    }
    if let Some(root) = project_root {
        return Ok((root.to_path_buf(), root.join(CONFIG_FILE_NAME)));
    }
    let dir = config_dir_path()?;
    Ok((dir.clone(), dir.join(CONFIG_FILE_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(build_endpoint("http://h:1/", "/chat"), "http://h:1/chat");
        assert_eq!(build_endpoint("http://h:1", "chat"), "http://h:1/chat");
        assert_eq!(build_endpoint("http://h:1/api", ""), "http://h:1/api");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let s: Settings = toml::from_str("field_name = \"q\"").unwrap();
        assert_eq!(s.field_name, "q");
        assert_eq!(s.path, "/chat");
        assert_eq!(s.reply_fields, vec!["reply", "message", "response", "text"]);
    }

    #[test]
    fn set_parses_reply_field_list() {
        let mut s = Settings::default();
        s.set("reply-fields", "answer, text ,").unwrap();
        assert_eq!(s.reply_fields, vec!["answer", "text"]);
        s.set("method", "put").unwrap();
        assert_eq!(s.method, "PUT");
        assert!(s.set("nope", "x").is_err());
    }

    #[test]
    fn save_then_load_in_project_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = Settings::default();
        s.path = "/api/chat".into();
        s.save_with(Some(dir.path()), None).unwrap();
        let loaded = Settings::load_with(Some(dir.path()), None).unwrap();
        assert_eq!(loaded, s);
        assert!(Settings::init_scoped(false, Some(dir.path())).is_err());
    }
}
