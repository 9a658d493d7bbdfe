//! Layered server configuration.
//!
//! Settings are resolved from three layers, in priority order:
//!
//! 1. Compiled defaults — [`ParlorSettings::default()`]
//! 2. Settings file — JSON, every section optional
//! 3. `PARLOR_*` environment variables (highest priority)
//!
//! Secrets (API keys) are normally injected via the env layer rather than
//! written into the settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use parlor_mailer::MailerConfig;

/// HTTP server section.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Allowed CORS origins. `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["*".into()],
        }
    }
}

/// Storage section.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// Connection pool size.
    pub pool_size: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/chat.db"),
            pool_size: 4,
        }
    }
}

/// Completion service section.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL override. Default endpoint when unset.
    pub base_url: Option<String>,
    /// Model ID.
    pub model: String,
    /// API key. Usually injected via `PARLOR_LLM_API_KEY`.
    pub api_key: String,
    /// Bounded generation length.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Outer store-read cap for the context window.
    pub history_limit: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            model: parlor_llm::types::DEFAULT_MODEL.into(),
            api_key: String::new(),
            max_tokens: parlor_llm::types::DEFAULT_MAX_TOKENS,
            temperature: parlor_llm::types::DEFAULT_TEMPERATURE,
            history_limit: parlor_engine::DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Prompt assembly section.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory holding the prompt fragments.
    pub dir: PathBuf,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("prompts"),
        }
    }
}

/// Full settings tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParlorSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Storage settings.
    pub store: StoreSettings,
    /// Completion service settings.
    pub llm: LlmSettings,
    /// Mailer settings. Incomplete config disables outbound mail.
    pub mail: MailerConfig,
    /// Prompt assembly settings.
    pub prompts: PromptSettings,
}

impl ParlorSettings {
    /// Load settings: defaults, optionally merged with a JSON file, then
    /// `PARLOR_*` env overrides. A missing file is not an error; an
    /// unparsable one falls back to defaults with a warning.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let mut settings = path.map_or_else(Self::default, Self::from_file);
        settings.apply_env_overrides();
        settings
    }

    fn from_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Apply `PARLOR_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("PARLOR_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PARLOR_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!(value = %port, "ignoring unparsable PARLOR_PORT"),
            }
        }
        if let Ok(origins) = std::env::var("PARLOR_CORS_ORIGIN") {
            self.server.cors_origins = origins.split(',').map(str::to_owned).collect();
        }
        if let Ok(path) = std::env::var("PARLOR_DB_PATH") {
            self.store.db_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("PARLOR_PROMPTS_DIR") {
            self.prompts.dir = PathBuf::from(dir);
        }
        if let Ok(key) = std::env::var("PARLOR_LLM_API_KEY") {
            self.llm.api_key = key;
        }
        if let Ok(model) = std::env::var("PARLOR_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(key) = std::env::var("PARLOR_MAILGUN_API_KEY") {
            self.mail.api_key = key;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unsafe_code)] // std::env::set_var is unsafe in edition 2024
mod tests {
    use super::*;

    /// Tests that mutate process env must hold this lock — cargo runs
    /// tests in parallel threads.
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn defaults_are_sane() {
        let s = ParlorSettings::default();
        assert_eq!(s.server.host, "0.0.0.0");
        assert_eq!(s.server.port, 3000);
        assert_eq!(s.server.cors_origins, vec!["*"]);
        assert_eq!(s.store.pool_size, 4);
        assert_eq!(s.llm.model, "grok-3-fast");
        assert_eq!(s.llm.max_tokens, 500);
        assert_eq!(s.llm.history_limit, 10);
        assert!(!s.mail.is_complete());
        assert_eq!(s.prompts.dir, PathBuf::from("prompts"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let s = ParlorSettings::load(Some(Path::new("/nonexistent/settings.json")));
        assert_eq!(s.server.port, 3000);
    }

    #[test]
    fn file_overrides_defaults_per_section() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            serde_json::json!({
                "server": {"port": 8080},
                "llm": {"model": "grok-4"},
                "mail": {"domain": "mg.example.com"}
            })
            .to_string(),
        )
        .unwrap();

        let s = ParlorSettings::load(Some(&path));
        assert_eq!(s.server.port, 8080);
        // Untouched fields keep their defaults
        assert_eq!(s.server.host, "0.0.0.0");
        assert_eq!(s.llm.model, "grok-4");
        assert_eq!(s.mail.domain, "mg.example.com");
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let s = ParlorSettings::load(Some(&path));
        assert_eq!(s.server.port, 3000);
    }

    #[test]
    fn env_overrides_win_over_file() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server": {"port": 8080}}"#).unwrap();

        // The mutex above serializes env-mutating tests.
        unsafe {
            std::env::set_var("PARLOR_PORT", "9090");
            std::env::set_var("PARLOR_LLM_API_KEY", "secret");
        }
        let s = ParlorSettings::load(Some(&path));
        unsafe {
            std::env::remove_var("PARLOR_PORT");
            std::env::remove_var("PARLOR_LLM_API_KEY");
        }

        assert_eq!(s.server.port, 9090);
        assert_eq!(s.llm.api_key, "secret");
    }

    #[test]
    fn unparsable_port_env_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            std::env::set_var("PARLOR_PORT", "not-a-port");
        }
        let s = ParlorSettings::load(None);
        unsafe {
            std::env::remove_var("PARLOR_PORT");
        }
        assert_eq!(s.server.port, 3000);
    }

    #[test]
    fn cors_env_splits_on_commas() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe {
            std::env::set_var("PARLOR_CORS_ORIGIN", "https://a.com,https://b.com");
        }
        let s = ParlorSettings::load(None);
        unsafe {
            std::env::remove_var("PARLOR_CORS_ORIGIN");
        }
        assert_eq!(s.server.cors_origins, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn settings_roundtrip_through_json() {
        let s = ParlorSettings::default();
        let json = serde_json::to_string(&s).unwrap();
        let back: ParlorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.server.port, s.server.port);
        assert_eq!(back.store.db_path, s.store.db_path);
    }
}
