use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::narrative::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};
use crate::pipeline::ollama::DEFAULT_OLLAMA_URL;

/// Application-level constants
pub const APP_NAME: &str = "MedLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_TAXONOMY_PATH: &str = "resources/medical_keywords.csv";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma:4b";
pub const DEFAULT_TESSERACT_BIN: &str = "tesseract";
pub const DEFAULT_TESSERACT_LANG: &str = "eng";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "medlens=info,tower_http=info"
}

/// Per-user data directory (`<data_dir>/MedLens`).
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("GOOGLE_API_KEY must be set when MEDLENS_AI_PROVIDER is 'gemini'")]
    MissingApiKey,

    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Who writes the narrative commentary.
#[derive(Debug, Clone, PartialEq)]
pub enum AiProvider {
    Gemini {
        api_key: String,
        model: String,
        api_base: String,
    },
    Ollama,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrBackend {
    Ollama,
    Tesseract,
}

/// Settings resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub taxonomy_path: PathBuf,
    pub db_path: PathBuf,
    pub max_upload_bytes: usize,
    pub ai_provider: AiProvider,
    pub ocr_backend: OcrBackend,
    pub ollama_url: String,
    pub ollama_model: String,
    pub tesseract_bin: PathBuf,
    pub tesseract_lang: String,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn ai_provider_name(&self) -> &'static str {
        match self.ai_provider {
            AiProvider::Gemini { .. } => "gemini",
            AiProvider::Ollama => "ollama",
        }
    }

    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let addr_raw = get("MEDLENS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse::<SocketAddr>()
            .map_err(|e| invalid("MEDLENS_ADDR", &addr_raw, e))?;

        let max_upload_bytes = match get("MEDLENS_MAX_UPLOAD_MB") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| invalid("MEDLENS_MAX_UPLOAD_MB", &raw, e))?
                .checked_mul(1024 * 1024)
                .ok_or_else(|| invalid("MEDLENS_MAX_UPLOAD_MB", &raw, "too large"))?,
            None => DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        };

        let http_timeout_secs = match get("MEDLENS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| invalid("MEDLENS_HTTP_TIMEOUT_SECS", &raw, e))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let ai_provider = match get("MEDLENS_AI_PROVIDER").as_deref() {
            None | Some("gemini") => AiProvider::Gemini {
                api_key: get("GOOGLE_API_KEY").ok_or(ConfigurationError::MissingApiKey)?,
                model: get("MEDLENS_GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: get("MEDLENS_GEMINI_API_BASE")
                    .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            },
            Some("ollama") => AiProvider::Ollama,
            Some(other) => {
                return Err(invalid("MEDLENS_AI_PROVIDER", other, "expected 'gemini' or 'ollama'"))
            }
        };

        let ocr_backend = match get("MEDLENS_OCR").as_deref() {
            None | Some("ollama") => OcrBackend::Ollama,
            Some("tesseract") => OcrBackend::Tesseract,
            Some(other) => {
                return Err(invalid("MEDLENS_OCR", other, "expected 'ollama' or 'tesseract'"))
            }
        };

        Ok(Self {
            addr,
            taxonomy_path: get("MEDLENS_TAXONOMY")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TAXONOMY_PATH)),
            db_path: get("MEDLENS_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| app_data_dir().join("medlens.db")),
            max_upload_bytes,
            ai_provider,
            ocr_backend,
            ollama_url: get("MEDLENS_OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            ollama_model: get("MEDLENS_OLLAMA_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            tesseract_bin: get("MEDLENS_TESSERACT_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TESSERACT_BIN)),
            tesseract_lang: get("MEDLENS_TESSERACT_LANG")
                .unwrap_or_else(|| DEFAULT_TESSERACT_LANG.to_string()),
            http_timeout_secs,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigurationError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_with_api_key() {
        let cfg = config(&[("GOOGLE_API_KEY", "k")]).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(cfg.taxonomy_path, PathBuf::from("resources/medical_keywords.csv"));
        assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(cfg.ocr_backend, OcrBackend::Ollama);
        assert_eq!(cfg.ollama_url, "http://localhost:11434");
        assert_eq!(cfg.ollama_model, "medgemma:4b");
        assert_eq!(cfg.http_timeout_secs, 120);
        assert!(cfg.db_path.ends_with("medlens.db"));
        assert_eq!(
            cfg.ai_provider,
            AiProvider::Gemini {
                api_key: "k".into(),
                model: "gemini-1.5-flash".into(),
                api_base: GEMINI_API_BASE.into(),
            }
        );
    }

    #[test]
    fn gemini_requires_api_key() {
        assert_eq!(config(&[]).unwrap_err(), ConfigurationError::MissingApiKey);
        assert_eq!(
            config(&[("GOOGLE_API_KEY", "   ")]).unwrap_err(),
            ConfigurationError::MissingApiKey
        );
    }

    #[test]
    fn ollama_provider_needs_no_key() {
        let cfg = config(&[("MEDLENS_AI_PROVIDER", "ollama"), ("MEDLENS_OCR", "tesseract")]).unwrap();
        assert_eq!(cfg.ai_provider, AiProvider::Ollama);
        assert_eq!(cfg.ocr_backend, OcrBackend::Tesseract);
        assert_eq!(cfg.tesseract_bin, PathBuf::from("tesseract"));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("MEDLENS_AI_PROVIDER", "ollama"),
            ("MEDLENS_ADDR", "0.0.0.0:9000"),
            ("MEDLENS_DB", "/tmp/x.db"),
            ("MEDLENS_MAX_UPLOAD_MB", "2"),
            ("MEDLENS_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 9000);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.max_upload_bytes, 2 * 1024 * 1024);
        assert_eq!(cfg.http_timeout_secs, 5);
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = config(&[("MEDLENS_AI_PROVIDER", "ollama"), ("MEDLENS_ADDR", "localhost")])
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { var: "MEDLENS_ADDR", .. }));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = config(&[("MEDLENS_AI_PROVIDER", "openai")]).unwrap_err();
        assert!(err.to_string().contains("MEDLENS_AI_PROVIDER"));
    }

    #[test]
    fn bad_number_is_rejected() {
        let err = config(&[("MEDLENS_AI_PROVIDER", "ollama"), ("MEDLENS_MAX_UPLOAD_MB", "ten")])
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { var: "MEDLENS_MAX_UPLOAD_MB", .. }));
    }

    #[test]
    fn oversized_upload_limit_is_rejected() {
        let huge = usize::MAX.to_string();
        let err = config(&[("MEDLENS_AI_PROVIDER", "ollama"), ("MEDLENS_MAX_UPLOAD_MB", &huge)])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidValue {
                var: "MEDLENS_MAX_UPLOAD_MB",
                value: huge,
                reason: "too large".into(),
            }
        );
    }

    #[test]
    fn app_data_dir_is_named_after_app() {
        assert!(app_data_dir().ends_with("MedLens"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
