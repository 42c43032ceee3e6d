use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub session_path: PathBuf,
    pub ai: AiConfig,
    /// Tracing filter directive, e.g. `info` or `finbr=debug`.
    pub log_filter: String,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (silently ignored if missing)
        let _ = dotenvy::dotenv();

        let data_dir = match env::var("FINBR_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = env::var("FINBR_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("finbr.db"));
        let session_path = data_dir.join("session.json");

        let timeout_secs = env::var("FINBR_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        let ai = AiConfig {
            api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            text_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: env::var("GEMINI_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        let log_filter = env::var("FINBR_LOG").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            data_dir,
            db_path,
            session_path,
            ai,
            log_filter,
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finbr", "finbr")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
