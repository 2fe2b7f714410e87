use std::env;
use std::path::PathBuf;

use anyhow::Context;

/// Uploads larger than this are rejected by the body limit layer.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
const DEFAULT_MODEL: &str = "qwen3-vl-plus";
const DEFAULT_UPLOAD_DIR: &str = "temp_uploads";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub bind_addr: String,
}

impl Config {
    /// Reads configuration from the environment. `DASHSCOPE_API_KEY` is the
    /// only required variable; everything else has a default.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("DASHSCOPE_API_KEY")
            .context("DASHSCOPE_API_KEY must be set (see .env)")?;

        Ok(Self {
            api_key,
            api_base_url: env::var("DASHSCOPE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("QWEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            upload_dir: env::var("UPLOAD_FOLDER")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
