use serde::Deserialize;

use crate::profile::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Where the key/value blobs live.
#[derive(Debug, Clone, Deserialize)]
pub enum StoreConfig {
    Memory,
    Fs { dir: String },
    S3(S3Config),
}

impl StoreConfig {
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Fs { .. } => "fs",
            Self::S3(_) => "s3",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub default_language: Language,
    pub ai_model: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "fs".into());
        let store = match backend.as_str() {
            "memory" => StoreConfig::Memory,
            "fs" => StoreConfig::Fs {
                dir: std::env::var("STORE_DIR").unwrap_or_else(|_| "./data".into()),
            },
            "s3" => StoreConfig::S3(S3Config {
                endpoint: std::env::var("MINIO_ENDPOINT")?,
                bucket: std::env::var("MINIO_BUCKET")?,
                access_key: std::env::var("MINIO_ACCESS_KEY")?,
                secret_key: std::env::var("MINIO_SECRET_KEY")?,
                region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
            }),
            other => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        };

        let default_language = std::env::var("DEFAULT_LANGUAGE")
            .ok()
            .and_then(|v| Language::from_code(&v))
            .unwrap_or_default();

        let ai_model =
            std::env::var("AI_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".into());

        Ok(Self {
            store,
            default_language,
            ai_model,
        })
    }
}
