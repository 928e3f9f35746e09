use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub admin_key: Option<String>,
    pub storage: StorageBackend,
    pub max_body_size: usize,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Local { data_dir: PathBuf },
    S3(S3Config),
}

#[derive(Debug, Clone, PartialEq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO etc.).
    pub endpoint_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("SLAMBOOK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SLAMBOOK_HOST: {e}"))?;

        let port: u16 = env_or("SLAMBOOK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SLAMBOOK_PORT: {e}"))?;

        // An empty key counts as unconfigured.
        let admin_key = std::env::var("ADMIN_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let storage = match env_or("SLAMBOOK_STORAGE", "local").as_str() {
            "local" => StorageBackend::Local {
                data_dir: PathBuf::from(env_or("SLAMBOOK_DATA_DIR", "./data")),
            },
            "s3" => StorageBackend::S3(S3Config {
                bucket: env_or("S3_BUCKET_NAME", "slam-book-5"),
                region: env_or("AWS_REGION", "eu-north-1"),
                endpoint_url: std::env::var("S3_ENDPOINT_URL")
                    .ok()
                    .filter(|u| !u.trim().is_empty()),
            }),
            other => {
                return Err(format!(
                    "Invalid SLAMBOOK_STORAGE '{other}': expected 'local' or 's3'"
                ));
            }
        };

        let max_body_size: usize = env_or("SLAMBOOK_MAX_BODY_SIZE", "12582912")
            .parse()
            .map_err(|e| format!("Invalid SLAMBOOK_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("SLAMBOOK_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            admin_key,
            storage,
            max_body_size,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
