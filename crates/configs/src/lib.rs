use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file the store collection is persisted to.
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_path: default_data_path() }
    }
}

fn default_data_path() -> String { "data/stores.json".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML wins; the env var only fills a blank path.
        if self.data_path.trim().is_empty() {
            if let Ok(path) = std::env::var("STORE_DATA_PATH") {
                self.data_path = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_path.trim().is_empty() {
            return Err(anyhow!(
                "storage.data_path is empty; set it in config.toml or via STORE_DATA_PATH"
            ));
        }
        if !self.data_path.ends_with(".json") {
            return Err(anyhow!("storage.data_path must point at a .json file"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().expect("defaults validate");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.data_path, "data/stores.json");
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [storage]
            data_path = "var/stores.json"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.storage.data_path, "var/stores.json");
    }

    #[test]
    fn rejects_non_json_data_path() {
        let cfg = StorageConfig { data_path: "data/stores.db".into() };
        assert!(cfg.validate().is_err());
    }
}
