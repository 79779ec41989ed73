use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Settings read from `cognet.toml`, then overridden by the environment
/// (`COGNET_DATABASE`, `COGNET_HOST`, `COGNET_PORT`) and by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CognetConfig {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Allowed CORS origins; empty or `*` allows any origin
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors_origins: Vec<String>,
}

impl CognetConfig {
    /// Apply `COGNET_*` environment overrides
    pub fn with_env_overrides(self) -> anyhow::Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup("COGNET_DATABASE").filter(|v| !v.is_empty()) {
            self.database = Some(database);
        }
        if let Some(host) = lookup("COGNET_HOST").filter(|v| !v.is_empty()) {
            self.host = Some(host);
        }
        if let Some(port) = lookup("COGNET_PORT").filter(|v| !v.is_empty()) {
            let port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("COGNET_PORT is not a valid port: {}", port))?;
            self.port = Some(port);
        }
        Ok(self)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_database_path_in(Path::new(".")))
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid host address: {}", host))?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("cognet.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".cognet").join("cognet.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CognetConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CognetConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CognetConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_write_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cognet.toml");
        let config = CognetConfig {
            database: Some("data/cognet.db".into()),
            host: Some("127.0.0.1".into()),
            port: Some(8080),
            cors_origins: vec!["https://map.example".into()],
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        assert_eq!(load_config(Some(&path)).unwrap(), Some(config));
        assert_eq!(load_config(Some(&dir.path().join("missing.toml"))).unwrap(), None);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [("COGNET_PORT", "9000"), ("COGNET_HOST", "")].into();
        let config = CognetConfig {
            host: Some("127.0.0.1".into()),
            ..Default::default()
        }
        .with_overrides(|k| env.get(k).map(|v| v.to_string()))
        .unwrap();

        assert_eq!(config.bind_addr().unwrap(), "127.0.0.1:9000".parse().unwrap());

        let bad = CognetConfig::default().with_overrides(|k| (k == "COGNET_PORT").then(|| "http".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = CognetConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("./.cognet/cognet.db"));
        assert_eq!(config.bind_addr().unwrap().port(), DEFAULT_PORT);
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("cognet.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
