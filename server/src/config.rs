use serde::Deserialize;
use std::net::SocketAddr;

use crate::progression::ProgressionSettings;
use crate::raiderio::{DEFAULT_REVALIDATE_SECONDS, RAIDER_IO_BASE_URL};

/// access key 환경 변수 (설정 파일 값보다 우선)
pub const ACCESS_KEY_ENV: &str = "RAIDERIO_ACCESS_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub web: Web,
    pub raiderio: RaiderIo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    pub host: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaiderIo {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub region: String,
    pub realm: String,
    pub guild: String,
    pub expansion_id: u32,
    pub raid_slug: String,
    #[serde(default = "default_revalidate_seconds")]
    pub revalidate_seconds: u64,
    #[serde(default)]
    pub access_key: Option<String>,
}

fn default_base_url() -> String {
    RAIDER_IO_BASE_URL.to_string()
}

fn default_revalidate_seconds() -> u64 {
    DEFAULT_REVALIDATE_SECONDS
}

impl Config {
    /// 환경 변수 값이 있으면 access key를 덮어씁니다. 빈 값은 무시
    pub fn with_access_key_override(mut self, env_value: Option<String>) -> Self {
        if let Some(key) = env_value.filter(|key| !key.trim().is_empty()) {
            self.raiderio.access_key = Some(key);
        }
        self
    }
}

impl RaiderIo {
    pub fn progression_settings(&self) -> ProgressionSettings {
        ProgressionSettings {
            region: self.region.clone(),
            realm: self.realm.clone(),
            guild: self.guild.clone(),
            expansion_id: self.expansion_id,
            raid_slug: self.raid_slug.clone(),
            revalidate_seconds: self.revalidate_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [web]
        host = "127.0.0.1:8000"

        [raiderio]
        region = "us"
        realm = "area-52"
        guild = "Example Guild"
        expansion_id = 10
        raid_slug = "manaforge-omega"
    "#;

    #[test]
    fn optional_fields_use_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.raiderio.base_url, RAIDER_IO_BASE_URL);
        assert_eq!(config.raiderio.revalidate_seconds, 3600);
        assert!(config.raiderio.access_key.is_none());
        assert_eq!(config.web.host.port(), 8000);

        let settings = config.raiderio.progression_settings();
        assert_eq!(settings.guild, "Example Guild");
        assert_eq!(settings.raid_slug, "manaforge-omega");
    }

    #[test]
    fn environment_key_overrides_file() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let config = config.with_access_key_override(Some("from-env".to_string()));
        assert_eq!(config.raiderio.access_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn empty_environment_key_keeps_file_value() {
        let toml = format!("{}\naccess_key = \"from-file\"\n", MINIMAL);
        let config: Config = toml::from_str(&toml).unwrap();
        let config = config.with_access_key_override(Some("  ".to_string()));
        assert_eq!(config.raiderio.access_key.as_deref(), Some("from-file"));

        let config = config.with_access_key_override(None);
        assert_eq!(config.raiderio.access_key.as_deref(), Some("from-file"));
    }
}
