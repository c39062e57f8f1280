use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub device: DeviceSettings,
    pub narrative: NarrativeSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DeviceSettings {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Answer from randomized data instead of calling the robot
    pub mock: bool,
}

impl DeviceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            timeout_ms: 500,
            mock: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NarrativeSettings {
    pub generate_url: String,
    pub tags_url: String,
    pub model: String,
    /// Human-readable model name printed in the report
    pub model_label: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            generate_url: "http://localhost:11434/api/generate".to_string(),
            tags_url: "http://localhost:11434/api/tags".to_string(),
            model: "gemma2:9b".to_string(),
            model_label: "Gemma 2 9B".to_string(),
            max_tokens: 3000,
            temperature: 0.7,
            timeout_secs: 120,
            health_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    /// Where each report's records are archived as CSV; empty disables the archive
    pub archive_dir: Option<PathBuf>,
}

impl ReportSettings {
    pub fn archive_dir(&self) -> Option<PathBuf> {
        self.archive_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            archive_dir: Some(PathBuf::from("archive")),
        }
    }
}

/// Load `config/pranbot.toml` (optional) overlaid with `PRANBOT_<SECTION>__<KEY>` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/pranbot").required(false))
        .add_source(
            config::Environment::with_prefix("PRANBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let config = AppConfig::default();
        assert_eq!(config.device.base_url, "http://192.168.4.1");
        assert_eq!(config.device.timeout(), Duration::from_millis(500));
        assert!(!config.device.mock);
        assert_eq!(config.narrative.model, "gemma2:9b");
        assert_eq!(config.server.bind, "0.0.0.0:5000");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[device]\nmock = true\n[narrative]\nmodel = \"llama3\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert!(config.device.mock);
        assert_eq!(config.device.timeout_ms, 500);
        assert_eq!(config.narrative.model, "llama3");
        assert_eq!(config.narrative.max_tokens, 3000);
        assert_eq!(config.report.archive_dir(), Some(PathBuf::from("archive")));
    }

    #[test]
    fn test_empty_archive_dir_disables_archive() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[report]\narchive_dir = \"\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.report.archive_dir(), None);
    }
}
