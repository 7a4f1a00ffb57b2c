// filepath: src/config.rs
//! Configuration handling for oled-status
//!
//! This file defines the configuration structure and provides
//! functionality to load and save configuration from/to files.
//! Widget placement lives in per-widget TOML tables that each widget
//! parses itself in `Widget::init`.

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

/// Which panel driver to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Ssd1306,
    Headless,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub backend: Backend,
    pub i2c_bus: String,
    /// Panel size for the headless backend; the SSD1306 reports its own
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Ssd1306,
            i2c_bus: "/dev/i2c-1".to_string(),
            width: 128,
            height: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Delay between cycles when no widget blocks on a sampling window
    pub idle_delay_ms: u64,
    pub cpu_sample_ms: u64,
    pub service_timeout_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            idle_delay_ms: 1000,
            cpu_sample_ms: 1000,
            service_timeout_ms: 2000,
        }
    }
}

impl RenderConfig {
    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }

    pub fn cpu_sample(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_millis(self.service_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WidgetsConfig {
    /// Widgets to draw, in drawing order
    #[serde(default)]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub config: HashMap<String, toml::Table>,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default = "default_widgets")]
    pub widgets: WidgetsConfig,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            render: RenderConfig::default(),
            widgets: default_widgets(),
        }
    }
}

fn default_widgets() -> WidgetsConfig {
    let mut config = HashMap::new();
    config.insert("uptime".to_string(), anchor(2, 2));
    config.insert("clock".to_string(), anchor(2, 2));

    let mut services = anchor(2, 20);
    let units = [
        ("nginx.service", "NGX"),
        ("home-assistant.service", "HAS"),
        ("grafana-server.service", "GRA"),
        ("pyload.service", "PYL"),
        ("raspyrfm.service", "RPY"),
    ]
    .iter()
    .map(|(id, label)| {
        toml::Value::Array(vec![
            toml::Value::String(id.to_string()),
            toml::Value::String(label.to_string()),
        ])
    })
    .collect();
    services.insert("services".to_string(), toml::Value::Array(units));
    config.insert("services".to_string(), services);

    let mut cpu = anchor(2, 40);
    cpu.insert("bar_height".to_string(), toml::Value::Integer(3));
    cpu.insert("padding".to_string(), toml::Value::Integer(1));
    cpu.insert(
        "orientation".to_string(),
        toml::Value::String("horizontal".to_string()),
    );
    cpu.insert("per_core".to_string(), toml::Value::Boolean(true));
    config.insert("cpu".to_string(), cpu);

    WidgetsConfig {
        enabled: vec![
            "uptime".to_string(),
            "services".to_string(),
            "cpu".to_string(),
        ],
        config,
    }
}

fn anchor(x: i64, y: i64) -> toml::Table {
    let mut table = toml::Table::new();
    table.insert("x".to_string(), toml::Value::Integer(x));
    table.insert("y".to_string(), toml::Value::Integer(y));
    table
}

impl StatusConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("oled-status")
        } else {
            PathBuf::from(".config/oled-status")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from the default location
    pub fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::get_config_path())
    }

    /// Load configuration, writing the defaults if the file doesn't exist
    pub fn load_from_path(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match fs::read_to_string(config_path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let default_config = Self::default();
                default_config.save_to_path(config_path)?;
                Ok(default_config)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Save configuration to file
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // Create the directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if !Path::exists(parent) {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    /// Settings table for one widget, empty when none is configured
    pub fn widget_table(&self, id: &str) -> toml::Table {
        self.widgets.config.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("oled-status-cfg-{}-{}", std::process::id(), name))
    }

    #[test]
    fn defaults_match_reference_composition() {
        let config = StatusConfig::default();
        assert_eq!(config.widgets.enabled, vec!["uptime", "services", "cpu"]);
        assert_eq!(config.display.backend, Backend::Ssd1306);
        let cpu = config.widget_table("cpu");
        assert_eq!(cpu.get("y").and_then(|v| v.as_integer()), Some(40));
        let services = config.widget_table("services");
        let units = services.get("services").and_then(|v| v.as_array()).unwrap();
        assert_eq!(units.len(), 5);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = scratch_dir("create");
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = StatusConfig::load_from_path(&path).unwrap();
        assert!(path.exists());
        let reloaded = StatusConfig::load_from_path(&path).unwrap();
        assert_eq!(reloaded.widgets.enabled, config.widgets.enabled);
        assert_eq!(reloaded.render.idle_delay_ms, 1000);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(
            &path,
            r#"
[display]
backend = "headless"
i2c_bus = "/dev/null"
width = 96
height = 16

[widgets]
enabled = ["clock"]
"#,
        )
        .unwrap();

        let config = StatusConfig::load_from_path(&path).unwrap();
        assert_eq!(config.display.backend, Backend::Headless);
        assert_eq!(config.display.width, 96);
        assert_eq!(config.render.cpu_sample(), Duration::from_secs(1));
        assert_eq!(config.widgets.enabled, vec!["clock"]);
        assert!(config.widget_table("clock").is_empty());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = scratch_dir("invalid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[display]\nbackend = \"vga\"\n").unwrap();
        assert!(StatusConfig::load_from_path(&path).is_err());
        fs::remove_dir_all(dir).unwrap();
    }
}
