use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG: &str = include_str!("../../adaptive-panel.default.toml");

pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("adaptive-panel")
        .join("config.toml")
}

pub fn default_config_text() -> &'static str { DEFAULT_CONFIG }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_follow_up_ms")]
    pub follow_up_ms: [u64; 2],
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Pixels below the bottom edge of the panel where the probes land.
    #[serde(default = "default_probe_margin")]
    pub probe_margin: i32,
    #[serde(default = "yes")]
    pub hot_reload: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            follow_up_ms: default_follow_up_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_ms: default_settle_ms(),
            transition_ms: default_transition_ms(),
            probe_margin: default_probe_margin(),
            hot_reload: true,
        }
    }
}

impl Settings {
    pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }

    pub fn follow_ups(&self) -> [Duration; 2] { self.follow_up_ms.map(Duration::from_millis) }

    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms) }

    pub fn settle(&self) -> Duration { Duration::from_millis(self.settle_ms) }

    pub fn transition(&self) -> Duration { Duration::from_millis(self.transition_ms) }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.debounce_ms == 0 {
            issues.push("debounce_ms must be positive".to_string());
        }

        let [first, second] = self.follow_up_ms;
        if first <= self.debounce_ms {
            issues.push(format!(
                "follow_up_ms[0] ({first}) should be longer than debounce_ms ({})",
                self.debounce_ms
            ));
        }
        if second <= first {
            issues.push(format!(
                "follow_up_ms must be ascending, got [{first}, {second}]"
            ));
        }

        if self.poll_interval_ms <= second {
            issues.push(format!(
                "poll_interval_ms ({}) should be longer than the last follow-up ({second})",
                self.poll_interval_ms
            ));
        }

        if self.settle_ms == 0 {
            issues.push("settle_ms must be positive".to_string());
        }

        if self.probe_margin < 0 {
            issues.push(format!(
                "probe_margin must be non-negative, got {}",
                self.probe_margin
            ));
        }

        issues
    }
}

fn yes() -> bool { true }

fn default_debounce_ms() -> u64 { 150 }

fn default_follow_up_ms() -> [u64; 2] { [500, 1500] }

fn default_poll_interval_ms() -> u64 { 5000 }

fn default_settle_ms() -> u64 { 500 }

fn default_transition_ms() -> u64 { 350 }

fn default_probe_margin() -> i32 { 5 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&buf).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }

    /// Reads `path` when it exists, the built-in defaults otherwise.
    pub fn read_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Config::default()) }
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }
}
