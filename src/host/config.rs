//! Host configuration.
//!
//! Defaults suit an interactive fullscreen app. Environment overrides:
//!
//! | Variable | Values |
//! |----------|--------|
//! | `SPARK_COMPOSE_RENDER_MODE` | `fullscreen`, `inline` |
//! | `SPARK_COMPOSE_MAX_PASSES` | positive integer |
//!
//! Unparseable values are logged and ignored.

use std::env;
use std::time::Duration;

use tracing::warn;

pub const ENV_RENDER_MODE: &str = "SPARK_COMPOSE_RENDER_MODE";
pub const ENV_MAX_PASSES: &str = "SPARK_COMPOSE_MAX_PASSES";

/// How frames reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Alternate screen, sized to the terminal, differential updates.
    #[default]
    Fullscreen,
    /// Normal screen below the prompt, sized to the content.
    Inline,
}

impl RenderMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fullscreen" | "full" => Some(RenderMode::Fullscreen),
            "inline" => Some(RenderMode::Inline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub render_mode: RenderMode,
    /// Scheduler passes allowed per recompose before giving up.
    pub max_passes: u32,
    /// How long `tick` waits for input.
    pub tick_interval: Duration,
    /// Fixed surface size. `None` asks the surface.
    pub size: Option<(u16, u16)>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Fullscreen,
            max_passes: 16,
            tick_interval: Duration::from_millis(16),
            size: None,
        }
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_env_with(mut get: impl FnMut(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = get(ENV_RENDER_MODE) {
            match RenderMode::parse(&value) {
                Some(mode) => config.render_mode = mode,
                None => warn!(variable = ENV_RENDER_MODE, %value, "ignoring unknown render mode"),
            }
        }

        if let Some(value) = get(ENV_MAX_PASSES) {
            match value.trim().parse::<u32>() {
                Ok(passes) if passes > 0 => config.max_passes = passes,
                _ => warn!(variable = ENV_MAX_PASSES, %value, "ignoring invalid pass limit"),
            }
        }

        config
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn max_passes(mut self, passes: u32) -> Self {
        self.max_passes = passes.max(1);
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.size = Some((width, height));
        self
    }
}
