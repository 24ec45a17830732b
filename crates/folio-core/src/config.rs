use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub typewriter: TypewriterConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Typewriter timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// Delay before each typed character
    #[serde(default = "default_typing_speed")]
    pub typing_speed_ms: u64,
    /// Delay before each deleted character
    #[serde(default = "default_delete_speed")]
    pub delete_speed_ms: u64,
    /// Pause with the full phrase on screen before deleting starts
    #[serde(default = "default_pause")]
    pub pause_ms: u64,
    /// Delay after a phrase is fully deleted before the next one starts
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            typing_speed_ms: default_typing_speed(),
            delete_speed_ms: default_delete_speed(),
            pause_ms: default_pause(),
            advance_delay_ms: default_advance_delay(),
        }
    }
}

impl TypewriterConfig {
    /// Same delay for typing, deleting and pausing
    pub fn uniform(speed_ms: u64) -> Self {
        Self {
            typing_speed_ms: speed_ms,
            delete_speed_ms: speed_ms,
            pause_ms: speed_ms,
            advance_delay_ms: default_advance_delay(),
        }
    }
}

/// Scroll tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Lookahead added to the scroll offset when probing for the active section
    #[serde(default = "default_lookahead")]
    pub lookahead_px: f64,
    /// Height of the fixed header, subtracted from navigation scroll targets
    #[serde(default = "default_header_offset")]
    pub header_offset_px: f64,
    /// Default start marker for entrance triggers
    #[serde(default = "default_start_marker")]
    pub start_marker: String,
    /// Default end marker for entrance triggers
    #[serde(default = "default_end_marker")]
    pub end_marker: String,
    /// Section highlighted before any geometry matches; empty for none
    #[serde(default = "default_initial_section")]
    pub initial_section: String,
    /// Coalesce scroll events so at most one evaluation runs per frame
    #[serde(default = "default_true")]
    pub coalesce_frames: bool,
    /// Frame rate used by hosts that drive `on_frame` from a timer
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lookahead_px: default_lookahead(),
            header_offset_px: default_header_offset(),
            start_marker: default_start_marker(),
            end_marker: default_end_marker(),
            initial_section: default_initial_section(),
            coalesce_frames: default_true(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// Default entrance animation applied to observed elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_animation_duration")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Opacity the element starts from before the entrance plays
    #[serde(default)]
    pub from_opacity: f64,
    /// Vertical offset (px) the element slides in from
    #[serde(default = "default_from_offset")]
    pub from_offset_y: f64,
    /// Horizontal offset (px) the element slides in from, negative is left
    #[serde(default)]
    pub from_offset_x: f64,
    /// Scale the element grows or shrinks from
    #[serde(default = "default_from_scale")]
    pub from_scale: f64,
    /// Replay the entrance when scrolling back above the start marker
    #[serde(default = "default_true")]
    pub reverse_on_leave_back: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            from_opacity: 0.0,
            from_offset_y: default_from_offset(),
            from_offset_x: 0.0,
            from_scale: default_from_scale(),
            reverse_on_leave_back: default_true(),
        }
    }
}

/// Easing curve for entrance animations
///
/// The `power*` / `expo` aliases accept the curve names the page's
/// animations are written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    /// power1.out, the default for scroll entrances
    #[default]
    #[serde(alias = "power1.out")]
    QuadOut,
    /// power2.out
    #[serde(alias = "power2.out")]
    Cubic,
    /// power4.out
    #[serde(alias = "power4.out")]
    Quintic,
    /// expo.out
    #[serde(alias = "expo.out")]
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Persisted light/dark preference
    #[serde(default)]
    pub theme: Theme,
    /// Phrases cycled by the hero typewriter, in display order
    #[serde(default = "default_phrases")]
    pub hero_phrases: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            hero_phrases: default_phrases(),
        }
    }
}

/// Colour scheme preference, the only state persisted across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(crate::Error::Config(format!("unknown theme '{}'", other))),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_phrases() -> Vec<String> {
    ["Data Analyst", "IoT Developer", "AI Enthusiast", "Problem Solver"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_typing_speed() -> u64 {
    100
}

fn default_delete_speed() -> u64 {
    50
}

fn default_pause() -> u64 {
    2000
}

fn default_advance_delay() -> u64 {
    500
}

fn default_lookahead() -> f64 {
    100.0
}

fn default_header_offset() -> f64 {
    80.0
}

fn default_start_marker() -> String {
    "top 80%".to_string()
}

fn default_end_marker() -> String {
    "bottom 20%".to_string()
}

fn default_initial_section() -> String {
    "home".to_string()
}

fn default_frame_rate() -> u32 {
    60
}

fn default_animation_duration() -> u64 {
    500
}

fn default_from_offset() -> f64 {
    30.0
}

fn default_from_scale() -> f64 {
    1.0
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/folio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("folio")
            .join("config.toml")
    }
}
