use crate::resources::ImageRef;
use derive_more::{Deref, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    #[default]
    #[strum(serialize = "window", serialize = "windowed")]
    Window,
    #[strum(serialize = "overlay", serialize = "layer")]
    Overlay,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid color '{0}': expected #RRGGBB, #AARRGGBB or a color name")]
pub struct ColorParseError(String);

/// An sRGB color with alpha. Parses `#RRGGBB`, `#AARRGGBB` (alpha first) and
/// CSS color names.
#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr, Deref, From, Into)]
pub struct Color(Srgba<f64>);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ColorParseError(s.to_string());

        let Some(hex) = s.strip_prefix('#') else {
            return palette::named::from_str(&s.to_ascii_lowercase())
                .map(|c: Srgb<u8>| Self(c.into_format::<f64>().with_alpha(1.0)))
                .ok_or_else(invalid);
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        let (alpha, rgb) = match hex.len() {
            6 => (0xff, value),
            8 => (value >> 24, value & 0x00ff_ffff),
            _ => return Err(invalid()),
        };

        let color = Srgba::<u8>::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, alpha as u8);
        Ok(Self(color.into_format::<f64, f64>()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c: Srgba<u8> = self.0.into_format();
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            c.alpha, c.red, c.green, c.blue
        )
    }
}

fn black() -> Color {
    Color(Srgba::new(0.0, 0.0, 0.0, 1.0))
}

fn white() -> Color {
    Color(Srgba::new(1.0, 1.0, 1.0, 1.0))
}

fn default_title_size() -> f64 {
    14.0
}

/// Options the pie menu is built from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuConfig {
    pub item_count: i64,
    pub center_icon: ImageRef,
    #[serde(default)]
    pub item_icons: Vec<ImageRef>,
    #[serde(default)]
    pub item_colors: Vec<Color>,
    #[serde(default)]
    pub item_titles: Vec<String>,
    pub inner_radius: f64,
    pub outer_radius: f64,
    #[serde(default = "black")]
    pub title_color: Color,
    #[serde(default = "default_title_size")]
    pub title_size: f64,
    #[serde(default)]
    pub title_padding: f64,
    #[serde(default = "white")]
    pub center_color: Color,
    /// Square size icons are decoded at; natural size when unset.
    #[serde(default)]
    pub icon_size: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub presentation: Presentation,
    pub toast_timeout_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Circlet".to_string(),
            width: 480,
            height: 480,
            presentation: Presentation::Window,
            toast_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    pub menu: MenuConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "circlet", "circlet").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Directory relative image paths are resolved against.
pub fn get_config_dir() -> Option<PathBuf> {
    get_config_path()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    ))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("CIRCLET")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn default_config() -> Result<Config, ConfigError> {
    Ok(builder().build()?.try_deserialize()?)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Result<Config, ConfigError> {
    match write_default_config() {
        Ok(path) => log::debug!("Using config at {}", path.display()),
        Err(e) => log::warn!("Could not write default config: {}", e),
    }

    load_config().or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        default_config()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if !is_reload_trigger(&event, &config_path) {
                    continue;
                }
                log::debug!("{:?} on {}, reloading", event.kind, config_path.display());
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

fn is_reload_trigger(event: &notify::Event, config_path: &std::path::Path) -> bool {
    let meaningful_event = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    meaningful_event && event.paths.iter().any(|p| p == config_path)
}
