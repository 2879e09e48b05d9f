//! TOML-based configuration for the pointer router.
//!
//! The config file is looked up in this order:
//!
//! 1. the path given as the first command-line argument,
//! 2. the `POINTER_ROUTER_CONFIG` environment variable,
//! 3. the platform config directory:
//!    - Windows:  `%APPDATA%\PointerRouter\config.toml`
//!    - Linux:    `~/.config/pointer-router/config.toml`
//!    - macOS:    `~/Library/Application Support/PointerRouter/config.toml`
//!
//! A missing file is not an error: the router starts with defaults.
//!
//! # File layout (for beginners)
//!
//! ```toml
//! [router]
//! log_level = "debug"
//! initial_x = 0
//! initial_y = 0
//!
//! [[surfaces]]
//! id = 1
//! session = "6f1c1a8e-0f4e-4b7e-9a51-2c0d7c1f9e10"
//! x = 100
//! y = 100
//! width = 100
//! height = 100
//!
//! [[script]]
//! type = "pointer_moved"
//! x = 150
//! y = 150
//! ```
//!
//! `[[surfaces]]` seeds the surface registry at startup; each `[[script]]`
//! table is one inbound event, replayed in file order.  Fields annotated with
//! `#[serde(default = "some_fn")]` take the value of `some_fn()` when absent.

use std::path::{Path, PathBuf};

use pointer_core::{InputEvent, Rect, SessionId, Stacking, Surface, SurfaceId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "POINTER_ROUTER_CONFIG";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level router configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub surfaces: Vec<SurfaceEntry>,
    #[serde(default)]
    pub script: Vec<InputEvent>,
}

/// General router settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pointer position before the first motion event.
    #[serde(default)]
    pub initial_x: i32,
    #[serde(default)]
    pub initial_y: i32,
    /// Pause between scripted events, in milliseconds.
    #[serde(default)]
    pub script_step_ms: u64,
}

/// A surface present at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceEntry {
    pub id: SurfaceId,
    pub session: SessionId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Explicit stacking rank; without it the surface goes on top.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_order: Option<i32>,
}

impl SurfaceEntry {
    /// Converts the entry into a domain surface plus its stacking position.
    pub fn to_surface(&self) -> (Surface, Stacking) {
        let surface = Surface::new(
            self.id,
            self.session,
            Rect::new(self.x, self.y, self.width, self.height),
        );
        (surface, self.z_order.map(Stacking::Rank).unwrap_or_default())
    }
}

impl AppConfig {
    /// Distinct sessions that own seeded surfaces or appear in the script,
    /// in first-seen order.
    pub fn sessions(&self) -> Vec<SessionId> {
        let mut sessions: Vec<SessionId> = Vec::new();
        let from_script = self.script.iter().filter_map(|event| match event {
            InputEvent::SurfaceAdded { session, .. } => Some(*session),
            _ => None,
        });
        for session in self.surfaces.iter().map(|s| s.session).chain(from_script) {
            if !sessions.contains(&session) {
                sessions.push(session);
            }
        }
        sessions
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            initial_x: 0,
            initial_y: 0,
            script_step_ms: 0,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Picks the config file path: explicit argument, then environment, then the
/// platform directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither an explicit path
/// nor a platform directory is available.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Resolves the platform config directory for the router.
pub fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PointerRouter"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pointer-router"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PointerRouter")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
