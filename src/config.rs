//! External configuration loader.
//!
//! Reads the first `config.toml` found in the executable's directory, the
//! working directory, or `~/.local/share/mazewalk`. Missing files and
//! missing keys fall back to defaults; command-line flags are applied later.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::decide::Strategy;
use crate::domain::heading::Heading;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub solver: SolverConfig,
    pub render: RenderConfig,
    pub mazes_dir: PathBuf,
    pub log_level: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub max_attempts: u32,     // per avatar
    pub initial_heading: Heading,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub enabled: bool,
    pub step_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    solver: TomlSolver,
    #[serde(default)]
    render: TomlRender,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlSolver {
    #[serde(default)]
    strategy: Strategy,
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    #[serde(default = "default_initial_heading")]
    initial_heading: Heading,
}

#[derive(Deserialize, Debug)]
struct TomlRender {
    #[serde(default)]
    enabled: bool,
    #[serde(default = "default_step_delay")]
    step_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_mazes_dir")]
    mazes_dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_max_attempts() -> u32 { 10_000 }
fn default_initial_heading() -> Heading { Heading::South }
fn default_step_delay() -> u64 { 120 }
fn default_mazes_dir() -> String { "mazes".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlSolver {
    fn default() -> Self {
        TomlSolver {
            strategy: Strategy::default(),
            max_attempts: default_max_attempts(),
            initial_heading: default_initial_heading(),
        }
    }
}

impl Default for TomlRender {
    fn default() -> Self {
        TomlRender {
            enabled: false,
            step_delay_ms: default_step_delay(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            mazes_dir: default_mazes_dir(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load from the first `config.toml` in `search_dirs()` order.
    pub fn load() -> Self {
        let dirs = search_dirs();
        AppConfig::from_toml(load_toml(&dirs), &dirs)
    }

    /// Parse config text directly (no file lookup, relative dirs kept as-is).
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(AppConfig::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, dirs: &[PathBuf]) -> Self {
        let mut initial_heading = toml_cfg.solver.initial_heading;
        if !initial_heading.is_cardinal() {
            warn!("solver.initial_heading cannot be null; using {}", default_initial_heading());
            initial_heading = default_initial_heading();
        }

        // A relative mazes_dir is taken from the first search dir that has it.
        let configured = PathBuf::from(&toml_cfg.general.mazes_dir);
        let found = if configured.is_absolute() {
            None
        } else {
            dirs.iter().map(|d| d.join(&configured)).find(|p| p.is_dir())
        };
        let mazes_dir = found.unwrap_or(configured);

        AppConfig {
            solver: SolverConfig {
                strategy: toml_cfg.solver.strategy,
                max_attempts: toml_cfg.solver.max_attempts,
                initial_heading,
            },
            render: RenderConfig {
                enabled: toml_cfg.render.enabled,
                step_delay_ms: toml_cfg.render.step_delay_ms,
            },
            mazes_dir,
            log_level: toml_cfg.log.level,
        }
    }
}

/// Where `config.toml` and a relative `mazes_dir` are looked for, in order:
/// the executable's directory, the working directory, `~/.local/share/mazewalk`.
fn search_dirs() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    let data_home = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/mazewalk"))
        .filter(|dir| dir.is_dir());

    let mut dirs: Vec<PathBuf> = vec![];
    for dir in [exe_dir, cwd, data_home].into_iter().flatten() {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// The first `config.toml` found wins. An unreadable or malformed one means
/// defaults, with a warning; later directories are not consulted.
fn load_toml(dirs: &[PathBuf]) -> TomlConfig {
    let Some(path) = dirs.iter().map(|d| d.join("config.toml")).find(|p| p.is_file()) else {
        debug!("no config.toml; using defaults");
        return TomlConfig::default();
    };

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| toml::from_str::<TomlConfig>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(cfg) => {
            debug!(path = %path.display(), "loaded config");
            cfg
        }
        Err(e) => {
            warn!("{}: {e}; using defaults", path.display());
            TomlConfig::default()
        }
    }
}
