//! Simple TOML-subset config loader for Courtside.
//! Supports [sections] with key = value pairs (strings, floats, ints).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "courtside.toml";
/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "COURTSIDE_CONFIG";

/// Parsed configuration values, keyed by "section.key".
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Load config from a TOML file. Returns empty config if file doesn't exist.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                log::info!("no config file at {} ({e}), using defaults", path.display());
                return Self { values: HashMap::new() };
            }
        };
        log::info!("loaded config from {}", path.display());
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        let mut section = String::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }
            let Some(eq_pos) = line.find('=') else {
                log::warn!("config line {}: expected `key = value`, got {line:?}", lineno + 1);
                continue;
            };
            let key = line[..eq_pos].trim();
            let val = line[eq_pos + 1..].trim();
            let val = if let Some(quoted) = val.strip_prefix('"') {
                // quoted strings may contain '#'
                match quoted.find('"') {
                    Some(end) => &quoted[..end],
                    None => quoted,
                }
            } else {
                // Strip inline comments
                match val.find('#') {
                    Some(hash) => val[..hash].trim(),
                    None => val,
                }
            };
            let full_key = if section.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", section, key)
            };
            values.insert(full_key, val.to_string());
        }

        Self { values }
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.parsed(key).unwrap_or(default)
    }

    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.parsed(key).unwrap_or(default)
    }

    pub fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.parsed(key).unwrap_or(default)
    }

    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map(|s| s.as_str()).unwrap_or(default)
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?;
        match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("config key {key}: cannot parse {raw:?}, using default");
                None
            }
        }
    }
}

/// Window settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

/// First-person camera and movement tuning.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub speed: f32,
    pub start: [f32; 3],
}

/// Ball flight tuning.
#[derive(Debug, Clone)]
pub struct BallConfig {
    pub gravity: f64,
    pub throw_force: f64,
    pub floor_threshold: f64,
    /// Hand offset along (right, up, front) of the camera.
    pub hand_offset: [f32; 3],
}

/// Court boundary.
#[derive(Debug, Clone)]
pub struct CourtConfig {
    pub half_extent: f32,
    pub margin: f32,
    pub jump_height: f32,
}

/// Texture files, relative to `dir`.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub floor: String,
    pub background: String,
    pub home: String,
    pub away: String,
}

impl AssetConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// All configurable game parameters with defaults.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub ball: BallConfig,
    pub court: CourtConfig,
    pub assets: AssetConfig,
}

impl GameConfig {
    pub fn from_file(path: &Path) -> Self {
        Self::from_config(&Config::load(path))
    }

    /// Path from `COURTSIDE_CONFIG`, or `courtside.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            window: WindowConfig {
                width: cfg.get_u32("window.width", 1280),
                height: cfg.get_u32("window.height", 720),
                title: cfg.get_str("window.title", "Courtside").to_string(),
            },
            camera: CameraConfig {
                fov: cfg.get_f32("camera.fov", 60.0),
                near: cfg.get_f32("camera.near", 0.1),
                far: cfg.get_f32("camera.far", 100.0),
                sensitivity: cfg.get_f32("camera.sensitivity", 100.0),
                speed: cfg.get_f32("camera.speed", 8.0),
                start: [
                    cfg.get_f32("camera.start_x", 0.0),
                    cfg.get_f32("camera.start_y", 0.0),
                    cfg.get_f32("camera.start_z", 0.0),
                ],
            },
            ball: BallConfig {
                gravity: cfg.get_f64("ball.gravity", courtside_core::GRAVITY_Y),
                throw_force: cfg.get_f64("ball.throw_force", 15.0),
                floor_threshold: cfg.get_f64("ball.floor_threshold", -10.0),
                hand_offset: [
                    cfg.get_f32("ball.hand_x", 0.5),
                    cfg.get_f32("ball.hand_y", -0.5),
                    cfg.get_f32("ball.hand_z", 1.0),
                ],
            },
            court: CourtConfig {
                half_extent: cfg.get_f32("court.half_extent", 5.0),
                margin: cfg.get_f32("court.margin", 0.2),
                jump_height: cfg.get_f32("court.jump_height", 0.95),
            },
            assets: AssetConfig {
                dir: PathBuf::from(cfg.get_str("assets.dir", "assets")),
                floor: cfg.get_str("assets.floor", "floor.jpg").to_string(),
                background: cfg.get_str("assets.background", "background.jpg").to_string(),
                home: cfg.get_str("assets.home", "home.png").to_string(),
                away: cfg.get_str("assets.away", "away.png").to_string(),
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_config(&Config::parse(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_comments() {
        let cfg = Config::parse(
            "# top comment\n\
             title = \"root\"\n\
             [camera]\n\
             fov = 75.0   # wider\n\
             \n\
             [ assets ]\n\
             floor = \"court #2.png\"\n",
        );
        assert_eq!(cfg.get_str("title", ""), "root");
        assert_eq!(cfg.get_f32("camera.fov", 0.0), 75.0);
        assert_eq!(cfg.get_str("assets.floor", ""), "court #2.png");
    }

    #[test]
    fn test_missing_and_malformed_fall_back() {
        let cfg = Config::parse("[ball]\nthrow_force = fast\nnot a pair\n");
        assert_eq!(cfg.get_f64("ball.throw_force", 15.0), 15.0);
        assert_eq!(cfg.get_f64("ball.gravity", -9.81), -9.81);
        assert_eq!(cfg.get_u32("window.width", 1280), 1280);
    }

    #[test]
    fn test_defaults_match_court_constants() {
        let g = GameConfig::default();
        assert_eq!(g.camera.speed, 8.0);
        assert_eq!(g.camera.sensitivity, 100.0);
        assert_eq!(g.camera.fov, 60.0);
        assert_eq!(g.camera.start, [0.0, 0.0, 0.0]);
        assert_eq!(g.ball.gravity, -9.81);
        assert_eq!(g.ball.throw_force, 15.0);
        assert_eq!(g.ball.floor_threshold, -10.0);
        assert_eq!(g.ball.hand_offset, [0.5, -0.5, 1.0]);
        assert_eq!(g.court.half_extent, 5.0);
        assert_eq!(g.court.margin, 0.2);
        assert_eq!(g.court.jump_height, 0.95);
    }

    #[test]
    fn test_overrides_apply() {
        let cfg = Config::parse("[court]\nhalf_extent = 7\n[ball]\nhand_y = -0.25\n[assets]\ndir = \"res\"\n");
        let g = GameConfig::from_config(&cfg);
        assert_eq!(g.court.half_extent, 7.0);
        assert_eq!(g.ball.hand_offset[1], -0.25);
        assert_eq!(g.assets.path("floor.jpg"), PathBuf::from("res").join("floor.jpg"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let g = GameConfig::from_file(Path::new("/nonexistent/courtside.toml"));
        assert_eq!(g.window.width, 1280);
        assert_eq!(g.window.title, "Courtside");
    }
}
