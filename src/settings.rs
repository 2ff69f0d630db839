//! Game settings
//!
//! Read once at startup from an optional JSON file. Every key is applied on its
//! own: a missing or malformed key keeps the compiled-in default and produces a
//! diagnostic, and nothing here can abort startup.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::*;
use crate::error::ConfigError;

/// Startup configuration (render-space units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Bricks per grid row
    pub brick_columns: u16,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Horizontal speed in pixels per second
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Fraction of max speed a slow ball is boosted back to
    pub ball_min_speed_multiplier: f32,

    // === Debug ===
    /// Velocity line, position/velocity readout, FPS, and the manual reset key
    pub debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brick_columns: BRICK_COLUMNS,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,

            ball_radius: BALL_RADIUS,
            ball_min_speed_multiplier: BALL_MIN_SPEED_MULTIPLIER,

            debug_overlay: false,
        }
    }
}

impl Settings {
    /// Keys understood by `from_json_str`
    pub const KEYS: [&'static str; 7] = [
        "brick_columns",
        "paddle_width",
        "paddle_height",
        "paddle_speed",
        "ball_radius",
        "ball_min_speed_multiplier",
        "debug_overlay",
    ];

    /// Load settings from a JSON file, logging every diagnostic
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let (settings, diagnostics) = match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json_str(&json)
            }
            Err(source) => (
                Self::default(),
                vec![ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                }],
            ),
        };

        for diagnostic in &diagnostics {
            match diagnostic {
                ConfigError::MissingKey(_) => log::info!("{diagnostic}; keeping default"),
                _ => log::warn!("{diagnostic}; keeping default"),
            }
        }
        settings
    }

    /// Parse settings, returning the result and the diagnostics it produced
    pub fn from_json_str(json: &str) -> (Self, Vec<ConfigError>) {
        let mut settings = Self::default();
        let mut diagnostics = Vec::new();

        let root = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return (settings, vec![ConfigError::NotAnObject]),
            Err(e) => return (settings, vec![ConfigError::Parse(e)]),
        };

        for key in root.keys() {
            if !Self::KEYS.contains(&key.as_str()) {
                diagnostics.push(ConfigError::UnknownKey(key.clone()));
            }
        }

        let d = &mut diagnostics;
        keep(&mut settings.brick_columns, read_columns(&root), d);
        keep(&mut settings.paddle_width, read_paddle_width(&root), d);
        keep(&mut settings.paddle_height, read_positive(&root, "paddle_height"), d);
        keep(&mut settings.paddle_speed, read_positive(&root, "paddle_speed"), d);
        keep(&mut settings.ball_radius, read_positive(&root, "ball_radius"), d);
        keep(&mut settings.ball_min_speed_multiplier, read_multiplier(&root), d);
        keep(&mut settings.debug_overlay, read_bool(&root, "debug_overlay"), d);

        (settings, diagnostics)
    }
}

/// Store a parsed value, or record why the default stays
fn keep<T>(slot: &mut T, result: Result<T, ConfigError>, diagnostics: &mut Vec<ConfigError>) {
    match result {
        Ok(value) => *slot = value,
        Err(e) => diagnostics.push(e),
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a Value, ConfigError> {
    root.get(key)
        .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
}

fn read_f32(root: &Map<String, Value>, key: &str) -> Result<f32, ConfigError> {
    lookup(root, key)?
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| ConfigError::WrongType {
            key: key.to_string(),
            expected: "number",
        })
}

fn read_positive(root: &Map<String, Value>, key: &str) -> Result<f32, ConfigError> {
    let v = read_f32(root, key)?;
    if !(v.is_finite() && v > 0.0) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            reason: format!("{v} is not a positive number"),
        });
    }
    Ok(v)
}

fn read_paddle_width(root: &Map<String, Value>) -> Result<f32, ConfigError> {
    let key = "paddle_width";
    let v = read_positive(root, key)?;
    if v >= PLAYFIELD_WIDTH {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            reason: format!("{v} does not fit the {PLAYFIELD_WIDTH} px playfield"),
        });
    }
    Ok(v)
}

fn read_multiplier(root: &Map<String, Value>) -> Result<f32, ConfigError> {
    let key = "ball_min_speed_multiplier";
    let v = read_f32(root, key)?;
    if !(v > 0.0 && v <= 1.0) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            reason: format!("{v} is outside (0, 1]"),
        });
    }
    Ok(v)
}

fn read_columns(root: &Map<String, Value>) -> Result<u16, ConfigError> {
    let key = "brick_columns";
    let columns = lookup(root, key)?
        .as_u64()
        .ok_or_else(|| ConfigError::WrongType {
            key: key.to_string(),
            expected: "unsigned integer",
        })?;

    // Columns must leave every cell wider than zero
    let max_columns = ((PLAYFIELD_WIDTH - 2.0 * BRICK_MARGIN + BRICK_PADDING) / BRICK_PADDING)
        .ceil() as u64
        - 1;
    if columns == 0 || columns > max_columns {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            reason: format!("{columns} is outside 1..={max_columns}"),
        });
    }
    Ok(columns as u16)
}

fn read_bool(root: &Map<String, Value>, key: &str) -> Result<bool, ConfigError> {
    lookup(root, key)?
        .as_bool()
        .ok_or_else(|| ConfigError::WrongType {
            key: key.to_string(),
            expected: "boolean",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Diagnostics other than keys left at their default
    fn problems(diagnostics: &[ConfigError]) -> Vec<&ConfigError> {
        diagnostics
            .iter()
            .filter(|d| !matches!(d, ConfigError::MissingKey(_)))
            .collect()
    }

    #[test]
    fn test_empty_object_keeps_defaults() {
        let (settings, diagnostics) = Settings::from_json_str("{}");
        assert_eq!(settings, Settings::default());
        assert_eq!(diagnostics.len(), Settings::KEYS.len());
        for (diagnostic, key) in diagnostics.iter().zip(Settings::KEYS) {
            assert!(matches!(diagnostic, ConfigError::MissingKey(k) if k == key));
        }
    }

    #[test]
    fn test_missing_keys_reported_next_to_overrides() {
        let (settings, diagnostics) = Settings::from_json_str(r#"{ "paddle_width": 90 }"#);
        assert_eq!(settings.paddle_width, 90.0);
        assert_eq!(diagnostics.len(), 6);
        assert!(
            diagnostics
                .iter()
                .all(|d| matches!(d, ConfigError::MissingKey(k) if k != "paddle_width"))
        );
    }

    #[test]
    fn test_overrides_apply() {
        let json = r#"{
            "brick_columns": 12,
            "paddle_width": 140.0,
            "paddle_height": 20,
            "paddle_speed": 500,
            "ball_radius": 10.5,
            "ball_min_speed_multiplier": 0.6,
            "debug_overlay": true
        }"#;
        let (settings, diagnostics) = Settings::from_json_str(json);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(settings.brick_columns, 12);
        assert_eq!(settings.paddle_width, 140.0);
        assert_eq!(settings.paddle_height, 20.0);
        assert_eq!(settings.paddle_speed, 500.0);
        assert_eq!(settings.ball_radius, 10.5);
        assert!((settings.ball_min_speed_multiplier - 0.6).abs() < 1e-6);
        assert!(settings.debug_overlay);
    }

    #[test]
    fn test_bad_key_does_not_discard_good_keys() {
        let json = r#"{ "brick_columns": "ten", "paddle_width": 80 }"#;
        let (settings, diagnostics) = Settings::from_json_str(json);
        assert_eq!(settings.brick_columns, BRICK_COLUMNS);
        assert_eq!(settings.paddle_width, 80.0);
        let problems = problems(&diagnostics);
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], ConfigError::WrongType { .. }));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let json = r#"{
            "brick_columns": 0,
            "ball_radius": -3,
            "ball_min_speed_multiplier": 1.5
        }"#;
        let (settings, diagnostics) = Settings::from_json_str(json);
        assert_eq!(settings, Settings::default());
        let problems = problems(&diagnostics);
        assert_eq!(problems.len(), 3);
        assert!(
            problems
                .iter()
                .all(|d| matches!(d, ConfigError::OutOfRange { .. }))
        );
    }

    #[test]
    fn test_paddle_wider_than_playfield_rejected() {
        let (settings, diagnostics) = Settings::from_json_str(r#"{ "paddle_width": 2000 }"#);
        assert_eq!(settings.paddle_width, PADDLE_WIDTH);
        let problems = problems(&diagnostics);
        assert_eq!(problems.len(), 1);
        assert!(
            matches!(problems[0], ConfigError::OutOfRange { key, .. } if key == "paddle_width")
        );

        let (settings, _) = Settings::from_json_str(r#"{ "paddle_width": 1280 }"#);
        assert_eq!(settings.paddle_width, PADDLE_WIDTH);
    }

    #[test]
    fn test_too_many_columns_rejected() {
        let (settings, diagnostics) = Settings::from_json_str(r#"{ "brick_columns": 500 }"#);
        assert_eq!(settings.brick_columns, BRICK_COLUMNS);
        assert_eq!(problems(&diagnostics).len(), 1);
    }

    #[test]
    fn test_malformed_json_keeps_defaults() {
        let (settings, diagnostics) = Settings::from_json_str("{ not json");
        assert_eq!(settings, Settings::default());
        assert!(matches!(diagnostics[0], ConfigError::Parse(_)));

        let (_, diagnostics) = Settings::from_json_str("[1, 2]");
        assert!(matches!(diagnostics[0], ConfigError::NotAnObject));
    }

    #[test]
    fn test_unknown_key_reported() {
        let (settings, diagnostics) = Settings::from_json_str(r#"{ "gravity": 9.8 }"#);
        assert_eq!(settings, Settings::default());
        assert!(matches!(&diagnostics[0], ConfigError::UnknownKey(k) if k == "gravity"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/brickfall/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_saved_settings_parse_cleanly() {
        let settings = Settings {
            brick_columns: 10,
            debug_overlay: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();

        let (parsed, diagnostics) = Settings::from_json_str(&json);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(parsed, settings);

        let direct: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(direct, settings);
    }
}
