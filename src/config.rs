// Wordsnap – A word fragment puzzle
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt::Write;

// Viewports up to these widths use the smaller cell sizes
pub const MOBILE_MAX_WIDTH: f32 = 480.0;
pub const TABLET_MAX_WIDTH: f32 = 768.0;

const DEFAULT_COMPLETED_BG: &'static str = "#e0e7ff";
const DEFAULT_TEXT_DARK: &'static str = "#1e40af";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub gradient_start: String,
    pub gradient_end: String,
    pub primary: String,
    pub piece_background: String,
    #[serde(default)]
    pub primary_dark: Option<String>,
    #[serde(default)]
    pub primary_hover: Option<String>,
    #[serde(default)]
    pub completed_bg: Option<String>,
    #[serde(default)]
    pub completed_border: Option<String>,
    #[serde(default)]
    pub text_dark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub name: String,
    pub colors: Colors,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CellSizes {
    pub desktop: f32,
    pub tablet: f32,
    pub mobile: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub snap_distance: f32,
    pub snap_tolerance: f32,
    // Milliseconds to wait after a piece is released before showing
    // the effects for any words that it completed
    pub completion_delay: f32,
    pub cell_size: CellSizes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub theme: Theme,
    pub game_settings: GameSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("config overrides must be an object")]
    NotAnObject,
}

fn default_config() -> Value {
    json!({
        "theme": {
            "name": "blue",
            "colors": {
                "gradientStart": "#1e3a8a",
                "gradientEnd": "#3b82f6",
                "primary": "#3b82f6",
                "pieceBackground": "white",
            },
        },
        "gameSettings": {
            "snapDistance": 150,
            "snapTolerance": 5,
            "completionDelay": 350,
            "cellSize": {
                "desktop": 50,
                "tablet": 40,
                "mobile": 35,
            },
        },
    })
}

fn merge_objects(
    defaults: Option<&Value>,
    overrides: &Map<String, Value>,
) -> Map<String, Value> {
    let mut result = match defaults {
        Some(Value::Object(defaults)) => defaults.clone(),
        _ => Map::new(),
    };

    for (key, value) in overrides.iter() {
        result.insert(key.clone(), value.clone());
    }

    result
}

// Merge the overrides over the defaults. Objects at the top level and
// the level below are merged key by key, anything deeper or any other
// type of value simply replaces the default.
pub fn merge(defaults: &Value, overrides: &Value) -> Value {
    let mut result = match defaults {
        Value::Object(defaults) => defaults.clone(),
        _ => Map::new(),
    };

    let Value::Object(overrides) = overrides
    else {
        return Value::Object(result);
    };

    for (key, value) in overrides.iter() {
        let Value::Object(value) = value
        else {
            result.insert(key.clone(), value.clone());
            continue;
        };

        let default_section = defaults.get(key);
        let mut section = merge_objects(default_section, value);

        for (nested_key, nested_value) in value.iter() {
            if let Value::Object(nested_value) = nested_value {
                let merged = merge_objects(
                    default_section.and_then(|d| d.get(nested_key)),
                    nested_value,
                );
                section.insert(nested_key.clone(), Value::Object(merged));
            }
        }

        result.insert(key.clone(), Value::Object(section));
    }

    Value::Object(result)
}

impl Config {
    pub fn defaults() -> Config {
        Config {
            theme: Theme {
                name: "blue".to_string(),
                colors: Colors {
                    gradient_start: "#1e3a8a".to_string(),
                    gradient_end: "#3b82f6".to_string(),
                    primary: "#3b82f6".to_string(),
                    piece_background: "white".to_string(),
                    primary_dark: None,
                    primary_hover: None,
                    completed_bg: None,
                    completed_border: None,
                    text_dark: None,
                },
            },
            game_settings: GameSettings {
                snap_distance: 150.0,
                snap_tolerance: 5.0,
                completion_delay: 350.0,
                cell_size: CellSizes {
                    desktop: 50.0,
                    tablet: 40.0,
                    mobile: 35.0,
                },
            },
        }
    }

    pub fn from_overrides(overrides: &Value) -> Result<Config, Error> {
        if !overrides.is_object() {
            return Err(Error::NotAnObject);
        }

        let merged = merge(&default_config(), overrides);

        Ok(serde_json::from_value(merged)?)
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Config, Error> {
        Config::from_overrides(&serde_json::from_str::<Value>(s)?)
    }
}

impl CellSizes {
    pub fn for_viewport(&self, viewport_width: f32) -> f32 {
        if viewport_width <= MOBILE_MAX_WIDTH {
            self.mobile
        } else if viewport_width <= TABLET_MAX_WIDTH {
            self.tablet
        } else {
            self.desktop
        }
    }
}

impl Colors {
    pub fn css_variables(&self) -> [(&'static str, &str); 9] {
        let primary = self.primary.as_str();

        [
            ("--primary-color", primary),
            ("--primary-dark", self.primary_dark.as_deref().unwrap_or(primary)),
            ("--primary-hover", self.primary_hover.as_deref().unwrap_or(primary)),
            ("--gradient-start", self.gradient_start.as_str()),
            ("--gradient-end", self.gradient_end.as_str()),
            ("--piece-bg", self.piece_background.as_str()),
            (
                "--completed-bg",
                self.completed_bg.as_deref().unwrap_or(DEFAULT_COMPLETED_BG),
            ),
            (
                "--completed-border",
                self.completed_border.as_deref().unwrap_or(primary),
            ),
            (
                "--text-dark",
                self.text_dark.as_deref().unwrap_or(DEFAULT_TEXT_DARK),
            ),
        ]
    }
}

impl Theme {
    pub fn stylesheet(&self) -> String {
        let mut css = ":root {".to_string();

        for (name, value) in self.colors.css_variables() {
            write!(&mut css, " {}: {};", name, value).unwrap();
        }

        css.push_str(" }");

        css
    }
}
