//! Top-level `Config.json` settings derived from the launch options

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::config::Options;

pub const GAME_DIR: &str = "/userdata/roms/switch";

/// `res_scale` / `res_scale_custom` pair
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionScale {
    pub scale: i64,
    pub custom: f64,
}

impl Default for ResolutionScale {
    fn default() -> Self {
        Self { scale: 1, custom: 1.0 }
    }
}

impl ResolutionScale {
    /// Whole factors 1-4 select a preset; anything else is a custom factor
    /// with `res_scale = -1`.
    pub fn from_option(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::default();
        };
        match raw.trim().parse::<f64>() {
            Ok(factor) if factor.fract() == 0.0 && (1.0..=4.0).contains(&factor) => Self {
                scale: factor as i64,
                custom: 1.0,
            },
            Ok(factor) if factor.is_finite() => Self { scale: -1, custom: factor },
            _ => {
                warn!("Ignoring ryu_resolution_scale '{}'", raw);
                Self::default()
            }
        }
    }

    fn custom_value(&self) -> Value {
        if self.custom.fract() == 0.0 {
            Value::from(self.custom as i64)
        } else {
            Number::from_f64(self.custom).map_or(Value::from(1), Value::Number)
        }
    }
}

/// Settings written over the template, in the order Ryujinx stores them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RyujinxSettings {
    pub res_scale: i64,
    pub max_anisotropy: i64,
    pub aspect_ratio: String,
    pub system_language: String,
    pub system_region: String,
    pub docked_mode: bool,
    pub enable_discord_integration: bool,
    pub enable_vsync: bool,
    pub language_code: String,
    pub game_dirs: Vec<String>,
    pub res_scale_custom: Value,
    /// Left as in the template when the option has an unknown value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_texture_recompression: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_gpu: Option<String>,
}

impl RyujinxSettings {
    pub fn from_options(options: &Options, language_code: &str, preferred_gpu: Option<String>) -> Self {
        let resolution = ResolutionScale::from_option(options.get("ryu_resolution_scale"));
        let enable_texture_recompression = match options.get("ryu_texture_recompression") {
            None => Some(false),
            Some("true" | "1") => Some(true),
            Some("false" | "0") => Some(false),
            Some(_) => None,
        };

        Self {
            res_scale: resolution.scale,
            max_anisotropy: options.int("max_anisotropy", -1),
            aspect_ratio: options.get_or("aspect_ratio", "Fixed16x9").to_string(),
            system_language: options.get_or("system_language", "AmericanEnglish").to_string(),
            system_region: options.get_or("system_region", "USA").to_string(),
            docked_mode: options.flag("ryu_docked_mode", true),
            enable_discord_integration: options.flag("ryu_enable_discord_integration", true),
            enable_vsync: options.flag("ryu_vsync", true),
            language_code: language_code.to_string(),
            game_dirs: vec![GAME_DIR.to_string()],
            res_scale_custom: resolution.custom_value(),
            enable_texture_recompression,
            preferred_gpu,
        }
    }

    /// Overwrite the matching keys of `config`, keeping everything else.
    pub fn apply(&self, config: &mut Map<String, Value>) -> serde_json::Result<()> {
        if let Value::Object(fields) = serde_json::to_value(self)? {
            for (key, value) in fields {
                config.insert(key, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolution_scale() {
        assert_eq!(ResolutionScale::from_option(None), ResolutionScale::default());
        assert_eq!(
            ResolutionScale::from_option(Some("3.0")),
            ResolutionScale { scale: 3, custom: 1.0 }
        );
        assert_eq!(
            ResolutionScale::from_option(Some("1.5")),
            ResolutionScale { scale: -1, custom: 1.5 }
        );
        assert_eq!(
            ResolutionScale::from_option(Some("6")),
            ResolutionScale { scale: -1, custom: 6.0 }
        );
        assert_eq!(ResolutionScale::from_option(Some("huge")), ResolutionScale::default());
    }

    #[test]
    fn test_defaults() {
        let settings = RyujinxSettings::from_options(&Options::new(), "en_US", None);
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["res_scale"], json!(1));
        assert_eq!(value["res_scale_custom"], json!(1));
        assert_eq!(value["max_anisotropy"], json!(-1));
        assert_eq!(value["docked_mode"], json!(true));
        assert_eq!(value["enable_texture_recompression"], json!(false));
        assert_eq!(value["game_dirs"], json!(["/userdata/roms/switch"]));
        assert!(value.get("preferred_gpu").is_none());
    }

    #[test]
    fn test_options_override() {
        let options: Options = [
            ("ryu_docked_mode", "0"),
            ("ryu_vsync", "0"),
            ("ryu_resolution_scale", "1.5"),
            ("ryu_texture_recompression", "maybe"),
        ]
        .into_iter()
        .collect();
        let settings = RyujinxSettings::from_options(&options, "fr_FR", Some("0x1002_0x163F".into()));

        assert!(!settings.docked_mode);
        assert!(!settings.enable_vsync);
        assert!(settings.enable_discord_integration);
        assert_eq!(settings.res_scale, -1);
        assert_eq!(settings.res_scale_custom, json!(1.5));
        assert_eq!(settings.enable_texture_recompression, None);
    }

    #[test]
    fn test_apply_keeps_template_keys() {
        let mut config = json!({
            "version": 50,
            "res_scale": 4,
            "enable_texture_recompression": true,
        })
        .as_object()
        .cloned()
        .unwrap();
        let options: Options = [("ryu_texture_recompression", "junk")].into_iter().collect();

        RyujinxSettings::from_options(&options, "en_US", None)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config["version"], json!(50));
        assert_eq!(config["res_scale"], json!(1));
        assert_eq!(config["enable_texture_recompression"], json!(true));
        assert_eq!(config.keys().next().map(String::as_str), Some("version"));
    }
}
