use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::{error::ConfigError, model::Location};

pub const DEFAULT_MENU_API_URL: &str = "https://shop.foodandco.dk/api/WeeklyMenu";
pub const DEFAULT_MENU_SITE_URL: &str = "https://shop.foodandco.dk";
pub const DEFAULT_LANGUAGE_CODE: &str = "en-GB";
pub const DEFAULT_TIMEZONE: &str = "Europe/Copenhagen";

pub const WEBHOOK_URL_ENV: &str = "WEBHOOK_URL";
pub const TEST_CHANNEL_ENV: &str = "TEST_CHANNEL_ID";

/// Restaurant ids show up both as numbers and as strings in the wild.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RestaurantId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestaurantId::Number(n) => write!(f, "{n}"),
            RestaurantId::Text(s) => f.write_str(s),
        }
    }
}

/// A location as written in the config file. The channel id itself is a
/// secret and is looked up from the environment variable named here.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub restaurant_id: RestaurantId,
    pub other_id: String,
    /// e.g. "CAMPUS_CHANNEL_ID"
    pub channel_env: String,
}

/// Configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timezone = "Europe/Copenhagen"
///
/// [[locations]]
/// name = "Campus"
/// restaurant_id = 1234
/// other_id = "campus"
/// channel_env = "CAMPUS_CHANNEL_ID"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    pub timezone: Option<String>,
    pub menu_api_url: Option<String>,
    pub menu_site_url: Option<String>,
    pub language_code: Option<String>,
    #[serde(default)]
    pub locations: Vec<LocationEntry>,
}

impl ConfigFile {
    /// Load the file at `path`. A missing file yields an empty config, which
    /// later fails resolution with a hint pointing at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default path to the config file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dk", "foodandco", "menu-notifier")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Fully resolved runtime configuration, built once at startup and passed
/// down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub menu_api_url: String,
    pub menu_site_url: String,
    pub language_code: String,
    pub timezone: Tz,
    pub testing: bool,
    pub locations: Vec<Location>,
}

impl Config {
    /// Read the config file and resolve it against the process environment.
    pub fn load(path: &Path, testing: bool) -> Result<Self, ConfigError> {
        let file = ConfigFile::load(path)?;
        Self::resolve(file, path, testing, |key| std::env::var(key).ok())
    }

    /// Combine the file with values from `env`. Empty values count as absent.
    /// Fails on the first missing required value.
    pub fn resolve<F>(
        file: ConfigFile,
        path: &Path,
        testing: bool,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String, ConfigError> {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing { key: key.to_string() })
        };

        let webhook_url = require(WEBHOOK_URL_ENV)?;

        if file.locations.is_empty() {
            return Err(ConfigError::NoLocations { path: path.to_path_buf() });
        }

        let mut locations = Vec::with_capacity(file.locations.len());
        for (index, entry) in file.locations.into_iter().enumerate() {
            let restaurant_id = entry.restaurant_id.to_string();
            if restaurant_id.trim().is_empty() {
                return Err(ConfigError::EmptyField { index, field: "restaurant_id" });
            }
            if entry.other_id.trim().is_empty() {
                return Err(ConfigError::EmptyField { index, field: "other_id" });
            }

            locations.push(Location {
                name: entry.name,
                restaurant_id,
                other_id: entry.other_id,
                channel_id: require(&entry.channel_env)?,
            });
        }

        if testing {
            let test_channel = require(TEST_CHANNEL_ENV)?;
            locations = vec![test_location(&locations, test_channel)];
        }

        let tz_name = file.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = tz_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone { value: tz_name.clone() })?;

        Ok(Self {
            webhook_url,
            menu_api_url: file.menu_api_url.unwrap_or_else(|| DEFAULT_MENU_API_URL.to_string()),
            menu_site_url: file
                .menu_site_url
                .unwrap_or_else(|| DEFAULT_MENU_SITE_URL.to_string()),
            language_code: file
                .language_code
                .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
            timezone,
            testing,
            locations,
        })
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }
}

// Borrow the menu feed of the second location (or the only one) and point
// it at the test channel.
fn test_location(locations: &[Location], channel_id: String) -> Location {
    let base = locations.get(1).unwrap_or(&locations[0]);

    Location {
        name: format!("Test ({})", base.name),
        restaurant_id: base.restaurant_id.clone(),
        other_id: base.other_id.clone(),
        channel_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_file() -> ConfigFile {
        toml::from_str(
            r#"
            [[locations]]
            name = "Oestergade"
            restaurant_id = 101
            other_id = "oestergade"
            channel_env = "OESTERGADE_CHANNEL_ID"

            [[locations]]
            name = "Campus"
            restaurant_id = "202"
            other_id = "campus"
            channel_env = "CAMPUS_CHANNEL_ID"
            "#,
        )
        .expect("sample config must parse")
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("WEBHOOK_URL", "https://hooks.example/teams"),
            ("OESTERGADE_CHANNEL_ID", "chan-oe"),
            ("CAMPUS_CHANNEL_ID", "chan-campus"),
        ]
    }

    #[test]
    fn resolves_locations_and_defaults() {
        let cfg =
            Config::resolve(sample_file(), Path::new("cfg.toml"), false, env(&full_env())).unwrap();

        assert_eq!(cfg.webhook_url, "https://hooks.example/teams");
        assert_eq!(cfg.menu_api_url, DEFAULT_MENU_API_URL);
        assert_eq!(cfg.language_code, "en-GB");
        assert_eq!(cfg.timezone, chrono_tz::Europe::Copenhagen);
        assert!(!cfg.testing);

        assert_eq!(cfg.locations.len(), 2);
        assert_eq!(cfg.locations[0].restaurant_id, "101");
        assert_eq!(cfg.locations[0].channel_id, "chan-oe");
        assert_eq!(cfg.locations[1].restaurant_id, "202");
        assert_eq!(cfg.location("campus").map(|l| l.channel_id.as_str()), Some("chan-campus"));
    }

    #[test]
    fn missing_webhook_url_is_reported() {
        let vars: Vec<_> = full_env().into_iter().filter(|(k, _)| *k != "WEBHOOK_URL").collect();
        let err = Config::resolve(sample_file(), Path::new("cfg.toml"), false, env(&vars))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Missing { ref key } if key == "WEBHOOK_URL"));
    }

    #[test]
    fn each_channel_id_is_required() {
        for missing in ["OESTERGADE_CHANNEL_ID", "CAMPUS_CHANNEL_ID"] {
            let vars: Vec<_> = full_env().into_iter().filter(|(k, _)| *k != missing).collect();
            let err = Config::resolve(sample_file(), Path::new("cfg.toml"), false, env(&vars))
                .unwrap_err();

            assert_eq!(err.to_string(), format!("{missing} is required"));
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let vars: Vec<_> = full_env()
            .into_iter()
            .map(|(k, v)| if k == "CAMPUS_CHANNEL_ID" { (k, "  ") } else { (k, v) })
            .collect();

        let err = Config::resolve(sample_file(), Path::new("cfg.toml"), false, env(&vars))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn no_locations_points_at_config_path() {
        let err = Config::resolve(
            ConfigFile::default(),
            Path::new("/etc/menu/config.toml"),
            false,
            env(&full_env()),
        )
        .unwrap_err();

        assert!(err.to_string().contains("/etc/menu/config.toml"));
    }

    #[test]
    fn testing_requires_test_channel() {
        let err = Config::resolve(sample_file(), Path::new("cfg.toml"), true, env(&full_env()))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Missing { ref key } if key == TEST_CHANNEL_ENV));
    }

    #[test]
    fn testing_reduces_to_relabelled_second_location() {
        let mut vars = full_env();
        vars.push(("TEST_CHANNEL_ID", "chan-test"));

        let cfg = Config::resolve(sample_file(), Path::new("cfg.toml"), true, env(&vars)).unwrap();

        assert!(cfg.testing);
        assert_eq!(
            cfg.locations,
            vec![Location {
                name: "Test (Campus)".into(),
                restaurant_id: "202".into(),
                other_id: "campus".into(),
                channel_id: "chan-test".into(),
            }]
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut file = sample_file();
        file.timezone = Some("Mars/Olympus_Mons".into());

        let err =
            Config::resolve(file, Path::new("cfg.toml"), false, env(&full_env())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimezone { .. }));
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let cfg = ConfigFile::load(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert!(cfg.locations.is_empty());
        assert!(cfg.timezone.is_none());
    }
}
