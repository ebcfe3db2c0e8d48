//! Layered settings: built-in defaults, an optional TOML file, then command-line flags.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use pledge_lungs_rendering::BUILTIN_LUNGS;
use serde::Deserialize;
use thiserror::Error;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file at {}", path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse config toml contents")]
    Parse(#[from] toml::de::Error),
    /// The configuration file declares a schema version this build cannot read.
    #[error("unsupported config version {found}; expected {}", SUPPORTED_CONFIG_VERSION)]
    UnsupportedVersion {
        /// Version declared by the file.
        found: u32,
    },
    /// The resolved window has no area.
    #[error("window size must be positive (received {width}x{height})")]
    InvalidWindowSize {
        /// Resolved window width.
        width: u32,
        /// Resolved window height.
        height: u32,
    },
}

/// Contents of a configuration file. Every key except `version` is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    version: u32,
    window_title: Option<String>,
    window_width: Option<u32>,
    window_height: Option<u32>,
    model: Option<PathBuf>,
    pledges: Option<u32>,
    vsync: Option<bool>,
    show_fps: Option<bool>,
}

/// Values supplied on the command line; `None` defers to the file or defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) model: Option<PathBuf>,
    pub(crate) pledges: Option<u32>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: Option<bool>,
}

/// Fully resolved settings used to start the visualiser.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) model: PathBuf,
    pub(crate) pledges: u32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "Pledge Lungs".to_owned(),
            window_width: 960,
            window_height: 500,
            model: PathBuf::from(BUILTIN_LUNGS),
            pledges: 0,
            vsync: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Layers the optional file and the command-line overrides over the defaults.
    pub(crate) fn resolve(
        file: Option<ConfigFile>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(file) = file {
            if file.version != SUPPORTED_CONFIG_VERSION {
                return Err(ConfigError::UnsupportedVersion {
                    found: file.version,
                });
            }
            if let Some(title) = file.window_title {
                settings.window_title = title;
            }
            settings.window_width = file.window_width.unwrap_or(settings.window_width);
            settings.window_height = file.window_height.unwrap_or(settings.window_height);
            settings.model = file.model.unwrap_or(settings.model);
            settings.pledges = file.pledges.unwrap_or(settings.pledges);
            settings.vsync = file.vsync.unwrap_or(settings.vsync);
            settings.show_fps = file.show_fps.unwrap_or(settings.show_fps);
        }

        settings.model = overrides.model.unwrap_or(settings.model);
        settings.pledges = overrides.pledges.unwrap_or(settings.pledges);
        settings.vsync = overrides.vsync.unwrap_or(settings.vsync);
        settings.show_fps = overrides.show_fps.unwrap_or(settings.show_fps);

        if settings.window_width == 0 || settings.window_height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: settings.window_width,
                height: settings.window_height,
            });
        }

        Ok(settings)
    }
}

/// Reads and parses the configuration file at `path`.
pub(crate) fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}

fn parse_config(contents: &str) -> Result<ConfigFile, ConfigError> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings =
            Settings::resolve(None, Overrides::default()).expect("defaults are valid");

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model, PathBuf::from(BUILTIN_LUNGS));
        assert_eq!(settings.window_height, 500);
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse_config(
            r#"
                version = 1
                window_title = "Campus Pledge Drive"
                model = "assets/lungs.glb"
                pledges = 40
                vsync = false
            "#,
        )
        .expect("config should parse");
        let overrides = Overrides {
            pledges: Some(120),
            ..Overrides::default()
        };

        let settings = Settings::resolve(Some(file), overrides).expect("settings resolve");

        assert_eq!(settings.window_title, "Campus Pledge Drive");
        assert_eq!(settings.model, PathBuf::from("assets/lungs.glb"));
        assert_eq!(settings.pledges, 120);
        assert!(!settings.vsync);
        assert_eq!(settings.window_width, 960);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_config(
            r#"
                version = 1
                goal = 500
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        let file = parse_config("version = 2").expect("schema parses");
        let error = Settings::resolve(Some(file), Overrides::default())
            .expect_err("version 2 is not supported");

        assert!(matches!(error, ConfigError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn zero_sized_windows_are_rejected() {
        let file = parse_config("version = 1\nwindow_height = 0").expect("schema parses");
        let error =
            Settings::resolve(Some(file), Overrides::default()).expect_err("no area");

        assert!(matches!(
            error,
            ConfigError::InvalidWindowSize {
                width: 960,
                height: 0
            }
        ));
    }

    #[test]
    fn missing_files_report_their_path() {
        let error = load_config_file(Path::new("no/such/pledge-lungs.toml"))
            .expect_err("file does not exist");

        assert!(error.to_string().contains("no/such/pledge-lungs.toml"));
    }
}
