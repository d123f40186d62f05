use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for reading the standard.
///
/// This struct holds settings that control how rows are decoded and how
/// strictly the hierarchy is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The glyph that marks a requirement as applying to a level.
    ///
    /// Any other value in a level column, including a blank cell, means the
    /// level does not apply.
    level_marker: String,

    /// The field delimiter of the CSV source.
    delimiter: char,

    /// Whether a row may return to a section seen earlier.
    ///
    /// When `false` (default): requirements of a section must be contiguous.
    ///   A row naming a previously seen section that is not the current one
    ///   is rejected.
    ///
    /// When `true`: such a row re-selects the earlier section and the
    ///   requirement is attached to it.
    pub allow_interleaved_sections: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level_marker: default_level_marker(),
            delimiter: default_delimiter(),
            allow_interleaved_sections: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the glyph that marks a level as applicable.
    #[must_use]
    pub fn level_marker(&self) -> &str {
        &self.level_marker
    }

    /// Sets the level marker glyph.
    pub fn set_level_marker(&mut self, marker: impl Into<String>) {
        self.level_marker = marker.into();
    }

    /// Returns the CSV field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Sets the CSV field delimiter.
    ///
    /// Returns `false`, leaving the delimiter unchanged, if `delimiter` is not
    /// a single-byte ASCII character.
    pub const fn set_delimiter(&mut self, delimiter: char) -> bool {
        if delimiter.is_ascii() {
            self.delimiter = delimiter;
            true
        } else {
            false
        }
    }
}

fn default_level_marker() -> String {
    "✓".to_string()
}

const fn default_delimiter() -> char {
    ','
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_level_marker")]
        level_marker: String,

        /// Must be ASCII; anything else falls back to the default.
        #[serde(default = "default_delimiter")]
        delimiter: char,

        #[serde(default)]
        allow_interleaved_sections: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                level_marker,
                delimiter,
                allow_interleaved_sections,
            } => Self {
                level_marker,
                delimiter: if delimiter.is_ascii() {
                    delimiter
                } else {
                    tracing::warn!("ignoring non-ASCII delimiter {delimiter:?}");
                    default_delimiter()
                },
                allow_interleaved_sections,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            level_marker: config.level_marker,
            delimiter: config.delimiter,
            allow_interleaved_sections: config.allow_interleaved_sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            "_version = \"1\"\nlevel_marker = \"X\"\ndelimiter = \";\"\nallow_interleaved_sections = true\n"
                .as_bytes(),
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.level_marker(), "X");
        assert_eq!(config.delimiter(), ';');
        assert!(config.allow_interleaved_sections);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nallow_interleaved_sections = \"yes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.level_marker(), "✓");
    }

    #[test]
    fn non_ascii_delimiter_falls_back_to_default() {
        let actual: Config = toml::from_str("_version = \"1\"\ndelimiter = \"→\"\n").unwrap();
        assert_eq!(actual.delimiter(), ',');

        let mut config = Config::default();
        assert!(!config.set_delimiter('→'));
        assert!(config.set_delimiter('\t'));
        assert_eq!(config.delimiter(), '\t');
    }

    #[test]
    fn save_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("asvs.toml");

        let mut config = Config::default();
        config.set_level_marker("Y");
        config.allow_interleaved_sections = true;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
