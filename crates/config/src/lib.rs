//! Layered configuration for bookshelf.
//!
//! Sources are merged with later ones taking precedence:
//!
//! 1. built-in defaults,
//! 2. a configuration file (an explicit one, or `bookshelf.toml` in the
//!    platform configuration directory when it exists),
//! 3. `BOOKSHELF_`-prefixed environment variables,
//! 4. command-line [`Overrides`].
//!
//! | Key            | Env                      | Default                        |
//! |----------------|--------------------------|--------------------------------|
//! | `data_dir`     | `BOOKSHELF_DATA_DIR`     | platform data directory        |
//! | `catalog_file` | `BOOKSHELF_CATALOG_FILE` | `books.json` (relative only)   |
//! | `read_only`    | `BOOKSHELF_READ_ONLY`    | `false`                        |

pub mod error;

use crate::error::{ErrorKind, Result};
use bookshelf_storage::validate_path;
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APPLICATION: &str = "bookshelf";
pub const CONFIG_FILE_NAME: &str = "bookshelf.toml";
pub const DEFAULT_CATALOG_FILE: &str = "books.json";
pub const ENV_PREFIX: &str = "BOOKSHELF_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the catalog file lives in. Always absolute once loaded.
    pub data_dir: PathBuf,
    /// Catalog file name, relative to `data_dir`.
    pub catalog_file: PathBuf,
    /// Never write to disk; changes only last for the session.
    pub read_only: bool,
}
impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs().map(|dirs| dirs.data_dir().to_path_buf()).unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir,
            catalog_file: PathBuf::from(DEFAULT_CATALOG_FILE),
            read_only: false,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

impl Config {
    /// Load configuration from every layer and validate it.
    ///
    /// `file` names an explicit configuration file, which must exist. Without
    /// one, the platform configuration directory is searched instead and a
    /// missing file there is not an error.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config: Self = Self::figment(file)?
            .merge(Serialized::defaults(overrides))
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validated()
    }

    /// Every layer except command-line overrides.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match file {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::MissingFile(path.to_path_buf()));
                }
                figment.merge(file_provider(path)?)
            },
            None => match project_dirs() {
                Some(dirs) => {
                    let path = dirs.config_dir().join(CONFIG_FILE_NAME);
                    tracing::debug!(path = %path.display(), "Looking for configuration file");
                    figment.merge(Toml::file(path))
                },
                None => figment,
            },
        };
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Absolute location of the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    fn validated(mut self) -> Result<Self> {
        if !self.data_dir.is_absolute() {
            let cwd = std::env::current_dir().or_raise(|| ErrorKind::InvalidPath(self.data_dir.clone()))?;
            self.data_dir = cwd.join(&self.data_dir);
        }
        // Storage would quietly re-root an absolute name under `data_dir`.
        if self.catalog_file.has_root() {
            exn::bail!(ErrorKind::InvalidPath(self.catalog_file.clone()));
        }
        self.catalog_file =
            validate_path(&self.catalog_file).or_raise(|| ErrorKind::InvalidPath(self.catalog_file.clone()))?;
        Ok(self)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

fn file_provider(path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase);
    let provider = match extension.as_deref() {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("yaml" | "yml") => Figment::from(Yaml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_file_values_apply() {
        Jail::expect_with(|jail| {
            jail.create_file("bookshelf.toml", "data_dir = \"/srv/books\"\ncatalog_file = \"shelf.json\"")?;
            let config = Config::load(Some(Path::new("bookshelf.toml")), Overrides::default()).unwrap();
            assert_eq!(config.data_dir, Path::new("/srv/books"));
            assert_eq!(config.catalog_file, Path::new("shelf.json"));
            assert!(!config.read_only);
            assert_eq!(config.catalog_path(), Path::new("/srv/books/shelf.json"));
            Ok(())
        });
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("bookshelf.toml", "")?;
            let config = Config::load(Some(Path::new("bookshelf.toml")), Overrides::default()).unwrap();
            assert_eq!(config.catalog_file, Path::new(DEFAULT_CATALOG_FILE));
            assert!(config.data_dir.is_absolute());
            assert!(!config.read_only);
            Ok(())
        });
    }

    #[rstest]
    #[case("bookshelf.yaml", "read_only: true\ncatalog_file: other.json\n")]
    #[case("bookshelf.yml", "read_only: true\ncatalog_file: other.json\n")]
    #[case("bookshelf.json", r#"{"read_only": true, "catalog_file": "other.json"}"#)]
    fn test_other_formats(#[case] name: &str, #[case] contents: &str) {
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            let config = Config::load(Some(Path::new(name)), Overrides::default()).unwrap();
            assert!(config.read_only);
            assert_eq!(config.catalog_file, Path::new("other.json"));
            Ok(())
        });
    }

    #[test]
    fn test_layer_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file("bookshelf.toml", "data_dir = \"/from/file\"\ncatalog_file = \"file.json\"")?;
            jail.set_env("BOOKSHELF_CATALOG_FILE", "env.json");
            jail.set_env("BOOKSHELF_READ_ONLY", "true");

            let config = Config::load(Some(Path::new("bookshelf.toml")), Overrides::default()).unwrap();
            assert_eq!(config.data_dir, Path::new("/from/file"));
            assert_eq!(config.catalog_file, Path::new("env.json"));
            assert!(config.read_only);

            let overrides = Overrides {
                catalog_file: Some(PathBuf::from("cli.json")),
                read_only: Some(false),
                ..Overrides::default()
            };
            let config = Config::load(Some(Path::new("bookshelf.toml")), overrides).unwrap();
            assert_eq!(config.data_dir, Path::new("/from/file"));
            assert_eq!(config.catalog_file, Path::new("cli.json"));
            assert!(!config.read_only);
            Ok(())
        });
    }

    #[test]
    fn test_relative_data_dir_is_resolved() {
        Jail::expect_with(|jail| {
            jail.create_file("bookshelf.toml", "data_dir = \"library\"")?;
            let config = Config::load(Some(Path::new("bookshelf.toml")), Overrides::default()).unwrap();
            assert!(config.data_dir.is_absolute());
            assert!(config.data_dir.ends_with("library"));
            Ok(())
        });
    }

    #[rstest]
    #[case("../books.json")]
    #[case("")]
    #[case("/tmp/books.json")]
    fn test_invalid_catalog_file(#[case] catalog_file: &str) {
        Jail::expect_with(|jail| {
            jail.create_file("bookshelf.toml", "")?;
            let overrides = Overrides { catalog_file: Some(PathBuf::from(catalog_file)), ..Overrides::default() };
            let err = Config::load(Some(Path::new("bookshelf.toml")), overrides).unwrap_err();
            assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");
        let err = Config::load(Some(&path), Overrides::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingFile(path));
    }

    #[test]
    fn test_unsupported_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bookshelf.ini");
        std::fs::write(&path, "read_only = true").unwrap();
        let err = Config::load(Some(&path), Overrides::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat(path));
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("bookshelf.toml", "read_only = \"sometimes\"")?;
            let err = Config::load(Some(Path::new("bookshelf.toml")), Overrides::default()).unwrap_err();
            assert_eq!(*err, ErrorKind::Load);
            Ok(())
        });
    }
}
