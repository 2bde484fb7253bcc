//! Configuration parsing and management.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Articles directory does not exist: {0:?}")]
    MissingArticlesDir(PathBuf),

    #[error("The version file is required to be readable: {0:?}")]
    UnreadableVersionFile(PathBuf),

    #[error("Invalid articles glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Unknown highlight theme: {0}")]
    UnknownTheme(String),
}

/// Main configuration struct matching the lightblog.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Blog title, also the feed title
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub about: Option<String>,

    /// Feed id; falls back to the title
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub root_url: Option<String>,

    #[serde(default = "default_articles_path")]
    pub articles_path: PathBuf,

    /// Marker file whose change signals new content; defaults to `<articles>/version`
    #[serde(default)]
    pub version_path: Option<PathBuf>,

    /// Discovery pattern relative to the articles directory
    #[serde(default)]
    pub articles_glob: Option<String>,

    #[serde(default = "default_article_extension")]
    pub article_extension: String,

    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,

    #[serde(default = "default_base_mount_path")]
    pub base_mount_path: String,

    #[serde(default = "default_static_mount_path")]
    pub articles_static_mount_path: String,

    /// Keep the directory structure of an article's path in its slug
    #[serde(default)]
    pub keep_article_path: bool,

    /// Global switch for the per-article template stage
    #[serde(default = "default_true")]
    pub allow_templating: bool,

    #[serde(default)]
    pub watch_for_changes: bool,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_title() -> String {
    String::from("LightBlog")
}

fn default_articles_path() -> PathBuf {
    PathBuf::from("articles")
}

fn default_article_extension() -> String {
    String::from("md")
}

fn default_date_format() -> String {
    String::from("%Y-%m-%d %H:%M")
}

fn default_highlight_theme() -> String {
    String::from("base16-ocean.dark")
}

fn default_base_mount_path() -> String {
    String::from("/")
}

fn default_static_mount_path() -> String {
    String::from("static")
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: None,
            about: None,
            id: None,
            root_url: None,
            articles_path: default_articles_path(),
            version_path: None,
            articles_glob: None,
            article_extension: default_article_extension(),
            date_format: default_date_format(),
            highlight_theme: default_highlight_theme(),
            base_mount_path: default_base_mount_path(),
            articles_static_mount_path: default_static_mount_path(),
            keep_article_path: false,
            allow_templating: true,
            watch_for_changes: false,
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load and validate in one step; what the CLI uses at startup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at the given articles directory
    pub fn for_articles<P: Into<PathBuf>>(articles_path: P) -> Self {
        Self {
            articles_path: articles_path.into(),
            ..Self::default()
        }
    }

    /// Check everything that would otherwise fail later, while serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let articles_dir = self.articles_dir();
        if !articles_dir.is_dir() {
            return Err(ConfigError::MissingArticlesDir(articles_dir));
        }

        let version_file = self.version_file();
        if std::fs::read(&version_file).is_err() {
            return Err(ConfigError::UnreadableVersionFile(version_file));
        }

        let pattern = self.articles_glob();
        glob::Pattern::new(&pattern)
            .map_err(|source| ConfigError::InvalidGlob { pattern, source })?;

        if self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }

        if !crate::markdown::highlight::has_theme(&self.highlight_theme) {
            return Err(ConfigError::UnknownTheme(self.highlight_theme.clone()));
        }

        Ok(())
    }

    /// Get the articles directory, resolved relative to config file
    pub fn articles_dir(&self) -> PathBuf {
        self.resolve_path(&self.articles_path)
    }

    /// Get the version marker path, resolved relative to config file
    pub fn version_file(&self) -> PathBuf {
        match &self.version_path {
            Some(path) => self.resolve_path(path),
            None => self.articles_dir().join("version"),
        }
    }

    /// Discovery glob, relative to the articles directory
    pub fn articles_glob(&self) -> String {
        self.articles_glob.clone().unwrap_or_else(|| {
            format!("**/*.{}", self.article_extension.trim_start_matches('.'))
        })
    }

    /// Normalized mount path with leading and trailing slash ("/blog/" or "/")
    pub fn base_mount_path(&self) -> String {
        normalize_base_url(&self.base_mount_path)
    }

    /// URL prefix of article static assets, without trailing slash
    pub fn static_prefix(&self) -> String {
        format!(
            "{}{}",
            self.base_mount_path(),
            self.articles_static_mount_path.trim_matches('/')
        )
    }

    pub fn feed_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.title)
    }

    pub fn feed_author(&self) -> &str {
        self.author.as_deref().unwrap_or("Anonymous")
    }

    /// Resolve a path relative to the config file location, then make it
    /// absolute against the working directory.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        let resolved = match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) if !path.is_absolute() => parent.join(path),
            _ => path.to_path_buf(),
        };
        std::path::absolute(&resolved).unwrap_or(resolved)
    }
}

/// Ensure base URLs have a leading and trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    let mut s = raw.trim().to_string();
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    if !s.ends_with('/') {
        s.push('/');
    }

    while s.contains("//") {
        s = s.replace("//", "/");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.title, "LightBlog");
        assert_eq!(config.date_format, "%Y-%m-%d %H:%M");
        assert_eq!(config.articles_glob(), "**/*.md");
        assert_eq!(
            config.version_file(),
            std::env::current_dir().unwrap().join("articles/version")
        );
        assert_eq!(config.static_prefix(), "/static");
        assert_eq!(config.feed_id(), "LightBlog");
        assert_eq!(config.feed_author(), "Anonymous");
        assert!(config.allow_templating);
        assert!(!config.keep_article_path);
    }

    #[test]
    fn test_extension_drives_default_glob() {
        let config = Config {
            article_extension: ".markdown".into(),
            ..Config::default()
        };
        assert_eq!(config.articles_glob(), "**/*.markdown");

        let explicit = Config {
            articles_glob: Some("posts/*.md".into()),
            ..Config::default()
        };
        assert_eq!(explicit.articles_glob(), "posts/*.md");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(""), "/");
        assert_eq!(normalize_base_url("/"), "/");
        assert_eq!(normalize_base_url("blog"), "/blog/");
        assert_eq!(normalize_base_url("//blog//"), "/blog/");
    }

    #[test]
    fn test_static_prefix_uses_mount_path() {
        let config = Config {
            base_mount_path: "/blog".into(),
            articles_static_mount_path: "/assets/".into(),
            ..Config::default()
        };
        assert_eq!(config.static_prefix(), "/blog/assets");
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("lightblog.yml");
        fs::write(
            &config_path,
            "title: My Blog\narticles_path: posts\ndate_format: \"%d/%m/%Y\"\n",
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.articles_dir(), dir.path().join("posts"));
        assert_eq!(config.version_file(), dir.path().join("posts").join("version"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let config = Config::for_articles("posts");
        assert!(config.articles_dir().is_absolute());
        assert_eq!(
            config.articles_dir(),
            std::env::current_dir().unwrap().join("posts")
        );

        let mut from_relative_file = Config::default();
        from_relative_file.config_path = Some(PathBuf::from("lightblog.yml"));
        from_relative_file.articles_path = PathBuf::from("posts");
        assert_eq!(from_relative_file.articles_dir(), config.articles_dir());
    }

    #[test]
    fn test_validate_requires_readable_version_file() {
        let dir = tempdir().unwrap();
        let config = Config::for_articles(dir.path());

        match config.validate() {
            Err(ConfigError::UnreadableVersionFile(path)) => {
                assert_eq!(path, dir.path().join("version"))
            }
            other => panic!("Expected UnreadableVersionFile, got {:?}", other),
        }

        fs::write(dir.path().join("version"), "1").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_contradictory_settings() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("version"), "1").unwrap();

        let missing_dir = Config::for_articles(dir.path().join("nope"));
        assert!(matches!(
            missing_dir.validate(),
            Err(ConfigError::MissingArticlesDir(_))
        ));

        let bad_glob = Config {
            articles_glob: Some("**/[".into()),
            ..Config::for_articles(dir.path())
        };
        assert!(matches!(
            bad_glob.validate(),
            Err(ConfigError::InvalidGlob { .. })
        ));

        let bad_date = Config {
            date_format: "%Y-%Q".into(),
            ..Config::for_articles(dir.path())
        };
        assert!(matches!(
            bad_date.validate(),
            Err(ConfigError::InvalidDateFormat(_))
        ));

        let bad_theme = Config {
            highlight_theme: "no-such-theme".into(),
            ..Config::for_articles(dir.path())
        };
        assert!(matches!(
            bad_theme.validate(),
            Err(ConfigError::UnknownTheme(_))
        ));
    }
}
