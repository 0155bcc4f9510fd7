use crate::source::{load_stopwords, CsvSource};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use vitrine_core::{Language, StopWords};

/// Where the stopword list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopwordConfig {
    Builtin(Language),
    File(PathBuf),
    None,
}

impl StopwordConfig {
    /// Resolve to a stopword set; a missing file degrades to the empty set
    pub fn load(&self) -> StopWords {
        match self {
            StopwordConfig::Builtin(language) => StopWords::for_language(*language),
            StopwordConfig::File(path) => load_stopwords(path),
            StopwordConfig::None => StopWords::empty(),
        }
    }
}

impl Default for StopwordConfig {
    fn default() -> Self {
        StopwordConfig::Builtin(Language::Portuguese)
    }
}

impl FromStr for StopwordConfig {
    type Err = std::convert::Infallible;

    /// `none`, a language name, or else a file path
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(StopwordConfig::None);
        }
        Ok(match trimmed.parse::<Language>() {
            Ok(language) => StopwordConfig::Builtin(language),
            Err(_) => StopwordConfig::File(PathBuf::from(trimmed)),
        })
    }
}

impl fmt::Display for StopwordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopwordConfig::Builtin(Language::Portuguese) => write!(f, "portuguese"),
            StopwordConfig::Builtin(Language::English) => write!(f, "english"),
            StopwordConfig::File(path) => write!(f, "{}", path.display()),
            StopwordConfig::None => write!(f, "none"),
        }
    }
}

/// Configuration for a catalog manager
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub catalog_path: PathBuf,
    pub stopwords: StopwordConfig,
    pub delimiter: u8,
    /// Reload the catalog periodically when set
    pub reload_interval: Option<Duration>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./data/catalog.csv"),
            stopwords: StopwordConfig::default(),
            delimiter: b',',
            reload_interval: None,
        }
    }
}

impl CatalogConfig {
    pub fn new<P: Into<PathBuf>>(catalog_path: P) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stopwords(mut self, stopwords: StopwordConfig) -> Self {
        self.stopwords = stopwords;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_reload_interval(mut self, interval: Option<Duration>) -> Self {
        self.reload_interval = interval.filter(|d| !d.is_zero());
        self
    }

    pub fn source(&self) -> CsvSource {
        CsvSource::new(&self.catalog_path).with_delimiter(self.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopword_config_from_str() {
        assert_eq!("none".parse(), Ok(StopwordConfig::None));
        assert_eq!("".parse(), Ok(StopwordConfig::None));
        assert_eq!(
            "English".parse(),
            Ok(StopwordConfig::Builtin(Language::English))
        );
        assert_eq!(
            "lists/pt.txt".parse(),
            Ok(StopwordConfig::File(PathBuf::from("lists/pt.txt")))
        );
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.stopwords, StopwordConfig::Builtin(Language::Portuguese));
        assert_eq!(config.delimiter, b',');
        assert!(config.reload_interval.is_none());
    }

    #[test]
    fn test_zero_reload_interval_disables_reload() {
        let config = CatalogConfig::new("c.csv").with_reload_interval(Some(Duration::ZERO));
        assert!(config.reload_interval.is_none());
    }

    #[test]
    fn test_missing_stopword_file_loads_empty() {
        let config = StopwordConfig::File(PathBuf::from("/definitely/not/here.txt"));
        assert!(config.load().is_empty());
        assert!(!StopwordConfig::default().load().is_empty());
    }
}
