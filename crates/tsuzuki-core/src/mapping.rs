//! User-supplied overrides from a local (title, season) to a remote entry.
//!
//! The mapping file is YAML:
//!
//! ```yaml
//! entries:
//!   - title: "Show A"
//!     seasons:
//!       - season: 2
//!         anilist-id: 777
//!         start: 13
//! ```
//!
//! `start` is the cumulative episode number that local episode 1 of the
//! season corresponds to on the remote entry. It defaults to 1.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

/// Default file name, resolved against the working directory.
pub const DEFAULT_MAPPING_FILE: &str = "custom_mappings.yaml";

const DEFAULT_START: u32 = 1;

/// One override entry for a single season of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomMapping {
    pub season: u32,
    pub remote_id: u64,
    pub start_offset: u32,
}

/// Immutable lookup of overrides keyed by exact series title.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    by_title: HashMap<String, Vec<CustomMapping>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingDocument {
    entries: Vec<DocumentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentEntry {
    title: String,
    seasons: Vec<DocumentSeason>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DocumentSeason {
    season: u32,
    anilist_id: u64,
    start: Option<u32>,
}

impl MappingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the mapping file at `path`.
    ///
    /// A missing file yields an empty registry. A file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "Custom mapping file not found");
            return Ok(Self::new());
        }

        info!(path = %path.display(), "Custom mapping file found");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a mapping document held in memory.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let document: MappingDocument =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Mapping(e.to_string()))?;

        let mut registry = Self::new();
        for entry in document.entries {
            for season in entry.seasons {
                let mapping = resolve_season(&entry.title, season)?;
                registry.insert(&entry.title, mapping)?;
            }
        }

        Ok(registry)
    }

    /// Look up the override for `season` of `title`.
    pub fn lookup(&self, title: &str, season: u32) -> Option<&CustomMapping> {
        self.by_title
            .get(title)?
            .iter()
            .find(|mapping| mapping.season == season)
    }

    /// All overrides for `title`, in file order.
    pub fn seasons(&self, title: &str) -> &[CustomMapping] {
        self.by_title.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of titles with at least one override.
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    fn insert(&mut self, title: &str, mapping: CustomMapping) -> Result<(), ConfigError> {
        let mappings = self.by_title.entry(title.to_string()).or_default();
        if mappings.iter().any(|m| m.season == mapping.season) {
            return Err(ConfigError::Mapping(format!(
                "duplicate season {} for title {title:?}",
                mapping.season
            )));
        }

        info!(
            title,
            season = mapping.season,
            anilist_id = mapping.remote_id,
            start = mapping.start_offset,
            "Adding custom mapping"
        );
        mappings.push(mapping);
        Ok(())
    }
}

fn resolve_season(title: &str, season: DocumentSeason) -> Result<CustomMapping, ConfigError> {
    if season.season == 0 {
        return Err(ConfigError::Mapping(format!(
            "season must be at least 1 for title {title:?}"
        )));
    }

    let start_offset = season.start.unwrap_or(DEFAULT_START);
    if start_offset == 0 {
        return Err(ConfigError::Mapping(format!(
            "start must be at least 1 for title {title:?} season {}",
            season.season
        )));
    }

    Ok(CustomMapping {
        season: season.season,
        remote_id: season.anilist_id,
        start_offset,
    })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    const SAMPLE: &str = r#"
entries:
  - title: "Show A"
    seasons:
      - season: 1
        anilist-id: 555
      - season: 2
        anilist-id: 777
        start: 13
  - title: "Kaguya-sama"
    seasons:
      - season: 3
        anilist-id: 125367
"#;

    #[test]
    fn test_parse_and_lookup() {
        let registry = MappingRegistry::parse(SAMPLE).unwrap();
        assert_eq!(registry.len(), 2);

        let mapping = registry.lookup("Show A", 2).unwrap();
        assert_eq!(mapping.remote_id, 777);
        assert_eq!(mapping.start_offset, 13);

        let first = registry.lookup("Show A", 1).unwrap();
        assert_eq!(first.remote_id, 555);
        assert_eq!(first.start_offset, 1);
    }

    #[test]
    fn test_lookup_misses_other_seasons() {
        let registry = MappingRegistry::parse(SAMPLE).unwrap();
        assert!(registry.lookup("Show A", 3).is_none());
        assert!(registry.lookup("Kaguya-sama", 1).is_none());
        assert!(registry.lookup("Kaguya-sama", 3).is_some());
    }

    #[test]
    fn test_title_lookup_is_exact() {
        let registry = MappingRegistry::parse(SAMPLE).unwrap();
        assert!(registry.lookup("show a", 2).is_none());
        assert!(registry.lookup("Show A ", 2).is_none());
    }

    #[test]
    fn test_empty_registry_lookup() {
        let registry = MappingRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("Show A", 1).is_none());
        assert!(registry.seasons("Show A").is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(MappingRegistry::parse("").unwrap().is_empty());
        assert!(MappingRegistry::parse("entries: []").unwrap().is_empty());
    }

    #[test]
    fn test_missing_anilist_id_is_error() {
        let yaml = r#"
entries:
  - title: "Show A"
    seasons:
      - season: 1
"#;
        assert!(matches!(
            MappingRegistry::parse(yaml),
            Err(ConfigError::Mapping(_))
        ));
    }

    #[test]
    fn test_misspelled_entries_key_is_error() {
        let yaml = r#"
entires:
  - title: "Show A"
    seasons:
      - season: 1
        anilist-id: 1
"#;
        assert!(matches!(
            MappingRegistry::parse(yaml),
            Err(ConfigError::Mapping(_))
        ));
    }

    #[test]
    fn test_title_without_seasons_is_error() {
        let yaml = r#"
entries:
  - title: "Show A"
"#;
        assert!(matches!(
            MappingRegistry::parse(yaml),
            Err(ConfigError::Mapping(_))
        ));
    }

    #[test]
    fn test_unknown_season_key_is_error() {
        let yaml = r#"
entries:
  - title: "Show A"
    seasons:
      - season: 2
        anilist-id: 777
        strat: 13
"#;
        assert!(MappingRegistry::parse(yaml).is_err());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(MappingRegistry::parse("entries: [title: {").is_err());
    }

    #[test]
    fn test_zero_start_is_error() {
        let yaml = r#"
entries:
  - title: "Show A"
    seasons:
      - season: 1
        anilist-id: 1
        start: 0
"#;
        assert!(MappingRegistry::parse(yaml).is_err());
    }

    #[test]
    fn test_duplicate_season_is_error() {
        let yaml = r#"
entries:
  - title: "Show A"
    seasons:
      - season: 1
        anilist-id: 1
      - season: 1
        anilist-id: 2
"#;
        assert!(MappingRegistry::parse(yaml).is_err());
    }

    #[test]
    fn test_duplicate_titles_merge() {
        let yaml = r#"
entries:
  - title: "Show A"
    seasons:
      - season: 1
        anilist-id: 1
  - title: "Show A"
    seasons:
      - season: 2
        anilist-id: 2
        start: 25
"#;
        let registry = MappingRegistry::parse(yaml).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.seasons("Show A").len(), 2);
        assert_eq!(registry.lookup("Show A", 2).unwrap().start_offset, 25);
    }

    #[test]
    fn test_example_file_parses() {
        let registry =
            MappingRegistry::parse(include_str!("../../../config/custom_mappings.example.yaml"))
                .unwrap();
        assert_eq!(registry.len(), 2);
        let mapping = registry.lookup("Shingeki no Kyojin", 4).unwrap();
        assert_eq!(mapping.remote_id, 104578);
        assert_eq!(mapping.start_offset, 13);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MAPPING_FILE);
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        let registry =
            tracing::subscriber::with_default(subscriber, || MappingRegistry::load(&path)).unwrap();

        assert!(registry.is_empty());
        let output = logs.contents();
        assert!(output.contains("INFO"));
        assert!(output.contains("Custom mapping file not found"));
        assert!(output.contains(DEFAULT_MAPPING_FILE));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MAPPING_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let registry = MappingRegistry::load(&path).unwrap();
        assert_eq!(registry.lookup("Show A", 2).unwrap().remote_id, 777);
    }
}
