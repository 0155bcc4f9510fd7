// Catalog sources: where raw rows and stopwords come from
use parking_lot::RwLock;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vitrine_core::{normalize, LoadError, Normalized, RawCatalog, StopWords};

/// Anything that can produce the full raw catalog on demand
pub trait CatalogSource: Send + Sync {
    fn read(&self) -> Result<RawCatalog, LoadError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Read a source and normalize it
pub fn load_products(source: &dyn CatalogSource) -> Result<Normalized, LoadError> {
    let raw = source.read()?;
    Ok(normalize(&raw))
}

/// CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse CSV from any reader. Invalid UTF-8 is replaced, not rejected.
    pub fn parse<R: Read>(&self, reader: R) -> Result<RawCatalog, LoadError> {
        let path = self.path.display().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(|e| LoadError::Malformed {
                path: path.clone(),
                message: format!("failed to read header row: {}", e),
            })?
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .to_string()
            })
            .collect();

        let mut raw = RawCatalog::new(headers);
        for (idx, record) in reader.byte_records().enumerate() {
            match record {
                Ok(record) => raw.push_row(
                    record
                        .iter()
                        .map(|field| Some(String::from_utf8_lossy(field).into_owned())),
                ),
                Err(e) => {
                    warn!(
                        "Stopped reading {} at data row {}: {}",
                        path,
                        idx + 1,
                        e
                    );
                    break;
                }
            }
        }

        debug!("Read {} rows from {}", raw.len(), path);
        Ok(raw)
    }
}

impl CatalogSource for CsvSource {
    fn read(&self) -> Result<RawCatalog, LoadError> {
        let file = File::open(&self.path).map_err(|e| LoadError::SourceUnavailable {
            path: self.path.display().to_string(),
            source: e,
        })?;
        self.parse(BufReader::new(file))
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// In-memory catalog; the content can be swapped to simulate a changed source
#[derive(Debug, Default)]
pub struct MemorySource {
    catalog: RwLock<RawCatalog>,
}

impl MemorySource {
    pub fn new(catalog: RawCatalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    /// Replace the catalog returned by subsequent reads
    pub fn replace(&self, catalog: RawCatalog) {
        *self.catalog.write() = catalog;
    }
}

impl CatalogSource for MemorySource {
    fn read(&self) -> Result<RawCatalog, LoadError> {
        Ok(self.catalog.read().clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Load a stopword file (one word per line).
/// An unreadable file is logged and yields the empty set.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> StopWords {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => {
            let stopwords = StopWords::parse(&content);
            info!("Loaded {} stopwords from {:?}", stopwords.len(), path);
            stopwords
        }
        Err(e) => {
            warn!(
                "Stopword list {:?} unavailable ({}); continuing without stopwords",
                path, e
            );
            StopWords::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_source_reads_rows() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "\u{feff}id, name ,price").expect("write header");
        writeln!(file, "1,Batom matte,29.9").expect("write row");
        writeln!(file, "2,,").expect("write row");
        writeln!(file, "3,Rimel").expect("write short row");

        let raw = CsvSource::new(file.path()).read().expect("read csv");
        assert_eq!(raw.headers, vec!["id", "name", "price"]);
        assert_eq!(raw.len(), 3);
        assert_eq!(raw.rows[1], vec![Some("2".to_string()), None, None]);
        assert_eq!(raw.rows[2][2], None);
    }

    #[test]
    fn test_csv_quoted_fields_and_delimiter() {
        let source = CsvSource::new("inline.csv").with_delimiter(b';');
        let raw = source
            .parse("id;name\n1;\"Pó; compacto\"\n".as_bytes())
            .expect("parse");
        assert_eq!(raw.rows[0][1].as_deref(), Some("Pó; compacto"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let raw = CsvSource::new("inline.csv")
            .parse(&b"id,name\n1,Bat\xffom\n2,Gloss\n"[..])
            .expect("parse");
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows[0][1].as_deref(), Some("Bat\u{fffd}om"));

        let normalized = normalize(&raw);
        assert_eq!(normalized.products.len(), 2);
        assert_eq!(normalized.products[0].name, "Bat\u{fffd}om");
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = CsvSource::new(dir.path().join("missing.csv"));
        assert!(matches!(
            source.read(),
            Err(LoadError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_empty_file_has_no_rows() {
        let file = NamedTempFile::new().expect("temp file");
        let normalized = load_products(&CsvSource::new(file.path())).expect("load");
        assert!(normalized.products.is_empty());
    }

    #[test]
    fn test_load_stopwords_file_and_missing() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "de\npara").expect("write");
        assert_eq!(load_stopwords(file.path()).len(), 2);

        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_stopwords(dir.path().join("nope.txt")).is_empty());
    }

    #[test]
    fn test_memory_source_replace() {
        let source = MemorySource::new(RawCatalog::new(vec!["name".into()]));
        assert!(source.read().unwrap().is_empty());
        let mut next = RawCatalog::new(vec!["name".into()]);
        next.push_row([Some("Gloss")]);
        source.replace(next);
        assert_eq!(source.read().unwrap().len(), 1);
    }
}
