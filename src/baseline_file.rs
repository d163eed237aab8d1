use crate::checksum::is_sha256_hex;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASELINE_FILE: &str = ".fileward.json";

#[derive(Debug, thiserror::Error)]
pub enum BaselineFileError {
    #[error("IO error accessing baseline {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Baseline {path} is corrupt and could not be parsed: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BaselineFileError {
    fn from_io(path: &Path, e: std::io::Error) -> Self {
        if e.kind() == ErrorKind::PermissionDenied {
            BaselineFileError::PermissionDenied(path.to_path_buf())
        } else {
            BaselineFileError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    }
}

/// Recorded path to digest mapping.
///
/// Iteration order is insertion order. Re-inserting a tracked path keeps its
/// position and removing a path keeps the relative order of the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: IndexMap<String, String>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the digest for `path`, returning the previous digest.
    pub fn insert(&mut self, path: String, sha256: String) -> Option<String> {
        self.entries.insert(path, sha256)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.shift_remove(path)
    }

    #[allow(dead_code)]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }

    /// Parse the persisted JSON form.
    ///
    /// `source` is only used to label errors.
    pub fn from_json(content: &str, source: &Path) -> Result<Self, BaselineFileError> {
        let baseline: Baseline =
            serde_json::from_str(content).map_err(|e| BaselineFileError::Corrupt {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;

        if let Some((path, digest)) = baseline.iter().find(|(_, d)| !is_sha256_hex(d)) {
            return Err(BaselineFileError::Corrupt {
                path: source.to_path_buf(),
                reason: format!("invalid sha256 digest {digest:?} for {path}"),
            });
        }

        Ok(baseline)
    }

    pub fn to_json(&self) -> Result<String, BaselineFileError> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        Ok(content)
    }
}

/// Durable home of the baseline.
///
/// The location is fixed at construction; nothing is cached between calls, so
/// every `load` observes the latest complete `save` from any process.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BaselineStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted baseline, or an empty one if none has been saved yet.
    pub fn load(&self) -> Result<Baseline, BaselineFileError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Baseline::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(BaselineFileError::Corrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(BaselineFileError::from_io(&self.path, e)),
        };

        Baseline::from_json(&content, &self.path)
    }

    /// Save the baseline atomically.
    ///
    /// Writes to a temporary file, fsyncs it, then atomically renames it into place.
    pub fn save(&self, baseline: &Baseline) -> Result<(), BaselineFileError> {
        use std::io::Write;

        let content = baseline.to_json()?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| BaselineFileError::from_io(parent, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| BaselineFileError::from_io(&self.path, e))?;

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| BaselineFileError::from_io(&self.path, e))?;

        temp_file
            .persist(&self.path)
            .map_err(|e| BaselineFileError::from_io(&self.path, e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn store_in(temp: &TempDir) -> BaselineStore {
        BaselineStore::new(temp.path().join(DEFAULT_BASELINE_FILE))
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(!store.exists());
        let baseline = store.load().unwrap();
        assert!(baseline.is_empty());
    }

    #[test]
    fn test_parse_valid_json() {
        let content = format!(r#"{{ "a.txt": "{HELLO_SHA256}", "etc/hosts": "{EMPTY_SHA256}" }}"#);

        let baseline = Baseline::from_json(&content, Path::new("b.json")).unwrap();

        assert_eq!(baseline.len(), 2);
        assert_eq!(baseline.get("a.txt"), Some(HELLO_SHA256));
        assert_eq!(baseline.get("etc/hosts"), Some(EMPTY_SHA256));
    }

    #[test]
    fn test_parse_preserves_document_order() {
        let content = format!(
            r#"{{ "zeta": "{HELLO_SHA256}", "alpha": "{EMPTY_SHA256}", "mid": "{HELLO_SHA256}" }}"#
        );

        let baseline = Baseline::from_json(&content, Path::new("b.json")).unwrap();

        let paths: Vec<_> = baseline.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_corrupt_not_json() {
        let result = Baseline::from_json("this is { not json", Path::new("b.json"));
        assert!(matches!(result, Err(BaselineFileError::Corrupt { .. })));
    }

    #[test]
    fn test_corrupt_not_a_mapping() {
        let result = Baseline::from_json(r#"["a.txt"]"#, Path::new("b.json"));
        assert!(matches!(result, Err(BaselineFileError::Corrupt { .. })));
    }

    #[test]
    fn test_corrupt_non_string_digest() {
        let result = Baseline::from_json(r#"{ "a.txt": 42 }"#, Path::new("b.json"));
        assert!(matches!(result, Err(BaselineFileError::Corrupt { .. })));
    }

    #[test]
    fn test_corrupt_malformed_digest() {
        let result = Baseline::from_json(r#"{ "a.txt": "abc123" }"#, Path::new("b.json"));
        match result {
            Err(BaselineFileError::Corrupt { reason, .. }) => {
                assert!(reason.contains("a.txt"), "reason: {reason}");
            }
            other => panic!("Expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn test_load_corrupt_file_is_error_not_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        std::fs::write(store.path(), "{ truncated").unwrap();

        let result = store.load();

        match result {
            Err(BaselineFileError::Corrupt { path, .. }) => assert_eq!(path, store.path()),
            other => panic!("Expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut baseline = Baseline::new();
        baseline.insert("b.txt".to_string(), HELLO_SHA256.to_string());
        baseline.insert("a.txt".to_string(), EMPTY_SHA256.to_string());

        store.save(&baseline).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, baseline);

        // Saving what was loaded does not change the logical content.
        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap(), baseline);
    }

    #[test]
    fn test_save_load_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(&Baseline::new()).unwrap();

        assert!(store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let mut first = Baseline::new();
        first.insert("a.txt".to_string(), HELLO_SHA256.to_string());
        store.save(&first).unwrap();

        let mut second = Baseline::new();
        second.insert("b.txt".to_string(), EMPTY_SHA256.to_string());
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);

        let names: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![DEFAULT_BASELINE_FILE.to_string()]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut baseline = Baseline::new();
        baseline.insert("one".to_string(), HELLO_SHA256.to_string());
        baseline.insert("two".to_string(), HELLO_SHA256.to_string());
        baseline.insert("three".to_string(), HELLO_SHA256.to_string());

        assert_eq!(baseline.remove("two"), Some(HELLO_SHA256.to_string()));
        assert_eq!(baseline.remove("two"), None);

        let paths: Vec<_> = baseline.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["one", "three"]);
    }

    #[test]
    fn test_json_output_is_path_to_digest_object() {
        let mut baseline = Baseline::new();
        baseline.insert("a.txt".to_string(), HELLO_SHA256.to_string());

        let json = baseline.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value, serde_json::json!({ "a.txt": HELLO_SHA256 }));
        assert!(json.ends_with('\n'));
    }
}
