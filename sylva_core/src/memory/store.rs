//! Backing stores for the interaction log.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::LogState;
use crate::error::MemoryError;

/// Where a [`LogState`] is persisted.
///
/// `load` returns `Ok(None)` when nothing has been stored yet. A store that
/// exists but cannot be parsed is an error; recovery is up to the caller.
pub trait LogStore {
    fn load(&self) -> Result<Option<LogState>, MemoryError>;

    fn save(&mut self, state: &LogState) -> Result<(), MemoryError>;

    /// Human-readable location, used in log messages and the CLI.
    fn location(&self) -> String;

    /// Size of the persisted data in bytes, 0 if absent.
    fn size_bytes(&self) -> u64;
}

/// JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStore for JsonFileStore {
    fn load(&self) -> Result<Option<LogState>, MemoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MemoryError::io(&self.path, e)),
        };
        let mut state: LogState = serde_json::from_str(&content)?;
        state.recompute_activity();
        Ok(Some(state))
    }

    fn save(&mut self, state: &LogState) -> Result<(), MemoryError> {
        let json = serde_json::to_string_pretty(state)?;
        write_atomic(&self.path, json.as_bytes())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn size_bytes(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }
}

/// Write `bytes` to a uniquely named sibling of `path`, then rename it over
/// `path`. The temporary file is removed if any step fails.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), MemoryError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| MemoryError::io(&dir, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        MemoryError::io(path, e)
    })
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    content: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw serialized content, valid or not.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            saves: 0,
        }
    }

    /// The last saved JSON text.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl LogStore for MemoryStore {
    fn load(&self) -> Result<Option<LogState>, MemoryError> {
        match &self.content {
            None => Ok(None),
            Some(content) => {
                let mut state: LogState = serde_json::from_str(content)?;
                state.recompute_activity();
                Ok(Some(state))
            }
        }
    }

    fn save(&mut self, state: &LogState) -> Result<(), MemoryError> {
        self.content = Some(serde_json::to_string_pretty(state)?);
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }

    fn size_bytes(&self) -> u64 {
        self.content.as_ref().map_or(0, |c| c.len() as u64)
    }
}
