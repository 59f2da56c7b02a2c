//! Output file registry.
//!
//! Generators register `(path, kind, producer, text)`; nothing touches the
//! disk until [`OutputManager::write_all`]. The same text registered twice
//! for one path is kept once; different text is a conflict.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::CodegenError;

/// What a generated file is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FileKind {
    /// C ABI header (`.h`).
    AbiHeader,
    /// C ABI source (`.c`).
    AbiSource,
    /// C++ header (`.hpp`).
    CppHeader,
    /// C++ source (`.cpp`).
    CppSource,
}

impl FileKind {
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::AbiHeader => "h",
            FileKind::AbiSource => "c",
            FileKind::CppHeader => "hpp",
            FileKind::CppSource => "cpp",
        }
    }
}

/// A registered output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    pub kind: FileKind,
    /// Who registered it first, for conflict reports.
    pub producer: String,
    pub text: String,
}

/// Collects generated files keyed by relative path.
#[derive(Debug, Default)]
pub struct OutputManager {
    files: BTreeMap<String, OutputFile>,
}

impl OutputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::RegistrationConflict`] if `path` is already
    /// registered with different text.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        kind: FileKind,
        producer: impl Into<String>,
        text: String,
    ) -> Result<(), CodegenError> {
        let path = path.into();
        let producer = producer.into();

        if let Some(existing) = self.files.get(&path) {
            if existing.text == text {
                trace!(%path, %producer, "duplicate registration with identical content");
                return Ok(());
            }
            return Err(CodegenError::RegistrationConflict {
                path,
                first: existing.producer.clone(),
                second: producer,
            });
        }

        debug!(%path, ?kind, %producer, bytes = text.len(), "registered output file");
        self.files.insert(
            path,
            OutputFile {
                kind,
                producer,
                text,
            },
        );
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&OutputFile> {
        self.files.get(path)
    }

    /// Files in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputFile)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file under `dir`, creating directories as needed.
    ///
    /// Returns the number of files written.
    pub fn write_all(&self, dir: &Path) -> Result<usize, CodegenError> {
        for (path, file) in &self.files {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| CodegenError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&target, &file.text).map_err(|source| CodegenError::Io {
                path: target.clone(),
                source,
            })?;
        }
        debug!(dir = %dir.display(), files = self.files.len(), "wrote output");
        Ok(self.files.len())
    }
}
