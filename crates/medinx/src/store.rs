//! # Side-car Store
//!
//! Metadata for `report.pdf` lives next to it in `report.pdf.mdf`; metadata
//! for the folder `letters/` lives in `letters.mdf`. The store maps between
//! the two names, reads a whole tree into a [`MetadataIndex`] and writes
//! edited documents back.
//!
//! ## Layout
//!
//! ```text
//! root/
//! ├── .medinx.toml          # optional project config
//! ├── letters/
//! │   ├── a.doc
//! │   └── a.doc.mdf         # side-car of letters/a.doc
//! ├── letters.mdf           # side-car of letters/
//! └── notes.txt             # no side-car: not indexed
//! ```
//!
//! Index paths are relative to the root. A side-car whose file or folder no
//! longer exists is an orphan: scans skip it with a warning.
//!
//! ## Atomic Writes
//!
//! A document is written to a temporary file in the same folder, then renamed
//! over the side-car, so a reader never sees a half-written side-car.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::MedinxConfig;
use crate::document::{load_document, Document};
use crate::error::{MedinxError, Result};
use crate::index::MetadataIndex;
use crate::registry::TypeRegistry;

#[derive(Debug, Clone)]
pub struct SidecarStore {
    root: PathBuf,
    extension: String,
    follow_links: bool,
}

impl SidecarStore {
    /// A store over `root` with the default `.mdf` extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &MedinxConfig::default())
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &MedinxConfig) -> Self {
        Self {
            root: root.into(),
            extension: config.sidecar_ext(),
            follow_links: config.follow_links,
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Location of the side-car describing `path` (relative to the root).
    pub fn sidecar_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let mut name = self.root.join(path).into_os_string();
        name.push(&self.extension);
        PathBuf::from(name)
    }

    /// Finds every side-car below the root and reads it.
    ///
    /// Returns `(described path, raw text)` pairs sorted by path.
    pub fn scan(&self) -> Result<Vec<(PathBuf, String)>> {
        let mut sources = Vec::new();
        let mut orphans = 0;

        for entry in WalkDir::new(&self.root).follow_links(self.follow_links) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(described) = self.described_path(entry.path()) else {
                continue;
            };
            if !self.root.join(&described).exists() {
                tracing::warn!(sidecar = %entry.path().display(), "skipping orphan side-car");
                orphans += 1;
                continue;
            }
            let raw = fs::read_to_string(entry.path()).map_err(|e| {
                MedinxError::InvalidDocument {
                    path: entry.path().to_path_buf(),
                    source: Box::new(MedinxError::Io(e)),
                }
            })?;
            sources.push((described, raw));
        }

        sources.sort_by(|a, b| a.0.cmp(&b.0));
        tracing::info!(root = %self.root.display(), found = sources.len(), orphans, "scanned side-cars");
        Ok(sources)
    }

    /// Scans the root and builds an index over every side-car.
    ///
    /// The first document that fails to load aborts the whole load.
    pub fn load_index(&self) -> Result<MetadataIndex> {
        let entries = self
            .scan()?
            .into_iter()
            .map(|(path, raw)| {
                let document = load_document(&raw).map_err(|e| MedinxError::InvalidDocument {
                    path: self.sidecar_path(&path),
                    source: Box::new(e),
                })?;
                Ok((path, document))
            })
            .collect::<Result<Vec<_>>>()?;
        MetadataIndex::build(entries)
    }

    /// Loads every side-car and collects every problem instead of stopping at
    /// the first one.
    ///
    /// Load failures are reported per side-car; type conflicts between the
    /// documents that did load are reported after them.
    pub fn validate(&self) -> Result<Vec<MedinxError>> {
        let mut problems = Vec::new();
        let mut loaded = Vec::new();

        for (path, raw) in self.scan()? {
            match load_document(&raw) {
                Ok(document) => loaded.push((path, document)),
                Err(e) => problems.push(MedinxError::InvalidDocument {
                    path: self.sidecar_path(&path),
                    source: Box::new(e),
                }),
            }
        }

        if let Err(e) = TypeRegistry::from_entries(
            loaded
                .iter()
                .map(|(path, document)| (path.as_path(), document)),
        ) {
            problems.push(e);
        }
        Ok(problems)
    }

    /// Writes the side-car of `path`, replacing any previous one.
    pub fn write(&self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        let target = self.sidecar_path(path);
        let mut content = document.to_json()?;
        content.push('\n');

        let dir = target.parent().unwrap_or(&self.root);
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &target)?;
        tracing::debug!(sidecar = %target.display(), "side-car written");
        Ok(())
    }

    /// Writes the side-car of every entry of `index`.
    pub fn save_index(&self, index: &MetadataIndex) -> Result<()> {
        for entry in index.entries() {
            self.write(&entry.path, &entry.document.borrow())?;
        }
        tracing::info!(root = %self.root.display(), written = index.len(), "index saved");
        Ok(())
    }

    /// The path described by side-car `file`, relative to the root, or
    /// `None` when `file` is not a side-car.
    fn described_path(&self, file: &Path) -> Option<PathBuf> {
        let relative = file.strip_prefix(&self.root).ok()?;
        let text = relative.to_str()?;
        let described = text.strip_suffix(self.extension.as_str())?;
        if described.is_empty() || described.ends_with(std::path::MAIN_SEPARATOR) {
            return None;
        }
        Some(PathBuf::from(described))
    }
}
