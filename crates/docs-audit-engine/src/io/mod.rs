use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    audit::SourceDocument,
    metadata::{DocFxConfig, Metadata, MetadataError},
};

pub const DOCFX_FILE: &str = "docfx.json";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid docfx.json {path}: {source}")]
    DocFx {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
}

/// Read a document from disk. The file name is kept as given.
pub fn read_document(path: &Path) -> Result<SourceDocument, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(IoError::Io)?;
    Ok(SourceDocument::new(path.to_string_lossy(), text))
}

/// Find the nearest `docfx.json` in the directory of `document` or any of
/// its ancestors.
pub fn find_docfx_json(document: &Path) -> Option<PathBuf> {
    document
        .parent()?
        .ancestors()
        .map(|dir| dir.join(DOCFX_FILE))
        .find(|candidate| candidate.is_file())
}

/// Global metadata from a `docfx.json` file.
pub fn read_docfx_defaults(path: &Path) -> Result<Metadata, IoError> {
    let json = fs::read_to_string(path).map_err(IoError::Io)?;
    let config = DocFxConfig::from_json(&json).map_err(|source| IoError::DocFx {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config.global_metadata())
}

/// Read a document along with the docfx global metadata that applies to it.
///
/// A broken `docfx.json` is logged and ignored.
pub fn load_document(path: &Path) -> Result<SourceDocument, IoError> {
    let doc = read_document(path)?;
    let Some(docfx) = find_docfx_json(path) else {
        return Ok(doc);
    };
    match read_docfx_defaults(&docfx) {
        Ok(defaults) => {
            log::debug!("using {} global metadata keys from {}", defaults.len(), docfx.display());
            Ok(doc.with_defaults(defaults))
        }
        Err(e) => {
            log::warn!("{e}");
            Ok(doc)
        }
    }
}
