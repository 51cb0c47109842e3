//! Project files on disk.
//!
//! A project file is the encoded model document, pretty-printed, under the
//! dedicated `.gwref` extension. The extension is part of the contract:
//! saving coerces any other suffix to `.gwref`, and loading anything else is
//! a hard error rather than a guess at the content. Saving never replaces an
//! existing file unless the caller passes `overwrite`.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{GwrefError, Result};
use crate::io::codec;
use crate::model::Model;

/// File extension identifying a project document.
pub const PROJECT_EXTENSION: &str = "gwref";

/// Write the model to `path`, returning the path actually written.
///
/// The returned path can differ from the argument when the extension was
/// coerced. Refuses to replace an existing file unless `overwrite` is set.
pub fn save_project(path: impl AsRef<Path>, model: &Model, overwrite: bool) -> Result<PathBuf> {
    let mut path = path.as_ref().to_path_buf();
    if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
        path.set_extension(PROJECT_EXTENSION);
    }
    if path.exists() && !overwrite {
        return Err(GwrefError::Validation(format!(
            "'{}' already exists; pass overwrite to replace it",
            path.display()
        )));
    }

    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, &codec::encode(model))?;
    info!(model = model.name(), path = %path.display(), "project saved");
    Ok(path)
}

/// Read a model back from a `.gwref` project file.
pub fn load_project(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
        return Err(GwrefError::Validation(format!(
            "unsupported file extension on '{}'; expected '.{PROJECT_EXTENSION}'",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let doc: Value = serde_json::from_reader(file)?;
    let model = codec::decode(&doc)?;
    info!(model = model.name(), path = %path.display(), "project loaded");
    Ok(model)
}
