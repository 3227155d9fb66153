use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::ir::Program;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("at JSON path {path} → {message}")]
    Shape { path: String, message: String },

    #[error("JSON pointer {0} selects nothing")]
    PointerMiss(String),
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(shape_error)
}

pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, LoadError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(shape_error)
}

fn shape_error(err: serde_path_to_error::Error<serde_json::Error>) -> LoadError {
    let path = err.path().to_string();
    LoadError::Shape { path, message: err.into_inner().to_string() }
}

/// Parse a program from JSON text, optionally selecting a subnode first
/// (e.g. `/shaders/0/program`).
pub fn program_from_str(src: &str, json_pointer: Option<&str>) -> Result<Program, LoadError> {
    let Some(pointer) = json_pointer else {
        return from_str_with_path(src);
    };
    let mut doc = serde_json::from_str::<Value>(src)?;
    let node = doc
        .pointer_mut(pointer)
        .ok_or_else(|| LoadError::PointerMiss(pointer.to_string()))?
        .take();
    from_value_with_path(node)
}

pub fn load_program(path: &Path, json_pointer: Option<&str>) -> Result<Program, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded {} ({} bytes)", path.display(), source.len());
    program_from_str(&source, json_pointer)
}

// ------------------------------- Tests ------------------------------------ //
