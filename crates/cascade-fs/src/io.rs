//! Text I/O and definition file discovery

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Whether a file name carries a YAML extension (`.yaml` or `.yml`).
pub fn is_yaml_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

/// List the YAML files directly inside `dir`.
///
/// Sub-directories are not descended into. The result is sorted so that
/// callers process files in a stable order.
pub fn list_yaml_files(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native_dir = dir.to_native();
    let entries = fs::read_dir(&native_dir).map_err(|e| Error::io(&native_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_dir() {
            continue;
        }
        if !is_yaml_file(&name) {
            tracing::debug!(file = %name, "Skipping non-YAML file");
            continue;
        }
        files.push(dir.join(&name));
    }

    files.sort();
    Ok(files)
}
