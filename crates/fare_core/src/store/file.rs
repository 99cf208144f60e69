use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::model::StoreDocumentV1;
use super::{StoreError, STORE_FILE_VERSION};

pub(super) fn load_document(path: &Path) -> Result<StoreDocumentV1, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StoreDocumentV1::empty())
        }
        Err(error) => {
            return Err(StoreError::Io(format!(
                "failed to read store file '{}': {error}",
                path.display()
            )))
        }
    };

    let document: StoreDocumentV1 = serde_json::from_str(&contents).map_err(|error| {
        StoreError::InvalidFormat(format!("invalid store file '{}': {error}", path.display()))
    })?;

    if document.version != STORE_FILE_VERSION {
        return Err(StoreError::InvalidFormat(format!(
            "unsupported store file version {} in '{}'",
            document.version,
            path.display()
        )));
    }

    Ok(document)
}

/// Load before an explicit calibration save. An unreadable file is overwritten,
/// every other write keeps it untouched and reports `InvalidFormat`.
pub(super) fn load_document_for_overwrite(path: &Path) -> Result<StoreDocumentV1, StoreError> {
    match load_document(path) {
        Ok(document) => Ok(document),
        Err(StoreError::InvalidFormat(message)) => {
            tracing::warn!(%message, "overwriting unreadable store file");
            Ok(StoreDocumentV1::empty())
        }
        Err(error) => Err(error),
    }
}

pub(super) fn save_document_atomic(
    path: &Path,
    document: &StoreDocumentV1,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            StoreError::Io(format!(
                "failed to create data directory '{}': {error}",
                parent.display()
            ))
        })?;
    }

    let serialized = serde_json::to_string_pretty(document)
        .map_err(|error| StoreError::Io(format!("failed to serialize store to json: {error}")))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("json.tmp.{nanos}"));
    let mut temp_file = File::create(&temp_path).map_err(|error| {
        StoreError::Io(format!(
            "failed to create temp store file '{}': {error}",
            temp_path.display()
        ))
    })?;
    temp_file
        .write_all(serialized.as_bytes())
        .map_err(|error| {
            StoreError::Io(format!(
                "failed to write temp store file '{}': {error}",
                temp_path.display()
            ))
        })?;
    temp_file.sync_all().map_err(|error| {
        StoreError::Io(format!(
            "failed to flush temp store file '{}': {error}",
            temp_path.display()
        ))
    })?;

    replace_file(&temp_path, path)
}

fn replace_file(temp_path: &Path, target_path: &Path) -> Result<(), StoreError> {
    let Err(first_error) = fs::rename(temp_path, target_path) else {
        return Ok(());
    };

    if !target_path.exists() {
        let _ = fs::remove_file(temp_path);
        return Err(StoreError::Io(format!(
            "failed to move temp store file '{}' to '{}': {first_error}",
            temp_path.display(),
            target_path.display()
        )));
    }

    // Some platforms refuse to rename over an existing file.
    fs::remove_file(target_path).map_err(|remove_error| {
        let _ = fs::remove_file(temp_path);
        StoreError::Io(format!(
            "failed to replace store file '{}': {first_error}; remove failed: {remove_error}",
            target_path.display()
        ))
    })?;
    fs::rename(temp_path, target_path).map_err(|rename_error| {
        let _ = fs::remove_file(temp_path);
        StoreError::Io(format!(
            "failed to move temp store file '{}' to '{}': {rename_error}",
            temp_path.display(),
            target_path.display()
        ))
    })
}
