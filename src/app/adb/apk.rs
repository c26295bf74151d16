use std::fs::{self, File};
use std::path::PathBuf;

use zip::ZipArchive;

use crate::app::models::ApkInfo;

pub fn normalize_apk_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(path.trim_start_matches("~/"));
        }
    }
    PathBuf::from(path)
}

/// Local preflight for an APK: existence, size, and whether the file opens as
/// a ZIP archive. Never touches adb or aapt.
pub fn describe_apk(path: &str) -> ApkInfo {
    let mut info = ApkInfo {
        path: path.to_string(),
        exists: false,
        file_size_bytes: 0,
        valid_archive: false,
        error: None,
    };

    let normalized = normalize_apk_path(path);
    if !normalized.is_file() {
        info.error = Some(format!("File not found: {path}"));
        return info;
    }
    info.exists = true;

    if let Ok(metadata) = fs::metadata(&normalized) {
        info.file_size_bytes = metadata.len();
    }

    match File::open(&normalized) {
        Ok(file) => match ZipArchive::new(file) {
            Ok(_) => info.valid_archive = true,
            Err(err) => info.error = Some(format!("Invalid APK: {err}")),
        },
        Err(err) => info.error = Some(format!("Failed to open APK: {err}")),
    }

    info
}
