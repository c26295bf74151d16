use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResponse<T> {
    pub trace_id: String,
    pub data: T,
}

/// Device lines as reported by `adb devices`, header and blanks removed.
/// Lines keep their original order and are otherwise opaque.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceListing {
    pub lines: Vec<String>,
    pub raw_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageExtraction {
    pub package_name: String,
    /// Badging lines mentioning "package", kept for display alongside the match.
    pub badging_lines: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub available: bool,
    pub version_output: String,
    pub command_path: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolsReport {
    pub adb: ToolInfo,
    pub aapt: ToolInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApkInfo {
    pub path: String,
    pub exists: bool,
    pub file_size_bytes: u64,
    pub valid_archive: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectRecord {
    pub address: String,
    pub connected_at: DateTime<Utc>,
}
