use std::path::Path;

pub fn normalize_command_path(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|candidate| candidate.strip_suffix('"'))
    {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|candidate| candidate.strip_suffix('\''))
    {
        return inner.trim().to_string();
    }
    trimmed.to_string()
}

/// Empty configured paths fall back to the bare tool name, resolved through
/// the platform's executable search path.
pub fn resolve_tool_program(configured: &str, default_name: &str) -> String {
    let normalized = normalize_command_path(configured);
    if normalized.is_empty() {
        default_name.to_string()
    } else {
        normalized
    }
}

fn is_bare_name(program: &str) -> bool {
    !program.contains('/') && !program.contains('\\')
}

pub fn validate_tool_program(program: &str, label: &str) -> Result<(), String> {
    if program.trim().is_empty() {
        return Err(format!("{label} command is empty"));
    }
    if is_bare_name(program) {
        // PATH lookup happens at spawn time; nothing to check here.
        return Ok(());
    }
    let path = Path::new(program);
    if path.is_dir() {
        return Err(format!("{label} path must point to an executable file"));
    }
    if !path.exists() {
        return Err(format!("{label} tool not found at: {program}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_wrapping_double_quotes() {
        assert_eq!(
            normalize_command_path("  \"/opt/android/platform-tools/adb\"  "),
            "/opt/android/platform-tools/adb"
        );
    }

    #[test]
    fn strips_wrapping_single_quotes() {
        assert_eq!(
            normalize_command_path("  '/opt/android/build-tools/aapt'  "),
            "/opt/android/build-tools/aapt"
        );
    }

    #[test]
    fn resolves_empty_to_default_name() {
        assert_eq!(resolve_tool_program("", "adb"), "adb");
        assert_eq!(resolve_tool_program("   ", "aapt"), "aapt");
        assert_eq!(
            resolve_tool_program("/opt/adb", "adb"),
            "/opt/adb"
        );
    }

    #[test]
    fn accepts_bare_names() {
        assert!(validate_tool_program("adb", "ADB").is_ok());
        assert!(validate_tool_program("aapt", "AAPT").is_ok());
    }

    #[test]
    fn rejects_nonexistent_path() {
        let err =
            validate_tool_program("/this/path/should/not/exist/aapt", "AAPT").unwrap_err();
        assert!(err.contains("AAPT tool not found at:"));
    }

    #[test]
    fn rejects_directory_path() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let err =
            validate_tool_program(&tmp.path().to_string_lossy(), "ADB").unwrap_err();
        assert!(err.contains("executable file"));
    }

    #[test]
    fn rejects_empty_program() {
        let err = validate_tool_program("  ", "ADB").unwrap_err();
        assert!(err.contains("empty"));
    }
}
