use regex::Regex;

const DEVICE_LIST_HEADER: &str = "List of devices attached";

/// Splits `adb devices` output into display-ready lines: blanks and the header
/// dropped, each survivor trimmed, order preserved. Line shape is not
/// validated; whatever adb printed passes through.
pub fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.contains(DEVICE_LIST_HEADER))
        .map(|line| line.trim().to_string())
        .collect()
}

/// First `package: name='<value>'` capture in badging output. Anchoring on
/// `name='` skips the other "package"-prefixed badging lines
/// (application-icon and friends).
pub fn extract_package_name(output: &str) -> Option<String> {
    let regex = Regex::new(r"package: name='([^']+)'").ok()?;
    regex.captures(output).map(|caps| caps[1].to_string())
}

/// In-process stand-in for piping badging output through a "package" line
/// filter.
pub fn filter_badging_package_lines(output: &str) -> String {
    output
        .lines()
        .filter(|line| line.contains("package"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_header_and_trims_device_lines() {
        let output = "List of devices attached\nABCD1234\tdevice\n";
        assert_eq!(parse_device_list(output), vec!["ABCD1234\tdevice"]);
    }

    #[test]
    fn drops_blank_lines_and_preserves_order() {
        let output =
            "List of devices attached\n\n0123456789ABCDEF\tdevice\n   \nemulator-5554\toffline\n";
        let lines = parse_device_list(output);
        assert_eq!(lines, vec!["0123456789ABCDEF\tdevice", "emulator-5554\toffline"]);
        assert!(lines.iter().all(|line| !line.trim().is_empty()));
        assert!(lines.iter().all(|line| !line.contains("List of devices attached")));
    }

    #[test]
    fn empty_output_yields_empty_listing() {
        assert!(parse_device_list("").is_empty());
        assert!(parse_device_list("List of devices attached\n\n").is_empty());
    }

    #[test]
    fn unrecognized_lines_pass_through_opaquely() {
        let output = "* daemon started successfully\nABCD1234\tdevice\n";
        assert_eq!(
            parse_device_list(output),
            vec!["* daemon started successfully", "ABCD1234\tdevice"]
        );
    }

    #[test]
    fn extracts_package_name_from_badging() {
        let output = "package: name='com.example.app' versionCode='1'";
        assert_eq!(
            extract_package_name(output).as_deref(),
            Some("com.example.app")
        );
    }

    #[test]
    fn extracts_first_match_only() {
        let output =
            "package: name='com.first.app' versionCode='1'\npackage: name='com.second.app'\n";
        assert_eq!(
            extract_package_name(output).as_deref(),
            Some("com.first.app")
        );
    }

    #[test]
    fn ignores_other_package_prefixed_lines() {
        let output = "package-group: 0\napplication-icon-160:'res/mipmap/ic_launcher.png'\npackage: name='org.sample.tool' versionCode='7'\n";
        assert_eq!(
            extract_package_name(output).as_deref(),
            Some("org.sample.tool")
        );
    }

    #[test]
    fn reports_no_match_as_none() {
        assert_eq!(extract_package_name("no badging here"), None);
        assert_eq!(extract_package_name(""), None);
    }

    #[test]
    fn filters_badging_lines_mentioning_package() {
        let output = "package: name='com.example.app'\nsdkVersion:'21'\napplication-icon-160:'icon.png'\nlaunchable-activity: name='com.example.Main'\npackage-group: 0\n";
        let filtered = filter_badging_package_lines(output);
        assert_eq!(
            filtered,
            "package: name='com.example.app'\npackage-group: 0"
        );
    }
}
