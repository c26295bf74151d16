use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::app::adb::apk::{describe_apk, normalize_apk_path};
use crate::app::adb::locator::{resolve_tool_program, validate_tool_program};
use crate::app::adb::parse::{
    extract_package_name, filter_badging_package_lines, parse_device_list,
};
use crate::app::adb::runner::{run_command, CommandOutput};
use crate::app::config::{load_config, AppConfig};
use crate::app::error::AppError;
use crate::app::models::{
    ApkInfo, CommandResponse, DeviceListing, PackageExtraction, ToolInfo, ToolsReport,
};
use crate::app::session::SessionState;


const ADB_DEFAULT: &str = "adb";
const AAPT_DEFAULT: &str = "aapt";
const TOOL_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

fn resolve_trace_id(input: Option<String>) -> String {
    input
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn ensure_non_empty(value: &str, field: &str, trace_id: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(
            format!("{field} is required"),
            trace_id,
        ));
    }
    Ok(())
}

fn get_adb_program(config: &AppConfig, trace_id: &str) -> Result<String, AppError> {
    let program = resolve_tool_program(&config.tools.adb_command_path, ADB_DEFAULT);
    if let Err(message) = validate_tool_program(&program, "ADB") {
        return Err(AppError::dependency(message, trace_id));
    }
    Ok(program)
}

fn get_aapt_program(config: &AppConfig, trace_id: &str) -> Result<String, AppError> {
    let program = resolve_tool_program(&config.tools.aapt_command_path, AAPT_DEFAULT);
    if let Err(message) = validate_tool_program(&program, "AAPT") {
        return Err(AppError::dependency(message, trace_id));
    }
    Ok(program)
}

pub fn check_tools(trace_id: Option<String>) -> Result<CommandResponse<ToolsReport>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    check_tools_inner(&config, &trace_id, run_command)
}

fn check_tools_inner(
    config: &AppConfig,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<ToolsReport>, AppError> {
    info!(trace_id = %trace_id, "check_tools");
    let adb = probe_tool(
        resolve_tool_program(&config.tools.adb_command_path, ADB_DEFAULT),
        "ADB",
        trace_id,
        &run,
    );
    let aapt = probe_tool(
        resolve_tool_program(&config.tools.aapt_command_path, AAPT_DEFAULT),
        "AAPT",
        trace_id,
        &run,
    );
    Ok(CommandResponse {
        trace_id: trace_id.to_string(),
        data: ToolsReport { adb, aapt },
    })
}

fn probe_tool(
    program: String,
    label: &str,
    trace_id: &str,
    run: &impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> ToolInfo {
    if let Err(message) = validate_tool_program(&program, label) {
        warn!(trace_id = %trace_id, tool = label, error = %message, "tool validation failed");
        return ToolInfo {
            available: false,
            version_output: String::new(),
            command_path: program,
            error: Some(message),
        };
    }

    let args = vec!["version".to_string()];
    let output = match run(&program, &args, Some(TOOL_PROBE_TIMEOUT), trace_id) {
        Ok(output) => output,
        Err(err) => {
            warn!(trace_id = %trace_id, tool = label, error = %err.error, "tool probe failed");
            return ToolInfo {
                available: false,
                version_output: String::new(),
                command_path: program,
                error: Some(err.error),
            };
        }
    };

    let mut version_output = output.stdout.trim().to_string();
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        if !version_output.is_empty() {
            version_output.push('\n');
        }
        version_output.push_str(stderr);
    }

    let available = output.exit_code.unwrap_or_default() == 0;
    ToolInfo {
        available,
        version_output,
        command_path: program,
        error: if available {
            None
        } else if stderr.is_empty() {
            Some(format!("{label} command returned a non-zero exit code"))
        } else {
            Some(stderr.to_string())
        },
    }
}

pub fn connect_device(
    session: &SessionState,
    address: String,
    trace_id: Option<String>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    connect_device_inner(&config, session, &address, &trace_id, run_command)
}

fn connect_device_inner(
    config: &AppConfig,
    session: &SessionState,
    address: &str,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    ensure_non_empty(address, "address", trace_id)?;

    let adb_program = get_adb_program(config, trace_id)?;
    let address = address.trim();
    // Bare IPs get the configured network-adb port appended.
    let target = if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, config.connect.port)
    };
    info!(trace_id = %trace_id, target = %target, "connect_device");

    let args = vec!["connect".to_string(), target.clone()];
    let output = run(&adb_program, &args, config.command.timeout(), trace_id)?;

    // The command was issued; the session remembers the address even when the
    // output below turns out to be a failure report.
    session.record_connect(&target);

    let combined = format!("{}{}", output.stdout, output.stderr).to_lowercase();
    if output.exit_code.unwrap_or_default() != 0
        || combined.contains("failed")
        || combined.contains("unable")
    {
        let detail = if output.stderr.trim().is_empty() {
            output.stdout.trim()
        } else {
            output.stderr.trim()
        };
        return Err(AppError::dependency(
            format!("adb connect failed: {detail}"),
            trace_id,
        ));
    }

    Ok(CommandResponse {
        trace_id: trace_id.to_string(),
        data: output,
    })
}

pub fn list_devices(trace_id: Option<String>) -> Result<CommandResponse<DeviceListing>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    list_devices_inner(&config, &trace_id, run_command)
}

fn list_devices_inner(
    config: &AppConfig,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<DeviceListing>, AppError> {
    info!(trace_id = %trace_id, "list_devices");
    let adb_program = get_adb_program(config, trace_id)?;
    let args = vec!["devices".to_string()];
    let output = run(&adb_program, &args, config.command.timeout(), trace_id)?;

    let raw_output = output.combined_text();
    let lines = parse_device_list(&raw_output);
    Ok(CommandResponse {
        trace_id: trace_id.to_string(),
        data: DeviceListing { lines, raw_output },
    })
}

pub fn install_apk(
    apk_path: String,
    trace_id: Option<String>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    install_apk_inner(&config, &apk_path, &trace_id, run_command)
}

fn install_apk_inner(
    config: &AppConfig,
    apk_path: &str,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    ensure_non_empty(apk_path, "apk_path", trace_id)?;
    let apk_path = apk_path.trim();
    let normalized = normalize_apk_path(apk_path);
    if !normalized.is_file() {
        return Err(AppError::validation("Invalid APK path.", trace_id));
    }

    let adb_program = get_adb_program(config, trace_id)?;
    info!(trace_id = %trace_id, apk_path = %apk_path, "install_apk");
    let args = vec![
        "install".to_string(),
        normalized.to_string_lossy().to_string(),
    ];
    let output = run(&adb_program, &args, config.command.timeout(), trace_id)?;
    info!(trace_id = %trace_id, exit_code = ?output.exit_code, "install_apk finished");

    Ok(CommandResponse {
        trace_id: trace_id.to_string(),
        data: output,
    })
}

pub fn uninstall_package(
    package_name: String,
    trace_id: Option<String>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    uninstall_package_inner(&config, &package_name, &trace_id, run_command)
}

fn uninstall_package_inner(
    config: &AppConfig,
    package_name: &str,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    ensure_non_empty(package_name, "package_name", trace_id)?;

    let adb_program = get_adb_program(config, trace_id)?;
    info!(trace_id = %trace_id, package = %package_name.trim(), "uninstall_package");
    let args = vec!["uninstall".to_string(), package_name.trim().to_string()];
    let output = run(&adb_program, &args, config.command.timeout(), trace_id)?;

    Ok(CommandResponse {
        trace_id: trace_id.to_string(),
        data: output,
    })
}

pub fn get_package_name(
    apk_path: String,
    trace_id: Option<String>,
) -> Result<CommandResponse<PackageExtraction>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    get_package_name_inner(&config, &apk_path, &trace_id, run_command)
}

fn get_package_name_inner(
    config: &AppConfig,
    apk_path: &str,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<PackageExtraction>, AppError> {
    ensure_non_empty(apk_path, "apk_path", trace_id)?;
    let apk_path = apk_path.trim();
    let normalized = normalize_apk_path(apk_path);
    if !normalized.is_file() {
        return Err(AppError::validation(
            format!("Invalid APK path: {apk_path}"),
            trace_id,
        ));
    }

    let aapt_program = get_aapt_program(config, trace_id)?;
    info!(trace_id = %trace_id, apk_path = %apk_path, "get_package_name");
    let args = vec![
        "dump".to_string(),
        "badging".to_string(),
        normalized.to_string_lossy().to_string(),
    ];
    let output = run(&aapt_program, &args, config.command.timeout(), trace_id)?;

    let combined = output.combined_text();
    match extract_package_name(&combined) {
        Some(package_name) => Ok(CommandResponse {
            trace_id: trace_id.to_string(),
            data: PackageExtraction {
                package_name,
                badging_lines: filter_badging_package_lines(&combined),
            },
        }),
        None => Err(AppError::no_match(
            format!("Failed to extract package name:\n{combined}"),
            trace_id,
        )),
    }
}

pub fn launch_app(
    package_name: String,
    trace_id: Option<String>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    let config = load_config()?;
    launch_app_inner(&config, &package_name, &trace_id, run_command)
}

fn launch_app_inner(
    config: &AppConfig,
    package_name: &str,
    trace_id: &str,
    run: impl Fn(&str, &[String], Option<Duration>, &str) -> Result<CommandOutput, AppError>,
) -> Result<CommandResponse<CommandOutput>, AppError> {
    ensure_non_empty(package_name, "package_name", trace_id)?;

    let adb_program = get_adb_program(config, trace_id)?;
    info!(trace_id = %trace_id, package = %package_name.trim(), "launch_app");
    let args = vec![
        "shell".to_string(),
        "monkey".to_string(),
        "-p".to_string(),
        package_name.trim().to_string(),
        "-c".to_string(),
        "android.intent.category.LAUNCHER".to_string(),
        "1".to_string(),
    ];
    let output = run(&adb_program, &args, config.command.timeout(), trace_id)?;

    Ok(CommandResponse {
        trace_id: trace_id.to_string(),
        data: output,
    })
}

pub fn inspect_apk(
    apk_path: String,
    trace_id: Option<String>,
) -> Result<CommandResponse<ApkInfo>, AppError> {
    let trace_id = resolve_trace_id(trace_id);
    ensure_non_empty(&apk_path, "apk_path", &trace_id)?;
    info!(trace_id = %trace_id, apk_path = %apk_path.trim(), "inspect_apk");
    Ok(CommandResponse {
        trace_id: trace_id.clone(),
        data: describe_apk(apk_path.trim()),
    })
}
