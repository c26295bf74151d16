use std::process::ExitCode;

use adb_bridge_lib::app::commands::{
    check_tools, connect_device, get_package_name, inspect_apk, install_apk, launch_app,
    list_devices, uninstall_package,
};
use adb_bridge_lib::app::error::AppError;
use adb_bridge_lib::app::logging::init_logging;
use adb_bridge_lib::app::models::CommandResponse;
use adb_bridge_lib::app::session::SessionState;

#[derive(Debug, Clone)]
struct CliArgs {
    command: String,
    operand: Option<String>,
    json: bool,
    trace_id: Option<String>,
}

const USAGE: &str = "\
adb_bridge <command> [args] [--json] [--trace <id>]

Commands:
  check                 probe the configured adb and aapt tools
  connect <ip[:port]>   connect to a device over network adb
  devices               list attached devices
  install <apk>         install an APK
  uninstall <package>   uninstall a package
  package <apk>         extract the package name from an APK
  launch <package>      launch an app via monkey
  inspect <apk>         inspect a local APK file without touching adb
";

fn operand_name(command: &str) -> Option<&'static str> {
    match command {
        "connect" => Some("device address"),
        "install" | "package" | "inspect" => Some("apk path"),
        "uninstall" | "launch" => Some("package name"),
        _ => None,
    }
}

/// Ok(None) means help was requested.
fn parse_args() -> Result<Option<CliArgs>, String> {
    let mut command: Option<String> = None;
    let mut positionals = Vec::new();
    let mut json = false;
    let mut trace_id: Option<String> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--json" => {
                json = true;
            }
            "--trace" => {
                trace_id = it
                    .next()
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty());
                if trace_id.is_none() {
                    return Err("--trace requires a value".to_string());
                }
            }
            "--help" | "-h" => {
                return Ok(None);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown flag: {other}"));
            }
            other => {
                if command.is_none() {
                    command = Some(other.to_string());
                } else {
                    positionals.push(other.to_string());
                }
            }
        }
    }

    let command = command.ok_or_else(|| "a command is required".to_string())?;
    match command.as_str() {
        "check" | "devices" | "connect" | "install" | "uninstall" | "package" | "launch"
        | "inspect" => {}
        other => return Err(format!("unknown command: {other}")),
    }

    let operand = match operand_name(&command) {
        Some(name) => match positionals.first() {
            Some(value) => Some(value.clone()),
            None => return Err(format!("{name} is required")),
        },
        None => None,
    };

    Ok(Some(CliArgs {
        command,
        operand,
        json,
        trace_id,
    }))
}

fn render<T: serde::Serialize>(response: &CommandResponse<T>, json: bool, text: String) -> String {
    if json {
        serde_json::to_string_pretty(response).unwrap_or(text)
    } else {
        text
    }
}

fn run_cli(args: &CliArgs, session: &SessionState) -> Result<String, AppError> {
    let trace_id = args.trace_id.clone();
    let operand = || args.operand.clone().unwrap_or_default();

    let out = match args.command.as_str() {
        "check" => {
            let response = check_tools(trace_id)?;
            let data = &response.data;
            let text = format!(
                "adb  ({}): {}\naapt ({}): {}",
                data.adb.command_path,
                if data.adb.available {
                    data.adb.version_output.clone()
                } else {
                    data.adb.error.clone().unwrap_or_default()
                },
                data.aapt.command_path,
                if data.aapt.available {
                    data.aapt.version_output.clone()
                } else {
                    data.aapt.error.clone().unwrap_or_default()
                },
            );
            render(&response, args.json, text)
        }
        "connect" => {
            let response = connect_device(session, operand(), trace_id)?;
            let text = response.data.combined_text();
            render(&response, args.json, text)
        }
        "devices" => {
            let response = list_devices(trace_id)?;
            let text = if response.data.lines.is_empty() {
                "(no devices)".to_string()
            } else {
                response.data.lines.join("\n")
            };
            render(&response, args.json, text)
        }
        "install" => {
            let response = install_apk(operand(), trace_id)?;
            let text = response.data.combined_text();
            render(&response, args.json, text)
        }
        "uninstall" => {
            let response = uninstall_package(operand(), trace_id)?;
            let text = response.data.combined_text();
            render(&response, args.json, text)
        }
        "package" => {
            let response = get_package_name(operand(), trace_id)?;
            let text = format!("Package name extracted: {}", response.data.package_name);
            render(&response, args.json, text)
        }
        "launch" => {
            let response = launch_app(operand(), trace_id)?;
            let text = response.data.combined_text();
            render(&response, args.json, text)
        }
        "inspect" => {
            let response = inspect_apk(operand(), trace_id)?;
            let data = &response.data;
            let text = format!(
                "path: {}\nexists: {}\nsize: {} bytes\nvalid archive: {}{}",
                data.path,
                data.exists,
                data.file_size_bytes,
                data.valid_archive,
                data.error
                    .as_deref()
                    .map(|err| format!("\nerror: {err}"))
                    .unwrap_or_default(),
            );
            render(&response, args.json, text)
        }
        // parse_args only lets the commands above through
        _ => unreachable!(),
    };
    Ok(out)
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}");
            eprint!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let session = SessionState::new();
    match run_cli(&args, &session) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
