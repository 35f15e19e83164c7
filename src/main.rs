/// Version injected at compile time via CKAN_CONNECT_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CKAN_CONNECT_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use ckan_connect::config::Config;
use ckan_connect::Registry;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Build and inspect catalog action requests
#[derive(Parser, Debug)]
#[command(name = "ckan-connect", version = VERSION, about, long_about = None)]
struct Args {
    /// Resource definitions file (JSON or YAML)
    #[arg(short, long, global = true)]
    definitions: Option<PathBuf>,

    /// Catalog base URL
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resource types and the actions they accept
    Resources,
    /// Print the request a catalog call would make
    Request {
        /// Machine name of the resource type, e.g. package
        machine_name: String,
        /// Action to perform: list, show, create, update, delete or patch
        action: String,
        /// Identifier of the target object
        #[arg(long, default_value = "")]
        id: String,
        /// Parameter as key=value; value is parsed as JSON when possible
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },
    /// Manage persisted configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Persist the catalog base URL
    SetUrl { url: String },
    /// Persist the definitions file location
    SetDefinitions { path: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_param(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ckan-connect started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ckan-connect").join("ckan-connect.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ckan-connect").join("ckan-connect.log");
    }
    PathBuf::from("ckan-connect.log")
}

fn load_registry(config: &Config, args: &Args) -> Result<Registry> {
    let path = config
        .effective_definitions(args.definitions.as_deref())
        .context("No resource definitions configured. Use --definitions or 'config set-definitions'")?;

    Registry::from_path(&path)
        .with_context(|| format!("Failed to load resource definitions from {:?}", path))
}

/// Describe the request a catalog call would make, failing when the
/// resource is not in a valid state
fn build_request(
    registry: &Registry,
    base_url: &str,
    machine_name: &str,
    action: &str,
    id: &str,
    params: &[(String, Value)],
) -> Result<Value> {
    let mut resource = registry.resource(machine_name, id)?;
    resource.set_action_str(action)?;
    resource.extend_parameters(params.iter().cloned());

    let request = resource.request()?;
    Ok(json!({
        "method": request.method(),
        "url": request.endpoint(base_url)?.as_str(),
        "path": request.path(),
        "parameters": request.parameters(),
        "body": request.body(),
    }))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;
    let mut config = Config::load();

    match &args.command {
        Command::Resources => {
            let registry = load_registry(&config, &args)?;
            for def in registry.iter() {
                let actions: Vec<&str> = def.valid_actions.iter().map(|a| a.as_str()).collect();
                println!(
                    "{:<24} {:<24} {}",
                    def.machine_name,
                    def.label(),
                    actions.join(", ")
                );
            }
        }
        Command::Request {
            machine_name,
            action,
            id,
            params,
        } => {
            let registry = load_registry(&config, &args)?;
            let base_url = config.effective_base_url(args.base_url.as_deref());
            let output = build_request(&registry, &base_url, machine_name, action, id, params)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                let effective = json!({
                    "config_file": Config::config_path(),
                    "base_url": config.effective_base_url(args.base_url.as_deref()),
                    "definitions": config.effective_definitions(args.definitions.as_deref()),
                });
                println!("{}", serde_json::to_string_pretty(&effective)?);
            }
            ConfigCommand::SetUrl { url } => {
                config.set_base_url(url)?;
                println!("Base URL set to {}", url);
            }
            ConfigCommand::SetDefinitions { path } => {
                let registry = Registry::from_path(path)
                    .with_context(|| format!("Failed to load resource definitions from {:?}", path))?;
                config.set_definitions(path)?;
                println!("Using {} resource definitions from {:?}", registry.len(), path);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckan_connect::Action;

    #[test]
    fn test_parse_param_json_and_string_values() {
        assert_eq!(parse_param("rows=10").unwrap(), ("rows".to_string(), json!(10)));
        assert_eq!(parse_param("private=true").unwrap(), ("private".to_string(), json!(true)));
        assert_eq!(
            parse_param("name=air-quality").unwrap(),
            ("name".to_string(), json!("air-quality"))
        );
        assert_eq!(
            parse_param("extras=[{\"key\":\"a\"}]").unwrap(),
            ("extras".to_string(), json!([{"key": "a"}]))
        );
        assert_eq!(parse_param("notes=").unwrap(), ("notes".to_string(), json!("")));
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("no-separator").is_err());
        assert!(parse_param("=value").is_err());
    }

    #[test]
    fn test_args_parse_request() {
        let args = Args::try_parse_from([
            "ckan-connect",
            "request",
            "package",
            "update",
            "--id",
            "abc-123",
            "-p",
            "name=y",
        ])
        .unwrap();

        match args.command {
            Command::Request { machine_name, action, id, params } => {
                assert_eq!(machine_name, "package");
                assert_eq!(action.parse::<Action>().unwrap(), Action::Update);
                assert_eq!(id, "abc-123");
                assert_eq!(params, vec![("name".to_string(), json!("y"))]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    fn test_registry() -> Registry {
        Registry::from_defs([ckan_connect::ResourceDef::new("package")
            .with_required("name", "url-safe dataset name")])
        .unwrap()
    }

    #[test]
    fn test_build_request_for_valid_create() {
        let registry = test_registry();
        let params = vec![("name".to_string(), json!("air-quality"))];

        let output =
            build_request(&registry, "https://demo.ckan.org", "package", "create", "", &params)
                .unwrap();
        assert_eq!(output["method"], "POST");
        assert_eq!(output["url"], "https://demo.ckan.org/api/3/action/package_create");
        assert_eq!(output["body"], json!({"name": "air-quality"}));
    }

    #[test]
    fn test_build_request_fails_on_invalid_state() {
        let registry = test_registry();

        let missing = build_request(&registry, "https://demo.ckan.org", "package", "create", "", &[]);
        let err = missing.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ckan_connect::CrudError>(),
            Some(ckan_connect::CrudError::MissingParameters { .. })
        ));

        assert!(build_request(&registry, "https://demo.ckan.org", "package", "update", "", &[]).is_err());
        assert!(build_request(&registry, "https://demo.ckan.org", "package", "purge", "", &[]).is_err());
        assert!(build_request(&registry, "https://demo.ckan.org", "group", "list", "", &[]).is_err());
    }
}
