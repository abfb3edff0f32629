/// Version injected at compile time via STRIPEKIT_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("STRIPEKIT_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::path::PathBuf;
use stripekit::config::Config;
use stripekit::resource::{get_registry, list_all};
use stripekit::stripe::credentials;
use stripekit::{format_stripe_error, Operation, StripeClient};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command line client for the Stripe API
#[derive(Parser, Debug)]
#[command(name = "stripekit", version, about, long_about = None)]
struct Args {
    /// Secret or restricted API key (defaults to STRIPE_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// API base URL, e.g. http://localhost:12111 for stripe-mock.
    /// A path prefix on the base is kept in front of /v1.
    #[arg(long)]
    api_base: Option<String>,

    /// Pin a Stripe-Version
    #[arg(long)]
    api_version: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known resources and the operations they support
    Resources,
    /// Show the effective API base and version; --save stores the global
    /// --api-base/--api-version flags in the config file
    Config {
        #[arg(long)]
        save: bool,
    },
    /// Invoke an operation on a resource
    Call {
        /// Resource key, e.g. customers or terminal.readers
        resource: String,
        /// create, retrieve, update, delete (or del), list
        operation: String,
        /// Object id for retrieve, update and delete
        id: Option<String>,
        /// Request parameters as a JSON object
        #[arg(long)]
        data: Option<String>,
        /// Extra parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Follow pagination (list only)
        #[arg(long)]
        all: bool,
    },
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

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("stripekit {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("stripekit").join("stripekit.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".stripekit").join("stripekit.log");
    }
    PathBuf::from("stripekit.log")
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Merge `--data` and `--param` into one parameter object
fn build_params(data: Option<&str>, params: &[(String, String)]) -> Result<Option<Value>> {
    let mut map = match data {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("--data is not valid JSON")? {
            Value::Object(map) => map,
            _ => anyhow::bail!("--data must be a JSON object"),
        },
        None => Map::new(),
    };

    for (key, value) in params {
        map.insert(key.clone(), Value::String(value.clone()));
    }

    Ok((!map.is_empty()).then_some(Value::Object(map)))
}

fn print_resources() {
    for (key, descriptor) in &get_registry().resources {
        let ops: Vec<&str> = descriptor.operations.iter().map(|op| op.name()).collect();
        println!("{:<20} /v1/{:<22} {}", key, descriptor.path, ops.join(", "));
    }
}

async fn run_call(
    client: &StripeClient,
    resource_key: &str,
    operation: &str,
    id: Option<&str>,
    params: Option<&Value>,
    all: bool,
) -> Result<Value> {
    let resource = client
        .resource(resource_key)
        .with_context(|| format!("Unknown resource: {}", resource_key))?;
    let operation = Operation::from_name(operation)
        .with_context(|| format!("Unknown operation: {}", operation))?;

    if all {
        if operation != Operation::List {
            anyhow::bail!("--all only applies to list, not {}", operation);
        }
        let items = list_all(resource, params).await?;
        return Ok(Value::Array(items));
    }

    resource.call(operation, id, params).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    let (resource, operation, id, data, params, all) = match args.command {
        Command::Resources => {
            print_resources();
            return Ok(());
        },
        Command::Config { save } => {
            if save {
                config.apply_overrides(args.api_base.as_deref(), args.api_version.as_deref());
                config.save().context("Failed to save config")?;
                if let Some(path) = Config::config_path() {
                    println!("Saved {}", path.display());
                }
            }
            let client_config =
                config.client_config(args.api_base.as_deref(), args.api_version.as_deref());
            println!("api_base:    {}", client_config.api_base);
            println!(
                "api_version: {}",
                client_config.api_version.as_deref().unwrap_or("(account default)")
            );
            return Ok(());
        },
        Command::Call {
            resource,
            operation,
            id,
            data,
            params,
            all,
        } => (resource, operation, id, data, params, all),
    };

    let api_key = args
        .api_key
        .clone()
        .or_else(credentials::get_default_api_key)
        .with_context(|| {
            format!(
                "No API key configured. Set {} or use --api-key",
                credentials::API_KEY_VAR
            )
        })?;
    if !credentials::is_valid_api_key(&api_key) {
        anyhow::bail!("API key must be a secret (sk_) or restricted (rk_) key");
    }

    let client_config =
        config.client_config(args.api_base.as_deref(), args.api_version.as_deref());
    tracing::info!("Using API base: {}", client_config.api_base);

    let client = StripeClient::with_config(&api_key, client_config)?;
    let params = build_params(data.as_deref(), &params)?;

    match run_call(&client, &resource, &operation, id.as_deref(), params.as_ref(), all).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        },
        Err(err) => {
            tracing::error!("{} {} failed: {:#}", resource, operation, err);
            eprintln!("Error: {}", format_stripe_error(&err));
            drop(log_guard);
            std::process::exit(1);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("email=jenny@example.com").unwrap(),
            ("email".to_string(), "jenny@example.com".to_string())
        );
        assert!(parse_key_val("no-equals").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn test_build_params_merges_sources() {
        let params = build_params(
            Some(r#"{"amount": 2000}"#),
            &[("currency".to_string(), "usd".to_string())],
        )
        .unwrap();
        assert_eq!(params, Some(json!({"amount": 2000, "currency": "usd"})));
    }

    #[test]
    fn test_build_params_empty_is_none() {
        assert_eq!(build_params(None, &[]).unwrap(), None);
    }

    #[test]
    fn test_build_params_rejects_non_object() {
        assert!(build_params(Some("[1, 2]"), &[]).is_err());
    }

    #[tokio::test]
    async fn test_all_is_rejected_outside_list() {
        let stripe = stripekit::testing::get_spyable_stripe();
        let err = run_call(&stripe, "customers", "retrieve", Some("cus_1"), None, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--all only applies to list"));
        assert_eq!(stripe.last_request(), None);
    }

    #[tokio::test]
    async fn test_all_follows_pagination_for_list() {
        let stripe = stripekit::testing::get_spyable_stripe();
        let response = run_call(&stripe, "customers", "list", None, None, true)
            .await
            .unwrap();
        assert_eq!(response, json!([]));
        assert_eq!(stripe.last_request().unwrap().url, "/v1/customers");
    }
}
