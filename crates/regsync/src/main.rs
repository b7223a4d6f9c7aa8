// # regsync - TransIP reconciliation CLI
//
// A thin layer over `regsync-core`: parse arguments, load the desired state,
// run one pass against the TransIP API and print the result as JSON.
//
// ## Commands
//
// - `regsync auth`: sign a login request and print the issued token
// - `regsync dns`: converge the DNS entries of a domain on a records file
// - `regsync nameservers`: converge the nameservers of a domain
//
// ## Environment
//
// - `REGSYNC_TOKEN`: bearer token for `dns` / `nameservers`
// - `REGSYNC_PRIVATE_KEY`: PEM text of the account key for `auth`
// - `REGSYNC_API_URL`: API endpoint (default `https://api.transip.nl/v6`)
// - `REGSYNC_LOG_LEVEL`: trace, debug, info, warn or error
//
// ## Output
//
// The result goes to stdout as a single JSON object; logs go to stderr.
// Failures print `{"failed": true, "msg": "..."}`.
//
// ## Example
//
// ```bash
// export REGSYNC_TOKEN=$(regsync auth --user me --private-key-file key.pem | jq -r .token)
// regsync dns --domain example.com --records-file records.json
// ```

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use regsync_core::config::DEFAULT_API_URL;
use regsync_core::{
    AuthSettings, ClientConfig, DesiredDnsRecord, NameserverEntry, NameserverReconciler,
    ReconcileOptions, ReconcileOutcome, RecordReconciler, RequestSigner, Token, authenticate,
};
use regsync_provider_transip::TransipClient;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible outcomes of a run
///
/// - 0: Success (changed or not)
/// - 1: Configuration or input error, nothing was sent
/// - 2: Runtime error (provider, merge, network)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegsyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<RegsyncExitCode> for ExitCode {
    fn from(code: RegsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "regsync", author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Base URL of the TransIP REST API
    #[arg(long, value_name = "URL", env = "REGSYNC_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Log level written to stderr
    #[arg(long, value_name = "LEVEL", env = "REGSYNC_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request an access token with the account's private key
    Auth(AuthArgs),
    /// Converge the DNS entries of a domain
    Dns(DnsArgs),
    /// Converge the nameservers of a domain
    Nameservers(NameserversArgs),
}

#[derive(Args, Debug)]
struct AuthArgs {
    /// Account login name
    #[arg(long, value_name = "LOGIN")]
    user: String,

    /// Request a read-only token
    #[arg(long)]
    read_only: bool,

    /// Token lifetime, e.g. "30 minutes" or "1 hour"
    #[arg(long, value_name = "TIME", default_value = "1 hour")]
    expiration: String,

    /// Token label; the current date and time are appended
    #[arg(long, value_name = "LABEL", default_value = "Ansible key")]
    label: String,

    /// Allow the token from any IP address
    #[arg(long)]
    global_key: bool,

    /// Path to the PEM private key
    #[arg(long, value_name = "PATH", conflicts_with = "private_key")]
    private_key_file: Option<PathBuf>,

    /// PEM private key text
    #[arg(long, value_name = "PEM", env = "REGSYNC_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Domain to reconcile
    #[arg(long, value_name = "DOMAIN")]
    domain: String,

    /// Bearer token from `regsync auth`
    #[arg(long, value_name = "TOKEN", env = "REGSYNC_TOKEN", hide_env_values = true)]
    token: String,

    /// Report the change without pushing it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct DnsArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// JSON array of desired DNS entries
    #[arg(long, value_name = "PATH")]
    records_file: PathBuf,
}

#[derive(Args, Debug)]
struct NameserversArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// JSON array of desired nameservers, in order
    #[arg(long, value_name = "PATH")]
    nameservers_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => return fail(&e, RegsyncExitCode::ConfigError),
    };

    // stdout carries the JSON result, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RegsyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let e = anyhow::Error::new(e).context("Failed to create tokio runtime");
            return fail(&e, RegsyncExitCode::RuntimeError);
        }
    };

    match rt.block_on(run(cli)) {
        Ok(report) => {
            println!("{}", report);
            RegsyncExitCode::Success.into()
        }
        Err(e) => {
            let code = exit_code_for(&e);
            fail(&e, code)
        }
    }
}

/// Run the selected command and return its JSON report
async fn run(cli: Cli) -> Result<Value> {
    let config = ClientConfig::new(cli.api_url).with_timeout_secs(cli.timeout_secs);
    debug!("Using API endpoint {}", config.api_url);

    match cli.command {
        Command::Auth(args) => run_auth(&config, args).await,
        Command::Dns(args) => run_dns(&config, args).await,
        Command::Nameservers(args) => run_nameservers(&config, args).await,
    }
}

async fn run_auth(config: &ClientConfig, args: AuthArgs) -> Result<Value> {
    let pem = match (&args.private_key_file, args.private_key) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read private key {}", path.display()))?,
        (None, Some(pem)) => pem,
        (None, None) => {
            bail!("A private key is required: pass --private-key-file or set REGSYNC_PRIVATE_KEY")
        }
    };
    let signer = RequestSigner::from_pem(&pem)?;

    let settings = AuthSettings {
        user: args.user,
        read_only: args.read_only,
        expiration: args.expiration,
        label: args.label,
        global_key: args.global_key,
    };

    let client = TransipClient::new(config)?;
    let now = chrono::Local::now().naive_local();
    let outcome = authenticate(&client, &signer, &settings, now, &mut rand::rng()).await?;

    Ok(json!({
        "changed": true,
        "label": outcome.label,
        "user": outcome.user,
        "token": outcome.token,
    }))
}

async fn run_dns(config: &ClientConfig, args: DnsArgs) -> Result<Value> {
    let desired: Vec<DesiredDnsRecord> = load_json_file(&args.records_file)?;
    let client = client_with_token(config, &args.target)?;

    let outcome = RecordReconciler::with_options(&client, options(&args.target))
        .reconcile(&args.target.domain, &desired)
        .await?;

    reconcile_report(&outcome, "records")
}

async fn run_nameservers(config: &ClientConfig, args: NameserversArgs) -> Result<Value> {
    let desired: Vec<NameserverEntry> = load_json_file(&args.nameservers_file)?;
    let client = client_with_token(config, &args.target)?;

    let outcome = NameserverReconciler::with_options(&client, options(&args.target))
        .reconcile(&args.target.domain, &desired)
        .await?;

    reconcile_report(&outcome, "nameservers")
}

fn client_with_token(config: &ClientConfig, target: &TargetArgs) -> Result<TransipClient> {
    if target.token.trim().is_empty() {
        bail!("An access token is required: pass --token or set REGSYNC_TOKEN");
    }
    Ok(TransipClient::new(config)?.with_token(Token::new(target.token.trim())))
}

fn options(target: &TargetArgs) -> ReconcileOptions {
    if target.dry_run {
        ReconcileOptions::dry_run()
    } else {
        ReconcileOptions::live()
    }
}

/// Read and deserialize a JSON input file
fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// `domain` and the resulting state are only reported when something changed
fn reconcile_report<T: Serialize>(outcome: &ReconcileOutcome<T>, key: &str) -> Result<Value> {
    let mut report = json!({ "changed": outcome.changed });
    if outcome.changed {
        report["domain"] = json!(outcome.domain);
        report[key] = serde_json::to_value(&outcome.state)?;
    }
    // Only a skipped push is worth flagging
    if outcome.changed && outcome.dry_run {
        report["dry_run"] = json!(true);
    }
    Ok(report)
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => bail!(
            "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Errors raised before anything reached the provider are configuration
/// errors; everything else happened at runtime.
fn exit_code_for(err: &anyhow::Error) -> RegsyncExitCode {
    match err.downcast_ref::<regsync_core::Error>() {
        Some(e) if !e.is_local() => RegsyncExitCode::RuntimeError,
        _ => RegsyncExitCode::ConfigError,
    }
}

fn failure_report(err: &anyhow::Error) -> Value {
    json!({ "failed": true, "msg": format!("{:#}", err) })
}

fn fail(err: &anyhow::Error, code: RegsyncExitCode) -> ExitCode {
    error!("{:#}", err);
    println!("{}", failure_report(err));
    code.into()
}
