mod render;

use std::fs;
use std::io;
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use ariadne::Fmt;
use clap::{Parser, Subcommand, ValueEnum};
use dx_explorer_config::{CONFIG_FILE_NAME, ExplorerConfig};
use dx_explorer_core::request::{self, Auth, HttpRequest};
use dx_explorer_core::{
    DxError, DxResponse, ResourceBundle, form_inputs, inspect, missing_required,
    parse_case_types, parse_dx_response, submission_body, validate_component, walk,
};
use dx_explorer_diagnostics::{self as diag, Diagnostic};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{Format, print_summary, print_tree, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "dx",
    version,
    about = "DX API explorer: inspect case responses, check forms, and describe DX API requests"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log filter, e.g. "debug" or "dx_explorer_core=debug". Defaults to
    /// RUST_LOG, then "warn". Logs go to stderr.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Saved response bodies ───────────────────────────────────────
    /// Assemble a DX response and show the case, its assignments, the
    /// component tree, and structural diagnostics.
    Inspect { file: String },

    /// Print the field catalog of a DX response.
    Fields { file: String },

    /// Print the case content of a DX response.
    Content { file: String },

    /// Apply edits to the form of a DX response and check whether it can be
    /// submitted (exit 1 if not).
    Validate {
        file: String,
        /// Field edit, e.g. `--set Acme-Work-Claim.Notes="Call back"`.
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_edit)]
        set: Vec<(String, String)>,
    },

    /// Apply edits and print the body a submit would send.
    SubmitBody {
        file: String,
        /// Field edit (see `validate --help`).
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_edit)]
        set: Vec<(String, String)>,
    },

    /// List the case types of a `/casetypes` response.
    CaseTypes { file: String },

    // ── Requests and configuration ──────────────────────────────────
    /// Describe the HTTP request for a DX API call.
    Request {
        #[arg(value_enum)]
        kind: RequestKind,
        /// Explorer configuration file.
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        config: String,
        /// Access token from a previous login.
        #[arg(long, default_value = "")]
        token: String,
        /// Case type to create (`create-case`).
        #[arg(long)]
        case_type: Option<String>,
        /// Assignment id (`open-assignment`, `open-action`, `submit`).
        #[arg(long)]
        assignment: Option<String>,
        /// Action id (`open-action`, `submit`).
        #[arg(long)]
        action: Option<String>,
        /// Etag from opening the action (`submit`).
        #[arg(long, default_value = "")]
        etag: String,
        /// Saved open-action response whose edited fields form the submit body.
        #[arg(long)]
        form: Option<String>,
        /// Field edit applied to `--form` (see `validate --help`).
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_edit)]
        set: Vec<(String, String)>,
    },

    /// Validate an explorer configuration file.
    CheckConfig {
        #[arg(default_value = CONFIG_FILE_NAME)]
        file: String,
    },

    /// Write a new explorer configuration file.
    InitConfig {
        #[arg(default_value = CONFIG_FILE_NAME)]
        file: String,
        #[arg(long)]
        server: String,
        #[arg(long, default_value = "/prweb/api/application/v2")]
        dx_api_path: String,
        #[arg(long, default_value = "/prweb/PRRestService/oauth2/v1/token")]
        token_endpoint: String,
        #[arg(long, default_value = "")]
        client_id: String,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    // ── Reference / informational ───────────────────────────────────
    /// Explain a diagnostic ID (e.g. DX1301).
    Explain { id: String },
}

/// DX API call to describe.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RequestKind {
    /// OAuth 2 password grant.
    Login,
    /// List case types.
    CaseTypes,
    /// Create a case.
    CreateCase,
    /// Open an assignment.
    OpenAssignment,
    /// Open an assignment action.
    OpenAction,
    /// Submit an assignment action.
    Submit,
}

fn parse_edit(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli.cmd, format) {
        report_failure(&err, format);
        process::exit(1);
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cmd: Cmd, format: Format) -> Result<()> {
    match cmd {
        Cmd::Inspect { file } => cmd_inspect(&file, format),
        Cmd::Fields { file } => cmd_fields(&file, format),
        Cmd::Content { file } => cmd_content(&file, format),
        Cmd::Validate { file, set } => cmd_validate(&file, &set, format),
        Cmd::SubmitBody { file, set } => cmd_submit_body(&file, &set, format),
        Cmd::CaseTypes { file } => cmd_case_types(&file, format),
        Cmd::Request {
            kind,
            config,
            token,
            case_type,
            assignment,
            action,
            etag,
            form,
            set,
        } => {
            let ids = CallIds {
                case_type,
                assignment,
                action,
                etag,
            };
            cmd_request(kind, &config, &token, &ids, form.as_deref(), &set, format)
        }
        Cmd::CheckConfig { file } => cmd_check_config(&file, format),
        Cmd::InitConfig {
            file,
            server,
            dx_api_path,
            token_endpoint,
            client_id,
            force,
        } => {
            let cfg = ExplorerConfig {
                server,
                dx_api_path,
                token_endpoint,
                client_id,
                ..Default::default()
            };
            cmd_init_config(&file, &cfg, force, format)
        }
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

/// Print a failure in the requested format.
fn report_failure(err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let mut out = serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            if let Some(dx) = err.downcast_ref::<DxError>() {
                out["code"] = dx.code().into();
            }
            println!("{out:#}");
        }
        Format::Pretty => {
            eprintln!("{} {err:#}", "error:".fg(ariadne::Color::Red));
        }
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_inspect(file: &str, format: Format) -> Result<()> {
    let (source, resp) = load_response(file)?;
    let info = &resp.case_info;

    let (steps, diagnostics) = match resp.resources.as_ref() {
        Some(bundle) => match bundle.root() {
            Some(root) => (
                walk(root, bundle.components()),
                inspect(root, bundle.components()),
            ),
            None => (Vec::new(), vec![missing_root(bundle)]),
        },
        None => (Vec::new(), Vec::new()),
    };

    match format {
        Format::Json => {
            let tree: Vec<_> = steps
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "depth": s.depth,
                        "step": s.kind,
                        "kind": s.component.kind,
                        "key": s.component.key,
                        "debug": s.component.debug_string,
                        "broken": s.component.broken,
                    })
                })
                .collect();
            let out = serde_json::json!({
                "case": info,
                "root": resp.resources.as_ref().map(ResourceBundle::root_key),
                "tree": tree,
                "diagnostics": diagnostics,
            });
            println!("{out:#}");
        }
        Format::Pretty => {
            println!(
                "Case {} ({}), {}, owner {}",
                info.business_id, info.case_type.name, info.status, info.owner
            );
            for assignment in info.assignments.values() {
                let perform = if assignment.can_perform { "" } else { " (read only)" };
                println!("  Assignment {}: {}{perform}", assignment.id, assignment.name);
                for action in assignment.actions.values() {
                    println!("    Action {}: {} [{}]", action.id, action.name, action.action_type);
                }
            }
            if !steps.is_empty() {
                println!();
                print_tree(&steps);
            }
            render_diagnostics(&source, file, &diagnostics, format)?;
            print_summary(&diagnostics);
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_fields(file: &str, format: Format) -> Result<()> {
    let (_, resp) = load_response(file)?;
    let bundle = require_resources(&resp)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(bundle.fields())?),
        Format::Pretty => {
            for (key, field) in bundle.fields().iter() {
                let mut flags = String::new();
                if field.is_special {
                    flags.push_str(" [special]");
                }
                if field.is_class_key {
                    flags.push_str(" [class key]");
                }
                println!(
                    "{} ({}) {:?} = {:?}{flags}",
                    key.fg(ariadne::Color::Cyan),
                    field.field_type,
                    field.label,
                    field.data
                );
            }
        }
    }
    Ok(())
}

fn cmd_content(file: &str, format: Format) -> Result<()> {
    let (_, resp) = load_response(file)?;
    let content = &resp.case_info.content;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(content)?),
        Format::Pretty => {
            for (name, value) in content.iter() {
                println!("{name} = {value:?}");
            }
        }
    }
    Ok(())
}

fn cmd_validate(file: &str, edits: &[(String, String)], format: Format) -> Result<()> {
    let (source, resp) = load_response(file)?;
    let bundle = edited_bundle(resp, edits)?;
    let root = bundle
        .root()
        .ok_or_else(|| anyhow!("{}", missing_root(&bundle).message))?;

    let ok = validate_component(root, bundle.components(), bundle.fields());
    let issues = missing_required(root, bundle.fields());
    debug!(ok, issues = issues.len(), "validated form");

    match format {
        Format::Json => {
            let inputs: Vec<_> = form_inputs(root, bundle.components(), bundle.fields())
                .iter()
                .map(|i| {
                    serde_json::json!({
                        "key": i.component.key,
                        "label": i.component.label,
                        "value": i.field.map(|f| f.data.as_str()),
                        "required": i.component.is_required,
                        "editable": i.editable,
                    })
                })
                .collect();
            let out = serde_json::json!({
                "ok": ok,
                "issues": issues,
                "inputs": inputs,
            });
            println!("{out:#}");
        }
        Format::Pretty => {
            render_diagnostics(&source, file, &issues, format)?;
            print_summary(&issues);
            if ok {
                eprintln!("form ok");
            }
        }
    }

    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn cmd_submit_body(file: &str, edits: &[(String, String)], format: Format) -> Result<()> {
    let (_, resp) = load_response(file)?;
    let bundle = edited_bundle(resp, edits)?;
    let body = submission_body(bundle.fields());

    match (format, body) {
        (Format::Json, body) => println!("{}", serde_json::to_string_pretty(&body)?),
        (Format::Pretty, Some(body)) => println!("{}", serde_json::to_string_pretty(&body)?),
        (Format::Pretty, None) => eprintln!("nothing to submit: no editable field was changed"),
    }
    Ok(())
}

fn cmd_case_types(file: &str, format: Format) -> Result<()> {
    let body = read_file(file)?;
    let types = parse_case_types(&body)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&types)?),
        Format::Pretty => {
            for t in &types {
                println!("{} {}", t.id.as_str().fg(ariadne::Color::Cyan), t.name);
            }
        }
    }
    Ok(())
}

/// Identifiers a request may need.
struct CallIds {
    case_type: Option<String>,
    assignment: Option<String>,
    action: Option<String>,
    etag: String,
}

fn cmd_request(
    kind: RequestKind,
    config_path: &str,
    token: &str,
    ids: &CallIds,
    form: Option<&str>,
    edits: &[(String, String)],
    format: Format,
) -> Result<()> {
    let cfg = dx_explorer_config::load_config(config_path)
        .with_context(|| format!("failed to load config {config_path}"))?;

    let req = match kind {
        RequestKind::Login => request::login(&cfg)?,
        RequestKind::CaseTypes => request::refresh_case_types(&cfg, token),
        RequestKind::CreateCase => {
            request::create_case(&cfg, token, require(&ids.case_type, "--case-type")?)
        }
        RequestKind::OpenAssignment => {
            request::open_assignment(&cfg, token, require(&ids.assignment, "--assignment")?)
        }
        RequestKind::OpenAction => request::open_assignment_action(
            &cfg,
            token,
            require(&ids.assignment, "--assignment")?,
            require(&ids.action, "--action")?,
        ),
        RequestKind::Submit => {
            let body = match form {
                Some(path) => {
                    let (_, resp) = load_response(path)?;
                    submission_body(edited_bundle(resp, edits)?.fields())
                }
                None if !edits.is_empty() => bail!("--set needs --form"),
                None => None,
            };
            request::submit_assignment_action(
                &cfg,
                token,
                require(&ids.assignment, "--assignment")?,
                require(&ids.action, "--action")?,
                &ids.etag,
                body.as_ref(),
            )
        }
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&req)?),
        Format::Pretty => print_request(&req),
    }
    Ok(())
}

fn print_request(req: &HttpRequest) {
    println!("{}", req.summary().fg(ariadne::Color::Cyan));
    for (name, value) in &req.headers {
        println!("{name}: {value}");
    }
    if let Some(content_type) = req.content_type {
        println!("Content-Type: {content_type}");
    }
    match &req.auth {
        Auth::Basic { client_id, .. } => println!("Authorization: Basic ({client_id}:***)"),
        Auth::Bearer { .. } => println!("Authorization: Bearer ***"),
    }
    if let Some(body) = &req.body {
        println!();
        println!("{body}");
    }
}

fn cmd_check_config(file: &str, format: Format) -> Result<()> {
    let cfg = dx_explorer_config::load_config(file)
        .with_context(|| format!("invalid config {file}"))?;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "file": file,
                "server": cfg.server,
                "token_url": cfg.token_url(),
                "has_credentials": cfg.has_credentials(),
            });
            println!("{out:#}");
        }
        Format::Pretty => {
            eprintln!("config ok: {file} ({})", cfg.server);
            if !cfg.has_credentials() {
                eprintln!("note: no operator or client credentials set");
            }
        }
    }
    Ok(())
}

fn cmd_init_config(file: &str, cfg: &ExplorerConfig, force: bool, format: Format) -> Result<()> {
    if !force && fs::metadata(file).is_ok() {
        bail!("{file} already exists; pass --force to overwrite");
    }
    dx_explorer_config::validate(cfg)?;
    dx_explorer_config::save_config(file, cfg)?;

    match format {
        Format::Json => {
            let out = serde_json::json!({ "status": "written", "file": file });
            println!("{out:#}");
        }
        Format::Pretty => eprintln!("written: {file}"),
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // The explanation is the command output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

/// Read and assemble a saved DX response body.
fn load_response(path: &str) -> Result<(String, DxResponse)> {
    let source = read_file(path)?;
    let resp = parse_dx_response(&source)?;
    Ok((source, resp))
}

fn require_resources(resp: &DxResponse) -> Result<&ResourceBundle> {
    resp.resources
        .as_ref()
        .ok_or_else(|| anyhow!("response has no uiResources; open an assignment action first"))
}

/// The response's form with `edits` applied through the field editor.
fn edited_bundle(resp: DxResponse, edits: &[(String, String)]) -> Result<ResourceBundle> {
    let mut bundle = require_resources(&resp)?.clone();
    let mut editor = bundle.editor();
    for (key, value) in edits {
        editor.set(key, value.as_str())?;
    }
    Ok(bundle)
}

fn require<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| anyhow!("{flag} is required for this request"))
}

fn missing_root(bundle: &ResourceBundle) -> Diagnostic {
    Diagnostic::error(
        diag::codes::MISSING_REFERENCE_TARGET,
        format!("root component {} is not in the component map", bundle.root_key()),
        Some(bundle.root_key().to_string()),
    )
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}
