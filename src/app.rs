use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{CliArgs, Command, RenderArgs, ServeArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::filter::FilterState;
use crate::loader::{self, DataSource, DEFAULT_DATA_PATH};
use crate::output::{self, OutputFormat, PageOptions};
use crate::server::{self, ServerOptions, DEFAULT_HOST};
use crate::view::ViewModel;

fn print_banner(no_color: bool) {
    const BANNER: &str = r#"
                  _     _ _
   ___  _ __ __ _| | __| (_)_ __
  / _ \| '__/ _` |/ _` | | '__|
 | (_) | | | (_| | (_| | | |
  \___/|_|  \__, |\__,_|_|_|
            |___/
"#;
    if no_color {
        print!("{BANNER}");
    } else {
        print!("{}", BANNER.cyan());
    }
    println!(
        "       v{} - organization directory",
        env!("CARGO_PKG_VERSION")
    );
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "orgdir=info,tower_http=info",
        1 => "orgdir=debug,tower_http=debug",
        _ => "orgdir=trace,tower_http=trace",
    }
}

/// `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: u8, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .try_init();
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub server: ServerOptions,
    pub no_color: bool,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub source: DataSource,
    pub filters: FilterState,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub page: PageOptions,
    pub no_color: bool,
}

fn resolve_no_color(flag: bool, cfg: &ConfigFile) -> bool {
    flag || cfg.no_color.unwrap_or(false)
}

fn build_serve_config(
    args: ServeArgs,
    no_color: bool,
    cfg: ConfigFile,
    env_port: Option<String>,
) -> Result<ServeConfig, String> {
    let no_color = resolve_no_color(no_color, &cfg);
    let root = config::expand_tilde(
        args.root
            .or(cfg.root)
            .unwrap_or_else(|| ".".to_string())
            .trim(),
    );
    let host = args
        .host
        .or(cfg.host)
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server::resolve_port(args.port, env_port.as_deref(), cfg.port);

    Ok(ServeConfig {
        server: ServerOptions { root, host, port },
        no_color,
    })
}

fn build_render_config(
    args: RenderArgs,
    no_color: bool,
    cfg: ConfigFile,
) -> Result<RenderConfig, String> {
    let no_color = resolve_no_color(no_color, &cfg);
    let data = args
        .data
        .or(cfg.data)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let source = match DataSource::parse(data.trim()) {
        DataSource::FilePath(path) => {
            DataSource::FilePath(config::expand_tilde(&path.to_string_lossy()))
        }
        other => other,
    };

    let output = args
        .output
        .map(|p| config::expand_tilde(p.trim()));

    let format = match args.format.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --format '{raw}', expected text, json, or html"))?,
        None => output
            .as_ref()
            .and_then(|p| output::infer_format_from_path(&p.to_string_lossy()))
            .unwrap_or(OutputFormat::Text),
    };

    let filters = FilterState {
        search: args.search.unwrap_or_default(),
        domain: args.domain.unwrap_or_default(),
        region: args.region.unwrap_or_default(),
        focus: args.focus.unwrap_or_default(),
        show_flagged: args.show_flagged,
    };

    let mut page = PageOptions::default();
    if let Some(title) = args.title.filter(|t| !t.trim().is_empty()) {
        page.title = title;
    }

    Ok(RenderConfig {
        source,
        filters,
        format,
        output,
        page,
        no_color,
    })
}

async fn run_serve(run: ServeConfig) -> Result<(), String> {
    format_kv_line("Root", &run.server.root.display().to_string());
    format_kv_line(
        "Listen",
        &format!("{}:{}", run.server.host, run.server.port),
    );
    println!();
    server::serve(run.server).await.map_err(|e| {
        error!(error = %e, "server failed");
        e.to_string()
    })
}

async fn run_render(run: RenderConfig) -> Result<(), String> {
    let directory = loader::load(&run.source).await.map_err(|e| {
        error!(source = %run.source.describe(), error = %e, "failed to load dataset");
        e.to_string()
    })?;
    let view = ViewModel::with_filters(directory, run.filters);
    info!(
        visible = view.visible().len(),
        total = view.directory().len(),
        "rendered snapshot"
    );
    let bytes = output::render(&view, run.format, &run.page);

    match run.output.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    format!("failed to create output directory '{}': {e}", parent.display())
                })?;
            }
            tokio::fs::write(path, &bytes)
                .await
                .map_err(|e| format!("failed to write output '{}': {e}", path.display()))?;
            debug!(path = %path.display(), bytes = bytes.len(), "snapshot written");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&bytes)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>, no_color: bool) -> Result<(), String> {
    let path = path
        .or_else(config::default_config_path)
        .ok_or_else(|| "could not determine home directory for config".to_string())?;
    let created = config::ensure_default_config_file(&path)?;
    let status = if created { "created" } else { "exists" };
    let status = if no_color {
        status.normal()
    } else if created {
        status.green()
    } else {
        status.yellow()
    };
    format_kv_line("Config", &format!("{} ({status})", path.display()));
    Ok(())
}

/// A `--config` path must exist, except for `init-config`, which creates it.
fn load_run_config(user_path: Option<&Path>, command: &Command) -> Result<ConfigFile, String> {
    let allow_missing = matches!(command, Command::InitConfig);
    match user_path {
        Some(path) => config::load_config(path, allow_missing),
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true),
            None => Ok(ConfigFile::default()),
        },
    }
}

fn build_runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };
    validation::validate(&args)?;

    let user_config_path = args.config.as_deref().map(config::expand_tilde);
    let cfg = load_run_config(user_config_path.as_deref(), &args.command)?;

    let no_color = resolve_no_color(args.no_color, &cfg);
    if no_color {
        colored::control::set_override(false);
    }
    init_tracing(args.verbose, no_color);

    match args.command {
        Command::InitConfig => init_config(user_config_path, no_color),
        Command::Serve(serve) => {
            let run = build_serve_config(serve, args.no_color, cfg, std::env::var("PORT").ok())?;
            print_banner(run.no_color);
            build_runtime()?.block_on(run_serve(run))
        }
        Command::Render(render) => {
            let run = build_render_config(render, args.no_color, cfg)?;
            build_runtime()?.block_on(run_render(run))
        }
    }
}
