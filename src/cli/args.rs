use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "orgdir",
    version,
    about = "searchable organization directory",
    long_about = "orgdir serves a filterable directory of organizations loaded from a JSON dataset, and renders filtered snapshots of it.\n\nExamples:\n  orgdir serve --root ./site\n  orgdir serve --port 8080\n  orgdir render --search climate --region Europe -o climate.html\n  orgdir init-config\n\nTip: Use --config to persist the site root and listener settings."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.orgdir/config.yml)."
    )]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Host the site root over HTTP.
    Serve(ServeArgs),
    /// Write a filtered snapshot of the directory.
    Render(RenderArgs),
    /// Write the default config file if it does not exist yet.
    InitConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help_heading = "Server",
        help = "Directory holding index.html and data/source.json."
    )]
    pub root: Option<String>,

    #[arg(
        short = 'H',
        long = "host",
        value_name = "ADDR",
        help_heading = "Server",
        help = "Address to bind (default 0.0.0.0)."
    )]
    pub host: Option<String>,

    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        help_heading = "Server",
        help = "Port to listen on (falls back to $PORT, then 3000)."
    )]
    pub port: Option<u16>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[arg(
        short = 'd',
        long = "data",
        value_name = "SOURCE",
        help_heading = "Input",
        help = "Dataset path or http(s) URL (default data/source.json)."
    )]
    pub data: Option<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive text matched against name, overview and key activities."
    )]
    pub search: Option<String>,

    #[arg(
        long = "domain",
        visible_alias = "scope",
        value_name = "NAME",
        help_heading = "Filters",
        help = "Exact operational domain."
    )]
    pub domain: Option<String>,

    #[arg(
        long = "region",
        value_name = "NAME",
        help_heading = "Filters",
        help = "Exact region."
    )]
    pub region: Option<String>,

    #[arg(
        long = "focus",
        value_name = "NAME",
        help_heading = "Filters",
        help = "Exact focus area."
    )]
    pub focus: Option<String>,

    #[arg(
        short = 'f',
        long = "show-flagged",
        visible_alias = "flagged",
        help_heading = "Filters",
        help = "Include records flagged for review."
    )]
    pub show_flagged: bool,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, html). Inferred from --output when omitted."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the snapshot to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "title",
        value_name = "TEXT",
        help_heading = "Output",
        help = "Page title for html output."
    )]
    pub title: Option<String>,
}
