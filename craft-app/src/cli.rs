use clap::{Parser, Subcommand};
use craft_common::OutputFormat;
use craft_http::HttpMethod;
use craft_web::page::DEFAULT_SAVE_PATH;
use std::path::PathBuf;

/// Web page helpers, WHOIS lookups and duration formatting
#[derive(Parser, Debug)]
#[command(name = "craft", version)]
pub struct Cli {
    /// Configuration file (YAML or TOML); defaults to the user config dir
    #[arg(long, global = true, value_name = "PATH", env = "CRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output rendering, overriding `output` from the config file
    #[arg(long, global = true, value_name = "text|json")]
    pub format: Option<OutputFormat>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a number of seconds as its largest whole unit
    Duration {
        #[arg(long, allow_negative_numbers = true)]
        seconds: i64,
        /// Locale tag (en or uk); defaults to `format.locale`
        #[arg(long)]
        locale: Option<String>,
    },
    /// Infer the type of a literal (bool, integer, float or string)
    TypeName {
        #[arg(allow_hyphen_values = true)]
        literal: String,
    },
    /// Image sources on a page, or the response headers for OPTIONS
    Images {
        url: String,
        #[arg(long, default_value_t = HttpMethod::Get)]
        method: HttpMethod,
        /// Extra request header; repeatable
        #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        /// Query pair appended to the URL; repeatable
        #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_query)]
        query: Vec<(String, String)>,
        /// Request body
        #[arg(long, value_name = "BODY")]
        data: Option<String>,
    },
    /// Page title
    Title { url: String },
    /// Link targets
    Links { url: String },
    /// Response status code
    Status { url: String },
    /// Paragraph text
    Paragraphs { url: String },
    /// Named meta tags
    Meta { url: String },
    /// Whether the page is served over verified TLS
    Tls { url: String },
    /// Save the raw page body to a file
    Save {
        url: String,
        #[arg(short, long, default_value = DEFAULT_SAVE_PATH)]
        output: PathBuf,
    },
    /// List item text
    ListItems { url: String },
    /// First <h1> heading
    H1 { url: String },
    /// External script sources
    Scripts { url: String },
    /// Forms with their named inputs
    Forms { url: String },
    /// Stylesheet links
    Css { url: String },
    /// WHOIS record for an IP address or domain
    Whois { address: String },
    /// Today's Wordle answer
    Wordle,
}

fn split_pair(raw: &str, sep: char, what: &str) -> Result<(String, String), String> {
    match raw.split_once(sep) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected {what}, got {raw:?}")),
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    split_pair(raw, ':', "NAME:VALUE")
}

fn parse_query(raw: &str) -> Result<(String, String), String> {
    split_pair(raw, '=', "KEY=VALUE")
}

impl Command {
    /// Whether the command talks to the network.
    pub fn needs_http(&self) -> bool {
        !matches!(self, Command::Duration { .. } | Command::TypeName { .. })
    }
}
