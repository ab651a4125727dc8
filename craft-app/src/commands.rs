use crate::cli::Command;
use anyhow::{Context, Result};
use craft_common::OutputFormat;
use craft_config::CraftConfig;
use craft_format::type_name_of;
use craft_http::{DEFAULT_USER_AGENT, HttpClient, RequestOpts};
use craft_web::{FormInfo, ImageScan, PageTools, WhoisClient, WordleSource};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Prints results either line by line or as one pretty JSON document.
#[derive(Clone, Copy, Debug)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn value<T: Serialize + Display>(&self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(value),
            OutputFormat::Text => {
                println!("{value}");
                Ok(())
            }
        }
    }

    pub fn lines(&self, items: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(items),
            OutputFormat::Text => {
                for item in items {
                    println!("{item}");
                }
                Ok(())
            }
        }
    }

    /// `None` prints `missing` in text mode and `null` in JSON.
    pub fn optional(&self, value: Option<&str>, missing: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&value),
            OutputFormat::Text => {
                println!("{}", value.unwrap_or(missing));
                Ok(())
            }
        }
    }

    pub fn pairs<V: Serialize>(
        &self,
        map: &BTreeMap<String, V>,
        render: impl Fn(&V) -> String,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(map),
            OutputFormat::Text => {
                for (key, value) in map {
                    println!("{key}: {}", render(value));
                }
                Ok(())
            }
        }
    }

    pub fn headers(&self, headers: &[(String, String)]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(headers),
            OutputFormat::Text => {
                for (name, value) in headers {
                    println!("{name}: {value}");
                }
                Ok(())
            }
        }
    }

    pub fn forms(&self, forms: &[FormInfo]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(forms),
            OutputFormat::Text => {
                for form in forms {
                    println!("{} {}", form.method, form.action.as_deref().unwrap_or("-"));
                    for (name, kind) in &form.inputs {
                        println!("  {name}: {}", kind.as_deref().unwrap_or("-"));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Type of the first interpretation that parses: bool, integer, float,
/// otherwise a string.
pub fn literal_type_name(literal: &str) -> String {
    if let Ok(v) = literal.parse::<bool>() {
        return type_name_of(&v);
    }
    if let Ok(v) = literal.parse::<i64>() {
        return type_name_of(&v);
    }
    if let Ok(v) = literal.parse::<f64>() {
        return type_name_of(&v);
    }
    type_name_of(&literal.to_string())
}

pub fn http_client(cfg: &CraftConfig) -> Result<HttpClient> {
    let agent = cfg.http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    let client = HttpClient::with_agent(agent, cfg.http.connect_timeout())
        .context("failed to build HTTP client")?
        .with_timeout(cfg.http.timeout());
    Ok(client)
}

/// Per-request options from `craft images` flags.
pub fn request_opts<'a>(
    headers: &[(String, String)],
    query: &'a [(String, String)],
    data: Option<String>,
) -> Result<RequestOpts<'a>> {
    let mut opts = RequestOpts {
        query: (!query.is_empty()).then(|| {
            query
                .iter()
                .map(|(k, v)| (k.as_str(), Cow::Borrowed(v.as_str())))
                .collect()
        }),
        body: data.map(Cow::Owned),
        ..Default::default()
    };
    for (name, value) in headers {
        opts = opts.header(name, value)?;
    }
    Ok(opts)
}

/// `locale` defaults to `format.locale`; unknown tags use
/// `format.fallback_locale` when one is configured.
pub fn duration_phrase(cfg: &CraftConfig, seconds: i64, locale: Option<&str>) -> Result<String> {
    let tag = locale.unwrap_or(cfg.format.locale.tag());
    Ok(cfg.format.duration_formatter().format(seconds, tag)?)
}

/// Commands that never touch the network.
pub fn run_local(command: &Command, cfg: &CraftConfig, out: Printer) -> Result<()> {
    match command {
        Command::Duration { seconds, locale } => {
            out.value(&duration_phrase(cfg, *seconds, locale.as_deref())?)
        }
        Command::TypeName { literal } => out.value(&literal_type_name(literal)),
        other => anyhow::bail!("{other:?} needs the network"),
    }
}

pub async fn run(command: Command, cfg: &CraftConfig, out: Printer) -> Result<()> {
    if !command.needs_http() {
        return run_local(&command, cfg, out);
    }

    let http = http_client(cfg)?;
    let tools = PageTools::new(http.clone());
    tracing::debug!(target: "craft", ?command, "craft.command");

    match command {
        Command::Images {
            url,
            method,
            headers,
            query,
            data,
        } => {
            let opts = request_opts(&headers, &query, data)?;
            match tools.find_all_images(&url, method, opts).await? {
                ImageScan::Images(images) => out.lines(&images),
                ImageScan::Headers(headers) => out.headers(&headers),
            }
        }
        Command::Title { url } => {
            let title = tools.page_title(&url).await?;
            out.optional(title.as_deref(), "No title found")
        }
        Command::Links { url } => out.lines(&tools.links(&url).await?),
        Command::Status { url } => out.value(&tools.check_status(&url).await?),
        Command::Paragraphs { url } => out.lines(&tools.paragraphs(&url).await?),
        Command::Meta { url } => {
            let meta = tools.meta_tags(&url).await?;
            out.pairs(&meta, |content| content.clone().unwrap_or_default())
        }
        Command::Tls { url } => out.value(&tools.check_tls(&url).await?),
        Command::Save { url, output } => {
            let path = tools.save_html(&url, &output).await?;
            out.value(&path.display().to_string())
        }
        Command::ListItems { url } => out.lines(&tools.list_items(&url).await?),
        Command::H1 { url } => {
            let heading = tools.first_h1(&url).await?;
            out.optional(heading.as_deref(), "No <h1> tag found")
        }
        Command::Scripts { url } => out.lines(&tools.script_sources(&url).await?),
        Command::Forms { url } => out.forms(&tools.forms(&url).await?),
        Command::Css { url } => out.lines(&tools.css_links(&url).await?),
        Command::Whois { address } => {
            let client = WhoisClient::new(http, &cfg.sources.whois_base)?;
            let record = client
                .lookup(&address)
                .await
                .with_context(|| format!("WHOIS lookup for {address} failed"))?;
            out.pairs(&record, String::clone)
        }
        Command::Wordle => {
            let source = WordleSource::new(
                http,
                cfg.sources.wordle_url.clone(),
                cfg.sources.wordle_strong_index,
            );
            out.value(&source.answer().await?)
        }
        local => run_local(&local, cfg, out),
    }
}
