//! WHOIS lookups scraped from a web front-end.
//!
//! The front-end renders the raw registry answer inside a `<pre>` block of
//! fixed-width `Key:          value` lines.

use crate::WebError;
use crate::extract::selector;
use craft_http::{HttpClient, HttpError};
use scraper::Html;
use std::collections::BTreeMap;
use url::Url;

/// Width of the key column in a WHOIS record line.
const KEY_WIDTH: usize = 15;

/// Keys dropped from every record.
const DROPPED_KEYS: &[&str] = &["Comment"];

/// Parse a fixed-width WHOIS text block into `key → value`.
///
/// Later occurrences of a key overwrite earlier ones.
///
/// ```
/// use craft_web::whois::parse_whois;
///
/// let record = parse_whois("NetName:        EXAMPLE-NET\nComment:        hi\n");
/// assert_eq!(record["NetName"], "EXAMPLE-NET");
/// assert!(!record.contains_key("Comment"));
/// ```
pub fn parse_whois(text: &str) -> BTreeMap<String, String> {
    let mut record = BTreeMap::new();
    for line in text.lines() {
        let split = line
            .char_indices()
            .nth(KEY_WIDTH)
            .map_or(line.len(), |(i, _)| i);
        let (raw_key, value) = line.split_at(split);
        let key: String = raw_key.chars().filter(|c| *c != ' ' && *c != ':').collect();
        if key.is_empty() {
            continue;
        }
        record.insert(key, value.trim().to_string());
    }
    for key in DROPPED_KEYS {
        record.remove(*key);
    }
    record
}

#[derive(Clone, Debug)]
pub struct WhoisClient {
    http: HttpClient,
    base: Url,
}

impl WhoisClient {
    /// `base` is the lookup prefix; the address is appended as one path segment.
    pub fn new(http: HttpClient, base: &str) -> Result<Self, WebError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(HttpError::Url(format!("{base}: cannot hold a path")).into());
        }
        Ok(Self { http, base })
    }

    pub fn lookup_url(&self, address: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(address);
        }
        url
    }

    pub async fn lookup(&self, address: &str) -> Result<BTreeMap<String, String>, WebError> {
        let url = self.lookup_url(address);
        let page = self.http.get(url.as_str()).await?.error_for_status()?;
        let block = first_pre(&page.body)?.ok_or_else(|| {
            WebError::MissingElement(format!("<pre> WHOIS block for {address}"))
        })?;
        let record = parse_whois(&block);
        tracing::debug!(target: "web.whois", address, fields = record.len(), "web.whois.parsed");
        Ok(record)
    }
}

fn first_pre(body: &str) -> Result<Option<String>, WebError> {
    let doc = Html::parse_document(body);
    let sel = selector("pre")?;
    Ok(doc.select(&sel).next().map(|el| el.text().collect()))
}
