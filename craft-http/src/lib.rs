//! Single-shot HTTP fetching with safe logging.
//!
//! - One request per call: no retries, no rate limiting, no auth
//! - Any method from GET to TRACE, parsed case-insensitively ([`HttpMethod`])
//! - Redacts sensitive query params and `Authorization` values in logs
//! - Optional *raw* request/response logging via `CRAFT_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), craft_http::HttpError> {
//! let client = craft_http::HttpClient::new()?;
//! let page = client.get("https://example.com").await?.error_for_status()?;
//! println!("{} bytes from {}", page.body.len(), page.final_url);
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and
//! (optionally) raw request/response lines (target `http.raw`).

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use std::borrow::Cow;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "CRAFT_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

/// `User-Agent` sent when the caller does not pick one.
pub const DEFAULT_USER_AGENT: &str = concat!("craft/", env!("CARGO_PKG_VERSION"));

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&str>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (key, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", key, val.replace('\'', r"'\''")));
    }
    if let Some(body) = body {
        let body = truncate_at_char(body, RAW_MAX_BODY);
        parts.push(format!("-d '{}'", body.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", redacted_url(url).as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("cookie") {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
            | "password"
    )
}

/// Copy of `url` with secret query values replaced by `<redacted>`.
fn redacted_url(url: &Url) -> Url {
    let mut out = url.clone();
    if url.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if is_secret_param(&k) {
                    "<redacted>".to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), v)
            })
            .collect();
        out.query_pairs_mut().clear().extend_pairs(pairs);
    }
    out
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("unknown HTTP method {0:?} (expected GET, POST, PUT, DELETE, PATCH, OPTIONS, HEAD or TRACE)")]
    UnknownMethod(String),
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}: {snippet}")]
    Status {
        status: StatusCode,
        url: String,
        snippet: String,
    },
}

// ==============================
// Methods & Request Options
// ==============================

/// The request methods the helpers accept.
///
/// ```
/// use craft_http::{HttpError, HttpMethod};
///
/// assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
/// assert!(matches!("BREW".parse::<HttpMethod>(), Err(HttpError::UnknownMethod(_))));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    fn to_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Trace => Method::TRACE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HttpError::UnknownMethod(s.to_string()))
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use craft_http::RequestOpts;
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("q", Cow::Borrowed("rust"))]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.body.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // appended to the URL's own query
    pub body: Option<Cow<'a, str>>,
}

impl RequestOpts<'_> {
    /// Add a header, keeping earlier values of the same name.
    ///
    /// ```
    /// use craft_http::{HttpError, RequestOpts};
    ///
    /// let opts = RequestOpts::default().header("X-Client", "craft").unwrap();
    /// assert_eq!(opts.headers.unwrap()["x-client"], "craft");
    /// assert!(matches!(
    ///     RequestOpts::default().header("bad name", "x"),
    ///     Err(HttpError::Build(_))
    /// ));
    /// ```
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, HttpError> {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| HttpError::Build(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| HttpError::Build(format!("header value for {name}: {e}")))?;
        self.headers
            .get_or_insert_with(HeaderMap::new)
            .append(name, value);
        Ok(self)
    }
}

// ==============================
// Response
// ==============================

/// Everything the helpers need from one response, with the body decoded as text.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub method: HttpMethod,
    /// The URL as requested (after query params were appended).
    pub url: Url,
    /// Where redirects ended up.
    pub final_url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchedPage {
    /// Turn a non-2xx status into [`HttpError::Status`].
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.status.is_success() {
            return Ok(self);
        }
        let snippet = snip_body(&self.body);
        tracing::warn!(
            status=%self.status,
            method=%self.method,
            host_path=%host_path(&self.final_url),
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Status {
            status: self.status,
            url: self.final_url.to_string(),
            snippet,
        })
    }

    pub fn is_https(&self) -> bool {
        self.final_url.scheme() == "https"
    }

    /// Response headers as text pairs; non-UTF-8 values are replaced lossily.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Client with [`DEFAULT_USER_AGENT`] and a 5s connect timeout.
    ///
    /// ```no_run
    /// use craft_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        Self::with_agent(DEFAULT_USER_AGENT, Duration::from_secs(5))
    }

    /// Client with an explicit `User-Agent` and connect timeout.
    pub fn with_agent(user_agent: &str, connect_timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the whole-request timeout.
    ///
    /// ```no_run
    /// use craft_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Plain GET with default options.
    pub async fn get(&self, url: &str) -> Result<FetchedPage, HttpError> {
        self.request(HttpMethod::Get, url, RequestOpts::default())
            .await
    }

    /// Issue exactly one request. Non-2xx statuses are *not* errors here; see
    /// [`FetchedPage::error_for_status`].
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        opts: RequestOpts<'_>,
    ) -> Result<FetchedPage, HttpError> {
        let mut url = Url::parse(url).map_err(|e| HttpError::Url(format!("{url}: {e}")))?;
        if let Some(q) = opts.query.as_ref().filter(|q| !q.is_empty()) {
            url.query_pairs_mut()
                .extend_pairs(q.iter().map(|(k, v)| (*k, v.as_ref())));
        }

        // ----- Build request -----
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let mut rb = self
            .inner
            .request(method.to_reqwest(), url.clone())
            .timeout(timeout);
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }
        if let Some(body) = &opts.body {
            rb = rb.body(body.to_string());
        }

        // Lightweight request id without extra deps
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        let redacted = redacted_url(&url);
        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%host_path(&url),
            query=?redacted.query(),
            timeout_ms=timeout.as_millis() as u64,
            has_body=%opts.body.is_some(),
            "http.request.start"
        );

        if raw_enabled() {
            let empty = HeaderMap::new();
            let headers = opts.headers.as_ref().unwrap_or(&empty);
            let curl = make_curl(&method.to_reqwest(), &url, headers, opts.body.as_deref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            classify(err, &url)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let final_url = resp.url().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            classify(err, &url)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;
        let redirected = final_url != url;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            redirected,
            "http.response.headers"
        );

        let body = String::from_utf8_lossy(&bytes).into_owned();

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let text = truncate_at_char(&body, RAW_MAX_BODY);
            let truncated = text.len() < body.len();
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snip_body(&body),
            "http.response.body_snippet"
        );

        Ok(FetchedPage {
            method,
            url,
            final_url,
            status,
            headers,
            body,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn classify(err: reqwest::Error, url: &Url) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout {
            url: redacted_url(url).to_string(),
        }
    } else if err.is_builder() {
        HttpError::Build(err.to_string())
    } else {
        HttpError::Network(err.to_string())
    }
}

fn host_path(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or("-"), url.path())
}

fn truncate_at_char(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn snip_body(body: &str) -> String {
    let snip = truncate_at_char(body, SNIPPET_MAX);
    if snip.len() < body.len() {
        format!("{snip}...")
    } else {
        snip.to_string()
    }
}
