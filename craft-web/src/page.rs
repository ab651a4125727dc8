//! Fetch-then-extract helpers.
//!
//! Each method performs exactly one request through the shared
//! [`HttpClient`], rejects non-2xx responses (except [`PageTools::check_status`]
//! and [`PageTools::check_tls`], which report on the response itself) and
//! hands the body to [`crate::extract`].

use crate::WebError;
use crate::extract::{self, FormInfo};
use craft_http::{FetchedPage, HttpClient, HttpMethod, RequestOpts};
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where [`PageTools::save_html`] writes when the caller has no preference.
pub const DEFAULT_SAVE_PATH: &str = "output.html";

/// Result of [`PageTools::find_all_images`]: an `OPTIONS` request has no
/// document to scan, so it yields the response headers instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum ImageScan {
    Images(Vec<String>),
    Headers(Vec<(String, String)>),
}

/// Whether a page was ultimately served over verified TLS.
///
/// The client rejects invalid certificates, so reaching an `https` URL
/// means the chain validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsStatus {
    Verified,
    PlainHttp,
}

impl fmt::Display for TlsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TlsStatus::Verified => "TLS certificate verified",
            TlsStatus::PlainHttp => "served over plain HTTP (no certificate)",
        })
    }
}

#[derive(Clone, Debug)]
pub struct PageTools {
    http: HttpClient,
}

fn log_extracted(kind: &'static str, url: &Url, count: usize) {
    tracing::debug!(target: "web.extract", kind, %url, count, "web.extract.done");
}

impl PageTools {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    async fn fetch_ok(&self, url: &str) -> Result<FetchedPage, WebError> {
        Ok(self.http.get(url).await?.error_for_status()?)
    }

    /// GET `url` and parse it. The returned URL is the one requested, which
    /// is what root-relative references are resolved against.
    async fn document(&self, url: &str) -> Result<(Html, Url), WebError> {
        let page = self.fetch_ok(url).await?;
        Ok((Html::parse_document(&page.body), page.url))
    }

    /// Image sources from a page requested with any supported method.
    /// `opts` carries extra headers, query pairs or a body for the request.
    pub async fn find_all_images(
        &self,
        url: &str,
        method: HttpMethod,
        opts: RequestOpts<'_>,
    ) -> Result<ImageScan, WebError> {
        let page = self
            .http
            .request(method, url, opts)
            .await?
            .error_for_status()?;

        if method == HttpMethod::Options {
            return Ok(ImageScan::Headers(page.header_pairs()));
        }

        let doc = Html::parse_document(&page.body);
        let images = extract::image_urls(&doc, &page.url)?;
        log_extracted("images", &page.url, images.len());
        Ok(ImageScan::Images(images))
    }

    pub async fn image_urls(&self, url: &str) -> Result<Vec<String>, WebError> {
        let (doc, base) = self.document(url).await?;
        let images = extract::image_urls(&doc, &base)?;
        log_extracted("images", &base, images.len());
        Ok(images)
    }

    pub async fn page_title(&self, url: &str) -> Result<Option<String>, WebError> {
        let (doc, _) = self.document(url).await?;
        extract::page_title(&doc)
    }

    pub async fn links(&self, url: &str) -> Result<Vec<String>, WebError> {
        let (doc, base) = self.document(url).await?;
        let links = extract::links(&doc, &base)?;
        log_extracted("links", &base, links.len());
        Ok(links)
    }

    /// Status code of a plain GET; non-2xx codes are returned, not raised.
    pub async fn check_status(&self, url: &str) -> Result<u16, WebError> {
        Ok(self.http.get(url).await?.status.as_u16())
    }

    pub async fn paragraphs(&self, url: &str) -> Result<Vec<String>, WebError> {
        let (doc, base) = self.document(url).await?;
        let paragraphs = extract::paragraphs(&doc)?;
        log_extracted("paragraphs", &base, paragraphs.len());
        Ok(paragraphs)
    }

    pub async fn meta_tags(&self, url: &str) -> Result<BTreeMap<String, Option<String>>, WebError> {
        let (doc, base) = self.document(url).await?;
        let meta = extract::meta_tags(&doc)?;
        log_extracted("meta", &base, meta.len());
        Ok(meta)
    }

    /// TLS verdict for the final URL after redirects. Certificate and
    /// connection failures surface as [`craft_http::HttpError::Network`].
    pub async fn check_tls(&self, url: &str) -> Result<TlsStatus, WebError> {
        let page = self.http.get(url).await?;
        Ok(if page.is_https() {
            TlsStatus::Verified
        } else {
            TlsStatus::PlainHttp
        })
    }

    /// Write the raw body of `url` to `path` and return the path.
    pub async fn save_html(&self, url: &str, path: impl AsRef<Path>) -> Result<PathBuf, WebError> {
        let page = self.fetch_ok(url).await?;
        let path = path.as_ref().to_path_buf();
        tokio::fs::write(&path, page.body.as_bytes()).await?;
        tracing::info!(target: "web.save", url=%page.url, path=%path.display(), bytes=page.body.len(), "web.save.done");
        Ok(path)
    }

    pub async fn list_items(&self, url: &str) -> Result<Vec<String>, WebError> {
        let (doc, base) = self.document(url).await?;
        let items = extract::list_items(&doc)?;
        log_extracted("list_items", &base, items.len());
        Ok(items)
    }

    pub async fn first_h1(&self, url: &str) -> Result<Option<String>, WebError> {
        let (doc, _) = self.document(url).await?;
        extract::first_h1(&doc)
    }

    pub async fn script_sources(&self, url: &str) -> Result<Vec<String>, WebError> {
        let (doc, base) = self.document(url).await?;
        let scripts = extract::script_sources(&doc)?;
        log_extracted("scripts", &base, scripts.len());
        Ok(scripts)
    }

    pub async fn forms(&self, url: &str) -> Result<Vec<FormInfo>, WebError> {
        let (doc, base) = self.document(url).await?;
        let forms = extract::forms(&doc)?;
        log_extracted("forms", &base, forms.len());
        Ok(forms)
    }

    pub async fn css_links(&self, url: &str) -> Result<Vec<String>, WebError> {
        let (doc, base) = self.document(url).await?;
        let css = extract::css_links(&doc)?;
        log_extracted("css", &base, css.len());
        Ok(css)
    }
}
