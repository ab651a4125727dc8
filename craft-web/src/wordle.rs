//! Today's Wordle answer, scraped from a news page that prints it in bold.

use crate::WebError;
use crate::extract::selector;
use craft_http::HttpClient;
use scraper::Html;

#[derive(Clone, Debug)]
pub struct WordleSource {
    http: HttpClient,
    url: String,
    strong_index: usize,
}

/// Upper-case the raw bold text and drop sentence punctuation.
///
/// ```
/// assert_eq!(craft_web::wordle::normalize_answer(" crane. "), "CRANE");
/// ```
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().replace('.', "").to_uppercase()
}

/// The `strong_index`-th `<strong>` of the page, normalized.
pub fn answer_from_html(doc: &Html, strong_index: usize) -> Result<String, WebError> {
    let sel = selector("strong")?;
    let raw: String = doc
        .select(&sel)
        .nth(strong_index)
        .ok_or_else(|| WebError::MissingElement(format!("<strong> element #{strong_index}")))?
        .text()
        .collect();
    Ok(normalize_answer(&raw))
}

impl WordleSource {
    pub fn new(http: HttpClient, url: impl Into<String>, strong_index: usize) -> Self {
        Self {
            http,
            url: url.into(),
            strong_index,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn answer(&self) -> Result<String, WebError> {
        let page = self.http.get(&self.url).await?.error_for_status()?;
        let answer = answer_from_html(&Html::parse_document(&page.body), self.strong_index)?;
        tracing::debug!(target: "web.wordle", url=%page.final_url, index=self.strong_index, "web.wordle.answer");
        Ok(answer)
    }
}
