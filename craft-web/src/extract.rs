//! HTML fragment extraction.
//!
//! Every function takes an already-parsed document, so the same page can be
//! queried several times without refetching. References starting with `/`
//! are resolved against the page URL; everything else is returned verbatim.

use crate::WebError;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// One `<form>` and the inputs inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormInfo {
    pub action: Option<String>,
    /// Upper-cased `method` attribute, `GET` when absent.
    pub method: String,
    /// Input `name` → `type`; inputs without a name are skipped.
    pub inputs: BTreeMap<String, Option<String>>,
}

pub(crate) fn selector(css: &str) -> Result<Selector, WebError> {
    Selector::parse(css).map_err(|e| WebError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Values of `attr` on every match of `css`, skipping empty ones.
fn attr_values(doc: &Html, css: &str, attr: &str) -> Result<Vec<String>, WebError> {
    let sel = selector(css)?;
    Ok(doc
        .select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect())
}

fn texts(doc: &Html, css: &str) -> Result<Vec<String>, WebError> {
    let sel = selector(css)?;
    Ok(doc.select(&sel).map(text_of).collect())
}

fn first_text(doc: &Html, css: &str) -> Result<Option<String>, WebError> {
    let sel = selector(css)?;
    Ok(doc
        .select(&sel)
        .next()
        .map(|el| text_of(el).trim().to_string()))
}

/// Resolve a root-relative reference (`/img/a.png`) against `base`.
pub fn resolve_root_relative(base: &Url, reference: &str) -> String {
    if reference.starts_with('/') {
        if let Ok(joined) = base.join(reference) {
            return joined.into();
        }
    }
    reference.to_string()
}

pub fn image_urls(doc: &Html, base: &Url) -> Result<Vec<String>, WebError> {
    Ok(attr_values(doc, "img[src]", "src")?
        .into_iter()
        .map(|src| resolve_root_relative(base, &src))
        .collect())
}

/// Trimmed text of the first `<title>`.
pub fn page_title(doc: &Html) -> Result<Option<String>, WebError> {
    first_text(doc, "title")
}

pub fn links(doc: &Html, base: &Url) -> Result<Vec<String>, WebError> {
    let sel = selector("a[href]")?;
    Ok(doc
        .select(&sel)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| resolve_root_relative(base, href))
        .collect())
}

pub fn paragraphs(doc: &Html) -> Result<Vec<String>, WebError> {
    texts(doc, "p")
}

/// `<meta name=… content=…>` pairs. A repeated name keeps its last content.
pub fn meta_tags(doc: &Html) -> Result<BTreeMap<String, Option<String>>, WebError> {
    let sel = selector("meta[name]")?;
    Ok(doc
        .select(&sel)
        .filter_map(|el| {
            let name = el.value().attr("name").filter(|n| !n.is_empty())?;
            Some((
                name.to_string(),
                el.value().attr("content").map(str::to_string),
            ))
        })
        .collect())
}

pub fn list_items(doc: &Html) -> Result<Vec<String>, WebError> {
    texts(doc, "li")
}

pub fn first_h1(doc: &Html) -> Result<Option<String>, WebError> {
    first_text(doc, "h1")
}

/// `src` of external scripts; inline scripts are ignored.
pub fn script_sources(doc: &Html) -> Result<Vec<String>, WebError> {
    attr_values(doc, "script[src]", "src")
}

pub fn forms(doc: &Html) -> Result<Vec<FormInfo>, WebError> {
    let form_sel = selector("form")?;
    let input_sel = selector("input")?;

    Ok(doc
        .select(&form_sel)
        .map(|form| {
            let inputs = form
                .select(&input_sel)
                .filter_map(|input| {
                    let name = input.value().attr("name")?;
                    Some((
                        name.to_string(),
                        input.value().attr("type").map(str::to_string),
                    ))
                })
                .collect();
            FormInfo {
                action: form.value().attr("action").map(str::to_string),
                method: form
                    .value()
                    .attr("method")
                    .unwrap_or("GET")
                    .to_uppercase(),
                inputs,
            }
        })
        .collect())
}

/// `href` of every `<link rel="stylesheet">`, `rel` lists included.
pub fn css_links(doc: &Html) -> Result<Vec<String>, WebError> {
    attr_values(doc, r#"link[rel~="stylesheet"][href]"#, "href")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>
     Craft   Test
  </title>
  <meta name="description" content="fixture page">
  <meta name="robots">
  <meta name="description" content="second wins">
  <meta property="og:title" content="ignored">
  <link rel="stylesheet" href="/css/site.css">
  <link rel="alternate stylesheet" href="alt.css">
  <link rel="icon" href="/favicon.ico">
  <script src="/js/app.js"></script>
  <script>var inline = true;</script>
</head>
<body>
  <h1> Main <em>heading</em> </h1>
  <h1>Second</h1>
  <p>First paragraph.</p>
  <p>Second <b>bold</b> one.</p>
  <img src="/img/logo.png">
  <img src="https://cdn.example.org/a.jpg">
  <img src="">
  <img alt="no source">
  <a href="/about">About</a>
  <a href="contact.html">Contact</a>
  <a href="https://other.example/">Other</a>
  <a name="anchor-only">x</a>
  <ul><li>one</li><li>two <i>2</i></li></ul>
  <form action="/search" method="post">
    <input name="q" type="text">
    <input name="page">
    <input type="submit">
  </form>
  <form><fieldset><input name="token" type="hidden"></fieldset></form>
</body>
</html>"#;

    fn fixture() -> (Html, Url) {
        (
            Html::parse_document(PAGE),
            Url::parse("https://example.com/docs/index.html").unwrap(),
        )
    }

    #[test]
    fn images_resolve_root_relative_sources() {
        let (doc, base) = fixture();
        assert_eq!(
            image_urls(&doc, &base).unwrap(),
            vec![
                "https://example.com/img/logo.png",
                "https://cdn.example.org/a.jpg"
            ]
        );
    }

    #[test]
    fn title_is_trimmed() {
        let (doc, _) = fixture();
        assert_eq!(
            page_title(&doc).unwrap().as_deref(),
            Some("Craft   Test")
        );
        let bare = Html::parse_document("<p>no head</p>");
        assert_eq!(page_title(&bare).unwrap(), None);
    }

    #[test]
    fn links_keep_relative_paths_that_are_not_root_relative() {
        let (doc, base) = fixture();
        assert_eq!(
            links(&doc, &base).unwrap(),
            vec![
                "https://example.com/about",
                "contact.html",
                "https://other.example/"
            ]
        );
    }

    #[test]
    fn paragraph_and_list_text_includes_nested_markup() {
        let (doc, _) = fixture();
        assert_eq!(
            paragraphs(&doc).unwrap(),
            vec!["First paragraph.", "Second bold one."]
        );
        assert_eq!(list_items(&doc).unwrap(), vec!["one", "two 2"]);
    }

    #[test]
    fn meta_tags_by_name() {
        let (doc, _) = fixture();
        let meta = meta_tags(&doc).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["description"].as_deref(), Some("second wins"));
        assert_eq!(meta["robots"], None);
    }

    #[test]
    fn first_h1_only() {
        let (doc, _) = fixture();
        assert_eq!(first_h1(&doc).unwrap().as_deref(), Some("Main heading"));
    }

    #[test]
    fn external_scripts_and_stylesheets() {
        let (doc, _) = fixture();
        assert_eq!(script_sources(&doc).unwrap(), vec!["/js/app.js"]);
        assert_eq!(css_links(&doc).unwrap(), vec!["/css/site.css", "alt.css"]);
    }

    #[test]
    fn forms_collect_named_inputs() {
        let (doc, _) = fixture();
        let forms = forms(&doc).unwrap();
        assert_eq!(forms.len(), 2);

        assert_eq!(forms[0].action.as_deref(), Some("/search"));
        assert_eq!(forms[0].method, "POST");
        assert_eq!(forms[0].inputs.len(), 2);
        assert_eq!(forms[0].inputs["q"].as_deref(), Some("text"));
        assert_eq!(forms[0].inputs["page"], None);

        assert_eq!(forms[1].action, None);
        assert_eq!(forms[1].method, "GET");
        assert_eq!(forms[1].inputs["token"].as_deref(), Some("hidden"));
    }

    #[test]
    fn protocol_relative_references_take_the_page_scheme() {
        let base = Url::parse("https://example.com/a/b").unwrap();
        assert_eq!(
            resolve_root_relative(&base, "//cdn.example.net/x.png"),
            "https://cdn.example.net/x.png"
        );
    }

    #[test]
    fn bad_selectors_are_reported() {
        assert!(matches!(
            selector("a[href"),
            Err(WebError::Selector { .. })
        ));
    }
}
