mod common;

use craft_http::HttpClient;
use craft_web::{WebError, WhoisClient, WordleSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WHOIS_PAGE: &str = "<html><body><h1>192.0.2.1</h1><pre>
NetRange:       192.0.2.0 - 192.0.2.255
NetName:        TEST-NET-1
Comment:        Documentation only
</pre><pre>second block ignored</pre></body></html>";

#[tokio::test]
async fn whois_lookup_parses_the_first_pre_block() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whois-ip/ip-address/192.0.2.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WHOIS_PAGE))
        .mount(&server)
        .await;

    let base = format!("{}/whois-ip/ip-address", server.uri());
    let client = WhoisClient::new(HttpClient::new().unwrap(), &base).unwrap();
    let record = client.lookup("192.0.2.1").await.unwrap();

    assert_eq!(record["NetRange"], "192.0.2.0 - 192.0.2.255");
    assert_eq!(record["NetName"], "TEST-NET-1");
    assert!(!record.contains_key("Comment"));
}

#[tokio::test]
async fn whois_without_pre_is_missing_element() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>rate limited</p>"))
        .mount(&server)
        .await;

    let client = WhoisClient::new(HttpClient::new().unwrap(), &server.uri()).unwrap();
    assert!(matches!(
        client.lookup("192.0.2.1").await,
        Err(WebError::MissingElement(_))
    ));
}

#[tokio::test]
async fn wordle_answer_comes_from_the_indexed_strong() {
    common::init_test_tracing();
    let strongs: String = ["Intro", "Hint", "Vowels", "Letter", "Clue", "Spoiler", "Ready?", "Crane."]
        .iter()
        .map(|s| format!("<p><strong>{s}</strong></p>"))
        .collect();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wordle"))
        .respond_with(ResponseTemplate::new(200).set_body_string(strongs))
        .mount(&server)
        .await;

    let source = WordleSource::new(HttpClient::new().unwrap(), format!("{}/wordle", server.uri()), 7);
    assert_eq!(source.answer().await.unwrap(), "CRANE");
}
