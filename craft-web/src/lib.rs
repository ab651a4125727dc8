//! Web page fetching and fragment extraction.
//!
//! - Pure HTML extraction over `scraper` documents (`extract`)
//! - Fetch-then-extract helpers sharing one HTTP client (`page`)
//! - WHOIS lookups scraped from a web front-end (`whois`)
//! - Today's Wordle answer (`wordle`)
//!
//! Each helper issues a single request and parses the response once; nothing
//! is cached between calls.

mod error;
pub mod extract;
pub mod page;
pub mod whois;
pub mod wordle;

pub use error::WebError;
pub use extract::FormInfo;
pub use page::{ImageScan, PageTools, TlsStatus};
pub use whois::WhoisClient;
pub use wordle::WordleSource;
