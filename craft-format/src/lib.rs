//! Human-readable formatting helpers shared across craft crates.
//!
//! - [`duration`]: seconds → largest-unit phrase ("3 days", "21 секунда")
//! - [`type_name`]: short type names without module paths
//!
//! Everything here is pure: no I/O, no global state.
//!
//! ```rust
//! use craft_format::{format_duration, Locale};
//!
//! assert_eq!(format_duration(90_000, Locale::En).unwrap(), "1 day");
//! assert_eq!(format_duration(3, Locale::Uk).unwrap(), "3 секунди");
//! ```

pub mod duration;
pub mod type_name;

pub use duration::{DurationFormatter, FormatError, Locale, Unit, format_duration, format_seconds};
pub use type_name::{clean_type_name, type_name_of};
