//! Largest-unit duration phrases with per-locale pluralization.
//!
//! Only the single largest unit that fits is reported: 90 000 seconds is
//! `"1 day"`, not `"1 day 1 hour"`. Units have fixed lengths (a month is 30
//! days, a year 365) and know nothing about calendars.
//!
//! ```rust
//! use craft_format::{DurationFormatter, FormatError, Locale};
//!
//! let strict = DurationFormatter::new();
//! assert_eq!(strict.format(3661, "en").unwrap(), "1 hour");
//! assert!(matches!(strict.format(60, "fr"), Err(FormatError::UnsupportedLocale(_))));
//!
//! let lenient = DurationFormatter::new().with_fallback(Locale::En);
//! assert_eq!(lenient.format(120, "fr").unwrap(), "2 minutes");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Durations are counted forward only.
    #[error("invalid input: {0} seconds (expected a non-negative count)")]
    InvalidInput(i64),
    #[error("unsupported locale {0:?} (expected \"en\" or \"uk\")")]
    UnsupportedLocale(String),
}

/// Output language for duration phrases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Uk,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Uk];

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Uk => "uk",
        }
    }

    /// Parse `tag`, substituting `fallback` when the tag is not recognised.
    ///
    /// Without a fallback an unknown tag is an error.
    pub fn parse_or(tag: &str, fallback: Option<Locale>) -> Result<Locale, FormatError> {
        match (tag.parse::<Locale>(), fallback) {
            (Ok(locale), _) => Ok(locale),
            (Err(_), Some(fallback)) => Ok(fallback),
            (Err(err), None) => Err(err),
        }
    }

    fn category(self, count: u64) -> PluralCategory {
        match self {
            Locale::En if count == 1 => PluralCategory::One,
            Locale::En => PluralCategory::Many,
            Locale::Uk => slavic_category(count),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = FormatError;

    /// Tags are matched exactly: `"UK"` and `" uk "` are not locales.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag() == s)
            .ok_or_else(|| FormatError::UnsupportedLocale(s.to_string()))
    }
}

/// Grammatical number; indexes the (singular, plural-small, plural-large) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PluralCategory {
    One,
    Few,
    Many,
}

// 11..=19 take the plural-large form whatever their last digit is.
fn slavic_category(count: u64) -> PluralCategory {
    if (11..=19).contains(&(count % 100)) {
        return PluralCategory::Many;
    }
    match count % 10 {
        1 => PluralCategory::One,
        2..=4 => PluralCategory::Few,
        _ => PluralCategory::Many,
    }
}

/// A fixed-length time granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Longest first; this is the search order of the formatter.
    pub const DESCENDING: [Unit; 7] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
    ];

    pub const fn seconds(self) -> u64 {
        match self {
            Unit::Second => 1,
            Unit::Minute => 60,
            Unit::Hour => 60 * 60,
            Unit::Day => 24 * 60 * 60,
            Unit::Week => 7 * 24 * 60 * 60,
            Unit::Month => 30 * 24 * 60 * 60,
            Unit::Year => 365 * 24 * 60 * 60,
        }
    }

    /// The longest unit that fits in `seconds`, or `None` below one second.
    pub fn largest_within(seconds: u64) -> Option<Unit> {
        Self::DESCENDING
            .into_iter()
            .find(|unit| unit.seconds() <= seconds)
    }

    /// Word forms in (singular, plural-small, plural-large) order.
    pub fn forms(self, locale: Locale) -> [&'static str; 3] {
        match (locale, self) {
            (Locale::En, Unit::Second) => ["second", "seconds", "seconds"],
            (Locale::En, Unit::Minute) => ["minute", "minutes", "minutes"],
            (Locale::En, Unit::Hour) => ["hour", "hours", "hours"],
            (Locale::En, Unit::Day) => ["day", "days", "days"],
            (Locale::En, Unit::Week) => ["week", "weeks", "weeks"],
            (Locale::En, Unit::Month) => ["month", "months", "months"],
            (Locale::En, Unit::Year) => ["year", "years", "years"],
            (Locale::Uk, Unit::Second) => ["секунда", "секунди", "секунд"],
            (Locale::Uk, Unit::Minute) => ["хвилина", "хвилини", "хвилин"],
            (Locale::Uk, Unit::Hour) => ["година", "години", "годин"],
            (Locale::Uk, Unit::Day) => ["день", "дня", "днів"],
            (Locale::Uk, Unit::Week) => ["тиждень", "тижня", "тижнів"],
            (Locale::Uk, Unit::Month) => ["місяць", "місяця", "місяців"],
            (Locale::Uk, Unit::Year) => ["рік", "роки", "років"],
        }
    }

    /// The form of this unit's name that agrees with `count`.
    pub fn word(self, locale: Locale, count: u64) -> &'static str {
        let [one, few, many] = self.forms(locale);
        match locale.category(count) {
            PluralCategory::One => one,
            PluralCategory::Few => few,
            PluralCategory::Many => many,
        }
    }
}

/// Format an unsigned count of seconds. Zero renders as "0 seconds".
pub fn format_seconds(seconds: u64, locale: Locale) -> String {
    let Some(unit) = Unit::largest_within(seconds) else {
        return format!("0 {}", Unit::Second.word(locale, 0));
    };
    let count = seconds / unit.seconds();
    format!("{count} {}", unit.word(locale, count))
}

/// Format a signed count of seconds, rejecting negatives.
pub fn format_duration(seconds: i64, locale: Locale) -> Result<String, FormatError> {
    let secs = u64::try_from(seconds).map_err(|_| FormatError::InvalidInput(seconds))?;
    Ok(format_seconds(secs, locale))
}

/// Formats durations for locale *tags* such as `"en"` or `"uk"`.
///
/// Holds nothing but the optional fallback locale, so it is `Copy` and can be
/// shared freely. Unknown tags are rejected unless a fallback was set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationFormatter {
    fallback: Option<Locale>,
}

impl DurationFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `locale` whenever a tag is not recognised.
    pub fn with_fallback(mut self, locale: Locale) -> Self {
        self.fallback = Some(locale);
        self
    }

    pub fn fallback(&self) -> Option<Locale> {
        self.fallback
    }

    pub fn locale(&self, tag: &str) -> Result<Locale, FormatError> {
        Locale::parse_or(tag, self.fallback)
    }

    pub fn format(&self, seconds: i64, tag: &str) -> Result<String, FormatError> {
        format_duration(seconds, self.locale(tag)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(n: i64) -> String {
        format_duration(n, Locale::En).unwrap()
    }

    fn uk(n: i64) -> String {
        format_duration(n, Locale::Uk).unwrap()
    }

    /// Split a phrase back into its count and the unit its word belongs to.
    fn reparse(phrase: &str, locale: Locale) -> (u64, Unit) {
        let (count, word) = phrase.split_once(' ').expect("count and word");
        let unit = Unit::DESCENDING
            .into_iter()
            .find(|u| u.forms(locale).contains(&word))
            .unwrap_or_else(|| panic!("unknown unit word {word:?}"));
        (count.parse().expect("leading integer"), unit)
    }

    #[test]
    fn english_basics() {
        assert_eq!(en(1), "1 second");
        assert_eq!(en(59), "59 seconds");
        assert_eq!(en(60), "1 minute");
        assert_eq!(en(3661), "1 hour");
        assert_eq!(en(90_000), "1 day");
    }

    #[test]
    fn english_only_exact_one_is_singular() {
        assert_eq!(en(21), "21 seconds");
        assert_eq!(en(11), "11 seconds");
        assert_eq!(en(2 * 60), "2 minutes");
        assert_eq!(en(101 * 365 * 24 * 3600), "101 years");
    }

    #[test]
    fn ukrainian_seconds() {
        assert_eq!(uk(1), "1 секунда");
        assert_eq!(uk(2), "2 секунди");
        assert_eq!(uk(4), "4 секунди");
        assert_eq!(uk(5), "5 секунд");
        assert_eq!(uk(11), "11 секунд");
        assert_eq!(uk(12), "12 секунд");
        assert_eq!(uk(14), "14 секунд");
        assert_eq!(uk(21), "21 секунда");
        assert_eq!(uk(22), "22 секунди");
        assert_eq!(uk(25), "25 секунд");
    }

    #[test]
    fn ukrainian_teens_override_last_digit_past_one_hundred() {
        let year = Unit::Year.seconds() as i64;
        assert_eq!(uk(101 * year), "101 рік");
        assert_eq!(uk(111 * year), "111 років");
        assert_eq!(uk(112 * year), "112 років");
        assert_eq!(uk(122 * year), "122 роки");
    }

    #[test]
    fn ukrainian_other_units() {
        assert_eq!(uk(60), "1 хвилина");
        assert_eq!(uk(3 * 3600), "3 години");
        assert_eq!(uk(6 * 86_400), "6 днів");
        assert_eq!(uk(2 * 86_400), "2 дня");
        assert_eq!(uk(7 * 86_400), "1 тиждень");
        assert_eq!(uk(30 * 86_400), "1 місяць");
        assert_eq!(uk(111 * 86_400), "3 місяця");
        assert_eq!(uk(365 * 86_400), "1 рік");
    }

    #[test]
    fn zero_is_zero_seconds() {
        assert_eq!(en(0), "0 seconds");
        assert_eq!(uk(0), "0 секунд");
    }

    #[test]
    fn negative_input_is_rejected() {
        assert_eq!(
            format_duration(-1, Locale::En),
            Err(FormatError::InvalidInput(-1))
        );
        assert_eq!(
            format_duration(i64::MIN, Locale::Uk),
            Err(FormatError::InvalidInput(i64::MIN))
        );
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(en(3599), "59 minutes");
        assert_eq!(en(3600), "1 hour");
        assert_eq!(en(86_399), "23 hours");
        assert_eq!(en(6 * 86_400 + 86_399), "6 days");
        assert_eq!(en(29 * 86_400), "4 weeks");
        assert_eq!(en(364 * 86_400), "12 months");
        assert_eq!(en(365 * 86_400), "1 year");
    }

    #[test]
    fn locale_tags() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("uk".parse::<Locale>(), Ok(Locale::Uk));
        for tag in ["UK", "EN", " uk ", "uk-UA", ""] {
            assert_eq!(
                tag.parse::<Locale>(),
                Err(FormatError::UnsupportedLocale(tag.into()))
            );
        }
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(FormatError::UnsupportedLocale("fr".into()))
        );
        assert_eq!(Locale::Uk.to_string(), "uk");
    }

    #[test]
    fn fallback_is_opt_in() {
        let strict = DurationFormatter::new();
        assert_eq!(
            strict.format(5, "de"),
            Err(FormatError::UnsupportedLocale("de".into()))
        );

        assert_eq!(
            strict.format(5, "UK"),
            Err(FormatError::UnsupportedLocale("UK".into()))
        );

        let lenient = DurationFormatter::new().with_fallback(Locale::Uk);
        assert_eq!(lenient.format(5, "EN").unwrap(), "5 секунд");
        assert_eq!(lenient.format(5, "de").unwrap(), "5 секунд");
        assert_eq!(lenient.format(5, "en").unwrap(), "5 seconds");
        assert_eq!(lenient.format(-5, "de"), Err(FormatError::InvalidInput(-5)));
    }

    #[test]
    fn picks_the_largest_fitting_unit() {
        let samples = (1..=20_000u64)
            .chain(Unit::DESCENDING.iter().flat_map(|u| {
                let s = u.seconds();
                [s - 1, s, s + 1, 2 * s - 1, 2 * s, 13 * s, 1000 * s]
            }))
            .filter(|n| *n > 0);

        for n in samples {
            let unit = Unit::largest_within(n).unwrap();
            assert!(unit.seconds() <= n);
            for larger in Unit::DESCENDING.iter().filter(|u| u.seconds() > unit.seconds()) {
                assert!(larger.seconds() > n, "{larger:?} also fits {n}");
            }
        }
    }

    #[test]
    fn reparsed_count_matches_recomputation() {
        let samples = (1..=5_000u64)
            .chain((1..=400).map(|k| k * 7919))
            .chain((1..=60).map(|k| k * Unit::Month.seconds() + k));

        for locale in Locale::ALL {
            for n in samples.clone() {
                let phrase = format_seconds(n, locale);
                let (count, unit) = reparse(&phrase, locale);
                assert_eq!(unit, Unit::largest_within(n).unwrap(), "{phrase}");
                assert_eq!(count, n / unit.seconds(), "{phrase}");
                assert!(count >= 1);
            }
        }
    }

    #[test]
    fn english_slots_agree_with_two_way_rule() {
        for unit in Unit::DESCENDING {
            let [one, few, many] = unit.forms(Locale::En);
            assert_eq!(few, many);
            assert_eq!(unit.word(Locale::En, 1), one);
            assert_eq!(unit.word(Locale::En, 2), many);
        }
    }
}
