//! Multi-format date normalisation.
//!
//! A raw string is tried against an ordered list of `strftime`-style formats and the first
//! successful parse wins. No later format is consulted once one has matched, so ambiguous
//! day/month pairs (both segments <= 12) resolve purely by list order.
//!
//! Two lists are in use:
//! - [`EXTRACTION_DATE_FORMATS`] when a record is first parsed.
//! - [`RENORMALISATION_DATE_FORMATS`] when an existing artifact is revisited.
//!
//! Parsing is strict: before chrono sees the input, its shape must line up with the format
//! exactly. `%Y` takes exactly four digits, `%m` and `%d` take one or two, month names take a
//! run of letters, a space takes at least one whitespace character, and every other character
//! must appear literally. No leading whitespace or signs are accepted.
//!
//! Normalisation never fails. Anything that does not parse comes back unchanged.

use chrono::NaiveDate;
use serde_json::Value;

use crate::constants::{
    EXTRACTION_DATE_FORMATS, ISO_DATE_FORMAT, READABLE_DATE_FORMAT, RENORMALISATION_DATE_FORMATS,
};

/// A calendar date recovered from free text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedDate {
    date: NaiveDate,
}

impl ParsedDate {
    /// `YYYY-MM-DD` rendering.
    pub fn iso(&self) -> String {
        self.date.format(ISO_DATE_FORMAT).to_string()
    }

    /// Long-form rendering with the full month name, e.g. `March 07, 1985`.
    pub fn readable(&self) -> String {
        self.date.format(READABLE_DATE_FORMAT).to_string()
    }
}

/// Tries each format in order and returns the first successful parse.
pub fn parse_first_match(raw: &str, formats: &[&str]) -> Option<ParsedDate> {
    formats.iter().find_map(|format| {
        matches_shape(raw, format)?;
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .map(|date| ParsedDate { date })
    })
}

/// Checks that `raw` has exactly the layout `format` describes.
fn matches_shape(raw: &str, format: &str) -> Option<()> {
    let mut rest = raw;
    let mut directives = format.chars();

    while let Some(c) = directives.next() {
        rest = match c {
            '%' => match directives.next()? {
                'Y' => take_digits(rest, 4, 4)?,
                'm' | 'd' => take_digits(rest, 1, 2)?,
                'B' | 'b' => take_while_min(rest, 1, |ch| ch.is_ascii_alphabetic())?,
                _ => return None,
            },
            c if c.is_whitespace() => take_while_min(rest, 1, char::is_whitespace)?,
            c => rest.strip_prefix(c)?,
        };
    }

    rest.is_empty().then_some(())
}

fn take_digits(input: &str, min: usize, max: usize) -> Option<&str> {
    let count = input.bytes().take_while(u8::is_ascii_digit).count();
    (min..=max).contains(&count).then(|| &input[count..])
}

fn take_while_min(input: &str, min: usize, pred: impl Fn(char) -> bool) -> Option<&str> {
    let end = input
        .char_indices()
        .find(|&(_, ch)| !pred(ch))
        .map_or(input.len(), |(i, _)| i);
    (input[..end].chars().count() >= min).then(|| &input[end..])
}

/// Parses a date found in a record, month/day first with day/month as the fallback.
///
/// Surrounding whitespace is ignored.
pub fn parse_extraction_date(raw: &str) -> Option<ParsedDate> {
    parse_first_match(raw.trim(), EXTRACTION_DATE_FORMATS)
}

/// Returns `value` as `YYYY-MM-DD` if any of `formats` parses it, otherwise `value` unchanged.
pub fn normalise_date(value: &str, formats: &[&str]) -> String {
    match parse_first_match(value, formats) {
        Some(parsed) => parsed.iso(),
        None => value.to_string(),
    }
}

/// Re-normalises a JSON value taken from an artifact.
///
/// Strings are run through [`RENORMALISATION_DATE_FORMATS`]. Every other JSON type is returned
/// as-is.
pub fn renormalise_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(normalise_date(text, RENORMALISATION_DATE_FORMATS)),
        other => other.clone(),
    }
}
