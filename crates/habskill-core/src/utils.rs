/*!
 * Utility functions and helpers for habskill.
 *
 * This module provides version comparison, numeric and string helpers used by
 * the mapping engine, and the compressed JSON transport used by endpoint cookies.
 */
use std::cmp::Ordering;
use std::io::{Read, Write};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde_json::Value;

use crate::error::{Error, Result};

/// Compare two dotted numeric versions
///
/// Only the leading components both versions share are compared, so `"3"`
/// equals `"3.1.0"`.
///
/// # Arguments
///
/// * `a` - The first version
/// * `b` - The second version
///
/// # Returns
///
/// The ordering of `a` relative to `b`, or an error if either version is not numeric
pub fn compare_version(a: &str, b: &str) -> Result<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;

    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            ordering => return Ok(ordering),
        }
    }

    Ok(Ordering::Equal)
}

fn parse_version(version: &str) -> Result<Vec<u64>> {
    version
        .trim()
        .split('.')
        .map(|part| {
            // Drop qualifiers such as "4.2.0-SNAPSHOT" or "M1"
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits
                .parse::<u64>()
                .map_err(|_| Error::other("Invalid formatted version"))
        })
        .collect()
}

/// Clamp a value between a minimum and a maximum
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Replace punctuation with spaces and collapse whitespace
///
/// Apostrophes are kept so possessive names stay intact.
pub fn strip_punctuation(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_punctuation() && c != '\'' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a camel case identifier into lower case words
///
/// # Arguments
///
/// * `s` - The identifier (e.g. "toggleState")
/// * `separator` - The separator inserted between words (e.g. "_" or " ")
pub fn decamelize(s: &str, separator: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut previous: Option<char> = None;

    for c in s.chars() {
        if c.is_uppercase() {
            if let Some(p) = previous {
                if p.is_lowercase() || p.is_ascii_digit() {
                    result.push_str(separator);
                }
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
        previous = Some(c);
    }

    result
}

/// Format a number for a backend command, without trailing zeros
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Compress a JSON value into a url-safe string
pub fn compress_json(value: &Value) -> Result<String> {
    let json = serde_json::to_vec(value)?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decompress a string produced by [`compress_json`]
///
/// Plain JSON strings are parsed as is.
pub fn decompress_json(s: &str) -> Result<Value> {
    let trimmed = s.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let compressed = URL_SAFE_NO_PAD
        .decode(s.trim())
        .map_err(|e| Error::codec(format!("Invalid base64 data: {}", e)))?;

    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| Error::codec(format!("Invalid compressed data: {}", e)))?;

    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_version() {
        assert_eq!(compare_version("3.1.0", "3.1.0").unwrap(), Ordering::Equal);
        assert_eq!(compare_version("3", "3.1.0").unwrap(), Ordering::Equal);
        assert_eq!(compare_version("3.1.0", "3.2.0").unwrap(), Ordering::Less);
        assert_eq!(compare_version("3.1.0", "3.0.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_version("4.2.0-SNAPSHOT", "4.2.0").unwrap(), Ordering::Equal);
        assert!(compare_version("foo", "bar").is_err());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(42, 0, 100), 42);
        assert_eq!(clamp(-42, 0, 100), 0);
        assert_eq!(clamp(142.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("foo bar"), "foo bar");
        assert_eq!(strip_punctuation("foo_bar"), "foo bar");
        assert_eq!(strip_punctuation("[ foo | bar ]"), "foo bar");
        assert_eq!(strip_punctuation("Kid's Room"), "Kid's Room");
    }

    #[test]
    fn test_decamelize() {
        assert_eq!(decamelize("fooBar", "_"), "foo_bar");
        assert_eq!(decamelize("FooBar", " "), "foo bar");
        assert_eq!(decamelize("toggleState", " "), "toggle state");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(21.5), "21.5");
        assert_eq!(format_number(-10.0), "-10");
    }

    #[test]
    fn test_compress_json() -> Result<()> {
        let value = json!({"foo": 1, "bar": 2});

        let compressed = compress_json(&value)?;
        assert!(!compressed.contains('='));
        assert_eq!(decompress_json(&compressed)?, value);

        assert_eq!(decompress_json(&value.to_string())?, value);
        assert!(decompress_json("not compressed").is_err());
        Ok(())
    }
}
