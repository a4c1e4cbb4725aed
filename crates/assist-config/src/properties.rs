//! Parser for Java-style `.properties` files (`gradle.properties`,
//! `local.properties`).
//!
//! Supported syntax: `#`/`!` comment lines, `=`, `:` or whitespace
//! separators, backslash line continuations, and the `\t \n \r \f \uXXXX`
//! escapes. Later entries override earlier ones.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

const WHITESPACE: [char; 3] = [' ', '\t', '\u{c}'];

/// A syntax error inside a properties document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct PropertiesError {
    /// 1-based line on which the offending logical entry starts.
    pub line: usize,
    pub message: String,
}

/// Parsed key/value entries of a properties document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parse properties from a string.
    ///
    /// # Errors
    /// Returns an error for a malformed `\u` escape.
    pub fn parse(content: &str) -> Result<Self, PropertiesError> {
        let mut entries = BTreeMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line = index.saturating_add(1);
            let trimmed = raw.trim_start_matches(WHITESPACE);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_owned();
            while has_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            entries.insert(unescape(key, line)?, unescape(value, line)?);
        }

        Ok(Self { entries })
    }

    /// Read and parse a properties file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = assist_util::fs::read_file(path)?;
        Self::parse(&content).map_err(|source| ConfigError::Properties {
            path: path.display().to_string(),
            source,
        })
    }

    /// Like [`Properties::from_path`], but an absent file yields `None`.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is malformed.
    pub fn from_path_if_exists(path: &Path) -> Result<Option<Self>, ConfigError> {
        let Some(content) = assist_util::fs::read_file_if_present(path)? else {
            return Ok(None);
        };
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::Properties {
                path: path.display().to_string(),
                source,
            })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_entries(self) -> BTreeMap<String, String> {
        self.entries
    }
}

/// An odd number of trailing backslashes continues the entry on the next line.
fn has_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = line.get(..key_end).unwrap_or(line);
    let mut value = line.get(key_end..).unwrap_or("").trim_start_matches(WHITESPACE);
    if let Some(rest) = value.strip_prefix(['=', ':']) {
        value = rest.trim_start_matches(WHITESPACE);
    }
    (key, value)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                let Some(ch) = decoded else {
                    return Err(PropertiesError {
                        line,
                        message: format!("malformed \\u escape \"\\u{hex}\""),
                    });
                };
                out.push(ch);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
