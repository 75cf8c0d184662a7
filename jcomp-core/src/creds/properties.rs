//! Reader for `.properties` style key/value files.
//!
//! Supports the subset of the format that credential files use in practice:
//! `key=value`, `key: value` and `key value` entries, `#`/`!` comment lines,
//! backslash line continuations, and backslash escapes including `\uXXXX`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read and parse a properties file.
pub fn read_properties_file(path: &Path) -> Result<HashMap<String, String>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  parse_properties(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse properties content into a map. Later entries win over earlier ones.
///
/// Values keep trailing whitespace, as `java.util.Properties` does.
pub fn parse_properties(content: &str) -> Result<HashMap<String, String>> {
  let mut props = HashMap::new();
  let mut logical = String::new();

  for raw in content.lines() {
    let line = raw.trim_start();
    if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
      continue;
    }

    if has_continuation(line) {
      logical.push_str(&line[..line.len() - 1]);
      continue;
    }

    logical.push_str(line);
    let (key, value) = split_entry(&logical)?;
    props.insert(key, value);
    logical.clear();
  }

  // A continuation on the last line still terminates the entry
  if !logical.is_empty() {
    let (key, value) = split_entry(&logical)?;
    props.insert(key, value);
  }

  Ok(props)
}

fn has_continuation(line: &str) -> bool {
  let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
  trailing % 2 == 1
}

fn split_entry(line: &str) -> Result<(String, String)> {
  let mut escaped = false;
  let mut split_at = None;

  for (idx, ch) in line.char_indices() {
    if escaped {
      escaped = false;
      continue;
    }
    match ch {
      '\\' => escaped = true,
      '=' | ':' => {
        split_at = Some((idx, 1, true));
        break;
      }
      c if c.is_whitespace() => {
        split_at = Some((idx, c.len_utf8(), false));
        break;
      }
      _ => {}
    }
  }

  let Some((idx, width, explicit_separator)) = split_at else {
    return Ok((unescape(line)?, String::new()));
  };

  let key = unescape(&line[..idx])?;
  let mut rest = line[idx + width..].trim_start();
  if !explicit_separator && (rest.starts_with('=') || rest.starts_with(':')) {
    rest = rest[1..].trim_start();
  }

  Ok((key, unescape(rest)?))
}

fn unescape(input: &str) -> Result<String> {
  let mut out = String::with_capacity(input.len());
  // UTF-16 units from consecutive \uXXXX escapes, so surrogate pairs combine
  let mut units: Vec<u16> = Vec::new();
  let mut chars = input.chars();

  while let Some(ch) = chars.next() {
    if ch != '\\' {
      flush_units(&mut units, &mut out);
      out.push(ch);
      continue;
    }
    match chars.next() {
      Some('u') => {
        let hex: String = chars.by_ref().take(4).collect();
        let unit = (hex.len() == 4)
          .then(|| u16::from_str_radix(&hex, 16).ok())
          .flatten()
          .with_context(|| format!("Malformed \\uxxxx escape '\\u{hex}'"))?;
        units.push(unit);
        continue;
      }
      Some('t') => {
        flush_units(&mut units, &mut out);
        out.push('\t');
      }
      Some('n') => {
        flush_units(&mut units, &mut out);
        out.push('\n');
      }
      Some('r') => {
        flush_units(&mut units, &mut out);
        out.push('\r');
      }
      Some('f') => {
        flush_units(&mut units, &mut out);
        out.push('\u{0c}');
      }
      Some(other) => {
        flush_units(&mut units, &mut out);
        out.push(other);
      }
      None => {}
    }
  }
  flush_units(&mut units, &mut out);

  Ok(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String) {
  if units.is_empty() {
    return;
  }
  out.extend(char::decode_utf16(units.drain(..)).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)));
}
