use std::collections::HashMap;

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{all_consuming, map, rest, verify},
    sequence::{delimited, separated_pair},
    IResult,
};
use thiserror::Error;

/// Parsed INI document: section name -> key -> value.
///
/// Only the subset the config file needs: `[section]` headers, `key = value`
/// pairs, blank lines, and full-line `;`/`#` comments. Values keep their inner
/// whitespace (the stock user-agent string contains spaces and semicolons),
/// and a later assignment overrides an earlier one.
#[derive(Debug, Default, PartialEq)]
pub struct Ini {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Ini {
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: expected `[section]` or `key = value`")]
pub struct IniError {
    pub line: usize,
}

pub fn parse(input: &str) -> Result<Ini, IniError> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Ok((_, name)) = section_header(line) {
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        if let Ok((_, (key, value))) = key_value(line) {
            // A pair before any [section] header has no place to live
            let section = current.as_ref().ok_or(IniError { line: index + 1 })?;
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
            continue;
        }

        return Err(IniError { line: index + 1 });
    }

    Ok(Ini { sections })
}

fn section_header(input: &str) -> IResult<&str, &str> {
    all_consuming(delimited(
        char('['),
        take_while1(|c| c != ']'),
        char(']'),
    ))(input)
}

fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(
        verify(map(take_while1(|c| c != '='), str::trim), |key: &str| {
            !key.is_empty()
        }),
        char('='),
        map(rest, str::trim),
    ))(input)
}
