use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{alphanumeric1, char, multispace0, multispace1},
    combinator::{not, opt},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::{Error, Result};

type Attribute<'a> = (&'a str, Option<&'a str>);

const MARKER: &[u8] = b"<input";

/// Pulls the portal's anti-forgery token out of a login response.
///
/// Bitrix renders the token as a hidden form field
/// (`<input name="sessid" value="…">`); the portal offers no documented API
/// for it, so this is scraping by contract. Attribute order and quoting style
/// are not assumed, and tag case is ignored. An absent field means either
/// rejected credentials or a changed portal layout, which the caller cannot
/// tell apart.
pub fn extract_sessid(html: &str) -> Result<&str> {
    let mut rest = html;
    while let Some(at) = find_input_marker(rest) {
        let candidate = &rest[at..];
        match input_tag(candidate) {
            Ok((remainder, attributes)) => {
                if let Some(value) = sessid_value(&attributes) {
                    return Ok(value);
                }
                rest = remainder;
            }
            // Not a well-formed input tag; resume scanning past the marker
            Err(_) => rest = &candidate[MARKER.len()..],
        }
    }
    Err(Error::TokenMissing)
}

fn find_input_marker(haystack: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(MARKER.len())
        .position(|window| window.eq_ignore_ascii_case(MARKER))
}

fn input_tag(input: &str) -> IResult<&str, Vec<Attribute<'_>>> {
    let (input, _) = tag_no_case("<input")(input)?;
    // Reject longer tag names such as <inputgroup>
    let (input, _) = not(alphanumeric1)(input)?;
    let (input, attributes) = many0(preceded(multispace1, attribute))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(char('/'))(input)?;
    let (input, _) = char('>')(input)?;
    Ok((input, attributes))
}

fn attribute(input: &str) -> IResult<&str, Attribute<'_>> {
    let (input, name) = take_while1(is_name_char)(input)?;
    let (input, value) = opt(preceded(
        delimited(multispace0, char('='), multispace0),
        attribute_value,
    ))(input)?;
    Ok((input, (name, value)))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        take_while1(|c: char| !c.is_whitespace() && c != '>' && c != '/'),
    ))(input)
}

fn sessid_value<'a>(attributes: &[Attribute<'a>]) -> Option<&'a str> {
    let named_sessid = attributes
        .iter()
        .any(|(name, value)| name.eq_ignore_ascii_case("name") && *value == Some("sessid"));
    if !named_sessid {
        return None;
    }
    attributes.iter().find_map(|(name, value)| {
        if name.eq_ignore_ascii_case("value") {
            *value
        } else {
            None
        }
    })
}
