use std::borrow::Cow;

use crate::ErrorKind;

/// Expand the five predefined entities and numeric character references in `raw`.
///
/// Borrows when there is nothing to expand. On failure, returns the error kind and a message
/// naming the offending reference.
pub(crate) fn decode(raw: &str) -> Result<Cow<'_, str>, (ErrorKind, String)> {
    let Some(first) = raw.find('&') else {
        return Ok(Cow::Borrowed(raw));
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut rest = &raw[first..];

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semicolon) = after.find(';') else {
            return Err((
                ErrorKind::UnterminatedEntityReference,
                "entity reference is missing its terminating `;`".to_owned(),
            ));
        };

        out.push(resolve(&after[..semicolon])?);
        rest = &after[semicolon + 1..];
    }

    out.push_str(rest);
    Ok(Cow::Owned(out))
}

/// Like [`decode`], but reuses the allocation of `raw` when there is nothing to expand.
pub(crate) fn decode_owned(raw: String) -> Result<String, (ErrorKind, String)> {
    if raw.contains('&') {
        decode(&raw).map(Cow::into_owned)
    } else {
        Ok(raw)
    }
}

fn resolve(name: &str) -> Result<char, (ErrorKind, String)> {
    match name {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => {
            if let Some(reference) = name.strip_prefix('#') {
                resolve_numeric(reference).ok_or_else(|| {
                    (
                        ErrorKind::InvalidCharacterReference,
                        format!("invalid character reference `&{};`", name),
                    )
                })
            } else {
                Err((
                    ErrorKind::UnknownEntity,
                    format!("unknown entity `&{};`", name),
                ))
            }
        }
    }
}

fn resolve_numeric(reference: &str) -> Option<char> {
    let (digits, radix) = match reference.strip_prefix('x') {
        Some(hex) => (hex, 16),
        None => (reference, 10),
    };

    // from_str_radix would also accept a leading sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let code = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(code).filter(|&c| is_xml_char(c))
}

/// The `Char` production of XML 1.0. Surrogates are already excluded by `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}
