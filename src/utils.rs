/// Whitespace as defined by the `S` production of XML 1.0.
#[inline]
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// The `NameStartChar` production of XML 1.0 (fifth edition).
#[inline]
pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

/// The `NameChar` production of XML 1.0 (fifth edition).
#[inline]
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Find the next character that ends a run of plain attribute value characters: the closing
/// quote, a forbidden `<`, or whitespace that needs normalizing.
#[cfg(feature = "jetscii")]
#[inline]
pub(crate) fn find_attribute_value_delimiter(haystack: &str, quote: char) -> Option<usize> {
    if quote == '"' {
        jetscii::ascii_chars!('"', '<', '\t', '\n', '\r').find(haystack)
    } else {
        jetscii::ascii_chars!('\'', '<', '\t', '\n', '\r').find(haystack)
    }
}

#[cfg(not(feature = "jetscii"))]
#[inline]
pub(crate) fn find_attribute_value_delimiter(haystack: &str, quote: char) -> Option<usize> {
    haystack.find(|c: char| c == quote || matches!(c, '<' | '\t' | '\n' | '\r'))
}

// having this be a macro is performance critical. rustc appears to be unable to optimize away code
// like this:
//
// ```rust
// fn noop(s: &str) {}
//
// noop(&format!("foo"));
// ```
//
// format!() + its string allocation still exists in resulting code
macro_rules! trace_log {
    ($($tt:tt)*) => {{
        #[cfg(debug_assertions)]
        crate::testutils::trace_log(&format!($($tt)*));
    }};
}

pub(crate) use trace_log;

#[test]
fn test_name_chars() {
    assert!(is_name_start_char('a'));
    assert!(is_name_start_char('_'));
    assert!(is_name_start_char('é'));
    assert!(!is_name_start_char('1'));
    assert!(!is_name_start_char('-'));
    assert!(is_name_char('1'));
    assert!(is_name_char('-'));
    assert!(is_name_char('.'));
    assert!(!is_name_char(' '));
    assert!(!is_name_char('>'));
    assert!(!is_name_char('/'));
    assert!(!is_name_char('='));
}

#[test]
fn test_find_attribute_value_delimiter() {
    assert_eq!(find_attribute_value_delimiter("abc\"def", '"'), Some(3));
    assert_eq!(find_attribute_value_delimiter("ab'c\"d", '"'), Some(4));
    assert_eq!(find_attribute_value_delimiter("ab\"c'd", '\''), Some(4));
    assert_eq!(find_attribute_value_delimiter("a\nb", '\''), Some(1));
    assert_eq!(find_attribute_value_delimiter("a<b", '"'), Some(1));
    assert_eq!(find_attribute_value_delimiter("plain", '"'), None);
}
