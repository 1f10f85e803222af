use std::fmt;

use crate::Position;

macro_rules! impl_error {
    ($(
        $string:literal <=> $variant:ident,
    )*) => {
        /// All kinds of well-formedness errors this tokenizer can raise.
        #[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
        pub enum ErrorKind {
            $(
                #[doc = concat!("This error corresponds to the `", $string, "` error code.")]
                $variant
            ),*
        }

        impl std::str::FromStr for ErrorKind {
            type Err = ();

            /// Parse a `kebap-case` error code into an enum variant.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $string => Ok(Self::$variant), )*
                    _ => Err(())
                }
            }
        }

        impl ErrorKind {
            /// Convert an enum variant back into its `kebap-case` error code.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match *self {
                    $( Self::$variant => $string, )*
                }
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    /// Convert an enum variant back into its `kebap-case` error code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl_error! {
    "invalid-character-before-document" <=> InvalidCharacterBeforeDocument,
    "text-outside-root-element" <=> TextOutsideRootElement,
    "invalid-first-character-of-tag-name" <=> InvalidFirstCharacterOfTagName,
    "invalid-character-in-name" <=> InvalidCharacterInName,
    "unexpected-character-in-tag" <=> UnexpectedCharacterInTag,
    "missing-equals-after-attribute-name" <=> MissingEqualsAfterAttributeName,
    "unquoted-attribute-value" <=> UnquotedAttributeValue,
    "less-than-in-attribute-value" <=> LessThanInAttributeValue,
    "missing-whitespace-between-attributes" <=> MissingWhitespaceBetweenAttributes,
    "duplicate-attribute" <=> DuplicateAttribute,
    "unexpected-end-tag" <=> UnexpectedEndTag,
    "mismatched-end-tag" <=> MismatchedEndTag,
    "unbound-namespace-prefix" <=> UnboundNamespacePrefix,
    "invalid-qualified-name" <=> InvalidQualifiedName,
    "invalid-namespace-declaration" <=> InvalidNamespaceDeclaration,
    "unknown-entity" <=> UnknownEntity,
    "invalid-character-reference" <=> InvalidCharacterReference,
    "unterminated-entity-reference" <=> UnterminatedEntityReference,
    "double-hyphen-in-comment" <=> DoubleHyphenInComment,
    "missing-processing-instruction-target" <=> MissingProcessingInstructionTarget,
    "malformed-declaration" <=> MalformedDeclaration,
    "cdata-outside-root-element" <=> CdataOutsideRootElement,
    "cdata-end-in-text" <=> CdataEndInText,
    "misplaced-doctype" <=> MisplacedDoctype,
    "content-after-root-element" <=> ContentAfterRootElement,
    "no-root-element" <=> NoRootElement,
    "unexpected-end-of-input" <=> UnexpectedEndOfInput,
}

/// A structural error, raised at most once per document.
///
/// Once a tokenizer produced an error, it is dead: it will not produce any further events.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct XmlParseError {
    /// Machine-readable error code.
    pub kind: ErrorKind,
    /// Human-readable description, including the offending names where available.
    pub message: String,
    /// Where in the input the error was detected.
    pub position: Position,
}

impl XmlParseError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        XmlParseError {
            kind,
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for XmlParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.position.line, self.position.column
        )
    }
}

impl std::error::Error for XmlParseError {}

#[test]
fn test_error_codes_roundtrip() {
    for code in ["mismatched-end-tag", "unknown-entity", "no-root-element"] {
        let kind: ErrorKind = code.parse().unwrap();
        assert_eq!(kind.as_str(), code);
        assert_eq!(kind.to_string(), code);
    }

    assert!("not-an-error".parse::<ErrorKind>().is_err());
}

#[test]
fn test_display() {
    let error = XmlParseError::new(
        ErrorKind::MismatchedEndTag,
        "expected </a>, found </b>",
        Position { line: 2, column: 7 },
    );
    assert_eq!(
        error.to_string(),
        "expected </a>, found </b> at line 2, column 7"
    );
}
