use std::rc::Rc;

use crate::XmlParseError;

/// An attribute of a start tag, after entity decoding and namespace resolution.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    /// Qualified name as written, for example `xlink:href`.
    pub name: String,
    /// Decoded value.
    pub value: String,
    /// The part before the colon, if any.
    pub prefix: Option<String>,
    /// The part after the colon, or the whole name.
    pub local_name: String,
    /// The namespace the prefix resolved to. Unprefixed attributes have no namespace.
    pub namespace_uri: Option<String>,
}

/// The attributes of a start tag, in document order.
///
/// Names are unique within one tag; the tokenizer rejects duplicates.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Look up an attribute by its qualified name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|attr| attr.name == name)
    }

    /// Look up an attribute by namespace URI and local name.
    pub fn get_ns(&self, namespace_uri: &str, local_name: &str) -> Option<&Attribute> {
        self.0.iter().find(|attr| {
            attr.local_name == local_name && attr.namespace_uri.as_deref() == Some(namespace_uri)
        })
    }

    /// Iterate over attributes in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tag had no attributes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, attr: Attribute) {
        self.0.push(attr);
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A fully parsed start tag.
///
/// The same value (the same [`Rc`]) is reported by the `start_element` event and by the matching
/// `end_element` event.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementInfo {
    /// Qualified name as written, for example `svg:rect`.
    // serialized events use `name` for the event name
    #[cfg_attr(feature = "serde", serde(rename = "qname"))]
    pub name: String,
    /// The part before the colon, if any.
    pub prefix: Option<String>,
    /// The part after the colon, or the whole name.
    pub local_name: String,
    /// The namespace the element is in, if any.
    pub namespace_uri: Option<String>,
    /// All attributes, including namespace declarations.
    pub attributes: Attributes,
}

/// Payload of [`Event::Text`].
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Text {
    /// The text. Entities are decoded unless this came from a CDATA section.
    pub content: String,
    /// The innermost open element.
    pub element: Option<Rc<ElementInfo>>,
    /// Whether this text is the content of a `<![CDATA[...]]>` section.
    pub cdata: bool,
}

/// Payload of [`Event::StartPrefixMapping`] and [`Event::EndPrefixMapping`].
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PrefixMapping {
    /// The declared prefix. Empty for the default namespace (`xmlns="..."`).
    pub prefix: String,
    /// The namespace URI bound to the prefix.
    pub uri: String,
}

/// A parse notification, in document order.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "name", rename_all = "snake_case"))]
pub enum Event {
    /// Always the first event of a document.
    StartDocument,
    /// `<?target data?>`, with everything between `<?` and `?>` as text.
    ProcessingInstruction {
        /// Body of the processing instruction.
        text: String,
    },
    /// A `<!...>` declaration that is not a comment, CDATA section or doctype.
    SgmlDeclaration {
        /// Body of the declaration, without `<!` and `>`.
        text: String,
    },
    /// Character data.
    Text(Text),
    /// `<!DOCTYPE...>`.
    Doctype {
        /// Everything after the `DOCTYPE` keyword, verbatim.
        text: String,
    },
    /// A namespace binding comes into scope. Precedes the declaring element's `StartElement`.
    StartPrefixMapping(PrefixMapping),
    /// A start tag (or an empty-element tag).
    StartElement(Rc<ElementInfo>),
    /// `<!-- ... -->`.
    Comment {
        /// Contents of the comment.
        text: String,
    },
    /// An end tag, or the implied end of an empty-element tag.
    EndElement(Rc<ElementInfo>),
    /// A namespace binding goes out of scope. Follows the declaring element's `EndElement`.
    EndPrefixMapping(PrefixMapping),
    /// The root element has been closed.
    EndDocument,
    /// A structural error. Always the last event of the parser that produced it.
    Error(XmlParseError),
}

macro_rules! impl_event_name {
    ($(
        $string:literal <=> $variant:ident,
    )*) => {
        /// The name of an [`Event`] variant, used to subscribe to events on a
        /// [`crate::PushParser`].
        #[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash)]
        pub enum EventName {
            $(
                #[doc = concat!("The `", $string, "` event.")]
                $variant
            ),*
        }

        impl EventName {
            /// All twelve event names.
            pub const ALL: &'static [EventName] = &[$(EventName::$variant),*];

            /// The `snake_case` name of this event.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match *self {
                    $( Self::$variant => $string, )*
                }
            }
        }

        impl std::str::FromStr for EventName {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $string => Ok(Self::$variant), )*
                    _ => Err(())
                }
            }
        }

        impl Event {
            /// The name of this event.
            #[must_use]
            pub fn name(&self) -> EventName {
                match *self {
                    $( Event::$variant { .. } => EventName::$variant, )*
                }
            }
        }
    }
}

impl_event_name! {
    "start_document" <=> StartDocument,
    "processing_instruction" <=> ProcessingInstruction,
    "sgml_declaration" <=> SgmlDeclaration,
    "text" <=> Text,
    "doctype" <=> Doctype,
    "start_prefix_mapping" <=> StartPrefixMapping,
    "start_element" <=> StartElement,
    "comment" <=> Comment,
    "end_element" <=> EndElement,
    "end_prefix_mapping" <=> EndPrefixMapping,
    "end_document" <=> EndDocument,
    "error" <=> Error,
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

#[test]
fn test_event_names() {
    assert_eq!(EventName::ALL.len(), 12);
    for name in EventName::ALL {
        assert_eq!(name.as_str().parse::<EventName>(), Ok(*name));
    }
    assert_eq!(Event::StartDocument.name(), EventName::StartDocument);
    assert_eq!(
        Event::Comment {
            text: String::new()
        }
        .name()
        .as_str(),
        "comment"
    );
}

#[test]
fn test_attribute_lookup() {
    let mut attributes = Attributes::default();
    attributes.push(Attribute {
        name: "xlink:href".to_owned(),
        value: "#a".to_owned(),
        prefix: Some("xlink".to_owned()),
        local_name: "href".to_owned(),
        namespace_uri: Some("http://www.w3.org/1999/xlink".to_owned()),
    });
    assert_eq!(attributes.get("xlink:href").map(|a| &*a.value), Some("#a"));
    assert!(attributes.get("href").is_none());
    assert!(attributes
        .get_ns("http://www.w3.org/1999/xlink", "href")
        .is_some());
}
