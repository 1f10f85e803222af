#![deny(missing_docs)]
// XML documents can be untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod context;
mod entities;
mod error;
mod event;
mod machine;
mod namespace;
mod options;
mod position;
mod pull;
mod push;
mod state;
mod tokenizer;
mod utils;

#[doc(hidden)]
pub mod testutils;

pub use error::{ErrorKind, XmlParseError};
pub use event::{Attribute, Attributes, ElementInfo, Event, EventName, PrefixMapping, Text};
pub use namespace::{XMLNS_NAMESPACE, XML_NAMESPACE};
pub use options::Options;
pub use position::Position;
pub use pull::PullParser;
pub use push::PushParser;
pub use state::State;
pub use tokenizer::Tokenizer;
