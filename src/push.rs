use std::collections::BTreeMap;
use std::fmt;

use crate::{ElementInfo, Event, EventName, Options, Text, Tokenizer, XmlParseError};

type Listener<'a> = Box<dyn FnMut(&Event) + 'a>;

/// A parser that is written to, and calls back into registered listeners.
///
/// Listeners are called synchronously from [`PushParser::write`] and [`PushParser::close`], in
/// document order. Several listeners for the same event are called in registration order.
///
/// ```
/// use saxgum::PushParser;
///
/// let mut names = Vec::new();
/// let mut parser = PushParser::new();
/// parser.on_start_element(|element| names.push(element.name.clone()));
/// parser.write("<feed><entry/>").unwrap();
/// parser.write("<entry/></feed>").unwrap();
/// parser.close().unwrap();
/// drop(parser);
///
/// assert_eq!(names, ["feed", "entry", "entry"]);
/// ```
pub struct PushParser<'a> {
    tokenizer: Tokenizer,
    listeners: BTreeMap<EventName, Vec<Listener<'a>>>,
    error: Option<XmlParseError>,
}

impl fmt::Debug for PushParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners: BTreeMap<_, _> = self
            .listeners
            .iter()
            .map(|(name, listeners)| (name.as_str(), listeners.len()))
            .collect();
        f.debug_struct("PushParser")
            .field("tokenizer", &self.tokenizer)
            .field("listeners", &listeners)
            .field("error", &self.error)
            .finish()
    }
}

impl Default for PushParser<'_> {
    fn default() -> Self {
        PushParser::new()
    }
}

impl<'a> PushParser<'a> {
    /// Create a parser with default [`Options`].
    pub fn new() -> Self {
        PushParser::with_options(Options::default())
    }

    /// Create a parser with custom [`Options`].
    pub fn with_options(options: Options) -> Self {
        PushParser {
            tokenizer: Tokenizer::with_options(options),
            listeners: BTreeMap::new(),
            error: None,
        }
    }

    /// Register a listener for one kind of event.
    pub fn on<F>(&mut self, name: EventName, listener: F) -> &mut Self
    where
        F: FnMut(&Event) + 'a,
    {
        self.listeners
            .entry(name)
            .or_default()
            .push(Box::new(listener));
        self
    }

    /// Register a listener for [`Event::StartElement`].
    pub fn on_start_element<F>(&mut self, mut listener: F) -> &mut Self
    where
        F: FnMut(&ElementInfo) + 'a,
    {
        self.on(EventName::StartElement, move |event| {
            if let Event::StartElement(element) = event {
                listener(element);
            }
        })
    }

    /// Register a listener for [`Event::EndElement`].
    pub fn on_end_element<F>(&mut self, mut listener: F) -> &mut Self
    where
        F: FnMut(&ElementInfo) + 'a,
    {
        self.on(EventName::EndElement, move |event| {
            if let Event::EndElement(element) = event {
                listener(element);
            }
        })
    }

    /// Register a listener for [`Event::Text`].
    pub fn on_text<F>(&mut self, mut listener: F) -> &mut Self
    where
        F: FnMut(&Text) + 'a,
    {
        self.on(EventName::Text, move |event| {
            if let Event::Text(text) = event {
                listener(text);
            }
        })
    }

    /// Register a listener for [`Event::Error`].
    ///
    /// The error is also returned from the `write` or `close` call that ran into it.
    pub fn on_error<F>(&mut self, mut listener: F) -> &mut Self
    where
        F: FnMut(&XmlParseError) + 'a,
    {
        self.on(EventName::Error, move |event| {
            if let Event::Error(error) = event {
                listener(error);
            }
        })
    }

    /// Feed a chunk of the document, calling listeners for every event it completes.
    ///
    /// After an error, the parser is dead: every further call returns that same error without
    /// calling any listener.
    pub fn write(&mut self, chunk: &str) -> Result<(), XmlParseError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.tokenizer.feed(chunk);
        self.dispatch()
    }

    /// Signal the end of the document. Fails if the root element was never closed.
    pub fn close(&mut self) -> Result<(), XmlParseError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.tokenizer.finish();
        self.dispatch()
    }

    /// The error that killed this parser, if any.
    pub fn error(&self) -> Option<&XmlParseError> {
        self.error.as_ref()
    }

    fn dispatch(&mut self) -> Result<(), XmlParseError> {
        while let Some(event) = self.tokenizer.pop_event() {
            if let Some(listeners) = self.listeners.get_mut(&event.name()) {
                for listener in listeners {
                    listener(&event);
                }
            }

            if let Event::Error(error) = event {
                self.error = Some(error.clone());
                return Err(error);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn listeners_in_registration_order() {
        let log = std::cell::RefCell::new(Vec::new());
        let mut parser = PushParser::new();
        parser
            .on(EventName::EndDocument, |_| log.borrow_mut().push("first"))
            .on(EventName::EndDocument, |_| log.borrow_mut().push("second"));
        parser.write("<a/>").unwrap();
        drop(parser);
        assert_eq!(log.into_inner(), ["first", "second"]);
    }

    #[test]
    fn error_is_sticky() {
        let mut errors = 0;
        let mut parser = PushParser::new();
        parser.on_error(|_| errors += 1);
        let error = parser.write("<a></b>").unwrap_err();
        assert_eq!(error.kind, ErrorKind::MismatchedEndTag);
        assert_eq!(parser.write("</a>"), Err(error.clone()));
        assert_eq!(parser.close(), Err(error.clone()));
        assert_eq!(parser.error(), Some(&error));
        drop(parser);
        assert_eq!(errors, 1);
    }

    #[test]
    fn close_reports_unclosed_root() {
        let mut parser = PushParser::new();
        parser.write("<a>").unwrap();
        let error = parser.close().unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn text_across_writes() {
        let mut texts = Vec::new();
        let mut parser = PushParser::new();
        parser.on_text(|text| texts.push(text.content.clone()));
        for chunk in ["<a>fi", "sh &a", "mp; ch", "ips</a>"] {
            parser.write(chunk).unwrap();
        }
        parser.close().unwrap();
        drop(parser);
        assert_eq!(texts, ["fish & chips"]);
    }
}
