use std::fmt;
use std::iter::{once, Once};

use crate::{Event, Options, Tokenizer};

/// An iterator over the events of a document.
///
/// Input is pulled from an iterator of chunks only as fast as events are requested. The
/// iterator ends after [`Event::EndDocument`] or [`Event::Error`].
///
/// ```
/// use saxgum::{Event, PullParser};
///
/// let chunks = ["<doc>", "Hello, ", "world!", "</doc>"];
/// let text: String = PullParser::from_chunks(chunks)
///     .filter_map(|event| match event {
///         Event::Text(text) => Some(text.content),
///         _ => None,
///     })
///     .collect();
/// assert_eq!(text, "Hello, world!");
/// ```
pub struct PullParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    tokenizer: Tokenizer,
    chunks: I,
    current: Option<I::Item>,
    offset: usize,
    finished: bool,
    done: bool,
}

impl<I> fmt::Debug for PullParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullParser")
            .field("tokenizer", &self.tokenizer)
            .field("offset", &self.offset)
            .field("finished", &self.finished)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'a> PullParser<Once<&'a str>> {
    /// Parse a complete document held in memory.
    pub fn new(input: &'a str) -> Self {
        PullParser::from_chunks(once(input))
    }

    /// Parse a complete document held in memory, with custom [`Options`].
    pub fn with_options(input: &'a str, options: Options) -> Self {
        PullParser::from_chunks_with_options(once(input), options)
    }
}

impl<I> PullParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Parse a document delivered in chunks.
    pub fn from_chunks<C>(chunks: C) -> Self
    where
        C: IntoIterator<IntoIter = I>,
    {
        PullParser::from_chunks_with_options(chunks, Options::default())
    }

    /// Parse a document delivered in chunks, with custom [`Options`].
    pub fn from_chunks_with_options<C>(chunks: C, options: Options) -> Self
    where
        C: IntoIterator<IntoIter = I>,
    {
        PullParser {
            tokenizer: Tokenizer::with_options(options),
            chunks: chunks.into_iter(),
            current: None,
            offset: 0,
            finished: false,
            done: false,
        }
    }

    /// Read from the current chunk until an event is queued or the chunk is exhausted.
    /// Returns `false` once all input is consumed and the end of input has been signalled.
    fn advance(&mut self) -> bool {
        let remaining = self
            .current
            .as_ref()
            .map_or(0, |chunk| chunk.as_ref().len() - self.offset);

        if remaining > 0 {
            if let Some(chunk) = &self.current {
                let consumed = self
                    .tokenizer
                    .feed_until_event(&chunk.as_ref()[self.offset..]);
                self.offset += consumed;
            }
            true
        } else if let Some(chunk) = self.chunks.next() {
            self.current = Some(chunk);
            self.offset = 0;
            true
        } else if !self.finished {
            self.finished = true;
            self.current = None;
            self.tokenizer.finish();
            true
        } else {
            false
        }
    }
}

impl<I> Iterator for PullParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                break None;
            } else if let Some(event) = self.tokenizer.pop_event() {
                if matches!(event, Event::EndDocument | Event::Error(_)) {
                    self.done = true;
                }
                break Some(event);
            } else if self.tokenizer.is_errored() || !self.advance() {
                break None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn stops_after_end_document() {
        let events: Vec<_> = PullParser::new("<a/> <!-- trailing -->").collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[3], Event::EndDocument);
    }

    #[test]
    fn stops_after_error() {
        let events: Vec<_> = PullParser::new("<a></b><c/>").collect();
        assert_eq!(events.len(), 3);
        match &events[2] {
            Event::Error(e) => assert_eq!(e.kind, ErrorKind::MismatchedEndTag),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn pulls_chunks_lazily() {
        let mut pulled = 0;
        let chunks = ["<a>", "<b/>", "</a>", "never read"]
            .iter()
            .inspect(|_| pulled += 1);
        let mut parser = PullParser::from_chunks(chunks);
        assert_eq!(parser.next(), Some(Event::StartDocument));
        assert!(matches!(parser.next(), Some(Event::StartElement(_))));
        drop(parser);
        assert_eq!(pulled, 1);
    }

    #[test]
    fn owned_chunks() {
        let chunks = vec!["<r>".to_owned(), "x".to_owned(), "</r>".to_owned()];
        let names: Vec<_> = PullParser::from_chunks(chunks)
            .map(|event| event.name().as_str())
            .collect();
        assert_eq!(
            names,
            ["start_document", "start_element", "text", "end_element", "end_document"]
        );
    }

    #[test]
    fn truncated_input() {
        let events: Vec<_> = PullParser::new("<a><b>").collect();
        match events.last() {
            Some(Event::Error(e)) => assert_eq!(e.kind, ErrorKind::UnexpectedEndOfInput),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
