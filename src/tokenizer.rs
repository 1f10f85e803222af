use crate::context::ParseContext;
use crate::machine;
use crate::utils::trace_log;
use crate::{Event, Options, Position, State, XmlParseError};

/// The incremental XML tokenizer both parser fronts are built on.
///
/// Feed it text with [`Tokenizer::feed`] in chunks of any size, call [`Tokenizer::finish`] at
/// the end of input, and take queued events out with [`Tokenizer::pop_event`]. How the input is
/// chunked never changes which events come out.
///
/// ```
/// use saxgum::{Event, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new();
/// tokenizer.feed("<gree");
/// tokenizer.feed("ting>hi</greeting>");
/// tokenizer.finish();
///
/// let mut names = Vec::new();
/// while let Some(event) = tokenizer.pop_event() {
///     names.push(event.name().as_str());
/// }
/// assert_eq!(
///     names,
///     ["start_document", "start_element", "text", "end_element", "end_document"]
/// );
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    ctx: ParseContext,
    finished: bool,
    // the last character was `\r`, so a following `\n` belongs to the same line break
    after_cr: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new()
    }
}

impl Tokenizer {
    /// Create a tokenizer with default [`Options`].
    pub fn new() -> Self {
        Tokenizer::with_options(Options::default())
    }

    /// Create a tokenizer with custom [`Options`].
    pub fn with_options(options: Options) -> Self {
        Tokenizer {
            ctx: ParseContext::new(options),
            finished: false,
            after_cr: false,
        }
    }

    /// Consume a chunk of input.
    ///
    /// Once an error has been reported or [`Tokenizer::finish`] was called, further input is
    /// ignored.
    pub fn feed(&mut self, chunk: &str) {
        if self.ctx.errored || self.finished {
            trace_log!("feed: ignoring {} bytes after end of parse", chunk.len());
            return;
        }

        trace_log!("feed: {} bytes in state {:?}", chunk.len(), self.ctx.state);
        let mut offset = 0;
        while offset < chunk.len() && !self.ctx.errored {
            offset += self.step(&chunk[offset..]);
        }
    }

    /// Like [`Tokenizer::feed`], but stop as soon as at least one event is queued. Returns the
    /// number of bytes consumed.
    pub(crate) fn feed_until_event(&mut self, chunk: &str) -> usize {
        let mut offset = 0;
        while offset < chunk.len() && !self.ctx.errored && self.ctx.events.is_empty() {
            offset += self.step(&chunk[offset..]);
        }
        offset
    }

    /// Consume at least one character from the non-empty `input`, returning the number of bytes
    /// consumed.
    ///
    /// Line breaks are normalized before the machine sees them: `\r\n` and a lone `\r` both
    /// become `\n`.
    fn step(&mut self, input: &str) -> usize {
        self.start();

        if std::mem::take(&mut self.after_cr) && input.starts_with('\n') {
            return 1;
        }

        let consumed = machine::consume_run(&mut self.ctx, input);
        if consumed > 0 {
            return consumed;
        }

        let c = match input.chars().next() {
            Some(c) => c,
            None => return 0,
        };
        let len = c.len_utf8();
        let c = if c == '\r' {
            self.after_cr = true;
            '\n'
        } else {
            c
        };

        self.ctx.position.advance(c);
        if let Err(e) = machine::consume(&mut self.ctx, c) {
            self.fail(e);
        }
        len
    }

    fn start(&mut self) {
        if !self.ctx.started {
            self.ctx.started = true;
            self.ctx.emit(Event::StartDocument);
        }
    }

    fn fail(&mut self, error: XmlParseError) {
        trace_log!("error: {:?} in state {:?}", error, self.ctx.state);
        self.ctx.errored = true;
        self.ctx.emit(Event::Error(error));
    }

    /// Signal the end of input.
    ///
    /// Emits [`Event::EndDocument`] if the root element has been closed, and reports an error
    /// otherwise. Calling this more than once has no further effect.
    pub fn finish(&mut self) {
        if self.ctx.errored || self.finished {
            return;
        }

        self.finished = true;
        self.start();
        if self.ctx.state == State::AfterDocument {
            self.ctx.emit(Event::EndDocument);
        } else {
            let error = self.ctx.end_of_input_error();
            self.fail(error);
        }
    }

    /// Take the oldest queued event.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.ctx.events.pop_front()
    }

    /// Whether an error has been reported. No events follow an error.
    pub fn is_errored(&self) -> bool {
        self.ctx.errored
    }

    /// The position just after the last consumed character.
    pub fn position(&self) -> Position {
        self.ctx.position
    }

    /// The number of currently open elements.
    pub fn depth(&self) -> usize {
        self.ctx.elements.len()
    }

    /// The current state of the state machine.
    pub fn state(&self) -> State {
        self.ctx.state
    }
}
