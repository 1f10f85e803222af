/// Tokenizer settings.
///
/// ```
/// use saxgum::{Options, PullParser};
///
/// let options = Options::default().xmlns(false);
/// let names: Vec<_> = PullParser::with_options("<a:b/>", options)
///     .map(|event| event.name().as_str())
///     .collect();
/// assert_eq!(
///     names,
///     ["start_document", "start_element", "end_element", "end_document"]
/// );
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    pub(crate) xmlns: bool,
    pub(crate) whitespace_text: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            xmlns: true,
            whitespace_text: true,
        }
    }
}

impl Options {
    /// Whether to process namespaces: split qualified names, resolve prefixes, check namespace
    /// well-formedness and emit prefix mapping events.
    ///
    /// The default is on.
    #[must_use]
    pub fn xmlns(mut self, yes: bool) -> Self {
        self.xmlns = yes;
        self
    }

    /// Whether to report text inside the root element that consists only of whitespace.
    ///
    /// The default is on. Whitespace outside the root element is never reported.
    #[must_use]
    pub fn whitespace_text(mut self, yes: bool) -> Self {
        self.whitespace_text = yes;
        self
    }
}
