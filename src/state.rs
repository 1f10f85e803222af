/// The states of the tokenizer's state machine.
///
/// Exposed for debugging and tests through [`crate::Tokenizer::state`]. Every character of input
/// is consumed by exactly one of these states.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum State {
    /// Nothing but whitespace or a byte-order mark has been seen yet.
    BeforeDocument,
    /// Character data between markup.
    GeneralStuff,
    /// Just consumed `<`.
    FoundLt,
    /// Inside `<?...`.
    ProcInst,
    /// Saw `?` inside a processing instruction.
    ProcInstEnding,
    /// Inside `<!...`, still deciding what kind of declaration this is.
    SgmlDecl,
    /// Inside a quoted literal of a `<!...>` declaration.
    SgmlDeclQuoted,
    /// Inside `<![CDATA[...`.
    Cdata,
    /// Saw `]` inside a CDATA section.
    CdataEnding,
    /// Saw `]]` inside a CDATA section.
    CdataEnding2,
    /// Inside `<!--...`.
    Comment,
    /// Saw `-` inside a comment.
    CommentEnding,
    /// Saw `--` inside a comment.
    CommentEnding2,
    /// Inside `<!DOCTYPE...`.
    Doctype,
    /// Reading the name of a start tag.
    StartTag,
    /// Between attributes of a start tag.
    StartTagStuff,
    /// Saw `/` in a start tag.
    EmptyElementTag,
    /// Reading an attribute name.
    AttributeName,
    /// Whitespace after an attribute name.
    AttributeNameSawWhite,
    /// Saw `=`, waiting for the opening quote.
    AttributeEqual,
    /// Inside a quoted attribute value.
    AttributeValueStart,
    /// Right after the closing quote of an attribute value.
    AttributeValueEnd,
    /// Reading the name of an end tag.
    EndTag,
    /// Whitespace after the name of an end tag.
    EndTagSawWhite,
    /// The root element has been closed.
    AfterDocument,
}
