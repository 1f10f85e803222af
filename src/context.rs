use std::collections::VecDeque;
use std::mem::take;
use std::rc::Rc;

use crate::entities;
use crate::namespace::{
    check_declaration, declared_prefix, split_qname, NamespaceStack, XMLNS_NAMESPACE,
};
use crate::utils::{is_name_start_char, is_whitespace, trace_log};
use crate::{
    Attribute, Attributes, ElementInfo, ErrorKind, Event, Options, Position, PrefixMapping, State,
    Text, XmlParseError,
};

type ResolvedName = (Option<String>, String, Option<String>);

/// All mutable state of one parse. Owned by exactly one [`crate::Tokenizer`].
#[derive(Debug)]
pub(crate) struct ParseContext {
    pub(crate) state: State,
    pub(crate) options: Options,
    pub(crate) position: Position,
    /// Position of the `<` that opened the current markup.
    pub(crate) markup_start: Position,

    // holds text, comment, CDATA, processing instruction or declaration contents
    pub(crate) text: String,
    pub(crate) tag_name: String,
    pub(crate) attribute_name: String,
    pub(crate) attribute_value: String,
    pub(crate) quote_char: Option<char>,
    pub(crate) doctype_brackets: usize,
    /// Inside a comment or processing instruction of the internal subset: where its body
    /// starts in `text`, and what ends it.
    pub(crate) doctype_markup: Option<(usize, &'static str)>,

    pub(crate) elements: Vec<Rc<ElementInfo>>,
    pub(crate) namespaces: NamespaceStack,
    pub(crate) pending_attributes: Vec<(String, String)>,

    pub(crate) self_closing: bool,
    pub(crate) in_cdata: bool,
    pub(crate) saw_root: bool,
    pub(crate) saw_doctype: bool,
    pub(crate) closed_root: bool,
    pub(crate) errored: bool,
    pub(crate) started: bool,

    pub(crate) events: VecDeque<Event>,
}

impl ParseContext {
    pub(crate) fn new(options: Options) -> Self {
        ParseContext {
            state: State::BeforeDocument,
            options,
            position: Position::default(),
            markup_start: Position::default(),
            text: String::new(),
            tag_name: String::new(),
            attribute_name: String::new(),
            attribute_value: String::new(),
            quote_char: None,
            doctype_brackets: 0,
            doctype_markup: None,
            elements: Vec::new(),
            namespaces: NamespaceStack::default(),
            pending_attributes: Vec::new(),
            self_closing: false,
            in_cdata: false,
            saw_root: false,
            saw_doctype: false,
            closed_root: false,
            errored: false,
            started: false,
            events: VecDeque::new(),
        }
    }

    #[inline]
    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Build an error located at the current position.
    pub(crate) fn error(&self, kind: ErrorKind, message: impl Into<String>) -> XmlParseError {
        XmlParseError::new(kind, message, self.position)
    }

    pub(crate) fn switch_to(&mut self, state: State) {
        trace_log!("switch_to: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Remember where the markup that starts with the `<` just consumed begins.
    pub(crate) fn begin_markup(&mut self) {
        self.markup_start = self.position;
    }

    /// Go back to reading character data once a comment, processing instruction or
    /// declaration is over.
    pub(crate) fn return_to_content(&mut self) {
        if self.closed_root {
            self.switch_to(State::AfterDocument);
        } else {
            self.switch_to(State::GeneralStuff);
        }
    }

    fn current_element(&self) -> Option<Rc<ElementInfo>> {
        self.elements.last().cloned()
    }

    pub(crate) fn flush_text(&mut self) -> Result<(), XmlParseError> {
        if self.text.is_empty() {
            return Ok(());
        }

        let raw = take(&mut self.text);
        if !self.options.whitespace_text && raw.chars().all(is_whitespace) {
            return Ok(());
        }

        let content =
            entities::decode_owned(raw).map_err(|(kind, message)| self.error(kind, message))?;
        let element = self.current_element();
        self.emit(Event::Text(Text {
            content,
            element,
            cdata: false,
        }));
        Ok(())
    }

    pub(crate) fn emit_cdata(&mut self) {
        let content = take(&mut self.text);
        let element = self.current_element();
        self.emit(Event::Text(Text {
            content,
            element,
            cdata: true,
        }));
        self.in_cdata = false;
        self.switch_to(State::GeneralStuff);
    }

    pub(crate) fn emit_comment(&mut self) {
        let text = take(&mut self.text);
        // comments after the root element are tolerated, but not reported
        if !self.closed_root {
            self.emit(Event::Comment { text });
        }
        self.return_to_content();
    }

    pub(crate) fn emit_processing_instruction(&mut self) -> Result<(), XmlParseError> {
        let text = take(&mut self.text);
        if !text.starts_with(is_name_start_char) {
            return Err(self.error(
                ErrorKind::MissingProcessingInstructionTarget,
                "processing instruction has no target",
            ));
        }

        if !self.closed_root {
            self.emit(Event::ProcessingInstruction { text });
        }
        self.return_to_content();
        Ok(())
    }

    pub(crate) fn emit_doctype(&mut self) {
        let text = take(&mut self.text);
        self.emit(Event::Doctype { text });
        self.switch_to(State::GeneralStuff);
    }

    pub(crate) fn emit_sgml_declaration(&mut self) -> Result<(), XmlParseError> {
        if self.closed_root {
            return Err(self.error(
                ErrorKind::ContentAfterRootElement,
                "declaration after the root element was closed",
            ));
        }

        if self.text.is_empty() || self.text.starts_with(&['-', '['][..]) {
            return Err(self.error(
                ErrorKind::MalformedDeclaration,
                format!("malformed declaration `<!{}>`", self.text),
            ));
        }

        let text = take(&mut self.text);
        self.emit(Event::SgmlDeclaration { text });
        self.return_to_content();
        Ok(())
    }

    /// Called once the name of an attribute is complete.
    pub(crate) fn finish_attribute_name(&mut self) -> Result<(), XmlParseError> {
        if self
            .pending_attributes
            .iter()
            .any(|(name, _)| *name == self.attribute_name)
        {
            return Err(self.error(
                ErrorKind::DuplicateAttribute,
                format!(
                    "duplicate attribute `{}` on <{}>",
                    self.attribute_name, self.tag_name
                ),
            ));
        }

        Ok(())
    }

    /// Called on the closing quote of an attribute value.
    pub(crate) fn finish_attribute_value(&mut self) -> Result<(), XmlParseError> {
        let raw = take(&mut self.attribute_value);
        let value =
            entities::decode_owned(raw).map_err(|(kind, message)| self.error(kind, message))?;
        let name = take(&mut self.attribute_name);
        self.pending_attributes.push((name, value));
        self.quote_char = None;
        Ok(())
    }

    fn resolve_name(&self, qname: &str, is_element: bool) -> Result<ResolvedName, XmlParseError> {
        if !self.options.xmlns {
            return Ok((None, qname.to_owned(), None));
        }

        let (prefix, local_name) = split_qname(qname).ok_or_else(|| {
            self.error(
                ErrorKind::InvalidQualifiedName,
                format!("`{}` is not a valid qualified name", qname),
            )
        })?;

        let namespace_uri = match prefix {
            Some(prefix) => Some(self.namespaces.resolve(prefix).ok_or_else(|| {
                self.error(
                    ErrorKind::UnboundNamespacePrefix,
                    format!("namespace prefix `{}` is not declared", prefix),
                )
            })?),
            None if is_element => self.namespaces.resolve(""),
            None if qname == "xmlns" => Some(XMLNS_NAMESPACE),
            None => None,
        };

        Ok((
            prefix.map(str::to_owned),
            local_name.to_owned(),
            namespace_uri.map(str::to_owned),
        ))
    }

    /// Called on the `>` of a start tag or an empty-element tag.
    pub(crate) fn close_start_tag(&mut self) -> Result<(), XmlParseError> {
        let name = take(&mut self.tag_name);
        let raw_attributes = take(&mut self.pending_attributes);

        let mut bindings = Vec::new();
        if self.options.xmlns {
            for (attribute_name, value) in &raw_attributes {
                if let Some(prefix) = declared_prefix(attribute_name) {
                    check_declaration(prefix, value).map_err(|message| {
                        self.error(ErrorKind::InvalidNamespaceDeclaration, message)
                    })?;
                    bindings.push((prefix.to_owned(), value.clone()));
                }
            }
        }

        let mappings: Vec<_> = bindings
            .iter()
            .map(|(prefix, uri)| PrefixMapping {
                prefix: prefix.clone(),
                uri: uri.clone(),
            })
            .collect();
        self.namespaces.push_scope(bindings);

        let (prefix, local_name, namespace_uri) = self.resolve_name(&name, true)?;

        let mut attributes = Attributes::default();
        for (attribute_name, value) in raw_attributes {
            let (prefix, local_name, namespace_uri) =
                self.resolve_name(&attribute_name, false)?;

            if let Some(uri) = &namespace_uri {
                if attributes.get_ns(uri, &local_name).is_some() {
                    return Err(self.error(
                        ErrorKind::DuplicateAttribute,
                        format!(
                            "attribute `{}` duplicates `{{{}}}{}` on <{}>",
                            attribute_name, uri, local_name, name
                        ),
                    ));
                }
            }

            attributes.push(Attribute {
                name: attribute_name,
                value,
                prefix,
                local_name,
                namespace_uri,
            });
        }

        let element = Rc::new(ElementInfo {
            name,
            prefix,
            local_name,
            namespace_uri,
            attributes,
        });

        for mapping in mappings {
            self.emit(Event::StartPrefixMapping(mapping));
        }
        self.saw_root = true;
        self.emit(Event::StartElement(Rc::clone(&element)));

        if self.self_closing {
            self.self_closing = false;
            self.end_element(element);
        } else {
            self.elements.push(element);
            self.switch_to(State::GeneralStuff);
        }

        Ok(())
    }

    /// Called on the `>` of an end tag.
    pub(crate) fn close_end_tag(&mut self) -> Result<(), XmlParseError> {
        let name = take(&mut self.tag_name);
        match self.elements.pop() {
            Some(element) if element.name == name => {
                self.end_element(element);
                Ok(())
            }
            Some(element) => Err(XmlParseError::new(
                ErrorKind::MismatchedEndTag,
                format!("expected </{}>, found </{}>", element.name, name),
                self.markup_start,
            )),
            None => Err(XmlParseError::new(
                ErrorKind::UnexpectedEndTag,
                format!("unexpected end tag </{}>, no element is open", name),
                self.markup_start,
            )),
        }
    }

    fn end_element(&mut self, element: Rc<ElementInfo>) {
        self.emit(Event::EndElement(element));

        for (prefix, uri) in self.namespaces.pop_scope() {
            self.emit(Event::EndPrefixMapping(PrefixMapping { prefix, uri }));
        }

        if self.elements.is_empty() {
            // end_document is emitted once input ends, see Tokenizer::finish
            self.closed_root = true;
            self.switch_to(State::AfterDocument);
        } else {
            self.switch_to(State::GeneralStuff);
        }
    }

    /// The error to raise when input ends before the root element was closed.
    pub(crate) fn end_of_input_error(&self) -> XmlParseError {
        if !self.saw_root && matches!(self.state, State::BeforeDocument | State::GeneralStuff) {
            self.error(ErrorKind::NoRootElement, "document has no root element")
        } else if self.in_cdata {
            self.error(
                ErrorKind::UnexpectedEndOfInput,
                "unexpected end of input in CDATA section",
            )
        } else if let Some(element) = self.elements.last() {
            self.error(
                ErrorKind::UnexpectedEndOfInput,
                format!("unexpected end of input, <{}> is not closed", element.name),
            )
        } else {
            self.error(
                ErrorKind::UnexpectedEndOfInput,
                format!("unexpected end of input in {:?}", self.state),
            )
        }
    }
}
