use crate::context::ParseContext;
use crate::utils::{find_attribute_value_delimiter, is_name_char, is_name_start_char, is_whitespace};
use crate::{ErrorKind, State, XmlParseError};

macro_rules! switch_to {
    ($ctx:expr, $state:ident) => {{
        $ctx.switch_to(State::$state);
        Ok(())
    }};
}

macro_rules! cont {
    () => {{
        Ok(())
    }};
}

macro_rules! error {
    ($ctx:expr, $kind:ident, $($fmt:tt)*) => {
        Err($ctx.error(ErrorKind::$kind, format!($($fmt)*)))
    };
}

/// Feed one character to the state machine. The position must already account for `c`.
///
/// Any error returned here is fatal to the context.
pub(crate) fn consume(ctx: &mut ParseContext, c: char) -> Result<(), XmlParseError> {
    match ctx.state {
        State::BeforeDocument => match c {
            '<' => {
                ctx.begin_markup();
                switch_to!(ctx, FoundLt)
            }
            // residue of a byte order mark the decoder did not strip
            '\u{feff}' => cont!(),
            c if is_whitespace(c) => cont!(),
            c => error!(
                ctx,
                InvalidCharacterBeforeDocument,
                "unexpected {:?} before the first tag",
                c
            ),
        },
        State::GeneralStuff => match c {
            '<' => {
                ctx.flush_text()?;
                ctx.begin_markup();
                switch_to!(ctx, FoundLt)
            }
            '>' if ctx.text.ends_with("]]") => error!(
                ctx,
                CdataEndInText,
                "`]]>` is not allowed in character data"
            ),
            c if !ctx.elements.is_empty() => {
                ctx.text.push(c);
                cont!()
            }
            c if is_whitespace(c) => cont!(),
            c => error!(
                ctx,
                TextOutsideRootElement,
                "text {:?} outside of the root element",
                c
            ),
        },
        State::FoundLt => match c {
            '?' => switch_to!(ctx, ProcInst),
            '!' => switch_to!(ctx, SgmlDecl),
            _ if ctx.closed_root => error!(
                ctx,
                ContentAfterRootElement,
                "tag after the root element was closed"
            ),
            '/' => switch_to!(ctx, EndTag),
            c if is_name_start_char(c) => {
                ctx.tag_name.push(c);
                switch_to!(ctx, StartTag)
            }
            c => error!(
                ctx,
                InvalidFirstCharacterOfTagName,
                "{:?} cannot start a tag name",
                c
            ),
        },
        State::ProcInst => match c {
            '?' => switch_to!(ctx, ProcInstEnding),
            c => {
                ctx.text.push(c);
                cont!()
            }
        },
        State::ProcInstEnding => match c {
            '>' => ctx.emit_processing_instruction(),
            '?' => {
                ctx.text.push('?');
                cont!()
            }
            c => {
                ctx.text.push('?');
                ctx.text.push(c);
                switch_to!(ctx, ProcInst)
            }
        },
        State::SgmlDecl => match c {
            '>' => ctx.emit_sgml_declaration(),
            '"' | '\'' => {
                ctx.text.push(c);
                ctx.quote_char = Some(c);
                switch_to!(ctx, SgmlDeclQuoted)
            }
            c => {
                ctx.text.push(c);
                open_declaration(ctx)
            }
        },
        State::SgmlDeclQuoted => {
            ctx.text.push(c);
            if ctx.quote_char == Some(c) {
                ctx.quote_char = None;
                switch_to!(ctx, SgmlDecl)
            } else {
                cont!()
            }
        }
        State::Cdata => match c {
            ']' => switch_to!(ctx, CdataEnding),
            c => {
                ctx.text.push(c);
                cont!()
            }
        },
        State::CdataEnding => match c {
            ']' => switch_to!(ctx, CdataEnding2),
            c => {
                ctx.text.push(']');
                ctx.text.push(c);
                switch_to!(ctx, Cdata)
            }
        },
        State::CdataEnding2 => match c {
            '>' => {
                ctx.emit_cdata();
                cont!()
            }
            ']' => {
                ctx.text.push(']');
                cont!()
            }
            c => {
                ctx.text.push_str("]]");
                ctx.text.push(c);
                switch_to!(ctx, Cdata)
            }
        },
        State::Comment => match c {
            '-' => switch_to!(ctx, CommentEnding),
            c => {
                ctx.text.push(c);
                cont!()
            }
        },
        State::CommentEnding => match c {
            '-' => switch_to!(ctx, CommentEnding2),
            c => {
                ctx.text.push('-');
                ctx.text.push(c);
                switch_to!(ctx, Comment)
            }
        },
        State::CommentEnding2 => match c {
            '>' => {
                ctx.emit_comment();
                cont!()
            }
            _ => error!(
                ctx,
                DoubleHyphenInComment,
                "`--` is not allowed inside a comment"
            ),
        },
        State::Doctype => {
            if let Some((body, end)) = ctx.doctype_markup {
                ctx.text.push(c);
                if ctx.text[body..].ends_with(end) {
                    ctx.doctype_markup = None;
                }
                return cont!();
            }

            match (ctx.quote_char, c) {
                (Some(quote), c) if quote == c => ctx.quote_char = None,
                (Some(_), _) => (),
                (None, '"' | '\'') => ctx.quote_char = Some(c),
                (None, '[') => ctx.doctype_brackets += 1,
                (None, ']') => ctx.doctype_brackets = ctx.doctype_brackets.saturating_sub(1),
                (None, '>') if ctx.doctype_brackets == 0 => {
                    ctx.emit_doctype();
                    return cont!();
                }
                // comments and processing instructions of the internal subset are opaque
                (None, '-') if ctx.doctype_brackets > 0 && ctx.text.ends_with("<!-") => {
                    ctx.doctype_markup = Some((ctx.text.len() + 1, "-->"));
                }
                (None, '?') if ctx.doctype_brackets > 0 && ctx.text.ends_with('<') => {
                    ctx.doctype_markup = Some((ctx.text.len() + 1, "?>"));
                }
                (None, _) => (),
            }
            ctx.text.push(c);
            cont!()
        }
        State::StartTag => match c {
            c if is_name_char(c) => {
                ctx.tag_name.push(c);
                cont!()
            }
            '>' => ctx.close_start_tag(),
            '/' => switch_to!(ctx, EmptyElementTag),
            c if is_whitespace(c) => switch_to!(ctx, StartTagStuff),
            c => error!(
                ctx,
                InvalidCharacterInName,
                "{:?} is not allowed in tag name `{}`",
                c,
                ctx.tag_name
            ),
        },
        State::StartTagStuff => match c {
            '>' => ctx.close_start_tag(),
            '/' => switch_to!(ctx, EmptyElementTag),
            c if is_whitespace(c) => cont!(),
            c if is_name_start_char(c) => {
                ctx.attribute_name.push(c);
                switch_to!(ctx, AttributeName)
            }
            c => error!(
                ctx,
                UnexpectedCharacterInTag,
                "unexpected {:?} in start tag <{}>",
                c,
                ctx.tag_name
            ),
        },
        State::EmptyElementTag => match c {
            '>' => {
                ctx.self_closing = true;
                ctx.close_start_tag()
            }
            c => error!(
                ctx,
                UnexpectedCharacterInTag,
                "expected `>` after `/` in <{}>, found {:?}",
                ctx.tag_name,
                c
            ),
        },
        State::AttributeName => match c {
            c if is_name_char(c) => {
                ctx.attribute_name.push(c);
                cont!()
            }
            '=' => {
                ctx.finish_attribute_name()?;
                switch_to!(ctx, AttributeEqual)
            }
            c if is_whitespace(c) => {
                ctx.finish_attribute_name()?;
                switch_to!(ctx, AttributeNameSawWhite)
            }
            '>' | '/' => error!(
                ctx,
                MissingEqualsAfterAttributeName,
                "attribute `{}` has no value",
                ctx.attribute_name
            ),
            c => error!(
                ctx,
                InvalidCharacterInName,
                "{:?} is not allowed in attribute name `{}`",
                c,
                ctx.attribute_name
            ),
        },
        State::AttributeNameSawWhite => match c {
            c if is_whitespace(c) => cont!(),
            '=' => switch_to!(ctx, AttributeEqual),
            _ => error!(
                ctx,
                MissingEqualsAfterAttributeName,
                "expected `=` after attribute `{}`",
                ctx.attribute_name
            ),
        },
        State::AttributeEqual => match c {
            c if is_whitespace(c) => cont!(),
            '"' | '\'' => {
                ctx.quote_char = Some(c);
                switch_to!(ctx, AttributeValueStart)
            }
            _ => error!(
                ctx,
                UnquotedAttributeValue,
                "value of attribute `{}` must be quoted",
                ctx.attribute_name
            ),
        },
        State::AttributeValueStart => match c {
            c if ctx.quote_char == Some(c) => {
                ctx.finish_attribute_value()?;
                switch_to!(ctx, AttributeValueEnd)
            }
            '<' => error!(
                ctx,
                LessThanInAttributeValue,
                "`<` is not allowed in the value of attribute `{}`",
                ctx.attribute_name
            ),
            // attribute value normalization
            '\t' | '\n' | '\r' => {
                ctx.attribute_value.push(' ');
                cont!()
            }
            c => {
                ctx.attribute_value.push(c);
                cont!()
            }
        },
        State::AttributeValueEnd => match c {
            c if is_whitespace(c) => switch_to!(ctx, StartTagStuff),
            '>' => ctx.close_start_tag(),
            '/' => switch_to!(ctx, EmptyElementTag),
            c => error!(
                ctx,
                MissingWhitespaceBetweenAttributes,
                "expected whitespace before {:?} in start tag <{}>",
                c,
                ctx.tag_name
            ),
        },
        State::EndTag => match c {
            c if ctx.tag_name.is_empty() && !is_name_start_char(c) => error!(
                ctx,
                InvalidFirstCharacterOfTagName,
                "{:?} cannot start an end tag name",
                c
            ),
            c if is_name_char(c) => {
                ctx.tag_name.push(c);
                cont!()
            }
            '>' => ctx.close_end_tag(),
            c if is_whitespace(c) => switch_to!(ctx, EndTagSawWhite),
            c => error!(
                ctx,
                InvalidCharacterInName,
                "{:?} is not allowed in end tag name `{}`",
                c,
                ctx.tag_name
            ),
        },
        State::EndTagSawWhite => match c {
            c if is_whitespace(c) => cont!(),
            '>' => ctx.close_end_tag(),
            c => error!(
                ctx,
                UnexpectedCharacterInTag,
                "unexpected {:?} in end tag </{}>",
                c,
                ctx.tag_name
            ),
        },
        State::AfterDocument => match c {
            '<' => {
                ctx.begin_markup();
                switch_to!(ctx, FoundLt)
            }
            c if is_whitespace(c) => cont!(),
            c => error!(
                ctx,
                ContentAfterRootElement,
                "text {:?} after the root element was closed",
                c
            ),
        },
    }
}

/// Decide what `<!` opened, as soon as the characters read so far allow it.
fn open_declaration(ctx: &mut ParseContext) -> Result<(), XmlParseError> {
    if ctx.text == "--" {
        ctx.text.clear();
        switch_to!(ctx, Comment)
    } else if ctx.text == "[CDATA[" {
        if ctx.elements.is_empty() {
            return error!(
                ctx,
                CdataOutsideRootElement,
                "CDATA section outside of the root element"
            );
        }
        ctx.text.clear();
        ctx.in_cdata = true;
        switch_to!(ctx, Cdata)
    } else if ctx.text == "DOCTYPE" {
        if ctx.saw_root {
            return error!(
                ctx,
                MisplacedDoctype,
                "doctype must come before the root element"
            );
        }
        if ctx.saw_doctype {
            return error!(ctx, MisplacedDoctype, "a document has at most one doctype");
        }
        ctx.text.clear();
        ctx.saw_doctype = true;
        ctx.doctype_brackets = 0;
        ctx.doctype_markup = None;
        switch_to!(ctx, Doctype)
    } else if (ctx.text.starts_with('-') && ctx.text.len() > 1)
        || (ctx.text.starts_with('[') && !"[CDATA[".starts_with(ctx.text.as_str()))
    {
        error!(
            ctx,
            MalformedDeclaration,
            "malformed declaration `<!{}`",
            ctx.text
        )
    } else {
        cont!()
    }
}

/// Consume a run of characters that the current state would only accumulate, without
/// dispatching them one by one. Returns the number of bytes consumed, possibly zero.
///
/// The result is indistinguishable from feeding the same characters through [`consume`].
/// Runs never include `\r`, which the driver normalizes first.
pub(crate) fn consume_run(ctx: &mut ParseContext, input: &str) -> usize {
    let end = match ctx.state {
        State::GeneralStuff if !ctx.elements.is_empty() => input.find(&['<', '>'][..]),
        State::Comment => input.find('-'),
        State::Cdata => input.find(']'),
        State::ProcInst => input.find('?'),
        State::AttributeValueStart => match ctx.quote_char {
            Some(quote) => find_attribute_value_delimiter(input, quote),
            None => return 0,
        },
        _ => return 0,
    }
    .unwrap_or(input.len());
    let end = input[..end].find('\r').unwrap_or(end);

    if end > 0 {
        let run = &input[..end];
        ctx.position.advance_str(run);
        if ctx.state == State::AttributeValueStart {
            ctx.attribute_value.push_str(run);
        } else {
            ctx.text.push_str(run);
        }
    }

    end
}
