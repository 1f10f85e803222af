//! Chunk invariance and other properties of the event stream.
//!
//! The fixture-driven tests in `xml_events.rs` cut documents into fixed-size pieces. Here
//! proptest picks the cut points, and throws generated garbage at both parser fronts.

use std::cell::RefCell;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::Index;

use saxgum::{ErrorKind, Event, EventName, Position, PullParser, PushParser};

const DOCUMENTS: &[&str] = &[
    "<a>hi</a>",
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE r [<!ENTITY x \"]>\">]>\n<r a='1' b=\"&lt;2&gt;\">\n  <c/>text &amp; more<![CDATA[<raw> ]] ]]]><!-- a - b --><?pi data??>\n</r>\n",
    "<p:r xmlns:p=\"urn:p\" xmlns=\"urn:d\"><p:c p:x=\"1\" y='2'><d xmlns=\"\">é€😀</d></p:c></p:r>",
    "<svg:svg xmlns:svg=\"http://www.w3.org/2000/svg\" xml:lang=\"en\"><svg:rect width=\"10\"\n height=\"20\"/></svg:svg>",
    "\u{feff}  <root>&#65;&#x1F600;&#10;</root>  <!-- trailing --> ",
    "<a></b>",
    "<a>\n  <b>\n  </c>\n</a>",
    "<a><!-- a -- b --></a>",
    "<a b=\"1\" b=\"2\"/>",
    "<a>&nope;</a>",
    "<a/><b/>",
    "<a><b>",
    "<!ENTITY y 'q>'><a x='\t&#9;'/>",
    "<!DOCTYPE r [<!-- it's ] --><?pi don't]?>]>\r\n<r a='1\r\n2'>x\r\ny]]z\r</r>\r",
    "<!DOCTYPE a [<!-- ] -->]><a>]]></a>",
    "<!DOCTYPE a><!DOCTYPE a><a/>",
];

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    }
}

fn pull(chunks: &[&str]) -> Vec<Event> {
    PullParser::from_chunks(chunks.iter().copied()).collect()
}

fn push(chunks: &[&str]) -> Vec<Event> {
    let events = RefCell::new(Vec::new());
    let mut parser = PushParser::new();
    for &name in EventName::ALL {
        parser.on(name, |event| events.borrow_mut().push(event.clone()));
    }

    let _ = chunks
        .iter()
        .try_for_each(|chunk| parser.write(chunk))
        .and_then(|()| parser.close());

    drop(parser);
    events.into_inner()
}

/// Cut `input` at the given character boundaries.
fn split_at<'a>(input: &'a str, cuts: &[Index]) -> Vec<&'a str> {
    let boundaries: Vec<usize> = input
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(input.len()))
        .collect();

    let mut offsets: Vec<usize> = cuts
        .iter()
        .map(|cut| boundaries[cut.index(boundaries.len())])
        .collect();
    offsets.sort_unstable();
    offsets.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for offset in offsets {
        chunks.push(&input[start..offset]);
        start = offset;
    }
    chunks.push(&input[start..]);
    chunks
}

fn assert_well_terminated(events: &[Event]) {
    assert_eq!(events.first(), Some(&Event::StartDocument));
    let terminals = events
        .iter()
        .filter(|event| matches!(event, Event::EndDocument | Event::Error(_)))
        .count();
    assert_eq!(terminals, 1, "{:#?}", events);
    assert!(matches!(
        events.last(),
        Some(Event::EndDocument | Event::Error(_))
    ));
}

proptest! {
    #![proptest_config(config())]

    /// Where the input is cut never changes the events.
    #[test]
    fn events_do_not_depend_on_chunking(
        document in prop::sample::select(DOCUMENTS),
        cuts in prop::collection::vec(any::<Index>(), 0..12),
    ) {
        let expected = pull(&[document]);
        let chunks = split_at(document, &cuts);

        prop_assert_eq!(&pull(&chunks), &expected);
        prop_assert_eq!(&push(&chunks), &expected);
    }

    /// Any input produces exactly one terminal event, and both fronts agree on everything.
    #[test]
    fn arbitrary_markup_is_well_terminated(
        input in "[<>/!?=\"'a-c: \\n\\r&;#x\\[\\]-]{0,60}",
        cuts in prop::collection::vec(any::<Index>(), 0..4),
    ) {
        let expected = pull(&[input.as_str()]);
        assert_well_terminated(&expected);
        prop_assert_eq!(&push(&split_at(&input, &cuts)), &expected);
    }

    /// A complete document opens and closes the same number of elements and prefix mappings.
    #[test]
    fn complete_documents_are_balanced(input in "(<[ab]( x='1')?>|</[ab]>|<[ab]/>|text){1,12}") {
        let events = pull(&[input.as_str()]);
        if events.last() == Some(&Event::EndDocument) {
            let count = |name: EventName| events.iter().filter(|event| event.name() == name).count();
            prop_assert_eq!(count(EventName::StartElement), count(EventName::EndElement));
            prop_assert_eq!(count(EventName::StartPrefixMapping), count(EventName::EndPrefixMapping));
        }
    }
}

#[test]
fn self_closing_element_is_not_pushed() {
    let events = pull(&["<root><item a=\"1\"/>tail</root>"]);
    let start = match &events[2] {
        Event::StartElement(element) => element,
        other => panic!("unexpected event {:?}", other),
    };
    assert_eq!(events[3], Event::EndElement(start.clone()));

    match &events[4] {
        Event::Text(text) => {
            assert_eq!(text.content, "tail");
            assert_eq!(text.element.as_ref().map(|e| e.name.as_str()), Some("root"));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn namespace_scope_ends_with_element() {
    let events = pull(&["<a xmlns:p=\"urn:p\"><p:b/></a>"]);
    let names: Vec<_> = events.iter().map(|event| event.name().as_str()).collect();
    assert_eq!(
        names,
        [
            "start_document",
            "start_prefix_mapping",
            "start_element",
            "start_element",
            "end_element",
            "end_element",
            "end_prefix_mapping",
            "end_document"
        ]
    );

    match &events[3] {
        Event::StartElement(element) => {
            assert_eq!(element.prefix.as_deref(), Some("p"));
            assert_eq!(element.local_name, "b");
            assert_eq!(element.namespace_uri.as_deref(), Some("urn:p"));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn attribute_namespaces() {
    let events = pull(&["<r xmlns=\"urn:d\" xmlns:p=\"urn:p\" p:a=\"1\" b=\"2\"/>"]);
    let element = events
        .iter()
        .find_map(|event| match event {
            Event::StartElement(element) => Some(element.clone()),
            _ => None,
        })
        .unwrap();

    assert_eq!(element.namespace_uri.as_deref(), Some("urn:d"));
    assert_eq!(element.attributes.len(), 4);
    assert_eq!(element.attributes.get_ns("urn:p", "a").unwrap().value, "1");
    assert_eq!(element.attributes.get("b").unwrap().namespace_uri, None);
    assert_eq!(
        element.attributes.get("xmlns:p").unwrap().namespace_uri.as_deref(),
        Some(saxgum::XMLNS_NAMESPACE)
    );
}

#[test]
fn cdata_is_opaque() {
    let events = pull(&["<a><![CDATA[<b>&amp;</b>]]></a>"]);
    assert!(!events.iter().any(|event| event.name() == EventName::Comment));
    let texts: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some((text.content.as_str(), text.cdata)),
            _ => None,
        })
        .collect();
    assert_eq!(texts, [("<b>&amp;</b>", true)]);
    assert_eq!(events.last(), Some(&Event::EndDocument));
}

#[test]
fn mismatched_end_tag_points_at_end_tag() {
    for chunks in [&["<a></b>"][..], &["<a></", "b>"], &["<", "a", ">", "<", "/b", ">"]] {
        let events = pull(chunks);
        assert!(!events.contains(&Event::EndDocument));
        match events.last() {
            Some(Event::Error(error)) => {
                assert_eq!(error.kind, ErrorKind::MismatchedEndTag);
                assert_eq!(error.position, Position { line: 1, column: 4 });
                assert_eq!(error.to_string(), "expected </a>, found </b> at line 1, column 4");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}

#[test]
fn early_stop_leaves_input_unparsed() {
    let mut parser = PullParser::new("<a><b/></a>");
    assert_eq!(parser.next(), Some(Event::StartDocument));
    assert!(matches!(parser.next(), Some(Event::StartElement(_))));
    drop(parser);
}

#[test]
fn whitespace_text_option() {
    let options = saxgum::Options::default().whitespace_text(false);
    let events: Vec<_> = PullParser::with_options("<a>\n  <b> x </b>\n</a>", options).collect();
    let texts: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some(text.content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, [" x "]);
}

#[test]
fn doctype_subset_may_hide_quotes_and_brackets() {
    for (input, doctype) in [
        ("<!DOCTYPE a [<!-- it's -->]><a/>", " a [<!-- it's -->]"),
        ("<!DOCTYPE a [<!-- ] -->]><a/>", " a [<!-- ] -->]"),
        ("<!DOCTYPE a [<?pi don't?>]><a/>", " a [<?pi don't?>]"),
    ] {
        let events = pull(&[input]);
        assert_eq!(
            events[1],
            Event::Doctype {
                text: doctype.to_owned()
            }
        );
        assert_eq!(events.last(), Some(&Event::EndDocument), "{:?}", input);
    }
}

#[test]
fn crlf_split_across_chunks() {
    let whole = pull(&["<a>1\r\n2</a>"]);
    assert_eq!(pull(&["<a>1\r", "\n2</a>"]), whole);
    assert_eq!(push(&["<a>1\r", "\n2</a>"]), whole);
    match &whole[2] {
        Event::Text(text) => assert_eq!(text.content, "1\n2"),
        other => panic!("unexpected event {:?}", other),
    }
}

#[cfg(feature = "serde")]
#[test]
fn events_serialize_with_name_field() {
    let events = pull(&["<a x=\"1\">t</a>"]);
    let json = serde_json::to_value(&events).unwrap();
    assert_eq!(json[0], serde_json::json!({"name": "start_document"}));
    assert_eq!(json[1]["name"], "start_element");
    assert_eq!(json[1]["qname"], "a");
    assert_eq!(json[1]["attributes"][0]["value"], "1");
    assert_eq!(json[2]["name"], "text");
    assert_eq!(json[2]["content"], "t");
}
