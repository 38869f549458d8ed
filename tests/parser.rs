//! # Parser Tests
//!
//! End-to-end checks of the ZPL front end: raw bytes in, label documents
//! out.

use pretty_assertions::assert_eq;
use zpl_raster::label::{
    Anchor, Barcode, Element, ElementKind, FieldPosition, FontInfo, Justification, Label, Point,
    Rotation, SymbolParams, Symbology, TextField,
};
use zpl_raster::zpl::{self, ParseError};

const HELLO: &str = "^XA^FO50,50^A0N,30,30^FDHELLO^FS^XZ";

fn parse(input: &str) -> Vec<Label> {
    zpl::parse(input.as_bytes()).unwrap()
}

fn hello_label() -> Label {
    Label {
        home: Point::new(0, 0),
        elements: vec![Element {
            position: FieldPosition::at(50, 50, Anchor::Origin),
            reverse: false,
            kind: ElementKind::Text(TextField {
                text: "HELLO".to_string(),
                font: FontInfo {
                    name: '0',
                    height: 30,
                    width: 30,
                    orientation: Rotation::R0,
                },
                block: None,
                justification: Justification::Left,
            }),
        }],
    }
}

#[test]
fn test_hello_document() {
    assert_eq!(parse(HELLO), vec![hello_label()]);
}

#[test]
fn test_parsing_is_deterministic() {
    let input = "^XA^CF0,40^FO10,10^FDone^FS^BY3^FO10,80^BCN,60^FD123456^FS^XZ\
                 ^XA^FO5,5^GB100,50,2^FS^XZ";
    assert_eq!(parse(input), parse(input));
}

#[test]
fn test_separator_redefinition_is_equivalent() {
    let redefined = "^XA^CD;^FO50;50^A0N;30;30^FDHELLO^FS^XZ";
    assert_eq!(parse(redefined), parse(HELLO));
}

#[test]
fn test_format_prefix_redefinition_is_equivalent() {
    let redefined = "^XA^CC+\n+FO50,50+A0N,30,30+FDHELLO+FS+XZ";
    assert_eq!(parse(redefined), parse(HELLO));

    let control_form = "~CC+\n+XA+FO50,50+A0N,30,30+FDHELLO+FS+XZ";
    assert_eq!(parse(control_form), parse(HELLO));
}

#[test]
fn test_prefix_characters_inside_field_data() {
    let labels = parse("^XA^FO10,10^FDa^b~c,d^FS^FO10,40^FDnext^FS^XZ");
    let texts: Vec<&str> = labels[0]
        .elements
        .iter()
        .map(|e| match &e.kind {
            ElementKind::Text(t) => t.text.as_str(),
            _ => "",
        })
        .collect();
    assert_eq!(texts, ["a^b~c,d", "next"]);
}

#[test]
fn test_labels_have_independent_defaults() {
    let labels = parse(
        "^XA^LH20,20^CF0,60^FWR^BY4^FO0,0^FDfirst^FS^XZ\
         ^XA^FO0,0^FDsecond^FS^XZ",
    );
    assert_eq!(labels.len(), 2);

    let second = &labels[1];
    assert_eq!(second.home, Point::new(0, 0));
    match &second.elements[0].kind {
        ElementKind::Text(text) => assert_eq!(text.font, FontInfo::default()),
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_unknown_command_between_fields() {
    let with_unknown = "^XA^FO50,50^A0N,30,30^FDHELLO^FS^ZZ1,2,3~QQ^XZ";
    assert_eq!(parse(with_unknown), parse(HELLO));

    let inside_field = "^XA^FO50,50^A0N,30,30^PQ5^FDHELLO^FS^XZ";
    assert_eq!(parse(inside_field), parse(HELLO));
}

#[test]
fn test_label_count() {
    let input = "^XA^FDa^FS^XZ^XA^FDb^FS^XZ^XA^FDc^FS^XZ^XA^FDunterminated^FS";
    assert_eq!(parse(input).len(), 3);
}

#[test]
fn test_barcode_document() {
    let labels = parse("^XA^BY3,2.5,80^FO20,30^BCR,,N^FD>:ABC^FS^XZ");
    assert_eq!(
        labels[0].elements[0],
        Element {
            position: FieldPosition::at(20, 30, Anchor::Origin),
            reverse: false,
            kind: ElementKind::Barcode(Barcode {
                data: ">:ABC".to_string(),
                symbology: Symbology::Code128,
                orientation: Rotation::R90,
                module_width: 3,
                ratio: 2.5,
                height: 80,
                interpretation: false,
                interpretation_above: false,
                params: SymbolParams::default(),
            }),
        }
    );
}

#[test]
fn test_invalid_number_reports_position() {
    let err = zpl::parse(b"^XA^FO10,1x0^FDa^FS^XZ").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidNumber { ref command, index: 1, .. } if command == "FO"
    ));
}

#[test]
fn test_utf8_field_data() {
    let labels = parse("^XA^FO0,0^FDÅngström ✓^FS^XZ");
    match &labels[0].elements[0].kind {
        ElementKind::Text(text) => assert_eq!(text.text, "Ångström ✓"),
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_json_serialization() {
    let json = serde_json::to_value(parse(HELLO)).unwrap();
    assert_eq!(json[0]["elements"][0]["kind"]["Text"]["text"], "HELLO");
    assert_eq!(json[0]["elements"][0]["position"]["anchor"], "Origin");
}
