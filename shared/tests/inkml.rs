use std::collections::HashSet;

use inkboard_shared::{
    convert, CapturedStroke, ConversionOptions, InkDocument, PenSample, Point, StrokePolicy,
    Transform, INKML_NAMESPACE,
};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

fn xml_id<'a>(node: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    node.attribute((XML_NAMESPACE, "id"))
}

/// Checks that every reference in the document points at an element defined
/// earlier in it.
fn assert_references_resolve(inkml: &str) {
    let document = roxmltree::Document::parse(inkml).expect("well-formed InkML");
    let root = document.root_element();
    assert_eq!(root.tag_name().name(), "ink");
    assert_eq!(root.tag_name().namespace(), Some(INKML_NAMESPACE));

    let mut defined = HashSet::new();
    for node in root.descendants().filter(|node| node.is_element()) {
        let reference = match node.tag_name().name() {
            "context" => node.attribute("canvasTransformRef"),
            "traceGroup" => node.attribute("contextRef"),
            _ => None,
        };
        if let Some(reference) = reference {
            let target = reference.strip_prefix('#').expect("local reference");
            assert!(defined.contains(target), "dangling reference {reference}");
        }
        if let Some(id) = xml_id(node) {
            assert!(defined.insert(id.to_string()), "duplicate id {id}");
        }
    }
}

#[test]
fn end_to_end_single_stroke() {
    let stroke =
        CapturedStroke::from_point_strings(&["1, 2", "3, 6", "1, 0", "0, 1", "0, -1", "1, 1"])
            .unwrap();
    let transform = stroke.transform().unwrap();
    let [p00, p01, p10, p11] = stroke.correspondence;
    let expected = Transform {
        m00: (p10.x * p01.y - p11.x * p00.y) / (p00.x * p01.y - p01.x * p00.y),
        m01: (p00.x * p11.x - p01.x * p10.x) / (p00.x * p01.y - p01.x * p00.y),
        m10: (p01.y * p10.y - p00.y * p11.y) / (p00.x * p01.y - p01.x * p00.y),
        m11: (p00.x * p11.y - p01.x * p10.y) / (p00.x * p01.y - p01.x * p00.y),
    };
    assert_eq!(transform, expected);

    let mut document = InkDocument::new();
    document.add_canvas_transform_and_context(transform);
    document.add_trace_group(&stroke.samples).unwrap();
    document.add_annotation("x+y");
    let inkml = document.render();

    assert!(inkml.contains("<affine>0.0000 1.0000, -1.0000 1.0000,</affine>"));
    assert!(inkml.contains("<trace>1 2, 3 6</trace>"));
    assert!(inkml.contains("<annotation type=\"equationInTeX\">$x+y$</annotation>"));
    assert_references_resolve(&inkml);
}

#[test]
fn interleaved_calls_keep_references_consistent() {
    let mut document = InkDocument::new();
    let sample = [PenSample::Down(Point::new(1.0, 1.0))];
    for round in 0..5 {
        let context = document.add_canvas_transform_and_context(Transform::IDENTITY);
        // Extra transforms between groups must not break the pairing.
        if round % 2 == 1 {
            let spare = document.add_canvas_transform_and_context(Transform::IDENTITY);
            document.add_trace_group(&sample).unwrap();
            document
                .add_trace_group_with_context(context, &sample)
                .unwrap();
            assert_eq!(document.latest_context(), Some(spare));
        } else {
            document.add_trace_group(&sample).unwrap();
        }
    }
    document.add_annotation(r"\sqrt{a^2 + b^2}");
    assert_references_resolve(&document.render());
}

#[test]
fn empty_document_is_well_formed() {
    let inkml = InkDocument::new().render();
    assert_references_resolve(&inkml);
    assert!(!inkml.contains("canvasTransform"));
    assert!(!inkml.contains("context"));
    assert!(!inkml.contains("traceGroup"));
}

#[test]
fn converted_commands_are_well_formed() {
    let commands = vec![
        "AttachCopyToView[Polyline[(10, 20), (11, 22), (?, ?), (30, 40), true], 1, (2, 1), (-1, 3), (4, -2), (0.5, 7)]".to_string(),
        "AttachCopyToView[Polyline[(0, 0), true], 1, (0, 0), (1, 0), (0, 1), (1, 1)]".to_string(),
        "AttachCopyToView[Polyline[(5, 5), (6, 6), true], 1, (1, 0), (0, 1), (1, 0), (0, 1)]".to_string(),
    ];
    let options = ConversionOptions {
        on_invalid_stroke: StrokePolicy::Skip,
    };
    let conversion = convert(&commands, r"\frac{a}{b} < c", &options)
        .unwrap()
        .expect("two usable strokes");
    assert_eq!(conversion.strokes, 2);
    assert_eq!(conversion.skipped.len(), 1);
    assert_eq!(conversion.skipped[0].index, 1);
    assert!(conversion.inkml.contains("<trace>10 20, 11 22</trace>"));
    assert!(conversion.inkml.contains("<trace>30 40</trace>"));
    assert!(conversion
        .inkml
        .contains("<affine>1.0000 0.0000, 0.0000 1.0000,</affine>"));
    assert_references_resolve(&conversion.inkml);
}
