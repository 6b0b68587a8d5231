#![no_main]

use dom::dom_snapshot::DomSnapshot;
use dom::{CustomElementRegistry, Document, NodeKey};
use libfuzzer_sys::fuzz_target;
use reconciler::{ElementType, Operation, Props, Renderer, StyleMap, Tag};
use std::sync::Arc;

const TAGS: [&str; 6] = ["div", "span", "p", "img", "br", "ul"];
const TEXTS: [&str; 4] = ["", "a", "b", "long text"];
const MAX_OPS: usize = 256;

fn decode_props(byte: u8) -> Props {
    let mut props = Props::new();
    if byte & 1 != 0 {
        props = props.attr("id", i32::from(byte >> 4));
    }
    if byte & 2 != 0 {
        props = props.class_name(if byte & 8 != 0 { "x" } else { "y" });
    }
    if byte & 4 != 0 {
        props = props.style(StyleMap::new().with("color", if byte & 16 != 0 { "red" } else { "blue" }));
    }
    if byte & 32 != 0 {
        props = props.prop("value", f64::from(byte));
    }
    props
}

fn decode_tag(byte: u8) -> Tag {
    match byte % 8 {
        6 => Tag::Type(ElementType::element("FuzzWidget")),
        7 => Tag::Type(ElementType::element("Plain")),
        n => Tag::from(TAGS[n as usize]),
    }
}

/// Split the input into two passes at the first `0xFF`.
fn decode_passes(data: &[u8]) -> (Vec<Operation>, Vec<Operation>) {
    let split = data.iter().position(|&b| b == 0xFF).unwrap_or(data.len());
    let (first, rest) = data.split_at(split);
    let second = rest.get(1..).unwrap_or(&[]);
    (decode_ops(first), decode_ops(second))
}

fn decode_ops(data: &[u8]) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut bytes = data.iter().copied();
    while let Some(byte) = bytes.next() {
        if ops.len() >= MAX_OPS {
            break;
        }
        let arg = bytes.next().unwrap_or(0);
        let op = match byte % 5 {
            0 | 1 => Operation::Open {
                tag: decode_tag(arg),
                props: decode_props(byte),
            },
            2 => Operation::Text(TEXTS[usize::from(arg) % TEXTS.len()].to_string()),
            3 if arg & 1 == 0 => Operation::Close(None),
            3 => Operation::Close(Some(decode_tag(arg >> 1))),
            _ => Operation::Finish,
        };
        let done = matches!(op, Operation::Finish);
        ops.push(op);
        // `finish` ends a pass.
        if done {
            break;
        }
    }
    ops
}

fn submit(renderer: &Renderer<&mut Document>, op: &Operation) {
    match op {
        Operation::Open { tag, props } => {
            renderer.open(tag.clone(), props.clone());
        }
        Operation::Text(value) => {
            renderer.text(value);
        }
        Operation::Close(Some(tag)) => {
            renderer.close(tag.clone());
        }
        Operation::Close(None) => {
            renderer.end();
        }
        Operation::Finish => {
            let _ = renderer.finish();
        }
    }
}

/// Returns whether the pass completed without error.
fn run_pass(
    doc: &mut Document,
    root: NodeKey,
    registry: &Arc<CustomElementRegistry>,
    ops: &[Operation],
) -> bool {
    let renderer = Renderer::new(doc, root, registry.clone());
    for op in ops {
        submit(&renderer, op);
    }
    renderer.error().is_none()
}

fuzz_target!(|data: &[u8]| {
    let (first, second) = decode_passes(data);
    let registry = Arc::new(CustomElementRegistry::new());
    let mut doc = Document::new();
    let root = doc.root();

    run_pass(&mut doc, root, &registry, &first);
    if !run_pass(&mut doc, root, &registry, &second) {
        return;
    }

    // Replaying a pass that succeeded must not touch the document.
    let before = DomSnapshot::of(&doc).render();
    doc.reset_stats();
    assert!(run_pass(&mut doc, root, &registry, &second));
    let stats = doc.stats();
    assert_eq!(stats.structural(), 0, "replay mutated structure: {stats:?}");
    assert_eq!(stats.writes(), 0, "replay rewrote properties: {stats:?}");
    assert_eq!(before, DomSnapshot::of(&doc).render());
    assert!(registry.get("plain").is_none());
});
