use crate::document::{Document, NodeData, NodeKey};
use std::fmt::{self, Write};

/// Deterministic document serialization for tests and demos.
/// Not a public stable format.
///
/// Line rules:
/// - One line per node, indented two spaces per depth.
/// - Elements print their tag, attributes in first-set order, then the style
///   map when non-empty (or always, if `ignore_empty_style` is off).
/// - Live properties print only with `include_properties`.
/// - Text prints quoted and escaped.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub include_properties: bool,
    pub ignore_empty_style: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self {
            include_properties: false,
            ignore_empty_style: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: NodeKey, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(doc, root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn of(doc: &Document) -> Self {
        Self::new(doc, doc.root(), DomSnapshotOptions::default())
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Panics with both snapshots and the first differing line.
pub fn assert_snapshot_eq(expected: &[&str], actual: &DomSnapshot) {
    let actual_lines = actual.as_lines();
    if actual_lines.len() == expected.len()
        && actual_lines.iter().zip(expected).all(|(a, e)| a == e)
    {
        return;
    }
    let first = (0..expected.len().max(actual_lines.len()))
        .find(|&i| expected.get(i).copied() != actual_lines.get(i).map(String::as_str))
        .unwrap_or(0);
    panic!(
        "snapshot mismatch at line {}\nexpected:\n{}\nactual:\n{}",
        first + 1,
        expected.join("\n"),
        actual
    );
}

fn walk_snapshot(
    doc: &Document,
    key: NodeKey,
    options: &DomSnapshotOptions,
    depth: usize,
    out: &mut Vec<String>,
) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth.saturating_mul(INDENT_STEP));
    match doc.data(key) {
        Some(NodeData::Fragment) => line.push_str("#document-fragment"),
        Some(NodeData::Element(el)) => {
            line.push('<');
            line.push_str(el.tag());
            for (attr, value) in el.attributes() {
                line.push(' ');
                line.push_str(attr);
                line.push_str("=\"");
                write_escaped(&mut line, value);
                line.push('"');
            }
            let style = el.style();
            if !(options.ignore_empty_style && style.is_empty()) {
                line.push_str(" style=[");
                for (i, (k, v)) in style.iter().enumerate() {
                    if i != 0 {
                        line.push_str("; ");
                    }
                    line.push_str(k);
                    line.push_str(": ");
                    write_escaped(&mut line, v);
                }
                line.push(']');
            }
            if options.include_properties && !el.properties().is_empty() {
                line.push_str(" props=[");
                for (i, (k, v)) in el.properties().iter().enumerate() {
                    if i != 0 {
                        line.push_str("; ");
                    }
                    line.push_str(k);
                    line.push_str(": ");
                    write_escaped(&mut line, &v.to_attr_string());
                }
                line.push(']');
            }
            line.push('>');
        }
        Some(NodeData::Text(text)) => {
            line.push('"');
            write_escaped(&mut line, text);
            line.push('"');
        }
        None => line.push_str("<dead>"),
    }
    out.push(line);
    for child in doc.children(key) {
        walk_snapshot(doc, child, options, depth + 1, out);
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DomSnapshot, DomSnapshotOptions, assert_snapshot_eq};
    use crate::Document;
    use core_types::{EventHandler, HostTree, PropValue};

    #[test]
    fn snapshot_prints_attributes_style_and_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("DIV");
        doc.append_child(root, div);
        doc.set_attribute(div, "id", "main");
        doc.set_style_property(div, "color", "red");
        let text = doc.create_text("say \"hi\"\n");
        doc.append_child(div, text);

        assert_snapshot_eq(
            &[
                "#document-fragment",
                "  <DIV id=\"main\" style=[color: red]>",
                "    \"say \\\"hi\\\"\\n\"",
            ],
            &DomSnapshot::of(&doc),
        );
    }

    #[test]
    fn properties_print_only_when_requested() {
        let mut doc = Document::new();
        let root = doc.root();
        let button = doc.create_element("BUTTON");
        doc.append_child(root, button);
        doc.set_property(button, "onclick", PropValue::Handler(EventHandler::new(|_| {})));
        doc.set_property(button, "disabled", PropValue::Bool(true));

        let plain = DomSnapshot::of(&doc);
        assert_eq!(plain.as_lines()[1], "  <BUTTON>");

        let options = DomSnapshotOptions {
            include_properties: true,
            ..DomSnapshotOptions::default()
        };
        let full = DomSnapshot::new(&doc, root, options);
        assert_eq!(
            full.as_lines()[1],
            "  <BUTTON props=[onclick: [handler]; disabled: true]>"
        );
    }

    #[test]
    fn non_ascii_text_is_escaped() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.create_text("caf\u{e9}");
        doc.append_child(root, text);
        assert_eq!(DomSnapshot::of(&doc).render(), "#document-fragment\n  \"caf\\u{E9}\"");
    }
}
