//! Minimal indented XML writer.
//!
//! Element and attribute names are written as given. Attribute values and
//! text are escaped; markup passed to the `raw` methods is not.

use qtipack_core::item::escape;

pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Attribute list of one start tag.
pub type Attrs<'a> = Vec<(&'a str, String)>;

#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    /// A writer that starts with the XML declaration.
    pub fn document() -> Self {
        let mut w = Self::default();
        w.out.push_str(DECLARATION);
        w.out.push('\n');
        w
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn start_tag(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.out.push_str(&escape(value));
            self.out.push('"');
        }
    }

    pub fn open(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.indent();
        self.start_tag(name, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    pub fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, String)]) {
        self.indent();
        self.start_tag(name, attrs);
        self.out.push_str("/>\n");
    }

    /// An element holding escaped text on one line.
    pub fn text(&mut self, name: &str, attrs: &[(&str, String)], text: &str) {
        self.inline(name, attrs, &escape(text));
    }

    /// An element holding markup verbatim on one line.
    pub fn raw_element(&mut self, name: &str, attrs: &[(&str, String)], markup: &str) {
        self.inline(name, attrs, markup);
    }

    fn inline(&mut self, name: &str, attrs: &[(&str, String)], content: &str) {
        self.indent();
        self.start_tag(name, attrs);
        self.out.push('>');
        self.out.push_str(content);
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    /// Markup verbatim on its own line.
    pub fn raw(&mut self, markup: &str) {
        self.indent();
        self.out.push_str(markup);
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}
