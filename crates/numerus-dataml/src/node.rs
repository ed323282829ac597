//! In-memory DataML element tree.
//!
//! A [`DataMlNode`] is a named element with ordered attributes, text and
//! child elements. Parsing XML text into nodes is left to the host; this
//! module only builds, inspects and renders them.

use std::fmt;

use indexmap::IndexMap;

use crate::context::Precision;

/// Format tag written on every DataML root.
pub const FORMAT: &str = "DataML";
/// DataML version written on every root.
pub const VERSION: &str = "5";

/// One DataML element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMlNode {
    name: String,
    attributes: IndexMap<String, String>,
    text: String,
    children: Vec<DataMlNode>,
}

impl DataMlNode {
    /// An empty element named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set (or replace) an attribute. Insertion order is preserved.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Child elements.
    pub fn children(&self) -> &[DataMlNode] {
        &self.children
    }

    /// Mutable child elements.
    pub fn children_mut(&mut self) -> &mut [DataMlNode] {
        &mut self.children
    }

    /// Append a child and return a reference to it.
    pub fn push_child(&mut self, child: DataMlNode) -> &mut DataMlNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Drop attributes, text and children, keeping the name.
    pub fn clear(&mut self) {
        self.attributes.clear();
        self.text.clear();
        self.children.clear();
    }

    /// Write the document-level tags carried by a DataML root.
    pub fn set_root_tags(&mut self, precision: Precision, tool: &str, tool_version: &str) {
        self.set_attribute("Format", FORMAT);
        self.set_attribute("Version", VERSION);
        match precision.significant_digits() {
            Some(p) => self.set_attribute("Precision", p.to_string()),
            None => {
                self.remove_attribute("Precision");
            }
        }
        self.set_attribute("AuthTool", tool);
        self.set_attribute("AuthToolVersion", tool_version);
    }
}

fn escape(s: &str, f: &mut fmt::Formatter<'_>, attr: bool) -> fmt::Result {
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' if attr => f.write_str("&quot;")?,
            _ => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for DataMlNode {
    /// Renders compact XML.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (k, v) in &self.attributes {
            write!(f, " {k}=\"")?;
            escape(v, f, true)?;
            f.write_str("\"")?;
        }
        if self.text.is_empty() && self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        escape(&self.text, f, false)?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_xml() {
        let mut n = DataMlNode::new("m");
        n.set_attribute("c", "d");
        n.set_attribute("b", "2 1");
        n.set_text("1 <2");
        n.push_child(DataMlNode::new("m"));
        assert_eq!(n.to_string(), "<m c=\"d\" b=\"2 1\">1 &lt;2<m/></m>");
    }

    #[test]
    fn attribute_order_and_replace() {
        let mut n = DataMlNode::new("x");
        n.set_attribute("b", "1");
        n.set_attribute("a", "2");
        n.set_attribute("b", "3");
        let got: Vec<_> = n.attributes().collect();
        assert_eq!(got, [("b", "3"), ("a", "2")]);
        assert_eq!(n.remove_attribute("b").as_deref(), Some("3"));
    }

    #[test]
    fn root_tags() {
        let mut n = DataMlNode::new("State");
        n.set_root_tags(Precision::digits(6).unwrap(), "numerus", "0.1.0");
        assert_eq!(n.attribute("Format"), Some("DataML"));
        assert_eq!(n.attribute("Version"), Some("5"));
        assert_eq!(n.attribute("Precision"), Some("6"));
        n.set_root_tags(Precision::NotSet, "numerus", "0.1.0");
        assert_eq!(n.attribute("Precision"), None);
        assert_eq!(n.attribute("AuthTool"), Some("numerus"));
    }

    #[test]
    fn clear_keeps_name() {
        let mut n = DataMlNode::new("keep");
        n.set_attribute("c", "d");
        n.set_text("1");
        n.clear();
        assert_eq!(n, DataMlNode::new("keep"));
    }
}
