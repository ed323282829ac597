//! Struct, cell and string nodes.
//!
//! A struct node (`c="z"`) lists its field names in `a`, each followed
//! by `;`, and holds one `<m>` child per field per element, ordered
//! `element × field_count + field`. A cell node (`c="y"`) holds one
//! `<m>` child per element. A string node has no `c` attribute and keeps
//! its characters in the text.

use numerus_core::{decode_slice, ElementKind, Shape};

use crate::codec::get_raw;
use crate::context::CodecContext;
use crate::error::DataMlError;
use crate::info::NodeInfo;
use crate::node::DataMlNode;

/// Child element name used for struct fields and cell entries.
pub const MEMBER: &str = "m";

fn count(node: &DataMlNode, shape: &Shape) -> Result<usize, DataMlError> {
    numerus_core::element_count_real(shape).map_err(|e| DataMlError::structure(node.name(), e))
}

fn set_dims(node: &mut DataMlNode, shape: &Shape, n: usize) {
    if n != 1 {
        node.set_attribute("b", shape.to_string());
    }
}

fn expect_kind(node: &DataMlNode, kind: ElementKind, expected: &'static str) -> Result<NodeInfo, DataMlError> {
    let info = NodeInfo::from_node(node)?;
    if info.tag.element == Some(kind) {
        Ok(info)
    } else {
        Err(DataMlError::NotComposite {
            node: node.name().to_string(),
            expected,
        })
    }
}

// ── Struct ──────────────────────────────────────────────────────

/// Turn `node` into a struct array of `shape` with the given fields,
/// each entry an empty `<m>` child.
pub fn become_struct(
    node: &mut DataMlNode,
    shape: &Shape,
    fields: &[&str],
) -> Result<(), DataMlError> {
    for (i, f) in fields.iter().enumerate() {
        if fields[..i].contains(f) {
            return Err(DataMlError::DuplicateField {
                node: node.name().to_string(),
                field: f.to_string(),
            });
        }
    }
    let n = count(node, shape)?;
    node.clear();
    node.set_attribute("c", "z");
    set_dims(node, shape, n);
    node.set_attribute("a", fields.iter().map(|f| format!("{f};")).collect::<String>());
    for _ in 0..n * fields.len() {
        node.push_child(DataMlNode::new(MEMBER));
    }
    Ok(())
}

/// Field names of a struct node, in order.
pub fn field_names(node: &DataMlNode) -> Result<Vec<String>, DataMlError> {
    expect_kind(node, ElementKind::Struct, "struct")?;
    Ok(node
        .attribute("a")
        .unwrap_or("")
        .split(';')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

/// `true` if the struct has a field called `name`.
pub fn has_field(node: &DataMlNode, name: &str) -> Result<bool, DataMlError> {
    Ok(field_names(node)?.iter().any(|f| f == name))
}

fn field_slot(node: &DataMlNode, name: &str, index: usize) -> Result<usize, DataMlError> {
    let info = expect_kind(node, ElementKind::Struct, "struct")?;
    let names = field_names(node)?;
    let field = names
        .iter()
        .position(|f| f == name)
        .ok_or_else(|| DataMlError::NoSuchField {
            node: node.name().to_string(),
            field: name.to_string(),
        })?;
    let len = count(node, &info.shape)?;
    if index >= len {
        return Err(DataMlError::IndexOutOfRange {
            node: node.name().to_string(),
            index,
            len,
        });
    }
    let slot = index * names.len() + field;
    if slot >= node.children().len() {
        return Err(DataMlError::IndexOutOfRange {
            node: node.name().to_string(),
            index: slot,
            len: node.children().len(),
        });
    }
    Ok(slot)
}

/// Field `name` of struct element `index`.
pub fn field<'a>(node: &'a DataMlNode, name: &str, index: usize) -> Result<&'a DataMlNode, DataMlError> {
    let slot = field_slot(node, name, index)?;
    Ok(&node.children()[slot])
}

/// Mutable field `name` of struct element `index`.
pub fn field_mut<'a>(
    node: &'a mut DataMlNode,
    name: &str,
    index: usize,
) -> Result<&'a mut DataMlNode, DataMlError> {
    let slot = field_slot(node, name, index)?;
    Ok(&mut node.children_mut()[slot])
}

/// Add a field to a scalar struct and return its (empty) node.
pub fn add_field<'a>(node: &'a mut DataMlNode, name: &str) -> Result<&'a mut DataMlNode, DataMlError> {
    let info = expect_kind(node, ElementKind::Struct, "struct")?;
    if count(node, &info.shape)? != 1 {
        return Err(DataMlError::NotScalarStruct {
            node: node.name().to_string(),
        });
    }
    if has_field(node, name)? {
        return Err(DataMlError::DuplicateField {
            node: node.name().to_string(),
            field: name.to_string(),
        });
    }
    let a = format!("{}{name};", node.attribute("a").unwrap_or(""));
    node.set_attribute("a", a);
    Ok(node.push_child(DataMlNode::new(MEMBER)))
}

// ── Cell ────────────────────────────────────────────────────────

/// Turn `node` into a cell array of `shape`, each entry an empty `<m>`.
pub fn become_cell(node: &mut DataMlNode, shape: &Shape) -> Result<(), DataMlError> {
    let n = count(node, shape)?;
    node.clear();
    node.set_attribute("c", "y");
    set_dims(node, shape, n);
    for _ in 0..n {
        node.push_child(DataMlNode::new(MEMBER));
    }
    Ok(())
}

fn cell_slot(node: &DataMlNode, index: usize) -> Result<usize, DataMlError> {
    expect_kind(node, ElementKind::Cell, "cell")?;
    let len = node.children().len();
    if index >= len {
        return Err(DataMlError::IndexOutOfRange {
            node: node.name().to_string(),
            index,
            len,
        });
    }
    Ok(index)
}

/// Cell entry `index`.
pub fn cell(node: &DataMlNode, index: usize) -> Result<&DataMlNode, DataMlError> {
    let i = cell_slot(node, index)?;
    Ok(&node.children()[i])
}

/// Mutable cell entry `index`.
pub fn cell_mut(node: &mut DataMlNode, index: usize) -> Result<&mut DataMlNode, DataMlError> {
    let i = cell_slot(node, index)?;
    Ok(&mut node.children_mut()[i])
}

// ── String ──────────────────────────────────────────────────────

/// Store `text` as a string node.
pub fn set_string(node: &mut DataMlNode, text: &str) {
    node.clear();
    node.set_text(text);
}

/// Read a string node, or a real `CHAR16` row vector.
pub fn get_string(node: &DataMlNode, ctx: &CodecContext) -> Result<String, DataMlError> {
    if node.attribute("c").is_none() {
        return Ok(node.text().to_string());
    }
    let info = NodeInfo::from_node(node)?;
    let dims = info.shape.dims();
    let row = (dims.len() == 2 && dims[0] == 1) || dims.len() == 1;
    if info.element() != ElementKind::Char16 || info.is_complex() || !row {
        return Err(DataMlError::NotComposite {
            node: node.name().to_string(),
            expected: "string",
        });
    }
    let n = count(node, &info.shape)?;
    let mut bytes = vec![0u8; n * 2];
    get_raw(node, ctx, &mut bytes, None)?;
    Ok(String::from_utf16_lossy(&decode_slice::<u16>(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_layout() {
        let mut n = DataMlNode::new("s");
        become_struct(&mut n, &Shape::from([2]), &["a", "b"]).unwrap();
        assert_eq!(n.attribute("c"), Some("z"));
        assert_eq!(n.attribute("a"), Some("a;b;"));
        assert_eq!(n.children().len(), 4);
        field_mut(&mut n, "b", 1).unwrap().set_text("x");
        assert_eq!(n.children()[3].text(), "x");
        assert_eq!(field(&n, "b", 1).unwrap().text(), "x");
        assert!(matches!(field(&n, "c", 0), Err(DataMlError::NoSuchField { .. })));
        assert!(matches!(field(&n, "a", 2), Err(DataMlError::IndexOutOfRange { .. })));
    }

    #[test]
    fn add_field_rules() {
        let mut n = DataMlNode::new("s");
        become_struct(&mut n, &Shape::scalar(), &[]).unwrap();
        add_field(&mut n, "x").unwrap().set_text("1");
        add_field(&mut n, "y").unwrap();
        assert_eq!(field_names(&n).unwrap(), ["x", "y"]);
        assert!(has_field(&n, "x").unwrap());
        assert!(matches!(add_field(&mut n, "x"), Err(DataMlError::DuplicateField { .. })));

        let mut arr = DataMlNode::new("s");
        become_struct(&mut arr, &Shape::from([3]), &["x"]).unwrap();
        assert!(matches!(add_field(&mut arr, "y"), Err(DataMlError::NotScalarStruct { .. })));
        assert!(become_struct(&mut arr, &Shape::scalar(), &["x", "x"]).is_err());
    }

    #[test]
    fn cells() {
        let mut n = DataMlNode::new("c");
        become_cell(&mut n, &Shape::from([1, 3])).unwrap();
        assert_eq!(n.attribute("c"), Some("y"));
        assert_eq!(n.attribute("b"), Some("1 3"));
        cell_mut(&mut n, 2).unwrap().set_text("q");
        assert_eq!(cell(&n, 2).unwrap().text(), "q");
        assert!(cell(&n, 3).is_err());
        assert!(field_names(&n).is_err());
    }

    #[test]
    fn strings() {
        let ctx = CodecContext::new();
        let mut n = DataMlNode::new("name");
        set_string(&mut n, "probe");
        assert_eq!(get_string(&n, &ctx).unwrap(), "probe");

        let mut c = DataMlNode::new("name");
        c.set_attribute("c", "c");
        c.set_attribute("b", "1 2");
        c.set_text("104 105");
        assert_eq!(get_string(&c, &ctx).unwrap(), "hi");

        c.set_attribute("c", "d");
        assert!(get_string(&c, &ctx).is_err());
    }
}
