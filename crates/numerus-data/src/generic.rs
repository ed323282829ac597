//! Generic structure strings.
//!
//! Hosts that know nothing about a data class describe its structure as
//! text:
//!
//! ```text
//! DOUBLE/COMPLEX/CPXFMT_INTERLEAVED/COLUMN_MAJOR/2,3
//! ```
//!
//! Element name, complexity, then optional layout and order parts, then
//! comma-separated dimensions. Layout and order parts are left out of a
//! rendered string when the request already states them.

use numerus_core::{
    ComplexLayout, Complexity, ElementKind, MemoryOrder, Shape, Structure, TypeTag,
};

use crate::error::DataError;

const ADJACENT: &str = "CPXFMT_ADJACENT";
const INTERLEAVED: &str = "CPXFMT_INTERLEAVED";
const COLUMN_MAJOR: &str = "COLUMN_MAJOR";
const ROW_MAJOR: &str = "ROW_MAJOR";

/// Render `structure`, omitting the parts `request` specifies.
pub fn render(structure: &Structure, request: &TypeTag) -> String {
    let mut out = String::new();
    out.push_str(structure.element().name());
    out.push('/');
    out.push_str(if structure.is_complex() {
        "COMPLEX/"
    } else {
        "REAL/"
    });
    if request.layout.is_none() {
        out.push_str(match structure.layout() {
            ComplexLayout::Adjacent => ADJACENT,
            ComplexLayout::Interleaved => INTERLEAVED,
        });
        out.push('/');
    }
    if request.order.is_none() {
        out.push_str(match structure.tag().order {
            Some(MemoryOrder::RowMajor) => ROW_MAJOR,
            _ => COLUMN_MAJOR,
        });
        out.push('/');
    }
    out.push_str(&structure.shape().comma_string());
    out
}

/// Parse `text` on top of `base`. Parts present in the string take
/// precedence over `base`.
pub fn parse(text: &str, base: &TypeTag) -> Result<(TypeTag, Shape), DataError> {
    let parts: Vec<&str> = text.split('/').collect();
    let (dims, head) = match parts.split_last() {
        Some((dims, head)) if (2..=4).contains(&head.len()) => (*dims, head),
        _ => return Err(DataError::generic(text, "wrong part count")),
    };

    let element = ElementKind::from_name(head[0])
        .ok_or_else(|| DataError::generic(text, format!("unrecognised type \"{}\"", head[0])))?;
    let complexity = match head[1] {
        "REAL" => Complexity::Real,
        "COMPLEX" => Complexity::Complex,
        other => {
            return Err(DataError::generic(
                text,
                format!("unrecognised complexity \"{other}\""),
            ))
        }
    };

    let mut tag = TypeTag {
        element: Some(element),
        complexity: Some(complexity),
        ..*base
    };
    for part in &head[2..] {
        match *part {
            ADJACENT => tag.layout = Some(ComplexLayout::Adjacent),
            INTERLEAVED => tag.layout = Some(ComplexLayout::Interleaved),
            COLUMN_MAJOR => tag.order = Some(MemoryOrder::ColumnMajor),
            ROW_MAJOR => tag.order = Some(MemoryOrder::RowMajor),
            other => {
                return Err(DataError::generic(
                    text,
                    format!("unrecognised part \"{other}\""),
                ))
            }
        }
    }

    let shape = Shape::parse_comma(dims)
        .map_err(|_| DataError::generic(text, format!("bad dimensions \"{dims}\"")))?;
    Ok((tag, shape))
}
