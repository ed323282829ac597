//! Typed array helpers over [`get_raw`] and [`set_raw`].

use numerus_core::{decode_slice, encode_slice, ComplexLayout, Element, Shape, TypeTag};

use crate::codec::{get_raw, set_raw};
use crate::context::{CodecContext, Precision};
use crate::error::DataMlError;
use crate::info::NodeInfo;
use crate::node::DataMlNode;

fn typed_info<T: Element>(node: &DataMlNode) -> Result<NodeInfo, DataMlError> {
    let info = NodeInfo::from_node(node)?;
    if !T::backs(info.element()) {
        return Err(DataMlError::TypeMismatch {
            node: node.name().to_string(),
            expected: T::KIND,
            found: info.tag.element,
        });
    }
    Ok(info)
}

fn check_len(node: &DataMlNode, shape: &Shape, len: usize) -> Result<(), DataMlError> {
    let n = numerus_core::element_count_real(shape)
        .map_err(|e| DataMlError::structure(node.name(), e))?;
    if n != len {
        return Err(DataMlError::SizeMismatch {
            node: node.name().to_string(),
            expected: n,
            actual: len,
        });
    }
    Ok(())
}

/// Encode a real array of `T`.
pub fn set_array<T: Element>(
    node: &mut DataMlNode,
    shape: &Shape,
    values: &[T],
    precision: Precision,
) -> Result<(), DataMlError> {
    check_len(node, shape, values.len())?;
    set_raw(
        node,
        &TypeTag::real(T::KIND),
        shape,
        &encode_slice(values),
        None,
        precision,
    )
}

/// Encode an adjacent complex array of `T`.
pub fn set_complex_array<T: Element>(
    node: &mut DataMlNode,
    shape: &Shape,
    real: &[T],
    imag: &[T],
    precision: Precision,
) -> Result<(), DataMlError> {
    check_len(node, shape, real.len())?;
    check_len(node, shape, imag.len())?;
    set_raw(
        node,
        &TypeTag::complex(T::KIND).with_layout(ComplexLayout::Adjacent),
        shape,
        &encode_slice(real),
        Some(&encode_slice(imag)),
        precision,
    )
}

/// Decode a real array of `T`.
pub fn get_array<T: Element>(
    node: &DataMlNode,
    ctx: &CodecContext,
) -> Result<(Shape, Vec<T>), DataMlError> {
    let info = typed_info::<T>(node)?;
    if info.is_complex() {
        return Err(DataMlError::ComplexMismatch {
            node: node.name().to_string(),
            detail: "expected data to be real",
        });
    }
    let n = info
        .elements_real()
        .map_err(|e| DataMlError::structure(node.name(), e))?;
    let mut bytes = vec![0u8; n * T::WIDTH];
    get_raw(node, ctx, &mut bytes, None)?;
    Ok((info.shape, decode_slice(&bytes)))
}

/// Decode a complex array of `T` into separate real and imaginary
/// vectors, whatever its stored layout.
pub fn get_complex_array<T: Element>(
    node: &DataMlNode,
    ctx: &CodecContext,
) -> Result<(Shape, Vec<T>, Vec<T>), DataMlError> {
    let info = typed_info::<T>(node)?;
    if !info.is_complex() {
        return Err(DataMlError::ComplexMismatch {
            node: node.name().to_string(),
            detail: "expected data to be complex",
        });
    }
    let n = info
        .elements_real()
        .map_err(|e| DataMlError::structure(node.name(), e))?;
    let mut bytes = vec![0u8; 2 * n * T::WIDTH];
    get_raw(node, ctx, &mut bytes, None)?;
    let values: Vec<T> = decode_slice(&bytes);
    let (re, im) = if info.tag.layout == Some(ComplexLayout::Interleaved) {
        (
            values.iter().step_by(2).copied().collect(),
            values.iter().skip(1).step_by(2).copied().collect(),
        )
    } else {
        let (re, im) = values.split_at(n);
        (re.to_vec(), im.to_vec())
    };
    Ok((info.shape, re, im))
}

/// Decode a node holding exactly one real `T`.
pub fn get_scalar<T: Element>(node: &DataMlNode, ctx: &CodecContext) -> Result<T, DataMlError> {
    let (_, values) = get_array::<T>(node, ctx)?;
    match values.as_slice() {
        [v] => Ok(*v),
        _ => Err(DataMlError::SizeMismatch {
            node: node.name().to_string(),
            expected: 1,
            actual: values.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_roundtrip() {
        let ctx = CodecContext::new();
        let mut n = DataMlNode::new("a");
        set_array(&mut n, &Shape::from([3]), &[1i16, -2, 3], Precision::NotSet).unwrap();
        assert_eq!(n.text(), "1 -2 3");
        let (shape, v) = get_array::<i16>(&n, &ctx).unwrap();
        assert_eq!(shape, Shape::from([3]));
        assert_eq!(v, [1, -2, 3]);
        assert!(matches!(
            get_array::<f64>(&n, &ctx),
            Err(DataMlError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn interleaved_node_splits() {
        let ctx = CodecContext::new();
        let mut n = DataMlNode::new("a");
        n.set_attribute("c", "dy");
        n.set_attribute("b", "2");
        n.set_text("1 10 2 20");
        let (_, re, im) = get_complex_array::<f64>(&n, &ctx).unwrap();
        assert_eq!(re, [1.0, 2.0]);
        assert_eq!(im, [10.0, 20.0]);
    }

    #[test]
    fn bool_and_scalar() {
        let ctx = CodecContext::new();
        let mut n = DataMlNode::new("flag");
        n.set_attribute("c", "l");
        n.set_text("1");
        assert_eq!(get_scalar::<u8>(&n, &ctx).unwrap(), 1);

        let mut m = DataMlNode::new("v");
        set_array(&mut m, &Shape::from([2]), &[1.0f64, 2.0], Precision::NotSet).unwrap();
        assert!(get_scalar::<f64>(&m, &ctx).is_err());
    }

    #[test]
    fn length_checked() {
        let mut n = DataMlNode::new("a");
        assert!(set_array(&mut n, &Shape::from([4]), &[1u8, 2], Precision::NotSet).is_err());
    }
}
