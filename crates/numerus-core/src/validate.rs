//! Structure validation against wildcard patterns.
//!
//! Every failure names the subject (port or node) and states what was
//! expected, using ordinal dimension names ("2nd dimension of 3").

use crate::error::ValidationError;
use crate::shape::{DimSpec, Shape, ShapeSpec};
use crate::type_tag::{ComplexLayout, Complexity, MemoryOrder, TypeTag};

/// Check `actual` against `requested`, field by field. Unspecified
/// fields of `requested` are not checked. Data with no layout of its own
/// counts as complex-adjacent.
pub fn validate_type(
    subject: &str,
    actual: &TypeTag,
    requested: &TypeTag,
) -> Result<(), ValidationError> {
    let fail = |detail: String| Err(ValidationError::new(subject, detail));

    if let Some(kind) = requested.element {
        if actual.element != Some(kind) {
            return fail(format!("expected data to be of type {kind}"));
        }
    }
    if let Some(cpx) = requested.complexity {
        if actual.complexity != Some(cpx) {
            return fail(match cpx {
                Complexity::Real => "expected data to be real".into(),
                Complexity::Complex => "expected data to be complex".into(),
            });
        }
    }
    if let Some(layout) = requested.layout {
        let actual_layout = actual.layout.unwrap_or(ComplexLayout::Adjacent);
        if actual_layout != layout {
            return fail(match layout {
                ComplexLayout::Adjacent => "expected data to be complex-adjacent format".into(),
                ComplexLayout::Interleaved => "expected data to be complex-interleaved format".into(),
            });
        }
    }
    if let Some(order) = requested.order {
        let actual_order = actual.order.unwrap_or(MemoryOrder::ColumnMajor);
        if actual_order != order {
            return fail(match order {
                MemoryOrder::ColumnMajor => "expected data to be in column-major format".into(),
                MemoryOrder::RowMajor => "expected data to be in row-major format".into(),
            });
        }
    }
    Ok(())
}

/// Check type and shape. Requested dimensions that accept an extent of
/// 1 may be absent from the end of `actual`; the reverse is not allowed.
pub fn validate_structure(
    subject: &str,
    actual_tag: &TypeTag,
    actual_shape: &Shape,
    requested_tag: &TypeTag,
    requested_shape: &ShapeSpec,
) -> Result<(), ValidationError> {
    validate_type(subject, actual_tag, requested_tag)?;
    validate_shape(subject, actual_shape, requested_shape)
}

/// Check only the shape.
pub fn validate_shape(
    subject: &str,
    actual: &Shape,
    requested: &ShapeSpec,
) -> Result<(), ValidationError> {
    let wanted = requested.dims.len();
    let dims = actual.dims();

    let rank_error = || {
        let detail = if requested.ellipsis {
            format!("expected data to have at least {wanted} dimensions")
        } else {
            format!("expected data to have {wanted} dimensions")
        };
        ValidationError::new(subject, detail)
    };

    if dims.len() > wanted && !requested.ellipsis {
        return Err(rank_error());
    }
    if dims.len() < wanted
        && !requested.dims[dims.len()..]
            .iter()
            .all(|d| d.accepts_padding())
    {
        return Err(rank_error());
    }

    for (i, spec) in requested.dims.iter().enumerate() {
        let extent = dims.get(i).copied().unwrap_or(1);
        if spec.accepts(extent) {
            continue;
        }
        let detail = match spec {
            DimSpec::Exact(n) => {
                format!("expected data to have {} dimension of {n}", ordinal(i + 1))
            }
            DimSpec::NonZero => {
                format!("expected data to have {} dimension non-zero", ordinal(i + 1))
            }
            DimSpec::Any => continue,
        };
        return Err(ValidationError::new(subject, detail));
    }
    Ok(())
}

/// `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_tag::ElementKind;
    use proptest::prelude::*;

    fn actual() -> TypeTag {
        TypeTag::complex(ElementKind::Float64)
            .with_layout(ComplexLayout::Adjacent)
            .with_order(MemoryOrder::ColumnMajor)
    }

    #[test]
    fn ordinals() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111]
            .into_iter()
            .map(ordinal)
            .collect();
        assert_eq!(
            got,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]
        );
    }

    #[test]
    fn type_mismatch_messages() {
        let a = actual();
        let e = validate_type("in", &a, &TypeTag::real(ElementKind::Float64)).unwrap_err();
        assert_eq!(e.detail, "expected data to be real");
        let e = validate_type("in", &a, &TypeTag::complex(ElementKind::Int8)).unwrap_err();
        assert_eq!(e.detail, "expected data to be of type INT8");
        let req = TypeTag::layout_request(ComplexLayout::Interleaved);
        let e = validate_type("in", &a, &req).unwrap_err();
        assert_eq!(e.detail, "expected data to be complex-interleaved format");
        let req = TypeTag::unspecified().with_order(MemoryOrder::RowMajor);
        let e = validate_type("in", &a, &req).unwrap_err();
        assert_eq!(e.detail, "expected data to be in row-major format");
        assert!(validate_type("in", &a, &TypeTag::unspecified()).is_ok());
    }

    #[test]
    fn layout_checked_for_real_data() {
        let real = TypeTag::real(ElementKind::Float64).with_layout(ComplexLayout::Adjacent);
        let req = TypeTag::layout_request(ComplexLayout::Interleaved);
        let e = validate_type("x", &real, &req).unwrap_err();
        assert_eq!(e.detail, "expected data to be complex-interleaved format");
        assert!(validate_type("x", &real, &TypeTag::layout_request(ComplexLayout::Adjacent)).is_ok());

        let bare = TypeTag::real(ElementKind::Float64);
        let e = validate_type("x", &bare, &req).unwrap_err();
        assert_eq!(e.detail, "expected data to be complex-interleaved format");
        let req = TypeTag::layout_request(ComplexLayout::Adjacent);
        let e = validate_type("x", &real.with_layout(ComplexLayout::Interleaved), &req).unwrap_err();
        assert_eq!(e.detail, "expected data to be complex-adjacent format");
    }

    #[test]
    fn dimension_messages() {
        let shape = Shape::from([4, 2]);
        let spec = ShapeSpec::new(&[DimSpec::Any, DimSpec::Exact(3)], false);
        let e = validate_shape("p", &shape, &spec).unwrap_err();
        assert_eq!(e.detail, "expected data to have 2nd dimension of 3");

        let zero = Shape::from([0, 2]);
        let spec = ShapeSpec::new(&[DimSpec::NonZero, DimSpec::Any], false);
        let e = validate_shape("p", &zero, &spec).unwrap_err();
        assert_eq!(e.detail, "expected data to have 1st dimension non-zero");
        assert_eq!(e.subject, "p");
    }

    #[test]
    fn rank_rules() {
        let spec = ShapeSpec::new(&[DimSpec::Exact(4)], false);
        let e = validate_shape("p", &Shape::from([4, 2]), &spec).unwrap_err();
        assert_eq!(e.detail, "expected data to have 1 dimensions");

        let spec = ShapeSpec::new(&[DimSpec::Exact(4)], true);
        assert!(validate_shape("p", &Shape::from([4, 2, 9]), &spec).is_ok());
        let spec = ShapeSpec::new(&[DimSpec::Exact(4), DimSpec::Exact(2)], true);
        let e = validate_shape("p", &Shape::from([4]), &spec).unwrap_err();
        assert_eq!(e.detail, "expected data to have at least 2 dimensions");
    }

    #[test]
    fn trailing_ones_padded_on_requested_side_only() {
        let spec = ShapeSpec::new(&[DimSpec::Exact(5), DimSpec::Exact(1)], false);
        assert!(validate_shape("p", &Shape::from([5]), &spec).is_ok());
        let spec = ShapeSpec::new(&[DimSpec::Exact(5), DimSpec::Any, DimSpec::NonZero], false);
        assert!(validate_shape("p", &Shape::from([5]), &spec).is_ok());
        let spec = ShapeSpec::new(&[DimSpec::Exact(5)], false);
        assert!(validate_shape("p", &Shape::from([5, 1]), &spec).is_err());
        let spec = ShapeSpec::new(&[DimSpec::Exact(5), DimSpec::Exact(2)], false);
        assert!(validate_shape("p", &Shape::from([5]), &spec).is_err());
    }

    proptest! {
        #[test]
        fn validation_is_idempotent(
            dims in prop::collection::vec(0u64..4, 1..4),
            req in prop::collection::vec(0u64..4, 0..4),
            ellipsis in any::<bool>(),
        ) {
            let shape = Shape::new(&dims);
            let before = shape.clone();
            let spec = ShapeSpec::new(
                &req.iter().map(|&d| DimSpec::Exact(d)).collect::<Vec<_>>(),
                ellipsis,
            );
            let first = validate_shape("p", &shape, &spec);
            let second = validate_shape("p", &shape, &spec);
            prop_assert_eq!(first, second);
            prop_assert_eq!(shape, before);
        }
    }
}
