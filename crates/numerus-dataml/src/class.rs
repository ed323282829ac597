//! The `c` (class) attribute.
//!
//! One letter names the element kind; a second letter `x` or `y` marks
//! complex data stored adjacent or interleaved. A missing `c` means the
//! node holds a plain string.

use numerus_core::{ComplexLayout, Complexity, ElementKind, TypeTag};

fn letter(kind: ElementKind) -> char {
    match kind {
        ElementKind::Float64 => 'd',
        ElementKind::Float32 => 'f',
        ElementKind::UInt64 => 'v',
        ElementKind::UInt32 => 'u',
        ElementKind::UInt16 => 't',
        ElementKind::UInt8 => 's',
        ElementKind::Int64 => 'p',
        ElementKind::Int32 => 'o',
        ElementKind::Int16 => 'n',
        ElementKind::Int8 => 'm',
        ElementKind::Bool8 => 'l',
        ElementKind::Char16 => 'c',
        ElementKind::Cell => 'y',
        ElementKind::Struct => 'z',
    }
}

fn kind_of(letter: char) -> Option<ElementKind> {
    Some(match letter {
        'd' => ElementKind::Float64,
        'f' => ElementKind::Float32,
        'v' => ElementKind::UInt64,
        'u' => ElementKind::UInt32,
        't' => ElementKind::UInt16,
        's' => ElementKind::UInt8,
        'p' => ElementKind::Int64,
        'o' => ElementKind::Int32,
        'n' => ElementKind::Int16,
        'm' => ElementKind::Int8,
        'l' => ElementKind::Bool8,
        'c' => ElementKind::Char16,
        'y' => ElementKind::Cell,
        'z' => ElementKind::Struct,
        _ => return None,
    })
}

/// Class code for `kind`. Complex data with no layout is written as
/// adjacent.
pub fn class_code(kind: ElementKind, complexity: Complexity, layout: Option<ComplexLayout>) -> String {
    let mut s = String::with_capacity(2);
    s.push(letter(kind));
    if complexity == Complexity::Complex {
        s.push(match layout.unwrap_or(ComplexLayout::Adjacent) {
            ComplexLayout::Adjacent => 'x',
            ComplexLayout::Interleaved => 'y',
        });
    }
    s
}

/// Parse a class code into a tag with element kind and complexity set.
/// Complex codes also set the layout.
pub fn parse_class(code: &str) -> Option<TypeTag> {
    let mut chars = code.chars();
    let kind = kind_of(chars.next()?)?;
    let suffix = chars.next();
    if chars.next().is_some() {
        return None;
    }
    let composite = matches!(kind, ElementKind::Struct | ElementKind::Cell);
    match suffix {
        None => Some(TypeTag::real(kind)),
        Some(_) if composite => None,
        Some('x') => Some(TypeTag::complex(kind).with_layout(ComplexLayout::Adjacent)),
        Some('y') => Some(TypeTag::complex(kind).with_layout(ComplexLayout::Interleaved)),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for kind in ElementKind::ARRAY_KINDS {
            for (cpx, layout) in [
                (Complexity::Real, None),
                (Complexity::Complex, Some(ComplexLayout::Adjacent)),
                (Complexity::Complex, Some(ComplexLayout::Interleaved)),
            ] {
                let code = class_code(kind, cpx, layout);
                let tag = parse_class(&code).unwrap();
                assert_eq!(tag.element, Some(kind));
                assert_eq!(tag.complexity, Some(cpx));
                assert_eq!(tag.layout, layout);
            }
        }
    }

    #[test]
    fn known_codes() {
        assert_eq!(class_code(ElementKind::Float64, Complexity::Real, None), "d");
        assert_eq!(
            class_code(ElementKind::Int16, Complexity::Complex, Some(ComplexLayout::Interleaved)),
            "ny"
        );
        assert_eq!(parse_class("y"), Some(TypeTag::real(ElementKind::Cell)));
        assert_eq!(parse_class("zx"), None);
        assert_eq!(parse_class("dq"), None);
        assert_eq!(parse_class("q"), None);
        assert_eq!(parse_class(""), None);
        assert_eq!(parse_class("dxx"), None);
    }
}
