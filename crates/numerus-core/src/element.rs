//! Typed access to raw element bytes.
//!
//! Arrays are stored as native-endian bytes. [`Element`] is implemented
//! for each primitive that backs an [`ElementKind`]; [`ElementVisitor`]
//! turns a runtime kind into a call to a generic function, so each
//! operation is written once over `T: Element` instead of once per kind.

use std::fmt;

use crate::type_tag::ElementKind;

/// A decoded element value, wide enough for every kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// Floating-point value.
    Float(f64),
    /// Integer value (signed, unsigned, bool and char kinds).
    Int(i128),
}

/// A primitive that backs one or more element kinds.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Width in bytes.
    const WIDTH: usize;
    /// The canonical kind stored by this primitive.
    const KIND: ElementKind;

    /// Read from exactly [`WIDTH`](Self::WIDTH) native-endian bytes.
    fn read_ne(bytes: &[u8]) -> Self;
    /// Write into exactly [`WIDTH`](Self::WIDTH) bytes.
    fn write_ne(self, out: &mut [u8]);
    /// Convert from a float. Integer kinds truncate toward zero,
    /// saturate at their bounds and map `Inf`/`NaN` to 0.
    fn from_f64(v: f64) -> Self;
    /// Convert from an integer, saturating at the type bounds.
    fn from_i128(v: i128) -> Self;
    /// Widen to a [`Scalar`].
    fn to_scalar(self) -> Scalar;

    /// Whether values of `kind` are stored as this primitive. Besides
    /// [`KIND`](Self::KIND), `u8` backs `Bool8` and `u16` backs `Char16`.
    fn backs(kind: ElementKind) -> bool {
        kind == Self::KIND
            || (kind == ElementKind::Bool8 && Self::KIND == ElementKind::UInt8)
            || (kind == ElementKind::Char16 && Self::KIND == ElementKind::UInt16)
    }
}

macro_rules! float_element {
    ($t:ty, $kind:expr) => {
        impl Element for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();
            const KIND: ElementKind = $kind;

            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_ne_bytes(raw)
            }

            fn write_ne(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            fn from_f64(v: f64) -> Self {
                v as $t
            }

            fn from_i128(v: i128) -> Self {
                v as $t
            }

            fn to_scalar(self) -> Scalar {
                Scalar::Float(self as f64)
            }
        }
    };
}

macro_rules! int_element {
    ($t:ty, $kind:expr) => {
        impl Element for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();
            const KIND: ElementKind = $kind;

            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_ne_bytes(raw)
            }

            fn write_ne(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            fn from_f64(v: f64) -> Self {
                if v.is_finite() {
                    v as $t
                } else {
                    0
                }
            }

            fn from_i128(v: i128) -> Self {
                v.clamp(<$t>::MIN as i128, <$t>::MAX as i128) as $t
            }

            fn to_scalar(self) -> Scalar {
                Scalar::Int(self as i128)
            }
        }
    };
}

float_element!(f32, ElementKind::Float32);
float_element!(f64, ElementKind::Float64);
int_element!(i8, ElementKind::Int8);
int_element!(i16, ElementKind::Int16);
int_element!(i32, ElementKind::Int32);
int_element!(i64, ElementKind::Int64);
int_element!(u8, ElementKind::UInt8);
int_element!(u16, ElementKind::UInt16);
int_element!(u32, ElementKind::UInt32);
int_element!(u64, ElementKind::UInt64);

/// A generic operation applied to whichever primitive backs a kind.
pub trait ElementVisitor {
    /// Result of the operation.
    type Output;
    /// Run the operation for primitive `T`.
    fn visit<T: Element>(self) -> Self::Output;
}

impl ElementKind {
    /// Dispatch `visitor` on the primitive backing this kind.
    ///
    /// `Bool8` is backed by `u8` and `Char16` by `u16`. Struct and cell
    /// kinds have no primitive and yield `None`.
    pub fn visit<V: ElementVisitor>(self, visitor: V) -> Option<V::Output> {
        Some(match self {
            Self::Float32 => visitor.visit::<f32>(),
            Self::Float64 => visitor.visit::<f64>(),
            Self::Int8 => visitor.visit::<i8>(),
            Self::Int16 => visitor.visit::<i16>(),
            Self::Int32 => visitor.visit::<i32>(),
            Self::Int64 => visitor.visit::<i64>(),
            Self::UInt8 | Self::Bool8 => visitor.visit::<u8>(),
            Self::UInt16 | Self::Char16 => visitor.visit::<u16>(),
            Self::UInt32 => visitor.visit::<u32>(),
            Self::UInt64 => visitor.visit::<u64>(),
            Self::Struct | Self::Cell => return None,
        })
    }
}

/// Native-endian bytes of `values`.
pub fn encode_slice<T: Element>(values: &[T]) -> Vec<u8> {
    let mut out = vec![0u8; values.len() * T::WIDTH];
    for (v, chunk) in values.iter().zip(out.chunks_exact_mut(T::WIDTH)) {
        v.write_ne(chunk);
    }
    out
}

/// Values read from native-endian `bytes`. A trailing partial element
/// is ignored.
pub fn decode_slice<T: Element>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::WIDTH).map(T::read_ne).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_primitives() {
        assert!(f64::backs(ElementKind::Float64));
        assert!(u8::backs(ElementKind::Bool8));
        assert!(u16::backs(ElementKind::Char16));
        assert!(!i8::backs(ElementKind::Bool8));
        assert!(!u8::backs(ElementKind::Char16));
        assert!(!u16::backs(ElementKind::Int16));
    }

    #[test]
    fn int_conversion_from_specials() {
        assert_eq!(i32::from_f64(f64::INFINITY), 0);
        assert_eq!(u8::from_f64(f64::NAN), 0);
        assert_eq!(i8::from_f64(-3.9), -3);
        assert_eq!(u8::from_f64(300.0), 255);
        assert!(f32::from_f64(f64::NAN).is_nan());
    }

    #[test]
    fn int_conversion_saturates() {
        assert_eq!(i16::from_i128(1 << 40), i16::MAX);
        assert_eq!(u32::from_i128(-5), 0);
        assert_eq!(u64::from_i128(u64::MAX as i128), u64::MAX);
    }

    #[test]
    fn slices_roundtrip() {
        let v = [1.5f64, -2.0, f64::INFINITY];
        assert_eq!(decode_slice::<f64>(&encode_slice(&v)), v);
        let w = [7u16, 65535];
        assert_eq!(decode_slice::<u16>(&encode_slice(&w)), w);
    }

    struct Width;
    impl ElementVisitor for Width {
        type Output = usize;
        fn visit<T: Element>(self) -> usize {
            T::WIDTH
        }
    }

    #[test]
    fn visit_matches_kind_width() {
        for kind in ElementKind::ARRAY_KINDS {
            assert_eq!(kind.visit(Width), kind.width());
        }
        assert_eq!(ElementKind::Char16.visit(Width), Some(2));
        assert_eq!(ElementKind::Struct.visit(Width), None);
    }
}
