use serde::Serialize;
use std::fmt;

use crate::signature::ClosureSignature;

/// A type as it appears on the origin side of the boundary.
///
/// Only a subset of these can cross the bridge (see [`SourceType::is_supported`]);
/// the rest exist so that declarations can be read faithfully and then rejected
/// with a precise error instead of being mangled into something they are not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SourceType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    /// Platform-width signed integer (64-bit on every supported target).
    Int,
    /// Platform-width unsigned integer.
    UInt,
    Void,
    String,
    /// Any other named type, passed across the boundary as an object reference.
    Nominal(String),

    // Unsupported shapes
    Float,
    Double,
    Optional(Box<SourceType>),
    Tuple(Vec<SourceType>),
    Array(Box<SourceType>),
    Closure(Box<ClosureSignature>),
}

impl SourceType {
    /// Maps a written type name to its model type. Unknown names are nominal.
    pub fn from_name(name: &str) -> SourceType {
        match name {
            "Bool" => SourceType::Bool,
            "Int8" => SourceType::Int8,
            "Int16" => SourceType::Int16,
            "Int32" => SourceType::Int32,
            "Int64" => SourceType::Int64,
            "UInt8" => SourceType::UInt8,
            "UInt16" => SourceType::UInt16,
            "UInt32" => SourceType::UInt32,
            "UInt64" => SourceType::UInt64,
            "Int" => SourceType::Int,
            "UInt" => SourceType::UInt,
            "Void" => SourceType::Void,
            "String" => SourceType::String,
            "Float" => SourceType::Float,
            "Double" => SourceType::Double,
            other => SourceType::Nominal(other.to_string()),
        }
    }

    /// True for types in the fixed set that can cross the bridge.
    pub fn is_supported(&self) -> bool {
        self.is_primitive() || self.is_void() || self.is_reference()
    }

    /// Integral widths and `Bool`.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SourceType::Bool
                | SourceType::Int8
                | SourceType::Int16
                | SourceType::Int32
                | SourceType::Int64
                | SourceType::UInt8
                | SourceType::UInt16
                | SourceType::UInt32
                | SourceType::UInt64
                | SourceType::Int
                | SourceType::UInt
        )
    }

    pub fn is_void(&self) -> bool {
        match self {
            SourceType::Void => true,
            SourceType::Tuple(elements) => elements.is_empty(),
            _ => false,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, SourceType::String | SourceType::Nominal(_))
    }

    pub fn as_closure(&self) -> Option<&ClosureSignature> {
        match self {
            SourceType::Closure(signature) => Some(signature),
            SourceType::Optional(inner) => inner.as_closure(),
            _ => None,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Bool => write!(f, "Bool"),
            SourceType::Int8 => write!(f, "Int8"),
            SourceType::Int16 => write!(f, "Int16"),
            SourceType::Int32 => write!(f, "Int32"),
            SourceType::Int64 => write!(f, "Int64"),
            SourceType::UInt8 => write!(f, "UInt8"),
            SourceType::UInt16 => write!(f, "UInt16"),
            SourceType::UInt32 => write!(f, "UInt32"),
            SourceType::UInt64 => write!(f, "UInt64"),
            SourceType::Int => write!(f, "Int"),
            SourceType::UInt => write!(f, "UInt"),
            SourceType::Void => write!(f, "Void"),
            SourceType::String => write!(f, "String"),
            SourceType::Nominal(name) => write!(f, "{}", name),
            SourceType::Float => write!(f, "Float"),
            SourceType::Double => write!(f, "Double"),
            SourceType::Optional(inner) => match inner.as_ref() {
                SourceType::Closure(_) => write!(f, "({})?", inner),
                _ => write!(f, "{}?", inner),
            },
            SourceType::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
            SourceType::Array(element) => write!(f, "[{}]", element),
            SourceType::Closure(signature) => write!(f, "{}", signature),
        }
    }
}
