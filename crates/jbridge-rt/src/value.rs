//! Values on either side of the boundary and the conversions between them.
//!
//! Unsigned origin integers travel in the signed target slot of the same
//! width, bit for bit; `UInt16` is the exception and maps to the unsigned
//! `char`. Boxing is not modelled: a `CompletableFuture<Long>` completes with
//! a [`TargetValue::Long`], and a `CompletableFuture<Void>` with `Null` or
//! `Void`.

use jbridge_model::SourceType;
use std::fmt;

use crate::error::{BridgeError, BridgeResult};

/// Opaque handle to an object owned by one side of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub u64);

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{:x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    /// Also carries `Int`.
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    /// Also carries `UInt`.
    UInt64(u64),
    String(String),
    Object(ObjectRef),
    Void,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetValue {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    String(String),
    Object(ObjectRef),
    Null,
    Void,
}

impl OriginValue {
    fn kind(&self) -> &'static str {
        match self {
            OriginValue::Bool(_) => "Bool",
            OriginValue::Int8(_) => "Int8",
            OriginValue::Int16(_) => "Int16",
            OriginValue::Int32(_) => "Int32",
            OriginValue::Int64(_) => "Int64",
            OriginValue::UInt8(_) => "UInt8",
            OriginValue::UInt16(_) => "UInt16",
            OriginValue::UInt32(_) => "UInt32",
            OriginValue::UInt64(_) => "UInt64",
            OriginValue::String(_) => "String",
            OriginValue::Object(_) => "object",
            OriginValue::Void => "Void",
        }
    }
}

impl TargetValue {
    fn kind(&self) -> &'static str {
        match self {
            TargetValue::Boolean(_) => "boolean",
            TargetValue::Byte(_) => "byte",
            TargetValue::Char(_) => "char",
            TargetValue::Short(_) => "short",
            TargetValue::Int(_) => "int",
            TargetValue::Long(_) => "long",
            TargetValue::String(_) => "java.lang.String",
            TargetValue::Object(_) => "object",
            TargetValue::Null => "null",
            TargetValue::Void => "void",
        }
    }
}

/// Origin → target for a value declared as `ty`.
pub fn marshal(value: OriginValue, ty: &SourceType) -> BridgeResult<TargetValue> {
    let converted = match (ty, value) {
        (SourceType::Bool, OriginValue::Bool(v)) => TargetValue::Boolean(v),
        (SourceType::Int8, OriginValue::Int8(v)) => TargetValue::Byte(v),
        (SourceType::UInt8, OriginValue::UInt8(v)) => TargetValue::Byte(v as i8),
        (SourceType::Int16, OriginValue::Int16(v)) => TargetValue::Short(v),
        (SourceType::UInt16, OriginValue::UInt16(v)) => TargetValue::Char(v),
        (SourceType::Int32, OriginValue::Int32(v)) => TargetValue::Int(v),
        (SourceType::UInt32, OriginValue::UInt32(v)) => TargetValue::Int(v as i32),
        (SourceType::Int64 | SourceType::Int, OriginValue::Int64(v)) => TargetValue::Long(v),
        (SourceType::UInt64 | SourceType::UInt, OriginValue::UInt64(v)) => {
            TargetValue::Long(v as i64)
        }
        (SourceType::String, OriginValue::String(s)) => TargetValue::String(s),
        (SourceType::Nominal(_), OriginValue::Object(r)) => TargetValue::Object(r),
        (ty, OriginValue::Void) if ty.is_void() => TargetValue::Void,
        (ty, value) => {
            return Err(BridgeError::TypeMismatch {
                expected: ty.to_string(),
                found: value.kind().to_string(),
            })
        }
    };
    Ok(converted)
}

/// Target → origin for a value declared as `ty` on the origin side.
pub fn unmarshal(value: TargetValue, ty: &SourceType) -> BridgeResult<OriginValue> {
    let converted = match (ty, value) {
        (SourceType::Bool, TargetValue::Boolean(v)) => OriginValue::Bool(v),
        (SourceType::Int8, TargetValue::Byte(v)) => OriginValue::Int8(v),
        (SourceType::UInt8, TargetValue::Byte(v)) => OriginValue::UInt8(v as u8),
        (SourceType::Int16, TargetValue::Short(v)) => OriginValue::Int16(v),
        (SourceType::UInt16, TargetValue::Char(v)) => OriginValue::UInt16(v),
        (SourceType::Int32, TargetValue::Int(v)) => OriginValue::Int32(v),
        (SourceType::UInt32, TargetValue::Int(v)) => OriginValue::UInt32(v as u32),
        (SourceType::Int64 | SourceType::Int, TargetValue::Long(v)) => OriginValue::Int64(v),
        (SourceType::UInt64 | SourceType::UInt, TargetValue::Long(v)) => {
            OriginValue::UInt64(v as u64)
        }
        (SourceType::String, TargetValue::String(s)) => OriginValue::String(s),
        (SourceType::Nominal(_), TargetValue::Object(r)) => OriginValue::Object(r),
        (ty, TargetValue::Void | TargetValue::Null) if ty.is_void() => OriginValue::Void,
        (ty, value) => {
            return Err(BridgeError::TypeMismatch {
                expected: ty.to_string(),
                found: value.kind().to_string(),
            })
        }
    };
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: OriginValue, ty: SourceType) {
        let target = marshal(value.clone(), &ty).unwrap();
        assert_eq!(unmarshal(target, &ty).unwrap(), value, "{}", ty);
    }

    #[test]
    fn test_round_trip_at_extremes() {
        round_trip(OriginValue::Bool(true), SourceType::Bool);
        round_trip(OriginValue::Int8(i8::MIN), SourceType::Int8);
        round_trip(OriginValue::UInt8(u8::MAX), SourceType::UInt8);
        round_trip(OriginValue::Int16(i16::MIN), SourceType::Int16);
        round_trip(OriginValue::UInt16(u16::MAX), SourceType::UInt16);
        round_trip(OriginValue::Int32(i32::MAX), SourceType::Int32);
        round_trip(OriginValue::UInt32(u32::MAX), SourceType::UInt32);
        round_trip(OriginValue::Int64(i64::MIN), SourceType::Int64);
        round_trip(OriginValue::Int64(-1), SourceType::Int);
        round_trip(OriginValue::UInt64(u64::MAX), SourceType::UInt64);
        round_trip(OriginValue::UInt64(1 << 63), SourceType::UInt);
        round_trip(OriginValue::String("héllo".into()), SourceType::String);
        round_trip(
            OriginValue::Object(ObjectRef(7)),
            SourceType::Nominal("CustomResult".into()),
        );
        round_trip(OriginValue::Void, SourceType::Void);
    }

    #[test]
    fn test_unsigned_reinterprets_bits() {
        assert_eq!(
            marshal(OriginValue::UInt32(u32::MAX), &SourceType::UInt32).unwrap(),
            TargetValue::Int(-1)
        );
        assert_eq!(
            marshal(OriginValue::UInt8(0x80), &SourceType::UInt8).unwrap(),
            TargetValue::Byte(i8::MIN)
        );
    }

    #[test]
    fn test_null_completes_void() {
        assert_eq!(
            unmarshal(TargetValue::Null, &SourceType::Void).unwrap(),
            OriginValue::Void
        );
        assert!(unmarshal(TargetValue::Null, &SourceType::String).is_err());
    }

    #[test]
    fn test_mismatch_is_reported() {
        let err = marshal(OriginValue::Int32(1), &SourceType::Int64).unwrap_err();
        assert_eq!(
            err,
            BridgeError::TypeMismatch {
                expected: "Int64".into(),
                found: "Int32".into()
            }
        );
    }
}
