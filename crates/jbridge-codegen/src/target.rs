//! Target-runtime side: the type table and the single-method callable interface.

use jbridge_model::{GenerationStrategy, SourceType};
use serde::Serialize;
use std::fmt;

use crate::error::{CodegenError, CodegenResult};
use crate::naming::{InterfaceName, SiteNames};

/// Canonical future type of the target runtime.
pub const FUTURE_CLASS: &str = "java.util.concurrent.CompletableFuture";
pub const STRING_CLASS: &str = "java.lang.String";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JavaPrimitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Void,
}

impl JavaPrimitive {
    pub fn keyword(self) -> &'static str {
        match self {
            JavaPrimitive::Boolean => "boolean",
            JavaPrimitive::Byte => "byte",
            JavaPrimitive::Char => "char",
            JavaPrimitive::Short => "short",
            JavaPrimitive::Int => "int",
            JavaPrimitive::Long => "long",
            JavaPrimitive::Void => "void",
        }
    }

    /// Reference form used where generics forbid primitives.
    pub fn boxed_class(self) -> &'static str {
        match self {
            JavaPrimitive::Boolean => "java.lang.Boolean",
            JavaPrimitive::Byte => "java.lang.Byte",
            JavaPrimitive::Char => "java.lang.Character",
            JavaPrimitive::Short => "java.lang.Short",
            JavaPrimitive::Int => "java.lang.Integer",
            JavaPrimitive::Long => "java.lang.Long",
            JavaPrimitive::Void => "java.lang.Void",
        }
    }

    pub fn jni_code(self) -> char {
        match self {
            JavaPrimitive::Boolean => 'Z',
            JavaPrimitive::Byte => 'B',
            JavaPrimitive::Char => 'C',
            JavaPrimitive::Short => 'S',
            JavaPrimitive::Int => 'I',
            JavaPrimitive::Long => 'J',
            JavaPrimitive::Void => 'V',
        }
    }
}

/// A type in the target runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TargetType {
    Primitive(JavaPrimitive),
    /// Fully qualified class name, dotted.
    Object(String),
    /// `CompletableFuture<T>`; `T` is always a reference type.
    Future(Box<TargetType>),
}

impl TargetType {
    pub fn void() -> Self {
        TargetType::Primitive(JavaPrimitive::Void)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TargetType::Primitive(JavaPrimitive::Void))
    }

    pub fn is_future(&self) -> bool {
        matches!(self, TargetType::Future(_))
    }

    /// Primitives (including `void`) become their wrapper class; references are unchanged.
    pub fn boxed(&self) -> TargetType {
        match self {
            TargetType::Primitive(p) => TargetType::Object(p.boxed_class().to_string()),
            other => other.clone(),
        }
    }

    /// Wraps `T` as `CompletableFuture<Boxed(T)>`.
    pub fn future_of(value: &TargetType) -> TargetType {
        TargetType::Future(Box::new(value.boxed()))
    }

    /// JNI field descriptor. Generic arguments are erased.
    pub fn jni_descriptor(&self) -> String {
        match self {
            TargetType::Primitive(p) => p.jni_code().to_string(),
            TargetType::Object(class) => format!("L{};", class.replace('.', "/")),
            TargetType::Future(_) => format!("L{};", FUTURE_CLASS.replace('.', "/")),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Primitive(p) => f.write_str(p.keyword()),
            TargetType::Object(class) => f.write_str(class),
            TargetType::Future(inner) => write!(f, "{}<{}>", FUTURE_CLASS, inner),
        }
    }
}

/// How a value changes representation when it crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Conversion {
    /// Same width and signedness.
    Direct,
    /// Unsigned origin value carried in a signed target slot of the same width.
    Reinterpret,
    /// Object reference; the value is a handle on both sides.
    Reference,
    /// No value.
    Unit,
}

/// One row of the fixed origin → target table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeMapping {
    pub source: SourceType,
    pub target: TargetType,
    pub conversion: Conversion,
}

/// The fixed per-type table. `None` for anything outside the supported set.
///
/// Nominal types are qualified into `package`.
pub fn map_type(ty: &SourceType, package: &str) -> Option<TypeMapping> {
    use Conversion::*;
    use JavaPrimitive as J;

    let (target, conversion) = match ty {
        SourceType::Bool => (TargetType::Primitive(J::Boolean), Direct),
        SourceType::Int8 => (TargetType::Primitive(J::Byte), Direct),
        SourceType::UInt8 => (TargetType::Primitive(J::Byte), Reinterpret),
        SourceType::Int16 => (TargetType::Primitive(J::Short), Direct),
        SourceType::UInt16 => (TargetType::Primitive(J::Char), Direct),
        SourceType::Int32 => (TargetType::Primitive(J::Int), Direct),
        SourceType::UInt32 => (TargetType::Primitive(J::Int), Reinterpret),
        SourceType::Int64 | SourceType::Int => (TargetType::Primitive(J::Long), Direct),
        SourceType::UInt64 | SourceType::UInt => (TargetType::Primitive(J::Long), Reinterpret),
        SourceType::String => (TargetType::Object(STRING_CLASS.to_string()), Reference),
        SourceType::Nominal(name) => {
            let class = if package.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", package, name)
            };
            (TargetType::Object(class), Reference)
        }
        ty if ty.is_void() => (TargetType::void(), Unit),
        _ => return None,
    };
    Some(TypeMapping {
        source: ty.clone(),
        target,
        conversion,
    })
}

pub(crate) fn map_or_err(ty: &SourceType, package: &str, site: &str) -> CodegenResult<TypeMapping> {
    map_type(ty, package).ok_or_else(|| CodegenError::UnmappedType {
        site: site.to_string(),
        ty: ty.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetParam {
    pub name: String,
    pub ty: TargetType,
}

/// The single abstract method of a generated interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetMethod {
    pub name: String,
    pub params: Vec<TargetParam>,
    pub ret: TargetType,
}

impl TargetMethod {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// JNI method descriptor, e.g. `(J)J`.
    pub fn jni_descriptor(&self) -> String {
        method_descriptor(self.params.iter().map(|p| &p.ty), &self.ret)
    }
}

pub(crate) fn method_descriptor<'a>(
    params: impl IntoIterator<Item = &'a TargetType>,
    ret: &TargetType,
) -> String {
    let mut descriptor = String::from("(");
    for ty in params {
        descriptor.push_str(&ty.jni_descriptor());
    }
    descriptor.push(')');
    descriptor.push_str(&ret.jni_descriptor());
    descriptor
}

/// A single-method callable interface type in the target runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetInterfaceDescriptor {
    pub name: InterfaceName,
    pub method: TargetMethod,
    pub strategy: GenerationStrategy,
}

impl TargetInterfaceDescriptor {
    pub fn returns_future(&self) -> bool {
        self.method.ret.is_future()
    }
}

/// Maps a closure signature onto the interface named by `names`.
///
/// The method shape does not depend on escaping: sync closures return `T`,
/// async closures return `CompletableFuture<Boxed(T)>`.
pub fn synthesize_interface(
    signature: &jbridge_model::ClosureSignature,
    strategy: GenerationStrategy,
    names: &SiteNames,
    package: &str,
    site: &str,
) -> CodegenResult<TargetInterfaceDescriptor> {
    let params = signature
        .params
        .iter()
        .enumerate()
        .map(|(index, param)| {
            map_or_err(&param.ty, package, site).map(|mapping| TargetParam {
                name: format!("_{}", index),
                ty: mapping.target,
            })
        })
        .collect::<CodegenResult<Vec<_>>>()?;

    let value = map_or_err(&signature.ret, package, site)?.target;
    let ret = if strategy.is_async() {
        TargetType::future_of(&value)
    } else {
        value
    };

    let descriptor = TargetInterfaceDescriptor {
        name: names.interface.clone(),
        method: TargetMethod {
            name: names.method.clone(),
            params,
            ret,
        },
        strategy,
    };
    log::trace!(
        "Interface {} :: {}{}",
        descriptor.name,
        descriptor.method.name,
        descriptor.method.jni_descriptor()
    );
    Ok(descriptor)
}
