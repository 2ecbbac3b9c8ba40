use jbridge_model::SourceType;
use miette::SourceSpan;

/// Declarations the reader keeps from one source file. Bodies, expressions
/// and anything without a type signature are dropped during parsing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Type(TypeDecl),
    Func(FuncDecl),
    Var(VarDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Actor,
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Public,
    #[default]
    Internal,
    Private,
}

impl Visibility {
    pub fn is_exported(self) -> bool {
        self != Visibility::Private
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub visibility: Visibility,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Argument label; `None` for `_`.
    pub label: Option<String>,
    pub name: String,
    pub ty: SourceType,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub params: Vec<Param>,
    pub is_async: bool,
    pub throws: bool,
    pub ret: SourceType,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub mutable: bool,
    /// `None` when the type is only inferred from an initializer.
    pub ty: Option<SourceType>,
    /// Has a getter body rather than storage.
    pub computed: bool,
    pub span: SourceSpan,
}
