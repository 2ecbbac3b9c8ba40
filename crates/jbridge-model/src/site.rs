use serde::Serialize;
use std::fmt;

use crate::signature::ClosureSignature;

/// Whether the API receiving an escaping closure parameter keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Retention {
    /// The receiver may store the closure past the call (the default for `@escaping`).
    Stored,
    /// The closure is escaping in type only; it never outlives the call.
    CallScoped,
}

/// Shape of the storage location behind a closure-valued property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StoreShape {
    /// One overwritable slot.
    Single,
    /// An accumulating list (add / remove-all).
    Collection,
}

/// Operations paired with a closure-valued property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyAccessors {
    pub store: StoreShape,
    /// Setting replaces the stored closure instead of adding to it.
    pub overwrites: bool,
    /// The operation that stores a closure (`setX` for slots, `addX` for collections).
    pub setter: Option<String>,
    pub trigger: Option<String>,
    pub clear: Option<String>,
}

impl PropertyAccessors {
    /// A single overwritable slot with only a setter.
    pub fn single(setter: impl Into<String>) -> Self {
        Self {
            store: StoreShape::Single,
            overwrites: true,
            setter: Some(setter.into()),
            trigger: None,
            clear: None,
        }
    }

    /// A collection store; `add` appends.
    pub fn collection(add: impl Into<String>) -> Self {
        Self {
            store: StoreShape::Collection,
            overwrites: false,
            setter: Some(add.into()),
            trigger: None,
            clear: None,
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn with_clear(mut self, clear: impl Into<String>) -> Self {
        self.clear = Some(clear.into());
        self
    }

    pub fn with_overwrite(mut self, overwrites: bool) -> Self {
        self.overwrites = overwrites;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SiteKind {
    /// A closure-typed parameter of a free function or method.
    Parameter {
        label: String,
        position: usize,
        retention: Retention,
    },
    /// A settable property holding a closure.
    Property(PropertyAccessors),
}

/// Where a closure appears in the origin API surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BindingSite {
    /// Enclosing type, or the module name for free functions.
    pub scope: String,
    /// Function name (parameter sites) or property name (property sites).
    pub member: String,
    pub signature: ClosureSignature,
    pub kind: SiteKind,
}

impl BindingSite {
    pub fn parameter(
        scope: impl Into<String>,
        function: impl Into<String>,
        label: impl Into<String>,
        position: usize,
        signature: ClosureSignature,
    ) -> Self {
        Self {
            scope: scope.into(),
            member: function.into(),
            signature,
            kind: SiteKind::Parameter {
                label: label.into(),
                position,
                retention: Retention::Stored,
            },
        }
    }

    /// Stored closures always escape, so the signature is marked escaping.
    pub fn property(
        scope: impl Into<String>,
        name: impl Into<String>,
        mut signature: ClosureSignature,
        accessors: PropertyAccessors,
    ) -> Self {
        signature.escaping = true;
        Self {
            scope: scope.into(),
            member: name.into(),
            signature,
            kind: SiteKind::Property(accessors),
        }
    }

    /// Marks a parameter site as never outliving its call. No effect on properties.
    pub fn call_scoped(mut self) -> Self {
        if let SiteKind::Parameter { retention, .. } = &mut self.kind {
            *retention = Retention::CallScoped;
        }
        self
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, SiteKind::Property(_))
    }

    pub fn accessors(&self) -> Option<&PropertyAccessors> {
        match &self.kind {
            SiteKind::Property(accessors) => Some(accessors),
            SiteKind::Parameter { .. } => None,
        }
    }

    /// The name the closure itself goes by: parameter label or property name.
    pub fn closure_name(&self) -> &str {
        match &self.kind {
            SiteKind::Parameter { label, .. } => label,
            SiteKind::Property(_) => &self.member,
        }
    }

    /// Path segments used for every derived name.
    pub fn path(&self) -> Vec<&str> {
        match &self.kind {
            SiteKind::Parameter { label, .. } => vec![&self.scope, &self.member, label],
            SiteKind::Property(_) => vec![&self.scope, &self.member],
        }
    }

    /// True when the closure ends up in a storage location that outlives the call.
    pub fn has_storage(&self) -> bool {
        match &self.kind {
            SiteKind::Parameter { retention, .. } => {
                self.signature.is_escaping() && *retention == Retention::Stored
            }
            SiteKind::Property(_) => true,
        }
    }
}

impl fmt::Display for BindingSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SiteKind::Parameter { label, .. } => {
                write!(f, "{}.{}({}:)", self.scope, self.member, label)
            }
            SiteKind::Property(_) => write!(f, "{}.{}", self.scope, self.member),
        }
    }
}
