//! The naming and ordering schema both generated sides agree on.
//!
//! The target side and the origin side are generated independently. They stay
//! call-compatible only because both read method names, parameter order and
//! JNI type encodings from here.

use jbridge_model::{BindingSite, SiteKind};
use serde::Serialize;

use crate::naming::SiteNames;
use crate::target::{
    method_descriptor, JavaPrimitive, TargetInterfaceDescriptor, TargetParam, TargetType,
};

/// How the origin side reaches the target callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallableRef {
    /// JNI binary class path of the interface.
    pub interface_class: String,
    pub method: String,
    /// JNI method descriptor, e.g. `(J)Ljava/util/concurrent/CompletableFuture;`.
    pub descriptor: String,
}

impl CallableRef {
    pub fn for_interface(interface: &TargetInterfaceDescriptor) -> Self {
        Self {
            interface_class: interface.name.jni_class_path(),
            method: interface.method.name.clone(),
            descriptor: interface.method.jni_descriptor(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntryRole {
    /// The function receiving the closure as a parameter.
    Call,
    Set,
    Trigger,
    Clear,
}

/// A `native` method on the target side and the origin symbol implementing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeEntry {
    pub role: EntryRole,
    /// Target-side method name (`$setCallback`).
    pub name: String,
    /// JNI class path of the declaring class.
    pub owner_class: String,
    /// Leading `selfPointer`, present only on property entries.
    pub has_receiver: bool,
    /// Parameters in call order, receiver included.
    pub params: Vec<TargetParam>,
    pub ret: TargetType,
    /// Exported origin-side symbol (JNI short name).
    pub symbol: String,
}

impl NativeEntry {
    fn new(
        role: EntryRole,
        member: &str,
        owner_class: &str,
        has_receiver: bool,
        mut params: Vec<TargetParam>,
        ret: TargetType,
    ) -> Self {
        if has_receiver {
            params.insert(
                0,
                TargetParam {
                    name: "selfPointer".to_string(),
                    ty: TargetType::Primitive(JavaPrimitive::Long),
                },
            );
        }
        let name = format!("${}", member);
        let symbol = mangle_jni_symbol(owner_class, &name);
        Self {
            role,
            name,
            owner_class: owner_class.to_string(),
            has_receiver,
            params,
            ret,
            symbol,
        }
    }

    pub fn descriptor(&self) -> String {
        method_descriptor(self.params.iter().map(|p| &p.ty), &self.ret)
    }
}

/// Everything both sides need to agree on for one binding site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DowncallContract {
    pub callable: CallableRef,
    pub entries: Vec<NativeEntry>,
}

impl DowncallContract {
    pub fn entry(&self, role: EntryRole) -> Option<&NativeEntry> {
        self.entries.iter().find(|entry| entry.role == role)
    }
}

/// Resolves the contract for `site`.
///
/// Parameter sites get one `Call` entry whose only known parameter is the
/// interface object; the receiving function's other parameters belong to the
/// templating layer. Property sites get the subset of set/trigger/clear they
/// declare. Only property entries take a receiver; the trigger's remaining
/// parameters follow the closure's parameter order.
pub fn resolve_contract(
    site: &BindingSite,
    interface: &TargetInterfaceDescriptor,
    names: &SiteNames,
) -> DowncallContract {
    let callable = CallableRef::for_interface(interface);
    let closure_param = TargetParam {
        name: site.closure_name().to_string(),
        ty: TargetType::Object(interface.name.binary_name()),
    };

    let entries = match &site.kind {
        SiteKind::Parameter { .. } => vec![NativeEntry::new(
            EntryRole::Call,
            &site.member,
            &names.scope_class,
            false,
            vec![closure_param],
            TargetType::void(),
        )],
        SiteKind::Property(accessors) => {
            let mut entries = Vec::new();
            if let Some(setter) = &accessors.setter {
                entries.push(NativeEntry::new(
                    EntryRole::Set,
                    setter,
                    &names.scope_class,
                    true,
                    vec![closure_param],
                    TargetType::void(),
                ));
            }
            if let Some(trigger) = &accessors.trigger {
                entries.push(NativeEntry::new(
                    EntryRole::Trigger,
                    trigger,
                    &names.scope_class,
                    true,
                    interface.method.params.clone(),
                    interface.method.ret.clone(),
                ));
            }
            if let Some(clear) = &accessors.clear {
                entries.push(NativeEntry::new(
                    EntryRole::Clear,
                    clear,
                    &names.scope_class,
                    true,
                    Vec::new(),
                    TargetType::void(),
                ));
            }
            entries
        }
    };

    for entry in &entries {
        log::trace!("{}: {:?} entry {} -> {}", site, entry.role, entry.name, entry.symbol);
    }
    DowncallContract { callable, entries }
}

/// JNI short-name symbol: `Java_<class>_<method>`.
pub fn mangle_jni_symbol(class_path: &str, method: &str) -> String {
    format!("Java_{}_{}", mangle_jni_component(class_path), mangle_jni_component(method))
}

/// Escapes one name component per the JNI symbol rules.
pub fn mangle_jni_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' => out.push('_'),
            '_' => out.push_str("_1"),
            ';' => out.push_str("_2"),
            '[' => out.push_str("_3"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("_0{:04x}", unit));
                }
            }
        }
    }
    out
}
