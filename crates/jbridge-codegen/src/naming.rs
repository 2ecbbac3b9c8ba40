use fxhash::FxHashSet;
use jbridge_model::BindingSite;
use serde::Serialize;
use std::fmt;

use crate::config::GeneratorConfig;

/// Fully qualified name of a generated target-runtime interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InterfaceName {
    pub package: String,
    /// Enclosing classes, outermost first (`SwiftModule`, `setCallback`).
    pub enclosing: Vec<String>,
    pub simple: String,
}

impl InterfaceName {
    /// Dotted source form: `com.example.swift.SwiftModule.setCallback.callback`.
    pub fn qualified(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.package.is_empty() {
            parts.push(&self.package);
        }
        parts.extend(self.enclosing.iter().map(String::as_str));
        parts.push(&self.simple);
        parts.join(".")
    }

    /// Binary name (`Class.getName()` form): `com.example.swift.SwiftModule$setCallback$callback`.
    pub fn binary_name(&self) -> String {
        self.jni_class_path().replace('/', ".")
    }

    /// Binary class path used by JNI: `com/example/swift/SwiftModule$setCallback$callback`.
    pub fn jni_class_path(&self) -> String {
        let mut nested = self.enclosing.clone();
        nested.push(self.simple.clone());
        let binary = nested.join("$");
        if self.package.is_empty() {
            binary
        } else {
            format!("{}/{}", self.package.replace('.', "/"), binary)
        }
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// Every name derived for one binding site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteNames {
    pub interface: InterfaceName,
    /// JNI class path of the scope's class, owner of the native entry points.
    pub scope_class: String,
    pub capability: String,
    pub adapter: String,
    /// Variable holding the lifetime holder in generated origin code.
    pub holder: String,
    pub method: String,
}

/// Names handed out during one generation run.
///
/// The registry is the only state carried between declarations. It must be
/// reset before each run so that names never depend on an earlier run.
/// Target-side interface names and origin-side type names are tracked
/// separately: distinct paths can join to the same origin name
/// (`on_event` + `handler` vs `on` + `event_handler`).
#[derive(Debug, Default)]
pub struct NameRegistry {
    interfaces: FxHashSet<String>,
    origin: FxHashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.interfaces.clear();
        self.origin.clear();
    }

    /// Number of sites named so far.
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Reserves the first suffix (`""`, `_1`, `_2`, ...) under which both the
    /// interface name and the joined origin name are still free.
    fn claim(&mut self, interface: &str, origin: &str) -> String {
        let mut disambiguator = 0usize;
        loop {
            let suffix = if disambiguator == 0 {
                String::new()
            } else {
                format!("_{}", disambiguator)
            };
            let interface_name = format!("{}{}", interface, suffix);
            let origin_name = format!("{}{}", origin, suffix);
            if !self.interfaces.contains(&interface_name) && !self.origin.contains(&origin_name) {
                self.interfaces.insert(interface_name);
                self.origin.insert(origin_name);
                return suffix;
            }
            disambiguator += 1;
        }
    }

    /// Derives and reserves all names for `site`.
    ///
    /// A site whose interface name or joined origin name is already taken in
    /// this run (overloads, underscored members) gets `_1`, `_2`, ... appended
    /// to the interface, capability and adapter names.
    pub fn resolve(&mut self, site: &BindingSite, config: &GeneratorConfig) -> SiteNames {
        let path = site.path();
        let (enclosing, simple) = match path.split_last() {
            Some((last, rest)) => (
                rest.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                last.to_string(),
            ),
            None => (Vec::new(), site.closure_name().to_string()),
        };
        let base = InterfaceName {
            package: config.package.clone(),
            enclosing,
            simple,
        };

        let joined = path.join("_");
        let suffix = self.claim(&base.qualified(), &joined);
        if !suffix.is_empty() {
            log::debug!(
                "Name collision on {} ({}); using suffix {}",
                base.qualified(),
                joined,
                suffix
            );
        }

        let interface = InterfaceName {
            simple: format!("{}{}", base.simple, suffix),
            ..base
        };
        let scope_class = InterfaceName {
            package: config.package.clone(),
            enclosing: Vec::new(),
            simple: site.scope.clone(),
        }
        .jni_class_path();

        SiteNames {
            interface,
            scope_class,
            capability: format!("{}_{}{}", config.capability_prefix, joined, suffix),
            adapter: format!("{}_{}{}", config.adapter_prefix, joined, suffix),
            holder: format!("closureContext_{}$", site.closure_name()),
            method: config.interface_method.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jbridge_model::{ClosureSignature, PropertyAccessors, SourceType};

    fn site(function: &str) -> BindingSite {
        BindingSite::parameter(
            "SwiftModule",
            function,
            "callback",
            0,
            ClosureSignature::new([], SourceType::Void).escaping(),
        )
    }

    #[test]
    fn test_parameter_names() {
        let mut registry = NameRegistry::new();
        let names = registry.resolve(&site("setCallback"), &GeneratorConfig::default());
        assert_eq!(
            names.interface.qualified(),
            "com.example.swift.SwiftModule.setCallback.callback"
        );
        assert_eq!(
            names.interface.jni_class_path(),
            "com/example/swift/SwiftModule$setCallback$callback"
        );
        assert_eq!(names.scope_class, "com/example/swift/SwiftModule");
        assert_eq!(names.capability, "_SwiftClosure_SwiftModule_setCallback_callback");
        assert_eq!(names.adapter, "_SwiftClosureWrapper_SwiftModule_setCallback_callback");
        assert_eq!(names.holder, "closureContext_callback$");
        assert_eq!(names.method, "apply");
    }

    #[test]
    fn test_property_names() {
        let mut registry = NameRegistry::new();
        let site = BindingSite::property(
            "CallbackManager",
            "intCallback",
            ClosureSignature::new([SourceType::Int64], SourceType::Void),
            PropertyAccessors::single("setIntCallback"),
        );
        let names = registry.resolve(&site, &GeneratorConfig::default());
        assert_eq!(
            names.interface.qualified(),
            "com.example.swift.CallbackManager.intCallback"
        );
        assert_eq!(names.capability, "_SwiftClosure_CallbackManager_intCallback");
    }

    #[test]
    fn test_collisions_are_suffixed_and_reset_clears() {
        let config = GeneratorConfig::default();
        let mut registry = NameRegistry::new();
        let first = registry.resolve(&site("setCallback"), &config);
        let second = registry.resolve(&site("setCallback"), &config);
        let other = registry.resolve(&site("setOther"), &config);

        assert_eq!(first.interface.simple, "callback");
        assert_eq!(second.interface.simple, "callback_1");
        assert_eq!(second.capability, "_SwiftClosure_SwiftModule_setCallback_callback_1");
        assert_eq!(other.interface.simple, "callback");

        registry.reset();
        assert!(registry.is_empty());
        let again = registry.resolve(&site("setCallback"), &config);
        assert_eq!(again, first);
    }

    #[test]
    fn test_underscored_paths_do_not_share_origin_names() {
        let config = GeneratorConfig::default();
        let signature = ClosureSignature::new([], SourceType::Void).escaping();
        let mut registry = NameRegistry::new();
        let a = registry.resolve(
            &BindingSite::parameter("SwiftModule", "on_event", "handler", 0, signature.clone()),
            &config,
        );
        let b = registry.resolve(
            &BindingSite::parameter("SwiftModule", "on", "event_handler", 0, signature),
            &config,
        );

        assert_eq!(a.capability, "_SwiftClosure_SwiftModule_on_event_handler");
        assert_eq!(b.capability, "_SwiftClosure_SwiftModule_on_event_handler_1");
        assert_eq!(b.adapter, "_SwiftClosureWrapper_SwiftModule_on_event_handler_1");
        assert_eq!(b.interface.simple, "event_handler_1");
        assert_ne!(a.adapter, b.adapter);
        assert_eq!(registry.len(), 2);
    }
}
