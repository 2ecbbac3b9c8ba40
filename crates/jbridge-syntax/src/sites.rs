//! Binding-site extraction from parsed declarations.
//!
//! Closure-typed parameters of exported functions become parameter sites.
//! Closure-typed stored properties become property sites; their set, trigger
//! and clear operations are found by naming convention among the methods of
//! the same type:
//!
//! | property            | setter        | trigger                          | clear                 |
//! |---------------------|---------------|----------------------------------|-----------------------|
//! | `x: (() -> T)?`     | `setX`        | `triggerX`, or `x` for `_x`      | `clearX`              |
//! | `xs: [() -> T]`     | `add…`        | `executeAll`, `triggerXs`        | `clear`, `removeAll`  |
//!
//! A method claimed as a setter does not produce its own parameter site.

use fxhash::FxHashSet;
use jbridge_model::{BindingSite, ClosureSignature, PropertyAccessors, SourceType, StoreShape};

use crate::ast::{FuncDecl, Item, SourceFile, VarDecl};

/// Walks `file` and returns every binding site in declaration order.
/// Free functions are scoped to `module`.
pub fn extract_sites(file: &SourceFile, module: &str) -> Vec<BindingSite> {
    let mut sites = Vec::new();
    collect_scope(module, &file.items, &mut sites);
    log::debug!("Extracted {} binding site(s) from module {}", sites.len(), module);
    sites
}

fn collect_scope(scope: &str, items: &[Item], sites: &mut Vec<BindingSite>) {
    let funcs: Vec<&FuncDecl> = items
        .iter()
        .filter_map(|item| match item {
            Item::Func(func) if func.visibility.is_exported() => Some(func),
            _ => None,
        })
        .collect();

    let properties: Vec<(&VarDecl, ClosureSignature, PropertyAccessors)> = items
        .iter()
        .filter_map(|item| match item {
            Item::Var(var) => property_site(var, &funcs).map(|(sig, acc)| (var, sig, acc)),
            _ => None,
        })
        .collect();

    let claimed: FxHashSet<String> = properties
        .iter()
        .filter_map(|(_, _, accessors)| accessors.setter.clone())
        .collect();

    let mut properties = properties.into_iter().peekable();
    for item in items {
        match item {
            Item::Type(decl) => collect_scope(&decl.name, &decl.items, sites),
            Item::Var(var) => {
                if let Some((_, signature, accessors)) =
                    properties.next_if(|(candidate, _, _)| std::ptr::eq(*candidate, var))
                {
                    log::trace!("{}.{}: closure property", scope, var.name);
                    sites.push(BindingSite::property(scope, &var.name, signature, accessors));
                }
            }
            Item::Func(func) => {
                if !func.visibility.is_exported() || claimed.contains(&func.name) {
                    continue;
                }
                for (position, param) in func.params.iter().enumerate() {
                    let Some(signature) = closure_of(&param.ty) else {
                        continue;
                    };
                    let label = param.label.as_deref().unwrap_or(&param.name);
                    log::trace!("{}.{}({}:): closure parameter", scope, func.name, label);
                    sites.push(BindingSite::parameter(
                        scope,
                        &func.name,
                        label,
                        position,
                        signature,
                    ));
                }
            }
        }
    }
}

/// The closure carried by a parameter type. Optional closures are implicitly
/// escaping.
fn closure_of(ty: &SourceType) -> Option<ClosureSignature> {
    match ty {
        SourceType::Closure(signature) => Some(signature.as_ref().clone()),
        SourceType::Optional(inner) => closure_of(inner).map(ClosureSignature::escaping),
        _ => None,
    }
}

fn property_site(var: &VarDecl, funcs: &[&FuncDecl]) -> Option<(ClosureSignature, PropertyAccessors)> {
    if var.computed || var.is_static {
        return None;
    }
    let ty = var.ty.as_ref()?;
    let find = |name: &str| funcs.iter().find(|f| f.name == name).map(|f| f.name.clone());
    let cap = capitalize(&var.name);

    if let SourceType::Array(element) = ty {
        let signature = closure_of(element)?;
        let add = adder(&var.name, &signature, funcs)?;
        let accessors = PropertyAccessors {
            store: StoreShape::Collection,
            overwrites: false,
            setter: Some(add),
            trigger: find("executeAll").or_else(|| find(&format!("trigger{}", cap))),
            clear: find(&format!("clear{}", cap))
                .or_else(|| find("clear"))
                .or_else(|| find("removeAll")),
        };
        return Some((signature, accessors));
    }

    let signature = closure_of(ty)?;
    let setter_name = format!("set{}", cap);
    let setter = match find(&setter_name) {
        Some(setter) => Some(setter),
        // a visible mutable property is settable through its own accessor
        None if var.mutable && var.visibility.is_exported() => Some(setter_name),
        None => None,
    };
    let trigger = find(&format!("trigger{}", cap)).or_else(|| {
        var.name
            .strip_prefix('_')
            .filter(|plain| !plain.is_empty())
            .and_then(|plain| find(plain))
    });
    let clear = find(&format!("clear{}", cap));

    // unreachable from the target side
    if setter.is_none() && trigger.is_none() && clear.is_none() {
        return None;
    }

    let accessors = PropertyAccessors {
        store: StoreShape::Single,
        overwrites: setter.is_some(),
        setter,
        trigger,
        clear,
    };
    Some((signature, accessors))
}

/// The `add…` method feeding a collection property: one parameter whose
/// closure shape matches the element type. `add<Name>` and
/// `add<Name minus trailing s>` win over any other matching `add…` method.
fn adder(property: &str, element: &ClosureSignature, funcs: &[&FuncDecl]) -> Option<String> {
    let element = element.clone().escaping();
    let matching: Vec<&FuncDecl> = funcs
        .iter()
        .copied()
        .filter(|f| {
            f.name.starts_with("add")
                && f.params.len() == 1
                && closure_of(&f.params[0].ty).map(ClosureSignature::escaping) == Some(element.clone())
        })
        .collect();

    let plural = capitalize(property);
    let singular = plural.strip_suffix('s').unwrap_or(&plural);
    let preferred = [format!("add{}", plural), format!("add{}", singular)];
    matching
        .iter()
        .find(|f| preferred.contains(&f.name))
        .or_else(|| matching.first())
        .map(|f| f.name.clone())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("callback"), "Callback");
        assert_eq!(capitalize("_x"), "_x");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_optional_closure_parameter_escapes() {
        let ty = SourceType::Optional(Box::new(SourceType::Closure(Box::new(
            ClosureSignature::new([], SourceType::Void),
        ))));
        assert!(closure_of(&ty).unwrap().escaping);
    }
}
