use expect_test::expect;
use jbridge_model::{BindingSite, SiteKind, StoreShape};
use jbridge_syntax::{parse_closure_type, parse_declarations, SyntaxError};

const FIXTURE: &str = include_str!("fixtures/escaping_closures.swift");

fn describe(sites: &[BindingSite]) -> String {
    sites
        .iter()
        .map(|site| {
            let kind = match &site.kind {
                SiteKind::Parameter { position, .. } => format!("param #{}", position),
                SiteKind::Property(acc) => format!(
                    "{:?} set={} trigger={} clear={}",
                    acc.store,
                    acc.setter.as_deref().unwrap_or("-"),
                    acc.trigger.as_deref().unwrap_or("-"),
                    acc.clear.as_deref().unwrap_or("-"),
                ),
            };
            format!("{} [{}] {} :: {}\n", site, site.signature.strategy(), kind, site.signature)
        })
        .collect()
}

#[test]
fn test_fixture_sites() {
    let sites = parse_declarations(FIXTURE, "SwiftModule").unwrap();
    expect![[r#"
        CustomerSupportClient._getUserLoginStatus [SYNC_ESCAPING] Single set=set_getUserLoginStatus trigger=getUserLoginStatus clear=- :: @escaping () -> Bool
        CustomerSupportClient._getCustomerSupportProfile [ASYNC_ESCAPING] Single set=set_getCustomerSupportProfile trigger=getCustomerSupportProfile clear=- :: @escaping (String) async -> String
        CustomerSupportClient.make(getUserLoginStatus:) [SYNC_ESCAPING] param #0 :: @escaping () -> Bool
        CustomerSupportClient.make(getCustomerSupportProfile:) [ASYNC_ESCAPING] param #1 :: @escaping (String) async -> String
        CallbackManager.callback [SYNC_ESCAPING] Single set=setCallback trigger=triggerCallback clear=clearCallback :: @escaping () -> Void
        CallbackManager.intCallback [ASYNC_ESCAPING] Single set=setIntCallback trigger=triggerIntCallback clear=- :: @escaping (Int64) async -> CustomResult
        CallbackManager.make(a:) [SYNC_ESCAPING] param #0 :: @escaping () -> Void
        CallbackManager.make(b:) [ASYNC_ESCAPING] param #1 :: @escaping (Int64) async -> CustomResult
        SwiftModule.delayedExecution(closure:) [SYNC_ESCAPING] param #0 :: @escaping (Int64) -> Int64
        ClosureStore.closures [SYNC_ESCAPING] Collection set=addClosure trigger=executeAll clear=clear :: @escaping () -> Void
        SwiftModule.multipleEscapingClosures(onSuccess:) [SYNC_ESCAPING] param #0 :: @escaping (Int64) -> Void
        SwiftModule.multipleEscapingClosures(onFailure:) [SYNC_ESCAPING] param #1 :: @escaping (Int64) -> Void
        SwiftModule.withScopedCallback(body:) [SYNC_NONESCAPING] param #0 :: (Int32) -> Int32
    "#]]
    .assert_eq(&describe(&sites));
}

#[test]
fn test_setter_parameters_fold_into_property() {
    let sites = parse_declarations(FIXTURE, "SwiftModule").unwrap();
    assert!(sites.iter().all(|s| s.member != "setCallback"));
    assert!(sites.iter().all(|s| s.member != "addClosure"));

    let store = sites.iter().find(|s| s.member == "closures").unwrap();
    assert_eq!(store.accessors().unwrap().store, StoreShape::Collection);
    assert!(!store.accessors().unwrap().overwrites);
}

#[test]
fn test_collection_adders_match_their_store() {
    let source = r#"
        public class Bus {
          private var handlers: [() -> Void] = []
          private var observers: [(Int64) -> Void] = []

          public init() {}

          public func addObserver(observer: @escaping (Int64) -> Void) {
            observers.append(observer)
          }

          public func addHandler(handler: @escaping () -> Void) {
            handlers.append(handler)
          }

          public func executeAll() {}
        }
    "#;
    let sites = parse_declarations(source, "M").unwrap();
    let setter = |member: &str| {
        let site = sites.iter().find(|s| s.member == member).unwrap();
        site.accessors().unwrap().setter.clone()
    };
    assert_eq!(setter("handlers").as_deref(), Some("addHandler"));
    assert_eq!(setter("observers").as_deref(), Some("addObserver"));
    assert!(sites.iter().all(|s| !s.member.starts_with("add")));
}

#[test]
fn test_private_declarations_are_skipped() {
    let source = r#"
        public class Hidden {
            private var onTick: (() -> Void)?
            private func schedule(_ work: @escaping () -> Void) {}
            fileprivate func other(work: @escaping () -> Void) {}
        }
    "#;
    assert!(parse_declarations(source, "M").unwrap().is_empty());
}

#[test]
fn test_optional_parameter_closure_escapes() {
    let source = "public func observe(handler: ((Bool) -> Void)?) {}";
    let sites = parse_declarations(source, "M").unwrap();
    assert_eq!(sites.len(), 1);
    assert!(sites[0].signature.escaping);
    assert!(sites[0].has_storage());
}

#[test]
fn test_unsupported_shapes_are_still_read() {
    // Rejection happens at generation time, with a precise error.
    let source = r#"
        public func load(completion: @escaping (Int64) throws -> Void) {}
        public func each(_ f: @escaping (Int...) -> Void) {}
        public func nested(make: @escaping () -> () -> Void) {}
    "#;
    let sites = parse_declarations(source, "M").unwrap();
    assert_eq!(sites.len(), 3);
    assert!(sites[0].signature.throws);
    assert!(sites[1].signature.params[0].variadic);
    assert!(sites[2].signature.ret.as_closure().is_some());
}

#[test]
fn test_parse_closure_type() {
    let sig = parse_closure_type("@escaping (Int64) async -> Int64").unwrap();
    assert!(sig.escaping && sig.is_async);

    let err = parse_closure_type("Int64").unwrap_err();
    assert!(matches!(err, SyntaxError::NotAClosure { .. }));
}

#[test]
fn test_lexer_error_carries_span() {
    let err = parse_declarations("public func f(x: Int) { let c = 'x' }", "M").unwrap_err();
    match err {
        SyntaxError::Lexer { span, .. } => assert_eq!(span.offset(), 32),
        other => panic!("unexpected error {:?}", other),
    }
}
