use super::*;

fn failed_ids(source: &str, target: &str, sl: Layer, tl: Layer) -> Vec<RuleId> {
    let catalog = RuleCatalog::standard();
    validate_dependency(&catalog, source, target, sl, tl)
        .failed
        .iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn test_catalog_is_complete() {
    let catalog = RuleCatalog::standard();
    assert_eq!(catalog.rules().len(), 10);
    assert_eq!(catalog.total_weight(), 56);

    let r1 = catalog.get(RuleId::R1).unwrap();
    assert_eq!(r1.severity, Severity::Critical);
    assert_eq!(r1.weight, 10);
    let r10 = catalog.get(RuleId::R10).unwrap();
    assert_eq!(r10.severity, Severity::Warning);
    assert_eq!(r10.weight, 1);
}

#[test]
fn test_downward_edge_is_compliant() {
    // auth (1) -> core (0)
    assert!(failed_ids("auth", "core", 1, 0).is_empty());
    // app (4) -> anything lower
    assert!(failed_ids("app", "billing", 4, 3).is_empty());
    assert!(failed_ids("app", "core", 4, 0).is_empty());
}

#[test]
fn test_upward_edge_breaks_layer_hierarchy() {
    let failed = failed_ids("auth", "billing", 1, 3);
    assert!(failed.contains(&RuleId::R2));

    let catalog = RuleCatalog::standard();
    let eval = validate_dependency(&catalog, "auth", "billing", 1, 3);
    let r2 = eval.failed.iter().find(|r| r.id == RuleId::R2).unwrap();
    assert_eq!(r2.kind, ViolationKind::Layer);
    assert_eq!(r2.severity, Severity::Critical);
}

#[test]
fn test_core_edge_is_not_short_circuited() {
    // core (0) -> auth (1): R1 and R2 both fail on the same edge
    let failed = failed_ids("core", "auth", 0, 1);
    assert_eq!(failed, vec![RuleId::R1, RuleId::R2]);
}

#[test]
fn test_core_to_core_breaks_isolation_only() {
    let failed = failed_ids("core", "shared", 0, 0);
    assert!(failed.contains(&RuleId::R1));
    assert!(failed.contains(&RuleId::R3));
    assert!(!failed.contains(&RuleId::R2));
}

#[test]
fn test_foundation_restriction() {
    // layer 1 peer: R3 and R4
    let failed = failed_ids("auth", "storage", 1, 1);
    assert_eq!(failed, vec![RuleId::R3, RuleId::R4]);
}

#[test]
fn test_domain_boundary_same_layer_exception() {
    // layer-2 peers are not rejected by R5, but R3 still applies
    let failed = failed_ids("profile", "resume", 2, 2);
    assert_eq!(failed, vec![RuleId::R3]);

    // layer 2 -> layer 3 fails R2 and R5
    let failed = failed_ids("profile", "editor", 2, 3);
    assert_eq!(failed, vec![RuleId::R2, RuleId::R5]);

    // layer 2 -> layer 1 is fine
    assert!(failed_ids("profile", "auth", 2, 1).is_empty());
}

#[test]
fn test_feature_and_app_peers() {
    assert_eq!(failed_ids("editor", "export", 3, 3), vec![RuleId::R3, RuleId::R6]);
    assert_eq!(failed_ids("web", "admin", 4, 4), vec![RuleId::R3, RuleId::R7]);
}

#[test]
fn test_self_reference_is_exempt() {
    for layer in 0..=4 {
        assert!(
            failed_ids("m", "m", layer, layer).is_empty(),
            "self edge on layer {layer} should pass"
        );
    }
}

#[test]
fn test_structural_rules_pass_on_edges() {
    let catalog = RuleCatalog::standard();
    let eval = validate_dependency(&catalog, "core", "auth", 0, 1);
    for id in [RuleId::R8, RuleId::R9, RuleId::R10] {
        assert!(eval.passed.iter().any(|r| r.id == id));
    }
    assert_eq!(eval.passed.len() + eval.failed.len(), 10);
    assert!(!eval.is_compliant());
}

#[test]
fn test_rule_lookup_by_kind_and_severity() {
    let catalog = RuleCatalog::standard();
    let id = |k, s| catalog.rule_for(k, s).map(|r| r.id);

    assert_eq!(id(ViolationKind::Forbidden, Severity::Critical), Some(RuleId::R1));
    assert_eq!(id(ViolationKind::Layer, Severity::Critical), Some(RuleId::R2));
    assert_eq!(id(ViolationKind::Peer, Severity::Major), Some(RuleId::R3));
    assert_eq!(id(ViolationKind::Peer, Severity::Minor), Some(RuleId::R7));
    assert_eq!(id(ViolationKind::Circular, Severity::Critical), Some(RuleId::R8));
    assert_eq!(id(ViolationKind::Forbidden, Severity::Warning), Some(RuleId::R10));
    assert_eq!(id(ViolationKind::Peer, Severity::Critical), None);
}

#[test]
fn test_custom_predicate_through_trait() {
    struct NoEdges;
    impl RulePredicate for NoEdges {
        fn is_compliant(&self, _edge: &EdgeContext<'_>) -> bool {
            false
        }
    }

    let edge = EdgeContext::new("a", "b", 1, 0);
    let predicates: Vec<Box<dyn RulePredicate>> =
        vec![Box::new(RuleCheck::LayerHierarchy), Box::new(NoEdges)];
    let results: Vec<bool> = predicates.iter().map(|p| p.is_compliant(&edge)).collect();
    assert_eq!(results, vec![true, false]);
}

#[test]
fn test_violation_messages_name_both_modules() {
    let catalog = RuleCatalog::standard();
    let edge = EdgeContext::new("core", "auth", 0, 1);
    for rule in validate_dependency(&catalog, "core", "auth", 0, 1).failed {
        let msg = rule.violation_message(&edge);
        assert!(msg.contains("core") && msg.contains("auth"), "{msg}");
    }
}
