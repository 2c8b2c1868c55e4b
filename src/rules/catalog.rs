//! The fixed rule catalog

use super::{Rule, RuleCheck, RuleId, StructuralCheck, CORE_LAYER};
use crate::models::{Severity, ViolationKind};

/// Immutable set of architecture rules, declared once
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleCatalog {
    /// The ten standard layering rules
    pub fn standard() -> Self {
        let rules = vec![
            Rule {
                id: RuleId::R1,
                name: "core-isolation",
                description: "The layer-0 module must not depend on any other module, including other layer-0 modules",
                severity: Severity::Critical,
                weight: 10,
                kind: ViolationKind::Forbidden,
                check: RuleCheck::CoreIsolation {
                    core_layer: CORE_LAYER,
                },
            },
            Rule {
                id: RuleId::R2,
                name: "layer-hierarchy",
                description: "Modules may only depend on modules of the same or a lower layer",
                severity: Severity::Critical,
                weight: 8,
                kind: ViolationKind::Layer,
                check: RuleCheck::LayerHierarchy,
            },
            Rule {
                id: RuleId::R3,
                name: "no-peer",
                description: "Different modules on the same layer must not depend on each other",
                severity: Severity::Major,
                weight: 6,
                kind: ViolationKind::Peer,
                check: RuleCheck::NoPeer,
            },
            Rule {
                id: RuleId::R4,
                name: "foundation-restriction",
                description: "Layer-1 modules may depend only on layer 0",
                severity: Severity::Major,
                weight: 7,
                kind: ViolationKind::Layer,
                check: RuleCheck::LayerCeiling {
                    source_layer: 1,
                    max_target_layer: 0,
                    allow_same_layer: false,
                },
            },
            Rule {
                id: RuleId::R5,
                name: "domain-boundary",
                description: "Layer-2 modules must not depend above layer 1 (layer-2 to layer-2 edges are not rejected by this rule)",
                severity: Severity::Minor,
                weight: 4,
                kind: ViolationKind::Layer,
                check: RuleCheck::LayerCeiling {
                    source_layer: 2,
                    max_target_layer: 1,
                    allow_same_layer: true,
                },
            },
            Rule {
                id: RuleId::R6,
                name: "feature-independence",
                description: "Layer-3 feature modules must not depend on other layer-3 modules",
                severity: Severity::Major,
                weight: 5,
                kind: ViolationKind::Peer,
                check: RuleCheck::PeerIsolation { layer: 3 },
            },
            Rule {
                id: RuleId::R7,
                name: "application-orchestration",
                description: "Layer-4 applications may use any lower layer but not other layer-4 modules",
                severity: Severity::Minor,
                weight: 3,
                kind: ViolationKind::Peer,
                check: RuleCheck::PeerIsolation { layer: 4 },
            },
            Rule {
                id: RuleId::R8,
                name: "no-circular",
                description: "The module graph must not contain dependency cycles",
                severity: Severity::Critical,
                weight: 10,
                kind: ViolationKind::Circular,
                check: RuleCheck::Structural(StructuralCheck::NoCircular),
            },
            Rule {
                id: RuleId::R9,
                name: "barrel-export",
                description: "Each module should expose a single public entry point (index file)",
                severity: Severity::Minor,
                weight: 2,
                kind: ViolationKind::Forbidden,
                check: RuleCheck::Structural(StructuralCheck::BarrelExport),
            },
            Rule {
                id: RuleId::R10,
                name: "external-dependency-minimization",
                description: "Layer-0 modules should keep external package dependencies to a minimum",
                severity: Severity::Warning,
                weight: 1,
                kind: ViolationKind::Forbidden,
                check: RuleCheck::Structural(StructuralCheck::ExternalMinimization),
            },
        ];
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Sum of all rule weights; the score denominator of every module
    pub fn total_weight(&self) -> u32 {
        self.rules.iter().map(|r| r.weight).sum()
    }

    /// Rule charged for a violation that only carries kind and severity.
    ///
    /// Peer violations are grouped by severity: major maps to R3, minor to R7.
    pub fn rule_for(&self, kind: ViolationKind, severity: Severity) -> Option<&Rule> {
        let id = match (kind, severity) {
            (ViolationKind::Forbidden, Severity::Critical) => RuleId::R1,
            (ViolationKind::Layer, Severity::Critical) => RuleId::R2,
            (ViolationKind::Peer, Severity::Major) => RuleId::R3,
            (ViolationKind::Layer, Severity::Major) => RuleId::R4,
            (ViolationKind::Layer, Severity::Minor) => RuleId::R5,
            (ViolationKind::Peer, Severity::Minor) => RuleId::R7,
            (ViolationKind::Circular, _) => RuleId::R8,
            (ViolationKind::Forbidden, Severity::Minor) => RuleId::R9,
            (ViolationKind::Forbidden, Severity::Warning) => RuleId::R10,
            _ => return None,
        };
        self.get(id)
    }
}
