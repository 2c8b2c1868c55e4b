//! Architecture rule engine
//!
//! Holds the fixed ten-rule catalog and evaluates module-to-module edges
//! against it. Rules are plain data ([`RuleCheck`] carries the layer
//! parameters) so the catalog can be listed, tested and reported on.
//!
//! # Catalog
//!
//! | id  | name                              | severity | weight |
//! |-----|-----------------------------------|----------|--------|
//! | R1  | core-isolation                    | critical | 10     |
//! | R2  | layer-hierarchy                   | critical | 8      |
//! | R3  | no-peer                           | major    | 6      |
//! | R4  | foundation-restriction            | major    | 7      |
//! | R5  | domain-boundary                   | minor    | 4      |
//! | R6  | feature-independence              | major    | 5      |
//! | R7  | application-orchestration         | minor    | 3      |
//! | R8  | no-circular                       | critical | 10     |
//! | R9  | barrel-export                     | minor    | 2      |
//! | R10 | external-dependency-minimization  | warning  | 1      |
//!
//! Every rule is evaluated on every edge; evaluation never stops at the
//! first failure, so one import can break several rules at once.

mod catalog;

pub use catalog::RuleCatalog;

use crate::models::{Layer, Severity, ViolationKind};
use serde::{Deserialize, Serialize};

/// The foundational layer; modules here may not depend on other modules
pub const CORE_LAYER: Layer = 0;

/// Identifier of a catalog rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::R1 => "R1",
            RuleId::R2 => "R2",
            RuleId::R3 => "R3",
            RuleId::R4 => "R4",
            RuleId::R5 => "R5",
            RuleId::R6 => "R6",
            RuleId::R7 => "R7",
            RuleId::R8 => "R8",
            RuleId::R9 => "R9",
            RuleId::R10 => "R10",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One directed module-to-module edge, as seen by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeContext<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub source_layer: Layer,
    pub target_layer: Layer,
}

impl<'a> EdgeContext<'a> {
    pub fn new(source: &'a str, target: &'a str, source_layer: Layer, target_layer: Layer) -> Self {
        Self {
            source,
            target,
            source_layer,
            target_layer,
        }
    }

    fn is_same_module(&self) -> bool {
        self.source == self.target
    }

    fn is_same_layer(&self) -> bool {
        self.source_layer == self.target_layer
    }
}

/// Strategy interface for edge predicates.
///
/// [`RuleCheck`] is the built-in implementation; anything else that can
/// judge an edge (a custom rule, a test double) implements this too.
pub trait RulePredicate {
    /// `true` when the edge complies with the rule
    fn is_compliant(&self, edge: &EdgeContext<'_>) -> bool;
}

/// Checks that are not decided by a single edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralCheck {
    /// Decided by whole-graph cycle detection in the scanner
    NoCircular,
    /// Decided by looking for an `index.*` entry file
    BarrelExport,
    /// Decided by the external package set of foundational modules
    ExternalMinimization,
}

/// Predicate of a catalog rule, with its parameters spelled out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCheck {
    /// Modules at `core_layer` must not depend on any other module
    CoreIsolation { core_layer: Layer },
    /// Target layer must not be above the source layer
    LayerHierarchy,
    /// Different modules on the same layer must not depend on each other
    NoPeer,
    /// Modules at `source_layer` may only reach layers up to
    /// `max_target_layer` (plus their own layer when `allow_same_layer`)
    LayerCeiling {
        source_layer: Layer,
        max_target_layer: Layer,
        allow_same_layer: bool,
    },
    /// Different modules at `layer` must not depend on each other
    PeerIsolation { layer: Layer },
    /// Not an edge rule; always passes on edges
    Structural(StructuralCheck),
}

impl RulePredicate for RuleCheck {
    fn is_compliant(&self, edge: &EdgeContext<'_>) -> bool {
        match *self {
            RuleCheck::CoreIsolation { core_layer } => {
                edge.source_layer != core_layer || edge.is_same_module()
            }
            RuleCheck::LayerHierarchy => edge.target_layer <= edge.source_layer,
            RuleCheck::NoPeer => !(edge.is_same_layer() && !edge.is_same_module()),
            RuleCheck::LayerCeiling {
                source_layer,
                max_target_layer,
                allow_same_layer,
            } => {
                edge.source_layer != source_layer
                    || edge.target_layer <= max_target_layer
                    || (allow_same_layer && edge.is_same_layer())
            }
            RuleCheck::PeerIsolation { layer } => {
                !(edge.source_layer == layer
                    && edge.target_layer == layer
                    && !edge.is_same_module())
            }
            RuleCheck::Structural(_) => true,
        }
    }
}

/// A catalog rule
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub weight: u32,
    /// Kind recorded on violations of this rule
    pub kind: ViolationKind,
    pub check: RuleCheck,
}

impl Rule {
    pub fn is_compliant(&self, edge: &EdgeContext<'_>) -> bool {
        self.check.is_compliant(edge)
    }

    pub fn is_structural(&self) -> bool {
        matches!(self.check, RuleCheck::Structural(_))
    }

    /// Human-readable explanation of why `edge` breaks this rule
    pub fn violation_message(&self, edge: &EdgeContext<'_>) -> String {
        let (s, t, sl, tl) = (edge.source, edge.target, edge.source_layer, edge.target_layer);
        match self.check {
            RuleCheck::CoreIsolation { .. } => format!(
                "Core module '{s}' (layer {sl}) must not depend on any other module, but imports '{t}' (layer {tl})"
            ),
            RuleCheck::LayerHierarchy => format!(
                "'{s}' (layer {sl}) depends on '{t}' from higher layer {tl}"
            ),
            RuleCheck::NoPeer => format!(
                "'{s}' depends on peer module '{t}' on the same layer {sl}"
            ),
            RuleCheck::LayerCeiling {
                max_target_layer, ..
            } => format!(
                "Layer {sl} module '{s}' may only depend on layers up to {max_target_layer}, but imports '{t}' (layer {tl})"
            ),
            RuleCheck::PeerIsolation { layer } => format!(
                "Layer {layer} modules must stay independent, but '{s}' imports '{t}'"
            ),
            RuleCheck::Structural(_) => format!("{}: {s} → {t}", self.name),
        }
    }
}

/// Outcome of running the whole catalog on one edge
#[derive(Debug, Clone)]
pub struct RuleEvaluation<'c> {
    pub passed: Vec<&'c Rule>,
    pub failed: Vec<&'c Rule>,
}

impl RuleEvaluation<'_> {
    pub fn is_compliant(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Evaluate every catalog rule on the edge `source → target`
pub fn validate_dependency<'c>(
    catalog: &'c RuleCatalog,
    source: &str,
    target: &str,
    source_layer: Layer,
    target_layer: Layer,
) -> RuleEvaluation<'c> {
    let edge = EdgeContext::new(source, target, source_layer, target_layer);
    let (passed, failed): (Vec<&Rule>, Vec<&Rule>) =
        catalog.rules().iter().partition(|rule| rule.is_compliant(&edge));
    RuleEvaluation { passed, failed }
}

#[cfg(test)]
mod tests;
