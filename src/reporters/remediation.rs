//! Canned remediation suggestions, keyed by violation kind

use crate::models::ViolationKind;

const LAYER: &[&str] = &[
    "Move the shared code down into a lower layer both modules may depend on",
    "Invert the dependency: let the lower layer define an interface the higher layer implements",
    "Pass the behavior in from the caller instead of importing it",
];

const CIRCULAR: &[&str] = &[
    "Extract the code both modules need into a new lower-layer module",
    "Replace one direction of the cycle with an event or callback",
    "Merge the modules if they cannot evolve independently",
];

const FORBIDDEN: &[&str] = &[
    "Remove the import; foundational modules must stay self-contained",
    "Move the needed code into this module or into a lower layer",
    "Wrap third-party packages behind a thin adapter in a higher layer",
];

const PEER: &[&str] = &[
    "Extract the shared logic into a lower-layer module both peers can use",
    "Compose the two modules from a higher layer instead of linking them directly",
    "Communicate through shared types or events defined below both modules",
];

/// Suggestions for fixing a violation of `kind`
pub fn suggestions(kind: ViolationKind) -> &'static [&'static str] {
    match kind {
        ViolationKind::Layer => LAYER,
        ViolationKind::Circular => CIRCULAR,
        ViolationKind::Forbidden => FORBIDDEN,
        ViolationKind::Peer => PEER,
    }
}
