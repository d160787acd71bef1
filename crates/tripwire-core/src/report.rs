//! The merged scan verdict.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tripwire_detect::{Layer, LayerResult, Severity};

/// The result of scanning one message.
///
/// Invariants, maintained by [`ScanResult::merge`]:
/// - `detected` is true iff at least one layer detected something;
/// - `severity` is the maximum layer severity under
///   `None < Warning < Critical`.
///
/// Severity merging is a fold over a total order, so it is associative,
/// commutative, and independent of layer evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The agent whose input was scanned.
    pub agent_id: String,

    /// Bounded prefix of the raw input, for audit without retaining full
    /// payloads.
    pub input_preview: String,

    /// Per-layer verdicts, keyed deterministically.
    pub layers: BTreeMap<Layer, LayerResult>,

    /// Whether any layer found anything.
    pub detected: bool,

    /// Maximum severity across all layers.
    pub severity: Severity,
}

impl ScanResult {
    /// Fold layer results into the final verdict.
    pub fn merge(
        agent_id: &str,
        input_preview: String,
        layers: BTreeMap<Layer, LayerResult>,
    ) -> Self {
        let detected = layers.values().any(|layer| layer.detected);
        let severity = layers
            .values()
            .map(|layer| layer.severity)
            .max()
            .unwrap_or(Severity::None);

        Self {
            agent_id: agent_id.to_string(),
            input_preview,
            layers,
            detected,
            severity,
        }
    }

    /// True if every layer came back clean.
    pub fn is_clean(&self) -> bool {
        !self.detected
    }

    /// True if any layer reported Critical.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// The result for one layer, if that layer ran.
    pub fn layer(&self, layer: Layer) -> Option<&LayerResult> {
        self.layers.get(&layer)
    }
}
