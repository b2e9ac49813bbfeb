//! Risk annotations from the last analysis.
//!
//! A side-table keyed by block id. Each analysis replaces the previous one
//! wholesale; annotations for blocks that are not mentioned any more are
//! cleared, not merged.

use std::collections::HashMap;

use crate::block_store::BlockStore;
use crate::{BlockId, RiskFinding, RiskLevel};

/// A finding together with the live block it resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedFinding {
    pub finding: RiskFinding,
    /// `None` when the finding referenced no block, or a block that is gone.
    pub block: Option<BlockId>,
}

#[derive(Clone, Debug, Default)]
pub struct RiskAnnotations {
    levels: HashMap<BlockId, RiskLevel>,
    entries: Vec<AnnotatedFinding>,
}

impl RiskAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all annotations with the result of a new analysis.
    ///
    /// References resolve against `store`'s live blocks. When several
    /// findings name the same block the last one wins.
    pub fn replace(&mut self, findings: Vec<RiskFinding>, store: &BlockStore) {
        self.clear();

        let document_id = store.document_id();
        for finding in findings {
            let block = finding
                .block_ref
                .as_deref()
                .and_then(|r| BlockId::from_ref(document_id, r))
                .filter(|id| store.contains(id));

            if let Some(id) = block {
                self.levels.insert(id, finding.severity);
            } else if let Some(reference) = &finding.block_ref {
                tracing::debug!(reference = %reference, "risk finding references no live block");
            }

            self.entries.push(AnnotatedFinding { finding, block });
        }

        tracing::debug!(
            findings = self.entries.len(),
            annotated = self.levels.len(),
            "risk annotations replaced"
        );
    }

    /// Severity annotated on `block`, if any.
    pub fn level(&self, block: &BlockId) -> Option<RiskLevel> {
        self.levels.get(block).copied()
    }

    /// All findings of the last analysis, in response order.
    pub fn findings(&self) -> &[AnnotatedFinding] {
        &self.entries
    }

    /// Findings that annotate no block.
    pub fn general_findings(&self) -> impl Iterator<Item = &RiskFinding> + '_ {
        self.entries
            .iter()
            .filter(|e| e.block.is_none())
            .map(|e| &e.finding)
    }

    /// Number of annotated blocks.
    pub fn annotated_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.entries.clear();
    }
}
