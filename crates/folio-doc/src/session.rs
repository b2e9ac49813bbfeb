//! Document session: the single owner of one document's editing state.
//!
//! Holds the block store together with its side-tables (pending
//! suggestions, risk annotations) and the focus state a view needs. Every
//! user-level action goes through here so the store stays the one source of
//! truth and the side-tables never outlive the blocks they describe.

use crate::block_store::{BlockStore, Merge, Removal, StoreSnapshot};
use crate::paginate::{Page, PageConfig, page_of_index, paginate};
use crate::risk::RiskAnnotations;
use crate::suggestion::{Applied, Suggestion, SuggestionOverlay};
use crate::{
    BlockId, BlockKind, BlockSnapshot, DocumentId, Result, RiskFinding, SuggestionId,
};

#[derive(Clone, Debug)]
pub struct DocumentSession {
    store: BlockStore,
    overlay: SuggestionOverlay,
    risks: RiskAnnotations,
    page_config: PageConfig,
    focus: Option<BlockId>,
    scroll_target: Option<BlockId>,
}

impl DocumentSession {
    /// A fresh session over a minimum document.
    pub fn new(document_id: DocumentId) -> Self {
        Self::with_store(BlockStore::new(document_id))
    }

    /// A session over an existing store.
    pub fn with_store(store: BlockStore) -> Self {
        Self {
            store,
            overlay: SuggestionOverlay::new(),
            risks: RiskAnnotations::new(),
            page_config: PageConfig::default(),
            focus: None,
            scroll_target: None,
        }
    }

    /// Restore a session from a store snapshot.
    pub fn restore(snapshot: StoreSnapshot) -> Result<Self> {
        Ok(Self::with_store(BlockStore::from_snapshot(snapshot)?))
    }

    pub fn with_page_config(mut self, config: PageConfig) -> Self {
        self.page_config = config;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn document_id(&self) -> DocumentId {
        self.store.document_id()
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn overlay(&self) -> &SuggestionOverlay {
        &self.overlay
    }

    pub fn risks(&self) -> &RiskAnnotations {
        &self.risks
    }

    pub fn page_config(&self) -> &PageConfig {
        &self.page_config
    }

    /// Blocks with risk levels filled in from the annotation table.
    pub fn blocks(&self) -> Vec<BlockSnapshot> {
        self.store
            .blocks()
            .iter()
            .map(|b| BlockSnapshot {
                risk_level: self.risks.level(&b.id),
                ..b.clone()
            })
            .collect()
    }

    /// Current page layout.
    pub fn pages(&self) -> Vec<Page<'_>> {
        paginate(self.store.blocks(), &self.page_config)
    }

    /// 1-based page number of a block.
    pub fn page_of(&self, id: &BlockId) -> Option<usize> {
        let index = self.store.position(id)?;
        page_of_index(&self.pages(), index)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&self) -> Option<BlockId> {
        self.focus
    }

    /// Focus a block. Returns false (and leaves focus alone) if it is absent.
    pub fn set_focus(&mut self, id: BlockId) -> bool {
        if self.store.contains(&id) {
            self.focus = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Block to scroll into view after the last accepted insertion, once.
    pub fn take_scroll_target(&mut self) -> Option<BlockId> {
        self.scroll_target.take()
    }

    /// Block an action should operate on: the explicit target, else focus.
    pub fn active_block(&self, target: Option<BlockId>) -> Option<&BlockSnapshot> {
        target.or(self.focus).and_then(|id| self.store.get(&id))
    }

    /// Where new drafted content goes: after the focused block, else at the end.
    pub fn insertion_anchor(&self) -> BlockId {
        self.focus
            .filter(|id| self.store.contains(id))
            .unwrap_or_else(|| self.store.last_id())
    }

    fn drop_stale_focus(&mut self) {
        if let Some(id) = self.focus {
            if !self.store.contains(&id) {
                self.focus = None;
            }
        }
        if let Some(id) = self.scroll_target {
            if !self.store.contains(&id) {
                self.scroll_target = None;
            }
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Replace a block's text.
    pub fn edit(&mut self, id: &BlockId, content: impl Into<String>) -> Result<()> {
        self.store.replace_content(id, content)
    }

    /// Character-range edit within a block.
    pub fn edit_text(&mut self, id: &BlockId, pos: usize, insert: &str, delete: usize) -> Result<()> {
        self.store.edit_text(id, pos, insert, delete)
    }

    pub fn set_kind(&mut self, id: &BlockId, kind: BlockKind) -> Result<()> {
        self.store.set_kind(id, kind)
    }

    /// Add an empty paragraph after `id` and focus it.
    pub fn new_block_after(&mut self, id: &BlockId) -> Result<BlockId> {
        let new_id = self.store.insert_block(Some(id), BlockKind::Paragraph, "")?;
        self.focus = Some(new_id);
        Ok(new_id)
    }

    /// Split at a caret and focus the new tail block.
    pub fn split(&mut self, id: &BlockId, caret: usize) -> Result<BlockId> {
        let new_id = self.store.split(id, caret)?;
        self.focus = Some(new_id);
        Ok(new_id)
    }

    pub fn remove(&mut self, id: &BlockId) -> Result<Removal> {
        let removal = self.store.remove(id)?;
        if let Removal::Removed { focus } = removal {
            self.focus = Some(focus);
        }
        self.drop_stale_focus();
        Ok(removal)
    }

    pub fn merge_with_previous(&mut self, id: &BlockId) -> Result<Merge> {
        let merge = self.store.merge_with_previous(id)?;
        self.focus = Some(merge.into);
        self.drop_stale_focus();
        Ok(merge)
    }

    // ========================================================================
    // Suggestions and risks
    // ========================================================================

    /// Queue a suggestion. Returns the one it superseded, if any.
    pub fn propose(&mut self, suggestion: Suggestion) -> Option<Suggestion> {
        self.overlay.propose(suggestion)
    }

    /// Accept a pending suggestion and move focus to what it changed.
    pub fn accept(&mut self, id: &SuggestionId) -> Result<Option<Applied>> {
        let applied = self.overlay.accept(id, &mut self.store)?;
        if let Some(applied) = &applied {
            self.focus = Some(applied.focus);
            if applied.scroll_to.is_some() {
                self.scroll_target = applied.scroll_to;
            }
        }
        Ok(applied)
    }

    pub fn reject(&mut self, id: &SuggestionId) -> Option<Suggestion> {
        self.overlay.reject(id)
    }

    /// Replace risk annotations with a new analysis.
    pub fn apply_risks(&mut self, findings: Vec<RiskFinding>) {
        self.risks.replace(findings, &self.store);
    }

    pub fn clear_risks(&mut self) {
        self.risks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocError, DraftBlock, RiskLevel};

    fn test_session() -> DocumentSession {
        DocumentSession::with_store(BlockStore::from_drafts(
            DocumentId::new(),
            vec![
                DraftBlock::new(BlockKind::Heading1, "TITLE"),
                DraftBlock::paragraph("First"),
            ],
        ))
    }

    #[test]
    fn test_new_session_is_minimum_document() {
        let session = DocumentSession::new(DocumentId::new());
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.pages().len(), 1);
        assert_eq!(session.focus(), None);
    }

    #[test]
    fn test_split_and_new_block_move_focus() {
        let mut session = test_session();
        let ids = session.store().block_ids();

        let tail = session.split(&ids[1], 2).unwrap();
        assert_eq!(session.focus(), Some(tail));

        let fresh = session.new_block_after(&tail).unwrap();
        assert_eq!(session.focus(), Some(fresh));
        assert_eq!(session.store().get(&fresh).unwrap().content, "");
    }

    #[test]
    fn test_remove_focuses_neighbour() {
        let mut session = test_session();
        let ids = session.store().block_ids();
        session.set_focus(ids[1]);

        session.remove(&ids[1]).unwrap();
        assert_eq!(session.focus(), Some(ids[0]));
        assert_eq!(session.remove(&ids[0]).unwrap(), Removal::LastBlockKept);
    }

    #[test]
    fn test_set_focus_rejects_missing_block() {
        let mut session = test_session();
        let ghost = BlockId::new(session.document_id(), 404);
        assert!(!session.set_focus(ghost));
        assert_eq!(session.focus(), None);
    }

    #[test]
    fn test_accept_insertion_sets_focus_and_scroll() {
        let mut session = test_session();
        let anchor = session.insertion_anchor();
        assert_eq!(anchor, session.store().block_ids()[1]);

        let suggestion = Suggestion::insertion(anchor, "One\nTwo");
        let sid = suggestion.id;
        session.propose(suggestion);

        let applied = session.accept(&sid).unwrap().unwrap();
        assert_eq!(session.focus(), Some(applied.inserted[0]));
        assert_eq!(session.take_scroll_target(), Some(applied.inserted[0]));
        assert_eq!(session.take_scroll_target(), None);
    }

    #[test]
    fn test_insertion_anchor_prefers_focus() {
        let mut session = test_session();
        let first = session.store().block_ids()[0];
        session.set_focus(first);
        assert_eq!(session.insertion_anchor(), first);
    }

    #[test]
    fn test_stale_insertion_is_discarded() {
        let mut session = test_session();
        let ids = session.store().block_ids();

        let suggestion = Suggestion::insertion(ids[1], "Late reply");
        let sid = suggestion.id;
        session.propose(suggestion);
        session.remove(&ids[1]).unwrap();

        assert_eq!(session.accept(&sid), Err(DocError::AnchorNotFound(ids[1])));
        assert!(session.overlay().is_empty());
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_blocks_carry_risk_levels() {
        let mut session = test_session();
        let ids = session.store().block_ids();

        session.apply_risks(vec![
            RiskFinding::new(RiskLevel::Medium, "t", "d").with_block_ref(ids[1].to_ref()),
        ]);

        let blocks = session.blocks();
        assert_eq!(blocks[0].risk_level, None);
        assert_eq!(blocks[1].risk_level, Some(RiskLevel::Medium));
        // The store itself stays free of annotations.
        assert_eq!(session.store().blocks()[1].risk_level, None);
    }

    #[test]
    fn test_page_of() {
        let mut session = test_session();
        let ids = session.store().block_ids();
        session.edit(&ids[1], "A".repeat(2000)).unwrap();

        assert_eq!(session.page_of(&ids[0]), Some(1));
        assert_eq!(session.page_of(&ids[1]), Some(2));
    }

    #[test]
    fn test_restore_from_snapshot() {
        let session = test_session();
        let restored = DocumentSession::restore(session.snapshot()).unwrap();
        assert_eq!(restored.store().block_ids(), session.store().block_ids());
    }
}
