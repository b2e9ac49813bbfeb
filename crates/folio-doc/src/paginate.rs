//! Heuristic pagination.
//!
//! Pages are approximated with a character budget rather than measured
//! layout: each block costs its character count plus a fixed overhead for its
//! kind, and a page closes when the next block would overflow the budget.
//! Blocks are never split across pages. Recomputation is full and stateless,
//! so callers simply re-run it after every mutation.

use serde::{Deserialize, Serialize};

use crate::{BlockKind, BlockSnapshot};

/// Pagination constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Total cost a page may hold before a new one starts.
    pub page_budget: usize,
    /// Extra cost charged for a level-1 heading.
    pub heading1_overhead: usize,
    /// Extra cost charged for a level-2 heading.
    pub heading2_overhead: usize,
    /// Extra cost charged for paragraphs and list items.
    pub block_overhead: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_budget: 1800,
            heading1_overhead: 300,
            heading2_overhead: 150,
            block_overhead: 50,
        }
    }
}

impl PageConfig {
    /// Fixed overhead charged for a block of this kind.
    pub fn overhead(&self, kind: BlockKind) -> usize {
        match kind {
            BlockKind::Heading1 => self.heading1_overhead,
            BlockKind::Heading2 => self.heading2_overhead,
            BlockKind::Paragraph | BlockKind::ListItem => self.block_overhead,
        }
    }

    /// Cost of a block: characters plus kind overhead.
    pub fn cost(&self, block: &BlockSnapshot) -> usize {
        block.char_len() + self.overhead(block.kind)
    }
}

/// A contiguous run of blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    /// Blocks on this page, in document order.
    pub blocks: &'a [BlockSnapshot],
    /// Accumulated cost of the blocks on this page.
    pub cost: usize,
}

impl Page<'_> {
    /// Whether any block on this page exceeds the budget on its own.
    pub fn is_overfull(&self, config: &PageConfig) -> bool {
        self.cost > config.page_budget
    }
}

/// Partition `blocks` into pages.
///
/// Every block lands on exactly one page and page order matches block order.
/// A block whose own cost exceeds the budget sits alone on its page. An empty
/// input yields no pages.
pub fn paginate<'a>(blocks: &'a [BlockSnapshot], config: &PageConfig) -> Vec<Page<'a>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut acc = 0;

    for (i, block) in blocks.iter().enumerate() {
        let cost = config.cost(block);
        if acc + cost > config.page_budget && i > start {
            pages.push(Page {
                number: pages.len() + 1,
                blocks: &blocks[start..i],
                cost: acc,
            });
            start = i;
            acc = 0;
        }
        acc += cost;
    }

    if start < blocks.len() {
        pages.push(Page {
            number: pages.len() + 1,
            blocks: &blocks[start..],
            cost: acc,
        });
    }

    tracing::debug!(blocks = blocks.len(), pages = pages.len(), "paginated");
    pages
}

/// 1-based page number holding the block at `index`, if in range.
pub fn page_of_index(pages: &[Page<'_>], index: usize) -> Option<usize> {
    let mut seen = 0;
    for page in pages {
        seen += page.blocks.len();
        if index < seen {
            return Some(page.number);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockId, DocumentId};

    fn blocks(spec: &[(BlockKind, usize)]) -> Vec<BlockSnapshot> {
        let doc = DocumentId::new();
        spec.iter()
            .enumerate()
            .map(|(i, (kind, len))| {
                BlockSnapshot::new(BlockId::new(doc, i as u64), *kind, "a".repeat(*len))
            })
            .collect()
    }

    fn shape(pages: &[Page<'_>]) -> Vec<usize> {
        pages.iter().map(|p| p.blocks.len()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_pages() {
        assert!(paginate(&[], &PageConfig::default()).is_empty());
    }

    #[test]
    fn test_title_and_long_paragraph_split() {
        let doc = DocumentId::new();
        let input = vec![
            BlockSnapshot::new(BlockId::new(doc, 0), BlockKind::Heading1, "TITLE"),
            BlockSnapshot::new(BlockId::new(doc, 1), BlockKind::Paragraph, "A".repeat(2000)),
        ];

        let pages = paginate(&input, &PageConfig::default());
        assert_eq!(shape(&pages), vec![1, 1]);
        assert_eq!(pages[0].cost, 305);
        assert_eq!(pages[1].cost, 2050);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 2);
        assert!(pages[1].is_overfull(&PageConfig::default()));
    }

    #[test]
    fn test_oversized_first_block_sits_alone() {
        let input = blocks(&[(BlockKind::Paragraph, 5000), (BlockKind::Paragraph, 10)]);
        let pages = paginate(&input, &PageConfig::default());
        assert_eq!(shape(&pages), vec![1, 1]);
    }

    #[test]
    fn test_exact_budget_fits() {
        // 850 + 50 twice = 1800 exactly.
        let input = blocks(&[(BlockKind::Paragraph, 850), (BlockKind::Paragraph, 850)]);
        let pages = paginate(&input, &PageConfig::default());
        assert_eq!(shape(&pages), vec![2]);
        assert_eq!(pages[0].cost, 1800);
    }

    #[test]
    fn test_heading_overheads() {
        let config = PageConfig::default();
        assert_eq!(config.overhead(BlockKind::Heading1), 300);
        assert_eq!(config.overhead(BlockKind::Heading2), 150);
        assert_eq!(config.overhead(BlockKind::Paragraph), 50);
        assert_eq!(config.overhead(BlockKind::ListItem), 50);
    }

    #[test]
    fn test_partition_holds_for_mixed_documents() {
        let kinds = [
            BlockKind::Heading1,
            BlockKind::Heading2,
            BlockKind::Paragraph,
            BlockKind::ListItem,
        ];
        let spec: Vec<(BlockKind, usize)> = (0..200)
            .map(|i| (kinds[i % kinds.len()], (i * 137) % 2600))
            .collect();
        let input = blocks(&spec);
        let config = PageConfig::default();
        let pages = paginate(&input, &config);

        let flattened: Vec<BlockId> = pages
            .iter()
            .flat_map(|p| p.blocks.iter().map(|b| b.id))
            .collect();
        let original: Vec<BlockId> = input.iter().map(|b| b.id).collect();
        assert_eq!(flattened, original);

        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert!(!page.blocks.is_empty());
            if page.blocks.len() > 1 {
                assert!(page.cost <= config.page_budget);
            }
        }
    }

    #[test]
    fn test_custom_budget() {
        let config = PageConfig {
            page_budget: 100,
            ..PageConfig::default()
        };
        let input = blocks(&[
            (BlockKind::Paragraph, 10),
            (BlockKind::Paragraph, 10),
            (BlockKind::Paragraph, 10),
        ]);
        let pages = paginate(&input, &config);
        assert_eq!(shape(&pages), vec![1, 1, 1]);
    }

    #[test]
    fn test_page_of_index() {
        let input = blocks(&[
            (BlockKind::Paragraph, 1000),
            (BlockKind::Paragraph, 1000),
            (BlockKind::Paragraph, 10),
        ]);
        let pages = paginate(&input, &PageConfig::default());
        assert_eq!(page_of_index(&pages, 0), Some(1));
        assert_eq!(page_of_index(&pages, 1), Some(2));
        assert_eq!(page_of_index(&pages, 2), Some(2));
        assert_eq!(page_of_index(&pages, 3), None);
    }

    #[test]
    fn test_config_partial_deserialize_uses_defaults() {
        let config: PageConfig = serde_json::from_str(r#"{"page_budget": 900}"#).unwrap();
        assert_eq!(config.page_budget, 900);
        assert_eq!(config.heading1_overhead, 300);
    }
}
