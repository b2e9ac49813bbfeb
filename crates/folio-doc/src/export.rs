//! Text renderings of a document.

use crate::paginate::Page;
use crate::{BlockKind, BlockSnapshot};

/// Contents joined by blank lines.
pub fn plain_text(blocks: &[BlockSnapshot]) -> String {
    blocks
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Markdown with heading and list markers.
pub fn markdown(blocks: &[BlockSnapshot]) -> String {
    let mut out = String::new();
    let mut prev: Option<BlockKind> = None;

    for block in blocks {
        // Consecutive list items form one list.
        if let Some(prev) = prev {
            let tight = prev == BlockKind::ListItem && block.kind == BlockKind::ListItem;
            out.push_str(if tight { "\n" } else { "\n\n" });
        }
        out.push_str(&markdown_line(block));
        prev = Some(block.kind);
    }

    out
}

fn markdown_line(block: &BlockSnapshot) -> String {
    match block.kind {
        BlockKind::Heading1 => format!("# {}", block.content),
        BlockKind::Heading2 => format!("## {}", block.content),
        BlockKind::ListItem => format!("- {}", block.content),
        BlockKind::Paragraph => block.content.clone(),
    }
}

/// Print layout: each page's blocks, a `Page N` footer, and a form feed
/// between pages.
pub fn paged_text(pages: &[Page<'_>]) -> String {
    let mut out = String::new();

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push_str("\u{000C}\n");
        }
        for block in page.blocks {
            out.push_str(&markdown_line(block));
            out.push_str("\n\n");
        }
        out.push_str(&format!("Page {}\n", page.number));
    }

    out
}
