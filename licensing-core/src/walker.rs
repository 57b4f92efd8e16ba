// Element walker: ParsedDocument -> flat sequence of TextElement
//
// All paragraphs come first, then every table cell in row-major order.
// Text is trimmed and empty elements are dropped, but indices always count
// the original positions.

use crate::types::{ParsedDocument, PositionKey, TextElement};

/// Lazily walk a document's paragraphs and table cells in document order.
pub fn walk(document: &ParsedDocument) -> impl Iterator<Item = TextElement> + '_ {
    let paragraphs = document
        .paragraphs
        .iter()
        .enumerate()
        .filter_map(|(index, text)| element(PositionKey::Paragraph(index), text));

    let cells = document
        .tables
        .iter()
        .enumerate()
        .flat_map(|(table_index, table)| {
            table.rows.iter().enumerate().flat_map(move |(row_index, row)| {
                row.cells.iter().enumerate().filter_map(move |(cell_index, text)| {
                    element(
                        PositionKey::TableCell {
                            table: table_index,
                            row: row_index,
                            cell: cell_index,
                        },
                        text,
                    )
                })
            })
        });

    paragraphs.chain(cells)
}

fn element(position: PositionKey, text: &str) -> Option<TextElement> {
    let text = text.trim();
    (!text.is_empty()).then(|| TextElement {
        position,
        text: text.to_string(),
    })
}
