//! WordprocessingML Parser
//!
//! Parses `word/document.xml` into a `ParsedDocument`. Only the body's direct
//! children are structural:
//! - `<w:p>` under `<w:body>` is a paragraph
//! - `<w:tbl>` under `<w:body>` is a table; its `<w:tr>`/`<w:tc>` are rows and cells
//! - a cell's text is its direct `<w:p>` children joined with `\n`
//!
//! Elements are matched by namespace, so any prefix bound to the
//! WordprocessingML namespace works (`w:` is only the usual one).
//!
//! Paragraphs in text boxes, content controls and nested tables are skipped.
//! A cell spanning several grid columns (`<w:gridSpan>`) is repeated once per
//! column, and a vertical merge continuation (`<w:vMerge>`) repeats the text of
//! the cell above it.

use crate::types::{ParsedDocument, Row, Table};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Transitional WordprocessingML namespace, as written by Word
pub const WML_NAMESPACE: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Strict OOXML WordprocessingML namespace
pub const WML_STRICT_NAMESPACE: &[u8] = b"http://purl.oclc.org/ooxml/wordprocessingml/main";

fn is_wml(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == WML_NAMESPACE || *uri == WML_STRICT_NAMESPACE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Body,
    Paragraph,
    Hyperlink,
    Run,
    Text,
    Table,
    Row,
    Cell,
    CellProperties,
    Other,
}

impl Tag {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"body" => Tag::Body,
            b"p" => Tag::Paragraph,
            b"hyperlink" => Tag::Hyperlink,
            b"r" => Tag::Run,
            b"t" => Tag::Text,
            b"tbl" => Tag::Table,
            b"tr" => Tag::Row,
            b"tc" => Tag::Cell,
            b"tcPr" => Tag::CellProperties,
            _ => Tag::Other,
        }
    }
}

/// Leaf elements that carry run content or cell layout
#[derive(Debug, Clone, PartialEq, Eq)]
enum Marker {
    None,
    RunText(&'static str),
    Break { kind: Option<String> },
    GridSpan(Option<String>),
    VerticalMerge(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalMerge {
    None,
    Restart,
    Continue,
}

#[derive(Debug)]
struct CellState {
    depth: usize,
    paragraphs: Vec<String>,
    grid_span: usize,
    vertical_merge: VerticalMerge,
}

#[derive(Debug)]
struct TableState {
    depth: usize,
    rows: Vec<Row>,
    row: Option<Vec<CellState>>,
    cell: Option<CellState>,
}

#[derive(Debug)]
struct ParagraphState {
    depth: usize,
    text: String,
}

/// Stack-driven builder fed by the XML event loop.
#[derive(Debug, Default)]
struct BodyBuilder {
    stack: Vec<Tag>,
    paragraph: Option<ParagraphState>,
    table: Option<TableState>,
    document: ParsedDocument,
}

impl BodyBuilder {
    fn open(&mut self, tag: Tag, marker: Marker) {
        let depth = self.stack.len();
        let parent = self.stack.last().copied();

        match tag {
            Tag::Paragraph if parent == Some(Tag::Body) || self.is_current_cell(depth.wrapping_sub(1)) => {
                self.paragraph = Some(ParagraphState {
                    depth,
                    text: String::new(),
                });
            }
            Tag::Table if parent == Some(Tag::Body) => {
                self.table = Some(TableState {
                    depth,
                    rows: Vec::new(),
                    row: None,
                    cell: None,
                });
            }
            Tag::Row => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 1) {
                    table.row = Some(Vec::new());
                }
            }
            Tag::Cell => {
                if let Some(table) = self
                    .table
                    .as_mut()
                    .filter(|t| depth == t.depth + 2 && t.row.is_some())
                {
                    table.cell = Some(CellState {
                        depth,
                        paragraphs: Vec::new(),
                        grid_span: 1,
                        vertical_merge: VerticalMerge::None,
                    });
                }
            }
            Tag::Other => match marker {
                Marker::RunText(text) => self.push_run_text(depth, text),
                Marker::Break { kind } => {
                    if matches!(kind.as_deref(), None | Some("textWrapping")) {
                        self.push_run_text(depth, "\n");
                    }
                }
                Marker::GridSpan(value) if self.is_current_cell_property(depth) => {
                    if let Some(cell) = self.current_cell() {
                        cell.grid_span = value.and_then(|v| v.parse().ok()).unwrap_or(1).max(1);
                    }
                }
                Marker::VerticalMerge(value) if self.is_current_cell_property(depth) => {
                    if let Some(cell) = self.current_cell() {
                        cell.vertical_merge = match value.as_deref() {
                            Some("restart") => VerticalMerge::Restart,
                            _ => VerticalMerge::Continue,
                        };
                    }
                }
                _ => {}
            },
            _ => {}
        }

        self.stack.push(tag);
    }

    fn close(&mut self) {
        let Some(tag) = self.stack.pop() else {
            return;
        };
        let depth = self.stack.len();
        let parent = self.stack.last().copied();

        match tag {
            Tag::Paragraph if self.paragraph.as_ref().is_some_and(|p| p.depth == depth) => {
                let Some(paragraph) = self.paragraph.take() else {
                    return;
                };
                if parent == Some(Tag::Body) {
                    self.document.paragraphs.push(paragraph.text);
                } else if let Some(cell) = self.current_cell() {
                    cell.paragraphs.push(paragraph.text);
                }
            }
            Tag::Cell => {
                if let Some(table) = self.table.as_mut() {
                    if table.cell.as_ref().is_some_and(|c| c.depth == depth) {
                        if let (Some(cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                            row.push(cell);
                        }
                    }
                }
            }
            Tag::Row => {
                if let Some(table) = self.table.as_mut().filter(|t| depth == t.depth + 1) {
                    if let Some(cells) = table.row.take() {
                        let above = table.rows.last().map(|r| r.cells.as_slice()).unwrap_or(&[]);
                        let row = expand_row(cells, above);
                        table.rows.push(row);
                    }
                }
            }
            Tag::Table if self.table.as_ref().is_some_and(|t| t.depth == depth) => {
                if let Some(table) = self.table.take() {
                    self.document.tables.push(Table { rows: table.rows });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.stack.last() == Some(&Tag::Text) {
            let depth = self.stack.len() - 1;
            self.push_run_text(depth, text);
        }
    }

    /// Append run content found at `depth` when its run belongs to the paragraph
    /// being recorded, either directly or through a hyperlink.
    fn push_run_text(&mut self, depth: usize, text: &str) {
        let Some(paragraph) = self.paragraph.as_mut() else {
            return;
        };
        let Some(run) = depth.checked_sub(1) else {
            return;
        };
        if self.stack.get(run) != Some(&Tag::Run) {
            return;
        }
        let owned = match run.checked_sub(1).map(|i| (i, self.stack[i])) {
            Some((i, Tag::Paragraph)) => i == paragraph.depth,
            Some((i, Tag::Hyperlink)) => i.checked_sub(1) == Some(paragraph.depth),
            _ => false,
        };
        if owned {
            paragraph.text.push_str(text);
        }
    }

    fn current_cell(&mut self) -> Option<&mut CellState> {
        self.table.as_mut().and_then(|t| t.cell.as_mut())
    }

    fn is_current_cell(&self, depth: usize) -> bool {
        self.table
            .as_ref()
            .and_then(|t| t.cell.as_ref())
            .is_some_and(|c| c.depth == depth)
    }

    fn is_current_cell_property(&self, depth: usize) -> bool {
        self.stack.last() == Some(&Tag::CellProperties) && self.is_current_cell(depth.wrapping_sub(2))
    }
}

/// Lay a row's cells out on the table grid, one entry per grid column.
fn expand_row(cells: Vec<CellState>, above: &[String]) -> Row {
    let mut expanded: Vec<String> = Vec::new();
    for cell in cells {
        let own = cell.paragraphs.join("\n");
        let text = match cell.vertical_merge {
            VerticalMerge::Continue => above.get(expanded.len()).cloned().unwrap_or(own),
            VerticalMerge::None | VerticalMerge::Restart => own,
        };
        for _ in 0..cell.grid_span {
            expanded.push(text.clone());
        }
    }
    Row { cells: expanded }
}

/// Value of a WordprocessingML-namespaced attribute, whatever its prefix
fn attribute(
    reader: &NsReader<&[u8]>,
    element: &BytesStart<'_>,
    local: &[u8],
) -> Result<Option<String>, String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| format!("invalid attribute: {e}"))?;
        let (ns, name) = reader.resolve_attribute(attr.key);
        if is_wml(&ns) && name.as_ref() == local {
            return attr
                .unescape_value()
                .map(|v| Some(v.into_owned()))
                .map_err(|e| format!("invalid attribute value: {e}"));
        }
    }
    Ok(None)
}

/// Map an element onto its structural tag and, for leaves, its marker.
fn classify(
    reader: &NsReader<&[u8]>,
    wml: bool,
    element: &BytesStart<'_>,
) -> Result<(Tag, Marker), String> {
    if !wml {
        return Ok((Tag::Other, Marker::None));
    }
    let local = element.local_name();
    let tag = Tag::from_local_name(local.as_ref());
    let marker = match local.as_ref() {
        b"tab" | b"ptab" => Marker::RunText("\t"),
        b"cr" => Marker::RunText("\n"),
        b"noBreakHyphen" => Marker::RunText("-"),
        b"br" => Marker::Break {
            kind: attribute(reader, element, b"type")?,
        },
        b"gridSpan" => Marker::GridSpan(attribute(reader, element, b"val")?),
        b"vMerge" => Marker::VerticalMerge(attribute(reader, element, b"val")?),
        _ => Marker::None,
    };
    Ok((tag, marker))
}

/// Parse `word/document.xml` into body paragraphs and tables
pub fn parse_document_xml(xml: &str) -> Result<ParsedDocument, String> {
    let mut reader = NsReader::from_str(xml);
    let mut builder = BodyBuilder::default();

    loop {
        let (wml, event) = match reader.read_resolved_event() {
            Ok((ns, event)) => (is_wml(&ns), event),
            Err(e) => {
                return Err(format!(
                    "malformed document.xml at position {}: {e}",
                    reader.buffer_position()
                ))
            }
        };
        match event {
            Event::Start(e) => {
                let (tag, marker) = classify(&reader, wml, &e)?;
                builder.open(tag, marker);
            }
            Event::Empty(e) => {
                let (tag, marker) = classify(&reader, wml, &e)?;
                builder.open(tag, marker);
                builder.close();
            }
            Event::End(_) => builder.close(),
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| format!("invalid text at {}: {e}", reader.buffer_position()))?;
                builder.text(&text);
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let text = std::str::from_utf8(&raw).map_err(|e| format!("invalid CDATA: {e}"))?;
                builder.text(text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{inner}<w:sectPr/></w:body></w:document>"#
        )
    }

    fn p(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
    }

    fn tc(inner: &str) -> String {
        format!("<w:tc><w:tcPr><w:tcW w:w=\"100\"/></w:tcPr>{inner}</w:tc>")
    }

    #[test]
    fn test_body_paragraphs_keep_empty_entries() {
        let xml = body(&format!("{}<w:p/>{}", p("ראשון"), p("  שני ")));
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["ראשון", "", "  שני "]);
        assert!(doc.tables.is_empty());
    }

    #[test]
    fn test_runs_concatenate_with_tabs_breaks_and_hyperlinks() {
        let xml = body(
            r#"<w:p><w:pPr><w:jc w:val="right"/></w:pPr><w:r><w:t>רישיון</w:t><w:tab/><w:t>עסק</w:t></w:r><w:hyperlink r:id="rId4"><w:r><w:t> נדרש</w:t></w:r></w:hyperlink><w:r><w:br/><w:t>סוף</w:t><w:br w:type="page"/></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["רישיון\tעסק נדרש\nסוף"]);
    }

    #[test]
    fn test_deleted_text_and_text_boxes_are_skipped() {
        let xml = body(
            r#"<w:p><w:r><w:t>גלוי</w:t></w:r><w:del><w:r><w:delText>נמחק</w:delText></w:r></w:del><w:r><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>תיבה</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></w:r></w:p>"#,
        );
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["גלוי"]);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = body(r#"<w:p><w:r><w:t>גפ&quot;מ &amp; גז</w:t></w:r></w:p>"#);
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["גפ\"מ & גז"]);
    }

    #[test]
    fn test_table_cells_are_not_body_paragraphs() {
        let table = format!(
            "<w:tbl><w:tblPr/><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
            tc(&p("א")),
            tc(&format!("{}{}", p("ב1"), p("ב2"))),
            tc("<w:p/>"),
            tc(&p("ד")),
        );
        let xml = body(&format!("{}{}", p("לפני"), table));
        let doc = parse_document_xml(&xml).unwrap();

        assert_eq!(doc.paragraphs, vec!["לפני"]);
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.tables[0].rows[0].cells, vec!["א", "ב1\nב2"]);
        assert_eq!(doc.tables[0].rows[1].cells, vec!["", "ד"]);
    }

    #[test]
    fn test_nested_tables_do_not_contribute() {
        let nested = format!("<w:tbl><w:tr>{}</w:tr></w:tbl>", tc(&p("פנימי")));
        let table = format!(
            "<w:tbl><w:tr>{}</w:tr></w:tbl>",
            tc(&format!("{}{}{}", p("חיצוני"), nested, "<w:p/>"))
        );
        let doc = parse_document_xml(&body(&table)).unwrap();
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.tables[0].rows.len(), 1);
        assert_eq!(doc.tables[0].rows[0].cells, vec!["חיצוני\n"]);
    }

    #[test]
    fn test_grid_span_repeats_cell() {
        let wide = r#"<w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>רחב</w:t></w:r></w:p></w:tc>"#;
        let table = format!("<w:tbl><w:tr>{}{}</w:tr></w:tbl>", wide, tc(&p("צר")));
        let doc = parse_document_xml(&body(&table)).unwrap();
        assert_eq!(doc.tables[0].rows[0].cells, vec!["רחב", "רחב", "צר"]);
    }

    #[test]
    fn test_vertical_merge_takes_text_from_above() {
        let top = r#"<w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>מאוחד</w:t></w:r></w:p></w:tc>"#;
        let continued = r#"<w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>"#;
        let table = format!(
            "<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
            top,
            tc(&p("1")),
            continued,
            tc(&p("2")),
            continued,
            tc(&p("3")),
        );
        let doc = parse_document_xml(&body(&table)).unwrap();
        let rows = &doc.tables[0].rows;
        assert_eq!(rows[1].cells, vec!["מאוחד", "2"]);
        assert_eq!(rows[2].cells, vec!["מאוחד", "3"]);
    }

    #[test]
    fn test_content_control_paragraphs_are_not_body_paragraphs() {
        let xml = body(&format!(
            "<w:sdt><w:sdtContent>{}</w:sdtContent></w:sdt>{}",
            p("בקרה"),
            p("גוף")
        ));
        let doc = parse_document_xml(&xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["גוף"]);
    }

    #[test]
    fn test_any_prefix_bound_to_the_namespace_is_recognised() {
        let xml = r#"<doc:document xmlns:doc="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><doc:body><doc:p><doc:r><doc:t>רישיון</doc:t><doc:tab/><doc:t>עסק</doc:t></doc:r></doc:p><doc:tbl><doc:tr><doc:tc><doc:tcPr><doc:gridSpan doc:val="2"/></doc:tcPr><doc:p><doc:r><doc:t>גז</doc:t></doc:r></doc:p></doc:tc></doc:tr></doc:tbl></doc:body></doc:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.paragraphs, vec!["רישיון\tעסק"]);
        assert_eq!(doc.tables[0].rows[0].cells, vec!["גז", "גז"]);
    }

    #[test]
    fn test_w_prefix_outside_the_namespace_is_ignored() {
        let xml = r#"<w:document xmlns:w="urn:not-wordprocessingml"><w:body><w:p><w:r><w:t>זר</w:t></w:r></w:p></w:body></w:document>"#;
        let doc = parse_document_xml(xml).unwrap();
        assert!(doc.paragraphs.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = parse_document_xml("<w:document><w:body><w:p></w:body>").unwrap_err();
        assert!(err.contains("malformed"));
    }
}
