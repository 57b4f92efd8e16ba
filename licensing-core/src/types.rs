use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ===== PARSED DOCUMENT TYPES =====
// Output of the preprocessor: the body's paragraphs and tables, text only.
// Nothing here is filtered yet; empty paragraphs and cells are kept so that
// indices stay aligned with the source document.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Body-level paragraph texts in document order (empty ones included)
    pub paragraphs: Vec<String>,
    /// Body-level tables in document order
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cell texts, with merged cells expanded to one entry per grid column
    pub cells: Vec<String>,
}

// ===== TEXT ELEMENTS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Paragraph,
    TableCell,
}

/// Structural position of an element inside its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKey {
    /// Zero-based index among all body paragraphs
    Paragraph(usize),
    TableCell { table: usize, row: usize, cell: usize },
}

impl PositionKey {
    pub fn kind(&self) -> ElementKind {
        match self {
            PositionKey::Paragraph(_) => ElementKind::Paragraph,
            PositionKey::TableCell { .. } => ElementKind::TableCell,
        }
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionKey::Paragraph(index) => write!(f, "{index}"),
            PositionKey::TableCell { table, row, cell } => write!(f, "{table}:{row}:{cell}"),
        }
    }
}

/// A unit of trimmed, non-empty document text with a known position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    pub position: PositionKey,
    pub text: String,
}

impl TextElement {
    pub fn kind(&self) -> ElementKind {
        self.position.kind()
    }
}

// ===== RULE DEFINITIONS =====

/// Optional inclusive bounds. A missing bound means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// Applicability conditions carried through to the output.
/// These are informational; nothing in the pipeline evaluates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    #[serde(default)]
    pub size_m2: Bounds,
    #[serde(default)]
    pub seating: Bounds,
    /// Required boolean value per premises flag (e.g. "uses_gas")
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: String,
    pub title: String,
    pub category: String,
    pub authority: String,
    #[serde(default)]
    pub conditions: RuleConditions,
    pub keywords: Vec<String>,
}

// ===== EXTRACTION OUTPUT =====

/// Origin of the first element that matched a rule.
///
/// Exactly one of `paragraph_index` / `table` is set. The remaining optional
/// fields are reserved and always serialise as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source file name, without directories
    pub doc: String,
    pub section_title: Option<String>,
    pub heading_level: Option<u32>,
    pub paragraph_index: Option<usize>,
    /// "table:row:cell"
    pub table: Option<String>,
    pub page_hint: Option<u32>,
}

impl Provenance {
    pub fn for_position(doc: &str, position: &PositionKey) -> Self {
        let (paragraph_index, table) = match position {
            PositionKey::Paragraph(index) => (Some(*index), None),
            PositionKey::TableCell { .. } => (None, Some(position.to_string())),
        };
        Self {
            doc: doc.to_string(),
            section_title: None,
            heading_level: None,
            paragraph_index,
            table,
            page_hint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub id: String,
    pub title: String,
    pub category: String,
    pub authority: String,
    pub conditions: RuleConditions,
    /// Every matched text in document order, duplicates kept
    pub requirements: Vec<String>,
    pub raw_excerpt: String,
    pub provenance: Provenance,
}
