use crate::catalog::RuleCatalog;
use crate::matcher::{self, KeywordIndex, MatchStrategy};
use crate::types::{ExtractionResult, Provenance, RuleDefinition, TextElement};
use tracing::debug;

/// Build one result per rule that matched at least one element, in catalog order.
///
/// `doc_name` is recorded as provenance and should be the bare file name.
pub fn assemble(
    catalog: &RuleCatalog,
    elements: &[TextElement],
    doc_name: &str,
    strategy: MatchStrategy,
) -> Vec<ExtractionResult> {
    let index = match strategy {
        MatchStrategy::Scan => None,
        MatchStrategy::Indexed => Some(KeywordIndex::build(catalog.rules(), elements)),
    };

    catalog
        .rules()
        .iter()
        .filter_map(|rule| {
            let matched = match &index {
                Some(index) => index.match_rule(rule, elements),
                None => matcher::match_rule(rule, elements),
            };
            debug!(rule = %rule.id, matches = matched.len(), "matched rule");
            build_result(rule, &matched, doc_name)
        })
        .collect()
}

/// `None` when nothing matched; rules without evidence are left out.
pub fn build_result(
    rule: &RuleDefinition,
    matched: &[&TextElement],
    doc_name: &str,
) -> Option<ExtractionResult> {
    let first = matched.first()?;
    Some(ExtractionResult {
        id: rule.id.clone(),
        title: rule.title.clone(),
        category: rule.category.clone(),
        authority: rule.authority.clone(),
        conditions: rule.conditions.clone(),
        requirements: matched.iter().map(|element| element.text.clone()).collect(),
        raw_excerpt: first.text.clone(),
        provenance: Provenance::for_position(doc_name, &first.position),
    })
}
