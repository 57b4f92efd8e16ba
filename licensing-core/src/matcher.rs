// Rule matching: literal, case-sensitive substring containment.
//
// Each rule is matched on its own against the full element slice. Results
// are always a subsequence of the input in document order.

use crate::types::{RuleDefinition, TextElement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Scan every element for every rule
    #[default]
    Scan,
    /// Precompute keyword postings once per document
    Indexed,
}

/// Does `text` contain at least one of the rule's keywords?
pub fn matches(rule: &RuleDefinition, text: &str) -> bool {
    rule.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

/// All elements matching `rule`, in input order.
pub fn match_rule<'a>(rule: &RuleDefinition, elements: &'a [TextElement]) -> Vec<&'a TextElement> {
    elements
        .iter()
        .filter(|element| matches(rule, &element.text))
        .collect()
}

/// Keyword -> ascending element positions.
///
/// Built over a fixed element slice for the keywords of a set of rules.
/// Lookups give the same elements, in the same order, as `match_rule`.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    pub fn build<'r>(
        rules: impl IntoIterator<Item = &'r RuleDefinition>,
        elements: &[TextElement],
    ) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for rule in rules {
            for keyword in &rule.keywords {
                if postings.contains_key(keyword) {
                    continue;
                }
                let hits = elements
                    .iter()
                    .enumerate()
                    .filter(|(_, element)| element.text.contains(keyword.as_str()))
                    .map(|(position, _)| position)
                    .collect();
                postings.insert(keyword.clone(), hits);
            }
        }
        Self { postings }
    }

    /// Matches for `rule` against the slice the index was built from.
    /// Keywords missing from the index are scanned on demand.
    pub fn match_rule<'a>(
        &self,
        rule: &RuleDefinition,
        elements: &'a [TextElement],
    ) -> Vec<&'a TextElement> {
        let mut positions: Vec<usize> = Vec::new();
        for keyword in &rule.keywords {
            match self.postings.get(keyword) {
                Some(hits) => positions.extend_from_slice(hits),
                None => positions.extend(
                    elements
                        .iter()
                        .enumerate()
                        .filter(|(_, element)| element.text.contains(keyword.as_str()))
                        .map(|(position, _)| position),
                ),
            }
        }
        positions.sort_unstable();
        positions.dedup();
        positions
            .into_iter()
            .filter_map(|position| elements.get(position))
            .collect()
    }
}
