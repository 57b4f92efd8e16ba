use crate::error::{ExtractionError, Result};
use crate::types::RuleDefinition;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_RULES: &str = include_str!("../catalog/builtin_rules.yaml");

/// Ordered, validated set of rule definitions.
///
/// Constructed once and passed by reference into matching. Declaration order
/// is evaluation order and output order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCatalog {
    rules: Vec<RuleDefinition>,
}

impl RuleCatalog {
    /// Validate and wrap a list of rule definitions
    pub fn new(rules: Vec<RuleDefinition>) -> Result<Self> {
        validate(&rules)?;
        Ok(Self { rules })
    }

    /// The licensing knowledge base shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_RULES)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let rules: Vec<RuleDefinition> = serde_yaml::from_str(yaml)
            .map_err(|e| ExtractionError::MalformedCatalog(e.to_string()))?;
        Self::new(rules)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ExtractionError::CatalogUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_yaml_str(&content)
    }

    /// Load from `path` when given, otherwise the built-in catalog
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate(rules: &[RuleDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.keywords.is_empty() {
            return Err(ExtractionError::MalformedCatalog(format!(
                "rule '{}' has no keywords",
                rule.id
            )));
        }
        // An empty keyword is a substring of every text and would match everything.
        if rule.keywords.iter().any(|k| k.is_empty()) {
            return Err(ExtractionError::MalformedCatalog(format!(
                "rule '{}' has an empty keyword",
                rule.id
            )));
        }
        if !seen.insert(rule.id.as_str()) {
            return Err(ExtractionError::MalformedCatalog(format!(
                "duplicate rule id '{}'",
                rule.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleConditions;

    fn rule(id: &str, keywords: &[&str]) -> RuleDefinition {
        RuleDefinition {
            id: id.to_string(),
            title: format!("title {id}"),
            category: "cat".to_string(),
            authority: "auth".to_string(),
            conditions: RuleConditions::default(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_catalog_order_and_contents() {
        let catalog = RuleCatalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "baseline_registration",
                "occupancy_certification",
                "gas_use",
                "seating_number",
                "building_size",
                "delivery",
            ]
        );

        let occupancy = catalog.get("occupancy_certification").unwrap();
        assert_eq!(occupancy.conditions.seating.min, Some(200));
        assert_eq!(occupancy.keywords, vec!["תפוס", "תפוסה", "אכלוס"]);

        let gas = catalog.get("gas_use").unwrap();
        assert_eq!(gas.keywords, vec!["גז", "גפ\"מ"]);
        assert_eq!(gas.conditions.flags.get("uses_gas"), Some(&true));

        let size = catalog.get("building_size").unwrap();
        assert_eq!(size.conditions.size_m2.min, Some(0));
        assert_eq!(size.keywords, vec!["מ\"ר", "שטח"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = RuleCatalog::new(vec![rule("a", &["x"]), rule("a", &["y"])]).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedCatalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_empty_keyword_set() {
        let err = RuleCatalog::new(vec![rule("a", &[])]).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedCatalog(msg) if msg.contains("no keywords")));
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let err = RuleCatalog::new(vec![rule("a", &["ok", ""])]).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedCatalog(_)));
    }

    #[test]
    fn test_yaml_conditions_default_when_omitted() {
        let catalog = RuleCatalog::from_yaml_str(
            "- id: custom\n  title: t\n  category: c\n  authority: a\n  keywords: [k]\n",
        )
        .unwrap();
        assert_eq!(catalog.rules()[0].conditions, RuleConditions::default());
    }

    #[test]
    fn test_missing_catalog_file_is_unreadable() {
        let err = RuleCatalog::load_from_file(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, ExtractionError::CatalogUnreadable { .. }));
    }
}
