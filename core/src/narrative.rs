//! "What are my points worth" narratives.
//!
//! Narrative text comes from an external text-generation service behind
//! the `NarrativeSource` trait. The service is optional: when it fails,
//! returns malformed JSON, or returns nothing usable, the storyteller
//! substitutes a deterministic narrative built from the fallback table and
//! the point translator. A narrative request never fails for the end user.

use crate::{
    catalog::RewardCategory,
    program::Program,
    translator::{PointTranslator, RewardOrder, TranslateQuery},
    types::{format_dollars, Points},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Examples listed per category in a fallback narrative.
const FALLBACK_EXAMPLES_PER_CATEGORY: usize = 3;

/// External narrative provider. Returns the raw JSON body.
pub trait NarrativeSource {
    fn fetch(&self, points: Points, program: Program) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeCategory {
    pub category:    String,
    pub description: String,
    #[serde(default)]
    pub examples:    Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeOrigin {
    Source,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNarrative {
    pub categories:   Vec<NarrativeCategory>,
    pub dollar_value: String,
    pub origin:       NarrativeOrigin,
}

/// Wire shape of a source response.
#[derive(Debug, Deserialize)]
struct SourceBody {
    categories:   Vec<NarrativeCategory>,
    dollar_value: String,
}

/// Fixed per-category blurbs used when the source is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackEntry {
    pub category:    RewardCategory,
    pub description: String,
}

pub struct Storyteller<'a> {
    translator: PointTranslator<'a>,
    fallback:   HashMap<RewardCategory, &'a str>,
}

impl<'a> Storyteller<'a> {
    pub fn new(translator: PointTranslator<'a>, fallback_table: &'a [FallbackEntry]) -> Self {
        let fallback = fallback_table
            .iter()
            .map(|e| (e.category, e.description.as_str()))
            .collect();
        Self {
            translator,
            fallback,
        }
    }

    /// Narrative for a balance. Tries `source` first when given.
    pub fn describe(
        &self,
        points: Points,
        program: Program,
        source: Option<&dyn NarrativeSource>,
    ) -> ValueNarrative {
        if points <= 0 {
            return ValueNarrative {
                categories:   Vec::new(),
                dollar_value: format_dollars(0.0),
                origin:       NarrativeOrigin::Fallback,
            };
        }

        if let Some(source) = source {
            match source.fetch(points, program).and_then(|raw| parse_body(&raw)) {
                Ok(narrative) => return narrative,
                Err(e) => log::warn!(
                    "narrative: source failed for {points} {program}, using fallback: {e}"
                ),
            }
        }
        self.fallback_narrative(points, program)
    }

    /// Deterministic narrative from the fallback table and the translator.
    pub fn fallback_narrative(&self, points: Points, program: Program) -> ValueNarrative {
        let categories = self
            .translator
            .category_summary(points, program)
            .into_iter()
            .map(|summary| {
                let query = TranslateQuery::ordered(RewardOrder::CheapestFirst)
                    .with_category(summary.category)
                    .with_cap(points);
                let examples = self
                    .translator
                    .translate_points(points, program, &query)
                    .into_iter()
                    .take(FALLBACK_EXAMPLES_PER_CATEGORY)
                    .map(|r| format!("{} ({} pts)", r.description, r.points_required))
                    .collect();
                let description = self
                    .fallback
                    .get(&summary.category)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| {
                        format!(
                            "{} {} redemptions within reach",
                            summary.affordable_count,
                            summary.category.label().to_lowercase()
                        )
                    });
                NarrativeCategory {
                    category: summary.category.label().to_string(),
                    description,
                    examples,
                }
            })
            .collect();

        ValueNarrative {
            categories,
            dollar_value: format_dollars(self.translator.points_dollar_value(points, program)),
            origin: NarrativeOrigin::Fallback,
        }
    }
}

fn parse_body(raw: &str) -> anyhow::Result<ValueNarrative> {
    let body: SourceBody = serde_json::from_str(raw)?;
    if body.categories.is_empty() {
        anyhow::bail!("source returned no categories");
    }
    if body.dollar_value.trim().is_empty() {
        anyhow::bail!("source returned an empty dollar value");
    }
    Ok(ValueNarrative {
        categories:   body.categories,
        dollar_value: body.dollar_value,
        origin:       NarrativeOrigin::Source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_categories() {
        assert!(parse_body(r#"{"categories": [], "dollar_value": "$1.00"}"#).is_err());
        assert!(parse_body("not json").is_err());
    }

    #[test]
    fn parse_accepts_well_formed_body() {
        let raw = r#"{
            "categories": [
                {"category": "Travel", "description": "A short flight", "examples": ["NYC to BOS"]}
            ],
            "dollar_value": "$150.00"
        }"#;
        let n = parse_body(raw).unwrap();
        assert_eq!(n.origin, NarrativeOrigin::Source);
        assert_eq!(n.categories[0].examples, vec!["NYC to BOS".to_string()]);
    }
}
