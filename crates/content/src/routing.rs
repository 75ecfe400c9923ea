//! Keyword routing of drafts to content categories.
//!
//! Each category is a niche with its keyword list. A draft scores 3 points
//! per keyword in its title, 2 per keyword in its tags, and 1 per body
//! occurrence (at most [`BODY_HIT_CAP`] per keyword).

use crate::frontmatter::ParsedDraft;
use ifrit_monetization::Niche;
use serde::{Deserialize, Serialize};

pub const TITLE_WEIGHT: u32 = 3;
pub const TAG_WEIGHT: u32 = 2;
pub const BODY_HIT_CAP: usize = 5;

/// Confidence ceiling for keyword-scored recommendations.
pub const MAX_SCORED_CONFIDENCE: u32 = 95;

/// Confidence for a category named explicitly in frontmatter.
pub const EXPLICIT_CONFIDENCE: u32 = 100;

const MAX_ALTERNATIVES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub niche: Niche,
    /// Lowercase keywords.
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new<I, S>(niche: Niche, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            niche,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Niche,
    pub score: u32,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRecommendation {
    pub category: Niche,
    pub score: u32,
    /// 0-100.
    pub confidence: u32,
    pub matched_keywords: Vec<String>,
    /// Runner-up categories with a non-zero score, best first.
    pub alternatives: Vec<CategoryScore>,
    /// True when the draft named its category in frontmatter.
    pub explicit: bool,
}

#[derive(Debug, Clone)]
pub struct CategoryRouter {
    categories: Vec<Category>,
}

impl Default for CategoryRouter {
    /// One category per niche, in niche table order.
    fn default() -> Self {
        Self::new(
            Niche::ALL
                .into_iter()
                .map(|n| Category::new(n, n.keywords()))
                .collect(),
        )
    }
}

impl CategoryRouter {
    /// Category order breaks score ties.
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// A niche named by frontmatter `category` or `niche`, if it parses.
    fn explicit_category(draft: &ParsedDraft) -> Option<Niche> {
        ["category", "niche"]
            .into_iter()
            .filter_map(|key| draft.frontmatter.get_str(key))
            .find_map(Niche::parse)
    }

    /// Scores every category against the draft, in category order.
    #[must_use]
    pub fn score_all(&self, draft: &ParsedDraft) -> Vec<CategoryScore> {
        let title = draft.title.as_deref().unwrap_or_default().to_lowercase();
        let tags: Vec<String> = draft.tags().iter().map(|t| t.to_lowercase()).collect();
        let body = draft.body.to_lowercase();

        self.categories
            .iter()
            .map(|category| {
                let mut score = 0;
                let mut matched_keywords = Vec::new();

                for keyword in &category.keywords {
                    let mut hit = 0;
                    if title.contains(keyword.as_str()) {
                        hit += TITLE_WEIGHT;
                    }
                    if tags.iter().any(|t| t.contains(keyword.as_str())) {
                        hit += TAG_WEIGHT;
                    }
                    hit += body.matches(keyword.as_str()).take(BODY_HIT_CAP).count() as u32;

                    if hit > 0 {
                        score += hit;
                        matched_keywords.push(keyword.clone());
                    }
                }

                CategoryScore {
                    category: category.niche,
                    score,
                    matched_keywords,
                }
            })
            .collect()
    }

    /// Recommends a category for a draft.
    #[must_use]
    pub fn recommend(&self, draft: &ParsedDraft) -> RoutingRecommendation {
        if let Some(category) = Self::explicit_category(draft) {
            return RoutingRecommendation {
                category,
                score: 0,
                confidence: EXPLICIT_CONFIDENCE,
                matched_keywords: Vec::new(),
                alternatives: Vec::new(),
                explicit: true,
            };
        }

        let mut scores = self.score_all(draft);
        // Stable sort keeps category order among equal scores
        scores.sort_by(|a, b| b.score.cmp(&a.score));

        let mut ranked = scores.into_iter().filter(|s| s.score > 0);
        let Some(top) = ranked.next() else {
            return RoutingRecommendation {
                category: Niche::FALLBACK,
                score: 0,
                confidence: 0,
                matched_keywords: Vec::new(),
                alternatives: Vec::new(),
                explicit: false,
            };
        };

        let alternatives: Vec<CategoryScore> = ranked.take(MAX_ALTERNATIVES).collect();
        let runner_up = alternatives.first().map_or(0, |s| s.score);
        let confidence = (100 * top.score / (top.score + runner_up)).min(MAX_SCORED_CONFIDENCE);

        RoutingRecommendation {
            category: top.category,
            score: top.score,
            confidence,
            matched_keywords: top.matched_keywords,
            alternatives,
            explicit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse_draft;

    // ==================== Explicit Category Tests ====================

    #[test]
    fn test_explicit_category_wins() {
        let draft = parse_draft("---\ncategory: Gaming\n---\n# Best life insurance quotes\n");
        let rec = CategoryRouter::default().recommend(&draft);
        assert_eq!(rec.category, Niche::Gaming);
        assert_eq!(rec.confidence, 100);
        assert!(rec.explicit);
    }

    #[test]
    fn test_niche_key_also_explicit() {
        let draft = parse_draft("---\nniche: food\n---\nbody");
        assert_eq!(CategoryRouter::default().recommend(&draft).category, Niche::Food);
    }

    #[test]
    fn test_unknown_explicit_category_falls_through_to_scoring() {
        let draft = parse_draft("---\ncategory: misc\n---\n# Easy weeknight recipe\n");
        let rec = CategoryRouter::default().recommend(&draft);
        assert_eq!(rec.category, Niche::Food);
        assert!(!rec.explicit);
    }

    // ==================== Scoring Tests ====================

    #[test]
    fn test_title_tag_and_body_weights() {
        let draft = parse_draft(
            "---\ntitle: Hotel hacks\ntags: [packing]\n---\nhotel hotel hotel hotel hotel hotel hotel",
        );
        let scores = CategoryRouter::default().score_all(&draft);
        let travel = scores.iter().find(|s| s.category == Niche::Travel).unwrap();
        // 3 (title) + 5 (body, capped)
        assert_eq!(travel.score, 8);
        assert_eq!(travel.matched_keywords, vec!["hotel"]);
    }

    #[test]
    fn test_tags_score_two() {
        let draft = parse_draft("---\ntags: [esports]\n---\nnothing relevant");
        let scores = CategoryRouter::default().score_all(&draft);
        let gaming = scores.iter().find(|s| s.category == Niche::Gaming).unwrap();
        assert_eq!(gaming.score, 2);
    }

    #[test]
    fn test_confidence_against_runner_up() {
        // travel: title 3 + body 2 = 5; food: body 1 (recipe)
        let draft = parse_draft("# Flight deals\n\nflight alerts and one recipe");
        let rec = CategoryRouter::default().recommend(&draft);
        assert_eq!(rec.category, Niche::Travel);
        assert_eq!(rec.score, 5);
        assert_eq!(rec.alternatives[0].category, Niche::Food);
        // 100 * 5 / 6
        assert_eq!(rec.confidence, 83);
    }

    #[test]
    fn test_sole_match_capped_at_95() {
        let draft = parse_draft("# Baking bread");
        let rec = CategoryRouter::default().recommend(&draft);
        assert_eq!(rec.category, Niche::Food);
        assert_eq!(rec.confidence, 95);
        assert!(rec.alternatives.is_empty());
    }

    #[test]
    fn test_ties_go_to_table_order() {
        let draft = parse_draft("fashion and baking");
        let rec = CategoryRouter::default().recommend(&draft);
        // Food precedes Lifestyle in the niche table
        assert_eq!(rec.category, Niche::Food);
        assert_eq!(rec.confidence, 50);
    }

    #[test]
    fn test_no_hits_falls_back_to_lifestyle() {
        let draft = parse_draft("# Untitled\n\nLorem ipsum dolor sit amet.");
        let rec = CategoryRouter::default().recommend(&draft);
        assert_eq!(rec.category, Niche::Lifestyle);
        assert_eq!(rec.confidence, 0);
        assert_eq!(rec.score, 0);
    }

    #[test]
    fn test_custom_categories() {
        let router = CategoryRouter::new(vec![Category::new(Niche::Business, ["Rust", "cargo"])]);
        let rec = router.recommend(&parse_draft("# Shipping Rust services"));
        assert_eq!(rec.category, Niche::Business);
        assert_eq!(rec.matched_keywords, vec!["rust"]);
    }
}
