//! Hand-curated CPM reference data per content niche.
//!
//! All CPM values are in cents. Multipliers are fixed constants that encode
//! observed ad-spend patterns; nothing here is learned from data.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// =============================================================================
// Niche
// =============================================================================

/// A content category used to bucket CPM expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    Insurance,
    Finance,
    Legal,
    Technology,
    Health,
    Business,
    Education,
    Travel,
    Gaming,
    Food,
    Entertainment,
    Lifestyle,
}

impl Niche {
    /// Every niche, in keyword-matching order.
    pub const ALL: [Niche; 12] = [
        Niche::Insurance,
        Niche::Finance,
        Niche::Legal,
        Niche::Technology,
        Niche::Health,
        Niche::Business,
        Niche::Education,
        Niche::Travel,
        Niche::Gaming,
        Niche::Food,
        Niche::Entertainment,
        Niche::Lifestyle,
    ];

    /// Niche used when nothing else matches.
    pub const FALLBACK: Niche = Niche::Lifestyle;

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Niche::Insurance => "insurance",
            Niche::Finance => "finance",
            Niche::Legal => "legal",
            Niche::Technology => "technology",
            Niche::Health => "health",
            Niche::Business => "business",
            Niche::Education => "education",
            Niche::Travel => "travel",
            Niche::Gaming => "gaming",
            Niche::Food => "food",
            Niche::Entertainment => "entertainment",
            Niche::Lifestyle => "lifestyle",
        }
    }

    /// Parses a niche name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|n| n.as_str() == name)
    }

    /// Keywords that classify a topic into this niche.
    #[must_use]
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Niche::Insurance => &["insurance", "insurer", "coverage", "deductible", "underwriting"],
            Niche::Finance => &[
                "finance", "invest", "stock", "crypto", "loan", "mortgage", "credit", "bank",
                "tax", "money", "budget", "retire", "saving",
            ],
            Niche::Legal => &["legal", "lawyer", "attorney", "lawsuit", "law firm", "court"],
            Niche::Technology => &[
                "tech", "software", "programming", "computer", "gadget", "smartphone",
                "machine learning", "artificial intelligence", "cloud", "cybersecurity",
            ],
            Niche::Health => &[
                "health", "fitness", "diet", "medical", "wellness", "nutrition", "workout",
                "weight loss",
            ],
            Niche::Business => &[
                "business", "marketing", "startup", "entrepreneur", "saas", "ecommerce", "sales",
            ],
            Niche::Education => &[
                "education", "learning", "course", "study", "school", "college", "tutorial",
            ],
            Niche::Travel => &[
                "travel", "hotel", "flight", "vacation", "destination", "tourism", "itinerary",
            ],
            Niche::Gaming => &[
                "gaming", "video game", "esports", "console", "playstation", "xbox", "nintendo",
            ],
            Niche::Food => &["food", "recipe", "cooking", "restaurant", "baking", "meal prep"],
            Niche::Entertainment => &[
                "movie", "music", "celebrity", "tv show", "streaming", "entertainment", "film",
            ],
            Niche::Lifestyle => &[
                "lifestyle", "fashion", "beauty", "home decor", "parenting", "relationship",
            ],
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Multipliers
// =============================================================================

/// Calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Returns the quarter for a 1-based month, or `None` outside 1..=12.
    #[must_use]
    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            1..=3 => Some(Quarter::Q1),
            4..=6 => Some(Quarter::Q2),
            7..=9 => Some(Quarter::Q3),
            10..=12 => Some(Quarter::Q4),
            _ => None,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

/// Per-quarter seasonal multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalMultipliers {
    pub q1: Decimal,
    pub q2: Decimal,
    pub q3: Decimal,
    pub q4: Decimal,
}

impl SeasonalMultipliers {
    #[must_use]
    pub fn for_quarter(&self, quarter: Quarter) -> Decimal {
        match quarter {
            Quarter::Q1 => self.q1,
            Quarter::Q2 => self.q2,
            Quarter::Q3 => self.q3,
            Quarter::Q4 => self.q4,
        }
    }
}

/// Where a visitor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSource {
    Organic,
    Direct,
    Referral,
    Email,
    Paid,
    Social,
}

impl TrafficSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficSource::Organic => "organic",
            TrafficSource::Direct => "direct",
            TrafficSource::Referral => "referral",
            TrafficSource::Email => "email",
            TrafficSource::Paid => "paid",
            TrafficSource::Social => "social",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "organic" | "search" => Some(TrafficSource::Organic),
            "direct" => Some(TrafficSource::Direct),
            "referral" => Some(TrafficSource::Referral),
            "email" | "newsletter" => Some(TrafficSource::Email),
            "paid" => Some(TrafficSource::Paid),
            "social" => Some(TrafficSource::Social),
            _ => None,
        }
    }
}

impl fmt::Display for TrafficSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-traffic-source multipliers. Organic search carries the strongest buyer
/// intent, social the weakest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficMultipliers {
    pub organic: Decimal,
    pub direct: Decimal,
    pub referral: Decimal,
    pub email: Decimal,
    pub paid: Decimal,
    pub social: Decimal,
}

impl TrafficMultipliers {
    /// Multipliers shared by most niches.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            organic: dec!(1.15),
            direct: dec!(1.0),
            referral: dec!(0.9),
            email: dec!(0.95),
            paid: dec!(0.85),
            social: dec!(0.7),
        }
    }

    #[must_use]
    pub fn for_source(&self, source: TrafficSource) -> Decimal {
        match source {
            TrafficSource::Organic => self.organic,
            TrafficSource::Direct => self.direct,
            TrafficSource::Referral => self.referral,
            TrafficSource::Email => self.email,
            TrafficSource::Paid => self.paid,
            TrafficSource::Social => self.social,
        }
    }
}

// =============================================================================
// Reference Table
// =============================================================================

/// CPM reference data for one niche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheCpmData {
    pub niche: Niche,
    /// Average CPM in cents.
    pub avg_cpm: i64,
    /// Lowest observed CPM in cents.
    pub min_cpm: i64,
    /// Highest observed CPM in cents.
    pub max_cpm: i64,
    /// Number of sites the averages were curated from.
    pub sample_size: u32,
    pub seasonal: SeasonalMultipliers,
    pub traffic: TrafficMultipliers,
}

fn entry(
    niche: Niche,
    (avg_cpm, min_cpm, max_cpm): (i64, i64, i64),
    sample_size: u32,
    [q1, q2, q3, q4]: [Decimal; 4],
    traffic: TrafficMultipliers,
) -> NicheCpmData {
    NicheCpmData {
        niche,
        avg_cpm,
        min_cpm,
        max_cpm,
        sample_size,
        seasonal: SeasonalMultipliers { q1, q2, q3, q4 },
        traffic,
    }
}

/// The niche table, in [`Niche::ALL`] order.
pub fn niche_table() -> &'static [NicheCpmData] {
    static TABLE: OnceLock<Vec<NicheCpmData>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let standard = TrafficMultipliers::standard();
        vec![
            // Open enrollment in Q4, renewals and tax refunds in Q1
            entry(
                Niche::Insurance,
                (1200, 800, 2500),
                450,
                [dec!(1.15), dec!(1.0), dec!(0.95), dec!(1.1)],
                TrafficMultipliers {
                    organic: dec!(1.25),
                    paid: dec!(0.8),
                    social: dec!(0.6),
                    ..standard
                },
            ),
            // Tax season
            entry(
                Niche::Finance,
                (1000, 600, 2000),
                520,
                [dec!(1.2), dec!(1.0), dec!(0.9), dec!(1.1)],
                TrafficMultipliers {
                    organic: dec!(1.2),
                    social: dec!(0.65),
                    ..standard
                },
            ),
            entry(
                Niche::Legal,
                (950, 500, 1800),
                210,
                [dec!(1.05), dec!(1.0), dec!(0.95), dec!(1.0)],
                TrafficMultipliers {
                    organic: dec!(1.2),
                    ..standard
                },
            ),
            // Holiday electronics spend
            entry(
                Niche::Technology,
                (600, 300, 1200),
                680,
                [dec!(0.9), dec!(0.95), dec!(1.0), dec!(1.25)],
                standard,
            ),
            // New-year resolutions
            entry(
                Niche::Health,
                (550, 300, 1000),
                390,
                [dec!(1.1), dec!(1.0), dec!(0.95), dec!(1.05)],
                standard,
            ),
            entry(
                Niche::Business,
                (700, 400, 1400),
                300,
                [dec!(1.0), dec!(1.0), dec!(0.95), dec!(1.15)],
                TrafficMultipliers {
                    email: dec!(1.05),
                    ..standard
                },
            ),
            // Back to school
            entry(
                Niche::Education,
                (450, 250, 900),
                260,
                [dec!(1.05), dec!(0.9), dec!(1.2), dec!(1.0)],
                standard,
            ),
            // Summer booking season
            entry(
                Niche::Travel,
                (400, 200, 900),
                310,
                [dec!(0.9), dec!(1.2), dec!(1.1), dec!(0.85)],
                TrafficMultipliers {
                    social: dec!(0.8),
                    ..standard
                },
            ),
            // Holiday releases
            entry(
                Niche::Gaming,
                (300, 150, 700),
                240,
                [dec!(0.85), dec!(0.9), dec!(1.0), dec!(1.4)],
                TrafficMultipliers {
                    social: dec!(0.8),
                    ..standard
                },
            ),
            entry(
                Niche::Food,
                (280, 150, 600),
                280,
                [dec!(0.9), dec!(1.0), dec!(1.0), dec!(1.2)],
                TrafficMultipliers {
                    social: dec!(0.8),
                    ..standard
                },
            ),
            entry(
                Niche::Entertainment,
                (250, 100, 600),
                350,
                [dec!(0.9), dec!(1.0), dec!(1.0), dec!(1.25)],
                TrafficMultipliers {
                    social: dec!(0.85),
                    ..standard
                },
            ),
            entry(
                Niche::Lifestyle,
                (300, 150, 650),
                420,
                [dec!(0.85), dec!(1.0), dec!(1.0), dec!(1.2)],
                standard,
            ),
        ]
    })
}

/// Looks up the table entry for a niche.
#[must_use]
pub fn niche_data(niche: Niche) -> &'static NicheCpmData {
    let table = niche_table();
    table
        .iter()
        .find(|d| d.niche == niche)
        .unwrap_or(&table[table.len() - 1])
}

// =============================================================================
// Geo
// =============================================================================

/// Multiplier for countries missing from [`GEO_MULTIPLIERS`].
pub const DEFAULT_GEO_MULTIPLIER: Decimal = dec!(0.6);

/// Country-code multipliers relative to US traffic.
pub const GEO_MULTIPLIERS: [(&str, Decimal); 14] = [
    ("US", dec!(1.0)),
    ("CA", dec!(0.85)),
    ("GB", dec!(0.8)),
    ("AU", dec!(0.8)),
    ("NZ", dec!(0.7)),
    ("DE", dec!(0.75)),
    ("CH", dec!(0.8)),
    ("NO", dec!(0.75)),
    ("NL", dec!(0.7)),
    ("SE", dec!(0.7)),
    ("DK", dec!(0.7)),
    ("FR", dec!(0.65)),
    ("IE", dec!(0.7)),
    ("SG", dec!(0.65)),
];

/// Returns the multiplier for an ISO alpha-2 country code, ignoring case.
#[must_use]
pub fn geo_multiplier(country_code: &str) -> Decimal {
    let code = country_code.trim().to_uppercase();
    GEO_MULTIPLIERS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(DEFAULT_GEO_MULTIPLIER, |(_, m)| *m)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Niche Tests ====================

    #[test]
    fn test_niche_parse_is_case_insensitive() {
        assert_eq!(Niche::parse("Insurance"), Some(Niche::Insurance));
        assert_eq!(Niche::parse("  GAMING "), Some(Niche::Gaming));
        assert_eq!(Niche::parse("underwater basket weaving"), None);
    }

    #[test]
    fn test_niche_round_trips_through_as_str() {
        for niche in Niche::ALL {
            assert_eq!(Niche::parse(niche.as_str()), Some(niche));
        }
    }

    #[test]
    fn test_every_niche_has_keywords() {
        for niche in Niche::ALL {
            assert!(!niche.keywords().is_empty(), "{niche} has no keywords");
        }
    }

    // ==================== Table Tests ====================

    #[test]
    fn test_table_covers_every_niche_in_order() {
        let table = niche_table();
        assert_eq!(table.len(), Niche::ALL.len());
        for (data, niche) in table.iter().zip(Niche::ALL) {
            assert_eq!(data.niche, niche);
        }
    }

    #[test]
    fn test_table_ranges_are_consistent() {
        for data in niche_table() {
            assert!(data.min_cpm <= data.avg_cpm, "{}", data.niche);
            assert!(data.avg_cpm <= data.max_cpm, "{}", data.niche);
            assert!(data.sample_size > 0);
        }
    }

    #[test]
    fn test_organic_highest_social_lowest() {
        for data in niche_table() {
            let t = data.traffic;
            let all = [t.organic, t.direct, t.referral, t.email, t.paid, t.social];
            assert!(all.iter().all(|m| *m <= t.organic), "{}", data.niche);
            assert!(all.iter().all(|m| *m >= t.social), "{}", data.niche);
        }
    }

    #[test]
    fn test_insurance_base_rate() {
        assert_eq!(niche_data(Niche::Insurance).avg_cpm, 1200);
    }

    // ==================== Quarter Tests ====================

    #[test]
    fn test_quarter_from_month() {
        assert_eq!(Quarter::from_month(1), Some(Quarter::Q1));
        assert_eq!(Quarter::from_month(6), Some(Quarter::Q2));
        assert_eq!(Quarter::from_month(9), Some(Quarter::Q3));
        assert_eq!(Quarter::from_month(12), Some(Quarter::Q4));
        assert_eq!(Quarter::from_month(0), None);
        assert_eq!(Quarter::from_month(13), None);
    }

    // ==================== Geo Tests ====================

    #[test]
    fn test_geo_multiplier_lookup() {
        assert_eq!(geo_multiplier("US"), dec!(1.0));
        assert_eq!(geo_multiplier("ca"), dec!(0.85));
        assert_eq!(geo_multiplier("BR"), DEFAULT_GEO_MULTIPLIER);
    }

    // ==================== Traffic Source Tests ====================

    #[test]
    fn test_traffic_source_parse() {
        assert_eq!(TrafficSource::parse("Organic"), Some(TrafficSource::Organic));
        assert_eq!(TrafficSource::parse("newsletter"), Some(TrafficSource::Email));
        assert_eq!(TrafficSource::parse("carrier pigeon"), None);
    }
}
