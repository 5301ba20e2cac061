//! Color-to-health-score classification.
//!
//! The single source of truth for the scoring rules; every ingestion path
//! (serial, manual, mock) goes through [`classify`] and the lookup tables
//! here. Scale convention: 1 = worst, 10 = best.

use serde::{Deserialize, Serialize};

/// Fixed classifier confidence. The sensor gives no per-sample statistic,
/// and a jittered value would break determinism.
pub const CONFIDENCE: f32 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HydrationLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl HydrationLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            9..=10 => Self::Excellent,
            7..=8 => Self::Good,
            5..=6 => Self::Fair,
            3..=4 => Self::Poor,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }
}

impl AlertLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            9..=10 => Self::None,
            7..=8 => Self::Low,
            5..=6 => Self::Medium,
            3..=4 => Self::High,
            _ => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Result of classifying one color sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub score: u8,
    pub confidence: f32,
}

impl Classification {
    pub fn hydration_level(&self) -> HydrationLevel {
        HydrationLevel::from_score(self.score)
    }

    pub fn alert_level(&self) -> AlertLevel {
        AlertLevel::from_score(self.score)
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        recommendations(self.score)
    }
}

/// `(r+g)/2 - b`. High for saturated yellow, negative for blue-ish samples.
pub fn yellowness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 + g as f32) / 2.0 - b as f32
}

/// Plain channel mean, 0..=255.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 + g as f32 + b as f32) / 3.0
}

/// Classify an RGB sample into a 1-10 health score.
///
/// Brightness picks a base score; concentrated yellow pulls it down. Pure:
/// identical inputs always produce the identical score and confidence.
pub fn classify(r: u8, g: u8, b: u8) -> Classification {
    let base = match brightness(r, g, b) {
        v if v >= 220.0 => 10,
        v if v >= 195.0 => 9,
        v if v >= 170.0 => 8,
        v if v >= 145.0 => 7,
        v if v >= 120.0 => 6,
        v if v >= 100.0 => 5,
        v if v >= 85.0 => 4,
        v if v >= 70.0 => 3,
        v if v >= 55.0 => 2,
        _ => 1,
    };

    let penalty = match yellowness(r, g, b) {
        y if y > 90.0 => 3,
        y if y > 60.0 => 2,
        y if y > 30.0 => 1,
        _ => 0,
    };

    Classification {
        score: (base - penalty).max(1) as u8,
        confidence: CONFIDENCE,
    }
}

/// Advice strings shown with a reading. Total over scores 1-10.
pub fn recommendations(score: u8) -> &'static [&'static str] {
    match HydrationLevel::from_score(score) {
        HydrationLevel::Excellent => &["Hydration is on track. Keep your current routine."],
        HydrationLevel::Good => &["Slightly below optimal. A glass of water within the hour helps."],
        HydrationLevel::Fair => &[
            "Drink 250-500 ml of water now.",
            "Recheck within 2-3 hours.",
        ],
        HydrationLevel::Poor => &[
            "Drink 500 ml of water immediately.",
            "Avoid caffeine and alcohol until readings improve.",
        ],
        HydrationLevel::Critical => &[
            "Severe dehydration indicators. Rehydrate now.",
            "If symptoms persist, contact a medical professional.",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pale_bright_sample_scores_excellent() {
        let c = classify(255, 255, 200);
        assert!(c.score >= 9, "got score {}", c.score);
        assert_eq!(c.hydration_level(), HydrationLevel::Excellent);
        assert_eq!(c.alert_level(), AlertLevel::None);
    }

    #[test]
    fn dark_sample_scores_critical() {
        let c = classify(80, 60, 60);
        assert!(c.score <= 2, "got score {}", c.score);
        assert_eq!(c.hydration_level(), HydrationLevel::Critical);
        assert_eq!(c.alert_level(), AlertLevel::Critical);
    }

    #[test]
    fn classify_is_pure() {
        let a = classify(190, 180, 120);
        let b = classify(190, 180, 120);
        assert_eq!(a, b);
        assert_eq!(a.confidence, CONFIDENCE);
    }

    #[test]
    fn yellowness_penalty_lowers_score() {
        // Same brightness band, one strongly yellow.
        let pale = classify(200, 200, 200);
        let yellow = classify(240, 230, 130);
        assert!(yellow.score < pale.score);
    }

    #[test]
    fn score_never_leaves_range() {
        // Darkest yellow-saturated corner cannot underflow below 1.
        for (r, g, b) in [(0, 0, 0), (255, 255, 0), (120, 120, 0), (255, 255, 255)] {
            let c = classify(r, g, b);
            assert!((1..=10).contains(&c.score), "({r},{g},{b}) -> {}", c.score);
        }
    }

    #[test]
    fn lookup_tables_are_total() {
        for score in 1..=10u8 {
            // from_score is a total match; exercising it pins that no score
            // panics and every score has recommendations.
            let _ = HydrationLevel::from_score(score);
            let _ = AlertLevel::from_score(score);
            assert!(!recommendations(score).is_empty());
        }
    }

    #[test]
    fn tables_are_monotonic_in_score() {
        fn hydration_rank(l: HydrationLevel) -> u8 {
            match l {
                HydrationLevel::Critical => 0,
                HydrationLevel::Poor => 1,
                HydrationLevel::Fair => 2,
                HydrationLevel::Good => 3,
                HydrationLevel::Excellent => 4,
            }
        }
        fn alert_rank(l: AlertLevel) -> u8 {
            match l {
                AlertLevel::Critical => 0,
                AlertLevel::High => 1,
                AlertLevel::Medium => 2,
                AlertLevel::Low => 3,
                AlertLevel::None => 4,
            }
        }
        for score in 1..10u8 {
            assert!(
                hydration_rank(HydrationLevel::from_score(score + 1))
                    >= hydration_rank(HydrationLevel::from_score(score))
            );
            assert!(
                alert_rank(AlertLevel::from_score(score + 1))
                    >= alert_rank(AlertLevel::from_score(score))
            );
        }
    }

    #[test]
    fn yellowness_can_be_negative() {
        assert!(yellowness(10, 10, 200) < 0.0);
    }

    #[test]
    fn level_serde_is_lowercase() {
        let json = serde_json::to_string(&HydrationLevel::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        let json = serde_json::to_string(&AlertLevel::None).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
