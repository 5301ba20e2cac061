//! Window statistics over readings.
//!
//! Plain unweighted means over whatever the window holds; no outlier
//! handling, no interpolation. An empty window yields the product's
//! documented defaults instead of an error, pinned by tests below.

use serde::Serialize;

use crate::readings::repo::Reading;

/// Average pH reported when a window holds no readings. Inherited from the
/// original product behavior; callers distinguish it via `total_readings`.
pub const EMPTY_WINDOW_AVG_PH: f32 = 6.72;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertCounts {
    pub none: u32,
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

#[derive(Debug, Serialize)]
pub struct WindowSummary {
    pub total_readings: u32,
    pub avg_ph: f32,
    pub avg_health_score: f32,
    /// Bucket i holds the count for score i+1.
    pub score_histogram: [u32; 10],
    pub alert_counts: AlertCounts,
    pub latest: Option<Reading>,
}

/// Summarize readings already ordered newest-first (as the repo returns them).
pub fn summarize(readings: &[Reading]) -> WindowSummary {
    if readings.is_empty() {
        return WindowSummary {
            total_readings: 0,
            avg_ph: EMPTY_WINDOW_AVG_PH,
            avg_health_score: 0.0,
            score_histogram: [0; 10],
            alert_counts: AlertCounts::default(),
            latest: None,
        };
    }

    let n = readings.len() as f32;
    let mut histogram = [0u32; 10];
    let mut alerts = AlertCounts::default();
    let mut ph_sum = 0.0f32;
    let mut score_sum = 0.0f32;

    for r in readings {
        ph_sum += r.ph;
        score_sum += r.health_score as f32;
        let idx = (r.health_score.clamp(1, 10) - 1) as usize;
        histogram[idx] += 1;
        match r.alert_level.as_str() {
            "none" => alerts.none += 1,
            "low" => alerts.low += 1,
            "medium" => alerts.medium += 1,
            "high" => alerts.high += 1,
            _ => alerts.critical += 1,
        }
    }

    WindowSummary {
        total_readings: readings.len() as u32,
        avg_ph: ph_sum / n,
        avg_health_score: score_sum / n,
        score_histogram: histogram,
        alert_counts: alerts,
        latest: readings.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    fn reading(score: i16, ph: f32, alert: &str, age_hours: i64) -> Reading {
        let now = OffsetDateTime::now_utc();
        Reading {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            ph,
            color_r: 200,
            color_g: 190,
            color_b: 150,
            health_score: score,
            hydration_level: "good".into(),
            confidence_score: 0.85,
            alert_level: alert.into(),
            recommendations: vec![],
            reading_time: now - Duration::hours(age_hours),
            device_id: None,
            source: "manual".into(),
            created_at: now,
        }
    }

    #[test]
    fn empty_window_returns_documented_defaults() {
        let s = summarize(&[]);
        assert_eq!(s.total_readings, 0);
        assert_eq!(s.avg_health_score, 0.0);
        assert_eq!(s.avg_ph, 6.72);
        assert_eq!(s.score_histogram, [0; 10]);
        assert_eq!(s.alert_counts, AlertCounts::default());
        assert!(s.latest.is_none());
    }

    #[test]
    fn means_are_unweighted_arithmetic() {
        let rows = vec![
            reading(10, 7.0, "none", 0),
            reading(6, 6.0, "medium", 1),
            reading(2, 5.0, "critical", 2),
        ];
        let s = summarize(&rows);
        assert_eq!(s.total_readings, 3);
        assert!((s.avg_health_score - 6.0).abs() < 1e-6);
        assert!((s.avg_ph - 6.0).abs() < 1e-6);
    }

    #[test]
    fn histogram_and_alert_counts_cover_every_reading() {
        let rows = vec![
            reading(10, 6.5, "none", 0),
            reading(10, 6.5, "none", 1),
            reading(4, 6.1, "high", 2),
            reading(1, 5.2, "critical", 3),
        ];
        let s = summarize(&rows);
        assert_eq!(s.score_histogram[9], 2);
        assert_eq!(s.score_histogram[3], 1);
        assert_eq!(s.score_histogram[0], 1);
        assert_eq!(s.score_histogram.iter().sum::<u32>(), s.total_readings);
        assert_eq!(s.alert_counts.none, 2);
        assert_eq!(s.alert_counts.high, 1);
        assert_eq!(s.alert_counts.critical, 1);
    }

    #[test]
    fn latest_is_the_first_row_of_the_desc_ordering() {
        let rows = vec![reading(8, 6.8, "low", 0), reading(3, 5.9, "high", 5)];
        let s = summarize(&rows);
        assert_eq!(s.latest.as_ref().unwrap().health_score, 8);
    }
}
