//! Mock reading generation for demos and tests.
//!
//! Canned scenarios with plausible base values plus random jitter, spread
//! back over a time range. Inserts are chunked and best-effort: a failed
//! chunk is logged and generation continues.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::readings::repo::{self, NewReading, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    WellHydrated,
    MildDehydration,
    ModerateDehydration,
    SevereDehydration,
    Overhydrated,
}

impl Scenario {
    /// Base (ph, r, g, b) the jitter is applied around.
    fn base(&self) -> (f32, u8, u8, u8) {
        match self {
            Self::WellHydrated => (6.5, 245, 240, 205),
            Self::MildDehydration => (6.2, 225, 210, 140),
            Self::ModerateDehydration => (5.9, 180, 160, 90),
            Self::SevereDehydration => (5.5, 120, 95, 55),
            Self::Overhydrated => (7.4, 250, 250, 245),
        }
    }
}

fn jitter_channel<R: Rng>(rng: &mut R, base: u8) -> u8 {
    (base as i16 + rng.gen_range(-15..=15)).clamp(0, 255) as u8
}

/// Generate `count` readings for one user, evenly spread over the last
/// `hours` hours with a little per-sample time noise.
pub fn generate(
    user_id: Uuid,
    scenario: Scenario,
    count: usize,
    hours: u32,
    device_id: Option<&str>,
) -> Vec<NewReading> {
    let mut rng = rand::thread_rng();
    let now = OffsetDateTime::now_utc();
    let (base_ph, base_r, base_g, base_b) = scenario.base();
    let step = Duration::seconds((hours as i64 * 3600) / count.max(1) as i64);

    (0..count)
        .map(|i| {
            let ph = (base_ph + rng.gen_range(-0.3..=0.3)).clamp(0.0, 14.0);
            let rgb = (
                jitter_channel(&mut rng, base_r),
                jitter_channel(&mut rng, base_g),
                jitter_channel(&mut rng, base_b),
            );
            let noise = Duration::seconds(rng.gen_range(0..=60));
            let reading_time = now - step * (i as i32) - noise;
            NewReading::classified(
                user_id,
                ph,
                rgb,
                reading_time,
                device_id.map(|d| d.to_string()),
                Source::Manual,
            )
        })
        .collect()
}

/// Generate and insert, returning (inserted, failed) row counts.
pub async fn run(
    db: &PgPool,
    user_id: Uuid,
    scenario: Scenario,
    count: usize,
    hours: u32,
) -> (usize, usize) {
    let batch = generate(user_id, scenario, count, hours, Some("mock"));
    let (inserted, failed) = repo::insert_batch_best_effort(db, &batch).await;
    info!(%user_id, ?scenario, inserted, failed, "mock generation finished");
    (inserted, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_values_stay_in_valid_ranges() {
        let batch = generate(Uuid::new_v4(), Scenario::SevereDehydration, 100, 24, None);
        assert_eq!(batch.len(), 100);
        for new in &batch {
            assert!((0.0..=14.0).contains(&new.ph));
            assert!((1..=10).contains(&new.health_score));
            assert!((0.0..=1.0).contains(&new.confidence_score));
        }
    }

    #[test]
    fn severe_scenario_trends_worse_than_well_hydrated() {
        let bad = generate(Uuid::new_v4(), Scenario::SevereDehydration, 50, 24, None);
        let good = generate(Uuid::new_v4(), Scenario::WellHydrated, 50, 24, None);
        let mean = |b: &[NewReading]| {
            b.iter().map(|n| n.health_score as f32).sum::<f32>() / b.len() as f32
        };
        assert!(mean(&bad) < mean(&good));
    }

    #[test]
    fn readings_are_spread_over_the_requested_range() {
        let hours = 12;
        let batch = generate(Uuid::new_v4(), Scenario::WellHydrated, 24, hours, None);
        let now = OffsetDateTime::now_utc();
        let oldest = batch.iter().map(|n| n.reading_time).min().unwrap();
        // step * count plus up to a minute of noise
        assert!(now - oldest <= Duration::hours(hours as i64) + Duration::minutes(2));
        for new in &batch {
            assert!(new.reading_time <= now);
        }
    }

    #[test]
    fn scenario_deserializes_from_snake_case() {
        let s: Scenario = serde_json::from_str("\"severe_dehydration\"").unwrap();
        assert_eq!(s, Scenario::SevereDehydration);
    }
}
