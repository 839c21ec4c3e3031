//! Random placement of houses and logs
//!
//! Houses never fail to place: after the attempt budget the last candidate
//! is kept even if it sits too close to a neighbour. Logs are the opposite:
//! when no candidate clears the houses the spawn is skipped.

use glam::Vec2;
use rand::Rng;

use super::catalog::LevelSpec;
use crate::consts::*;
use crate::persistence::HouseRecord;

/// Uniform point in `[margin, size - margin]` on both axes
fn sample_point<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, margin: f32) -> Vec2 {
    // Degenerate maps collapse to the centre line rather than panicking
    let x_hi = (width - margin).max(margin);
    let y_hi = (height - margin).max(margin);
    Vec2::new(
        rng.random_range(margin..=x_hi),
        rng.random_range(margin..=y_hi),
    )
}

/// Place `house_count` houses and assign their quotas in order
pub fn generate_houses<R: Rng + ?Sized>(spec: &LevelSpec, rng: &mut R) -> Vec<HouseRecord> {
    let (width, height) = (spec.map_width as f32, spec.map_height as f32);
    let mut placed: Vec<Vec2> = Vec::with_capacity(spec.house_count as usize);

    for i in 0..spec.house_count as usize {
        let mut candidate = sample_point(rng, width, height, HOUSE_MARGIN);
        let mut attempts = 1;
        while attempts < HOUSE_PLACEMENT_ATTEMPTS
            && placed
                .iter()
                .any(|p| p.distance(candidate) < MIN_HOUSE_DISTANCE)
        {
            candidate = sample_point(rng, width, height, HOUSE_MARGIN);
            attempts += 1;
        }
        if placed
            .iter()
            .any(|p| p.distance(candidate) < MIN_HOUSE_DISTANCE)
        {
            log::debug!(
                "Level {} house {}: accepting crowded position after {} attempts",
                spec.level_id,
                i,
                attempts
            );
        }
        placed.push(candidate);
    }

    placed
        .into_iter()
        .zip(spec.quotas.iter())
        .map(|(pos, &required)| HouseRecord {
            x: pos.x,
            y: pos.y,
            required,
            delivered: 0,
        })
        .collect()
}

/// Find a spot for a log clear of every house, or `None` to skip the spawn
pub fn place_collectible<R: Rng + ?Sized>(
    spec: &LevelSpec,
    houses: &[HouseRecord],
    rng: &mut R,
) -> Option<Vec2> {
    let (width, height) = (spec.map_width as f32, spec.map_height as f32);
    (0..LOG_PLACEMENT_ATTEMPTS)
        .map(|_| sample_point(rng, width, height, LOG_MARGIN))
        .find(|candidate| {
            houses
                .iter()
                .all(|h| h.pos().distance(*candidate) >= LOG_HOUSE_CLEARANCE)
        })
}
