use std::cmp::Ordering;

use crate::error::Result;
use crate::math::intersect_2d::point_to_segment_dist;
use crate::math::{Point2, POINT_EPSILON};
use crate::model::{PlanStore, WallId};

/// All walls with an endpoint at `point` (within tolerance), in key order.
#[must_use]
pub fn walls_at_point(store: &PlanStore, point: Point2) -> Vec<WallId> {
    let mut found: Vec<WallId> = store
        .walls()
        .filter(|(_, w)| w.has_endpoint_at(point))
        .map(|(id, _)| id)
        .collect();
    found.sort_unstable();
    found
}

/// Like [`walls_at_point`], but also reporting walls whose centerline span
/// passes through `point` without an endpoint there (unsplit T-junctions).
#[must_use]
pub fn walls_through_point(store: &PlanStore, point: Point2) -> Vec<WallId> {
    let mut found: Vec<WallId> = store
        .walls()
        .filter(|(_, w)| {
            w.has_endpoint_at(point) || point_to_segment_dist(point, w.start, w.end) < POINT_EPSILON
        })
        .map(|(id, _)| id)
        .collect();
    found.sort_unstable();
    found
}

/// Outgoing angle of `wall` at the joint `at`: the direction toward the
/// endpoint on the far side of the joint.
fn outgoing_angle(store: &PlanStore, at: Point2, wall: WallId) -> Result<f64> {
    let far = store.wall(wall)?.far_endpoint(at);
    Ok((far.y - at.y).atan2(far.x - at.x))
}

/// Sorts walls meeting at `at` into clockwise (descending-angle) order,
/// tiebreaking by key.
///
/// # Errors
///
/// Returns an error if any wall is missing from the store.
pub fn angular_order(store: &PlanStore, at: Point2, walls: &[WallId]) -> Result<Vec<WallId>> {
    let mut entries: Vec<(f64, WallId)> = Vec::with_capacity(walls.len());
    for &id in walls {
        entries.push((outgoing_angle(store, at, id)?, id));
    }
    entries.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    Ok(entries.into_iter().map(|(_, id)| id).collect())
}

/// Sorts walls meeting at `at` into clockwise order and rotates the result
/// so `pivot` comes first.
///
/// Every tracer needs "all walls at this joint, clockwise, starting with the
/// wall I arrived from"; this is that query. Returns `None` if `pivot` is
/// not among `walls`.
///
/// # Errors
///
/// Returns an error if any wall is missing from the store.
pub fn sort_walls_clockwise(
    store: &PlanStore,
    at: Point2,
    walls: &[WallId],
    pivot: WallId,
) -> Result<Option<Vec<WallId>>> {
    let ordered = angular_order(store, at, walls)?;
    let Some(pos) = ordered.iter().position(|&id| id == pivot) else {
        return Ok(None);
    };
    let mut rotated = Vec::with_capacity(ordered.len());
    rotated.extend_from_slice(&ordered[pos..]);
    rotated.extend_from_slice(&ordered[..pos]);
    Ok(Some(rotated))
}

/// The wall following `pivot` in clockwise order around `at`.
///
/// A single-entry list yields `pivot` itself (the dead-end turnaround).
///
/// # Errors
///
/// Returns an error if any wall is missing from the store.
pub fn next_wall_clockwise(
    store: &PlanStore,
    at: Point2,
    walls: &[WallId],
    pivot: WallId,
) -> Result<Option<WallId>> {
    let Some(ordered) = sort_walls_clockwise(store, at, walls, pivot)? else {
        return Ok(None);
    };
    Ok(Some(ordered[1 % ordered.len()]))
}

/// The first wall clockwise after the direction `ref_angle` around `at`.
///
/// Used when the arrival direction is not itself a wall at the joint (a
/// boundary wall passing through an unsplit T-junction).
///
/// # Errors
///
/// Returns an error if any wall is missing from the store.
pub fn next_wall_clockwise_of_angle(
    store: &PlanStore,
    at: Point2,
    walls: &[WallId],
    ref_angle: f64,
) -> Result<Option<WallId>> {
    let mut best: Option<(f64, WallId)> = None;
    for &id in walls {
        let angle = outgoing_angle(store, at, id)?;
        // Clockwise offset from ref_angle, in (0, 2pi].
        let mut delta = ref_angle - angle;
        while delta <= 0.0 {
            delta += std::f64::consts::TAU;
        }
        while delta > std::f64::consts::TAU {
            delta -= std::f64::consts::TAU;
        }
        let better = match best {
            None => true,
            Some((bd, bid)) => delta < bd || ((delta - bd).abs() < f64::EPSILON && id < bid),
        };
        if better {
            best = Some((delta, id));
        }
    }
    Ok(best.map(|(_, id)| id))
}
