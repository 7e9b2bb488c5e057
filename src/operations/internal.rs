use std::collections::HashSet;

use tracing::trace;

use crate::error::Result;
use crate::math::intersect_2d::point_to_segment_dist;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{points_approx_equal, Point2, POINT_EPSILON};
use crate::model::{BoundaryPath, PathStep, PlanStore, WallId};

use super::joints::{next_wall_clockwise, next_wall_clockwise_of_angle, walls_at_point};
use super::polygon::path_polygon;

/// Splices dangling interior walls into an outer boundary path.
///
/// Walls with an endpoint inside the outer polygon that the trace did not
/// visit are "offending". Connected clusters of them that touch the boundary,
/// at a joint between two boundary walls or mid-span on an unsplit
/// T-junction, are walked clockwise from their attachment point and the
/// resulting sub-path is inserted right after the boundary wall that arrives
/// there, so the rendered outline routes around interior partitions.
/// Clusters that touch nothing are left for the hole resolver.
#[derive(Debug)]
pub struct ResolveInternalWalls {
    path: BoundaryPath,
}

impl ResolveInternalWalls {
    /// Creates the resolver for a traced outer boundary.
    #[must_use]
    pub fn new(path: BoundaryPath) -> Self {
        Self { path }
    }

    /// Executes the splice, returning the augmented boundary path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is malformed or a wall is missing.
    pub fn execute(&self, store: &PlanStore) -> Result<BoundaryPath> {
        if self.path.len() < 2 {
            return Ok(self.path.clone());
        }

        let outer_polygon = path_polygon(store, &self.path)?;
        let mut augmented = self.path.clone();

        let offending: Vec<WallId> = store
            .wall_ids()
            .into_iter()
            .filter(|&id| !augmented.contains_wall(id))
            .filter(|&id| {
                store.wall(id).is_ok_and(|w| {
                    point_in_polygon(&outer_polygon, w.start)
                        || point_in_polygon(&outer_polygon, w.end)
                })
            })
            .collect();

        for cluster in connected_clusters(store, &offending) {
            let Some(attach) = find_attachment(store, &augmented, &cluster)? else {
                trace!("cluster has no boundary attachment, deferring to hole resolver");
                continue;
            };
            let sub = walk_cluster(store, &augmented, &cluster, attach.point, attach.back_angle)?;
            if !sub.is_empty() {
                augmented.insert_after(attach.insert_index, sub);
            }
        }

        Ok(augmented)
    }
}

/// Where a cluster meets the boundary.
struct Attachment {
    /// Path index of the boundary wall arriving at the attachment point;
    /// the spliced sub-path goes immediately after it.
    insert_index: usize,
    point: Point2,
    /// Direction pointing back along the boundary's travel at the point.
    back_angle: f64,
}

/// Groups offending walls into endpoint-connected clusters, ordered by their
/// smallest wall key.
fn connected_clusters(store: &PlanStore, offending: &[WallId]) -> Vec<Vec<WallId>> {
    let mut remaining: Vec<WallId> = offending.to_vec();
    let mut clusters = Vec::new();

    while let Some(seed) = remaining.first().copied() {
        let mut cluster = vec![seed];
        remaining.retain(|&id| id != seed);
        let mut frontier = vec![seed];

        while let Some(current) = frontier.pop() {
            let Ok(cw) = store.wall(current) else { continue };
            let joined: Vec<WallId> = remaining
                .iter()
                .copied()
                .filter(|&other| {
                    store.wall(other).is_ok_and(|ow| {
                        ow.has_endpoint_at(cw.start) || ow.has_endpoint_at(cw.end)
                    })
                })
                .collect();
            for id in joined {
                remaining.retain(|&r| r != id);
                cluster.push(id);
                frontier.push(id);
            }
        }

        cluster.sort_unstable();
        clusters.push(cluster);
    }

    clusters
}

/// The joint sequence of a closed path: `exits[i]` is where step `i` hands
/// over to step `i + 1` (cyclically).
fn travel_joints(store: &PlanStore, path: &BoundaryPath) -> Result<Vec<Point2>> {
    let steps = path.steps();
    let n = steps.len();
    let first = store.wall(steps[0].wall)?;

    let mut exits = Vec::with_capacity(n);
    let seed = if steps[0].wall == steps[1].wall {
        first.clockwise_endpoint(steps[0].side)
    } else {
        let second = store.wall(steps[1].wall)?;
        first.centerline_intersection(second).unwrap_or(first.end)
    };
    exits.push(seed);

    for i in 1..n {
        let wall = store.wall(steps[i].wall)?;
        let entry = exits[i - 1];
        let next = steps[(i + 1) % n];
        let exit = if next.wall == steps[i].wall {
            wall.other_endpoint(entry)
        } else {
            let next_wall = store.wall(next.wall)?;
            wall.centerline_intersection(next_wall)
                .unwrap_or_else(|| wall.other_endpoint(entry))
        };
        exits.push(exit);
    }

    Ok(exits)
}

/// Finds the first point where the cluster touches the boundary path.
fn find_attachment(
    store: &PlanStore,
    path: &BoundaryPath,
    cluster: &[WallId],
) -> Result<Option<Attachment>> {
    let steps = path.steps();
    let n = steps.len();
    let exits = travel_joints(store, path)?;

    for &id in cluster {
        let wall = store.wall(id)?;
        for endpoint in [wall.start, wall.end] {
            // Joint attachment: the endpoint is a handover joint between two
            // boundary walls.
            for (i, &exit) in exits.iter().enumerate() {
                if points_approx_equal(exit, endpoint) {
                    let arriving = store.wall(steps[i].wall)?;
                    let far = arriving.far_endpoint(exit);
                    let back_angle = (far.y - exit.y).atan2(far.x - exit.x);
                    return Ok(Some(Attachment {
                        insert_index: i,
                        point: exit,
                        back_angle,
                    }));
                }
            }

            // T-junction attachment: the endpoint lies mid-span on a
            // boundary wall.
            for (i, step) in steps.iter().enumerate() {
                let bw = store.wall(step.wall)?;
                if bw.has_endpoint_at(endpoint) {
                    continue;
                }
                if point_to_segment_dist(endpoint, bw.start, bw.end) < POINT_EPSILON {
                    let entry = exits[(i + n - 1) % n];
                    let back_angle =
                        (entry.y - endpoint.y).atan2(entry.x - endpoint.x);
                    return Ok(Some(Attachment {
                        insert_index: i,
                        point: endpoint,
                        back_angle,
                    }));
                }
            }
        }
    }

    Ok(None)
}

/// Walks a cluster clockwise from its attachment point until the boundary is
/// reached again or a (wall, side) pair repeats.
fn walk_cluster(
    store: &PlanStore,
    boundary: &BoundaryPath,
    cluster: &[WallId],
    attach: Point2,
    back_angle: f64,
) -> Result<Vec<PathStep>> {
    let at_attach: Vec<WallId> = walls_at_point(store, attach)
        .into_iter()
        .filter(|id| cluster.contains(id))
        .collect();
    let Some(first) = next_wall_clockwise_of_angle(store, attach, &at_attach, back_angle)? else {
        return Ok(Vec::new());
    };

    let first_step = PathStep::new(first, store.wall(first)?.counter_clockwise_side(attach));
    let mut sub = vec![first_step];
    let mut visited: HashSet<PathStep> = HashSet::from([first_step]);

    let mut current = first;
    let mut joint = store.wall(first)?.other_endpoint(attach);

    loop {
        let at_joint = walls_at_point(store, joint);
        let Some(next) = next_wall_clockwise(store, joint, &at_joint, current)? else {
            break;
        };
        if boundary.contains_wall(next) {
            break;
        }

        let next_data = store.wall(next)?;
        let step = PathStep::new(next, next_data.counter_clockwise_side(joint));
        if !visited.insert(step) {
            break;
        }
        sub.push(step);

        joint = next_data.other_endpoint(joint);
        current = next;
    }

    Ok(sub)
}
