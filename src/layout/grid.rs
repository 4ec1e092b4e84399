//! Strict grid composition: every lane and root band shares one width,
//! bands stack top to bottom, pools stack with a fixed gap.

use crate::config::LayoutConfig;
use crate::ir::Document;

use super::containment::Bucket;
use super::ranking::{RankedNode, RankedPositions};
use super::shapes::shape_info;
use super::types::{NodeKind, PositionedNode};

pub(crate) const UNASSIGNED_POOL_ID: &str = "pool-unassigned";

/// A pool band before placement: declared, synthesized for orphan lanes, or
/// the trailing bucket for unassigned elements.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PoolPlan {
    pub id: String,
    pub label: String,
    /// `(lane index, member element indices)` in document order.
    pub lanes: Vec<(usize, Vec<usize>)>,
    /// Element indices placed directly in the pool.
    pub root: Vec<usize>,
}

/// Groups lanes and elements into pool bands, in stacking order.
///
/// `members` lists the element indices that take part in the layout, in
/// document order; `buckets` is index-aligned with `doc.elements`.
pub(crate) fn plan_pools(doc: &Document, buckets: &[Bucket], members: &[usize]) -> Vec<PoolPlan> {
    let in_bucket = |bucket: Bucket| -> Vec<usize> {
        members
            .iter()
            .copied()
            .filter(|&idx| buckets.get(idx) == Some(&bucket))
            .collect()
    };
    let lane_plan = |lane_idx: usize| (lane_idx, in_bucket(Bucket::Lane(lane_idx)));

    let mut plans: Vec<PoolPlan> = doc
        .pools
        .iter()
        .enumerate()
        .map(|(pool_idx, pool)| {
            let owns_lanes = doc.pool_index(&pool.name) == Some(pool_idx);
            let lanes = if owns_lanes {
                doc.lanes_of(&pool.name).map(|(idx, _)| lane_plan(idx)).collect()
            } else {
                Vec::new()
            };
            PoolPlan {
                id: format!("pool-{pool_idx}"),
                label: pool.name.clone(),
                lanes,
                root: in_bucket(Bucket::PoolRoot(pool_idx)),
            }
        })
        .collect();

    let mut orphan_pools: Vec<&str> = Vec::new();
    for lane in &doc.lanes {
        if doc.pool_index(&lane.pool).is_none() && !orphan_pools.contains(&lane.pool.as_str()) {
            orphan_pools.push(&lane.pool);
        }
    }
    for (orphan_idx, name) in orphan_pools.into_iter().enumerate() {
        plans.push(PoolPlan {
            id: format!("pool-orphan-{orphan_idx}"),
            label: name.to_string(),
            lanes: doc.lanes_of(name).map(|(idx, _)| lane_plan(idx)).collect(),
            root: Vec::new(),
        });
    }

    let unassigned = in_bucket(Bucket::Unassigned);
    if !unassigned.is_empty() {
        plans.push(PoolPlan {
            id: UNASSIGNED_POOL_ID.to_string(),
            label: String::new(),
            lanes: Vec::new(),
            root: unassigned,
        });
    }
    plans
}

/// `max(rightmost solver edge + padding, floor)`.
pub(crate) fn grid_width(positions: &RankedPositions, config: &LayoutConfig) -> f32 {
    let max_right = positions
        .values()
        .map(RankedNode::right_edge)
        .fold(0.0f32, f32::max);
    (max_right + config.grid_padding).max(config.min_grid_width)
}

/// Result of placing one band: its nodes in parent-first order and height.
#[derive(Debug, Default)]
struct PlacedBand {
    nodes: Vec<PositionedNode>,
    height: f32,
}

pub(crate) struct GridContext<'a> {
    pub doc: &'a Document,
    pub positions: &'a RankedPositions,
    pub config: &'a LayoutConfig,
    pub grid_width: f32,
}

/// Places every pool, returning the nodes and the canvas height.
pub(crate) fn compose(ctx: &GridContext<'_>, plans: &[PoolPlan]) -> (Vec<PositionedNode>, f32) {
    let (nodes, next_offset) = plans.iter().fold(
        (Vec::new(), 0.0f32),
        |(mut nodes, offset), plan| {
            let band = place_pool(ctx, plan, offset);
            nodes.extend(band.nodes);
            (nodes, offset + band.height + ctx.config.pool_gap)
        },
    );
    let height = if plans.is_empty() {
        0.0
    } else {
        next_offset - ctx.config.pool_gap
    };
    (nodes, height)
}

fn place_pool(ctx: &GridContext<'_>, plan: &PoolPlan, y: f32) -> PlacedBand {
    let config = ctx.config;
    let body = if plan.lanes.is_empty() {
        place_root_band(ctx, plan)
    } else {
        plan.lanes
            .iter()
            .fold(PlacedBand::default(), |mut acc, (lane_idx, members)| {
                let lane = place_lane(ctx, &plan.id, *lane_idx, members, acc.height);
                acc.nodes.extend(lane.nodes);
                acc.height += lane.height;
                acc
            })
    };

    let mut nodes = Vec::with_capacity(body.nodes.len() + 1);
    nodes.push(container_node(
        plan.id.clone(),
        NodeKind::Pool,
        plan.label.clone(),
        (0.0, y),
        None,
        (ctx.grid_width + config.pool_header_width, body.height),
    ));
    nodes.extend(body.nodes);
    PlacedBand {
        nodes,
        height: body.height,
    }
}

fn place_lane(
    ctx: &GridContext<'_>,
    pool_id: &str,
    lane_idx: usize,
    members: &[usize],
    y: f32,
) -> PlacedBand {
    let config = ctx.config;
    let ranked: Vec<(usize, &RankedNode)> = members
        .iter()
        .filter_map(|&idx| {
            let element = ctx.doc.elements.get(idx)?;
            Some((idx, ctx.positions.get(&element.id)?))
        })
        .collect();

    let (min_y, max_y) = ranked
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (_, pos)| {
            (lo.min(pos.y), hi.max(pos.y))
        });
    let (span, group_center) = if ranked.is_empty() {
        (0.0, 0.0)
    } else {
        (max_y - min_y, (min_y + max_y) / 2.0)
    };
    let height = config.lane_min_height.max(span + config.lane_padding_y);
    let band_center = height / 2.0;

    let lane_id = format!("lane-{lane_idx}");
    let label = ctx
        .doc
        .lanes
        .get(lane_idx)
        .map(|lane| lane.name.clone())
        .unwrap_or_default();
    let mut nodes = vec![container_node(
        lane_id.clone(),
        NodeKind::Lane,
        label,
        (config.pool_header_width, y),
        Some(pool_id.to_string()),
        (ctx.grid_width, height),
    )];
    nodes.extend(ranked.iter().map(|(idx, pos)| {
        element_node(ctx, *idx, &lane_id, |anchor| {
            (pos.x, band_center + (pos.y - group_center) - anchor)
        })
    }));
    PlacedBand { nodes, height }
}

/// Single flat row centered in a fixed-height band.
fn place_root_band(ctx: &GridContext<'_>, plan: &PoolPlan) -> PlacedBand {
    let config = ctx.config;
    let height = config.root_band_height;
    let nodes = plan
        .root
        .iter()
        .filter_map(|&idx| {
            let element = ctx.doc.elements.get(idx)?;
            let pos = ctx.positions.get(&element.id)?;
            Some(element_node(ctx, idx, &plan.id, |anchor| {
                (config.pool_header_width + pos.x, height / 2.0 - anchor)
            }))
        })
        .collect();
    PlacedBand { nodes, height }
}

fn element_node(
    ctx: &GridContext<'_>,
    idx: usize,
    parent_id: &str,
    place: impl FnOnce(f32) -> (f32, f32),
) -> PositionedNode {
    let element = &ctx.doc.elements[idx];
    let shape = shape_info(&element.kind, &ctx.config.shapes);
    let (x, y) = place(shape.spec.anchor_offset);
    PositionedNode {
        id: element.id.clone(),
        kind: shape.kind,
        variant: shape.variant,
        label: element.label.clone(),
        x,
        y,
        parent_id: Some(parent_id.to_string()),
        width: shape.spec.width,
        height: shape.spec.height,
        markers: shape.markers,
        icon: shape.icon,
    }
}

fn container_node(
    id: String,
    kind: NodeKind,
    label: String,
    (x, y): (f32, f32),
    parent_id: Option<String>,
    (width, height): (f32, f32),
) -> PositionedNode {
    PositionedNode {
        id,
        kind,
        variant: None,
        label,
        x,
        y,
        parent_id,
        width,
        height,
        markers: Vec::new(),
        icon: None,
    }
}
