//! Movement domain: ground, head and wall probing against level geometry.
//!
//! The controller never talks to the physics engine directly. It issues box
//! casts through [`BoxCaster`]; [`AvianBoxCaster`] answers them with avian's
//! spatial query in the running game, tests answer them from a script.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{BodyFrame, Facing, MovementConfig};

/// One rectangular sweep.
#[derive(Debug, Clone, Copy)]
pub struct BoxCast {
    pub origin: Vec2,
    pub size: Vec2,
    pub direction: Dir2,
    pub max_distance: f32,
    pub mask: LayerMask,
}

/// A collider found by a box cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub entity: Entity,
    /// Contact point on the hit collider, world space
    pub point: Vec2,
}

pub trait BoxCaster {
    /// Sweep a box and report the first collider on `cast.mask`, if any.
    fn box_intersect(&self, cast: &BoxCast) -> Option<ProbeHit>;
}

/// Raw answers of the three probes for one physics step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeResult {
    pub grounded: bool,
    pub bumped_head: bool,
    pub wall_hit: Option<ProbeHit>,
}

/// Contact flags as seen by the states. Refreshed every physics step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contacts {
    pub grounded: bool,
    pub bumped_head: bool,
    pub touching_wall: bool,
    pub wall_hit: Option<ProbeHit>,
    /// Last wall hit seen, kept after contact is lost. Can be one or more
    /// steps stale; wall jumps read it when the wall has just slipped out of
    /// the probe.
    pub last_wall_hit: Option<ProbeHit>,
}

impl Contacts {
    pub fn apply(&mut self, result: ProbeResult) {
        self.grounded = result.grounded;
        self.bumped_head = result.bumped_head;
        self.touching_wall = result.wall_hit.is_some();
        self.wall_hit = result.wall_hit;
        if result.wall_hit.is_some() {
            self.last_wall_hit = result.wall_hit;
        }
    }
}

pub fn ground_cast(body: &BodyFrame, config: &MovementConfig) -> BoxCast {
    BoxCast {
        origin: Vec2::new(body.center.x, body.bottom()),
        // Narrower than the body so a wall beside the feet never reads as floor
        size: Vec2::new(
            body.size().x * config.feet_width,
            config.ground_detection_ray_length,
        ),
        direction: Dir2::NEG_Y,
        max_distance: config.ground_detection_ray_length,
        mask: config.ground_layer,
    }
}

pub fn head_cast(body: &BodyFrame, config: &MovementConfig) -> BoxCast {
    BoxCast {
        origin: Vec2::new(body.center.x, body.top()),
        size: Vec2::new(
            body.size().x * config.head_width,
            config.head_detection_ray_length,
        ),
        direction: Dir2::Y,
        max_distance: config.head_detection_ray_length,
        mask: config.ground_layer,
    }
}

pub fn wall_cast(body: &BodyFrame, facing: Facing, config: &MovementConfig) -> BoxCast {
    let front = body.center.x + body.half_extents.x * facing.sign();
    BoxCast {
        origin: Vec2::new(front, body.center.y),
        size: Vec2::new(
            config.wall_detection_ray_length,
            body.size().y * config.wall_detection_ray_height_multiplier,
        ),
        direction: facing.direction(),
        max_distance: config.wall_detection_ray_length,
        mask: config.ground_layer,
    }
}

/// Run the three probes. A cast that finds nothing simply reads as no contact.
pub fn probe_environment<C: BoxCaster + ?Sized>(
    caster: &C,
    body: &BodyFrame,
    facing: Facing,
    config: &MovementConfig,
) -> ProbeResult {
    ProbeResult {
        grounded: caster.box_intersect(&ground_cast(body, config)).is_some(),
        bumped_head: caster.box_intersect(&head_cast(body, config)).is_some(),
        wall_hit: caster.box_intersect(&wall_cast(body, facing, config)),
    }
}

/// [`BoxCaster`] backed by avian's spatial query.
pub struct AvianBoxCaster<'a, 'w, 's> {
    pub spatial_query: &'a SpatialQuery<'w, 's>,
    /// Usually the player's own entity
    pub exclude: Entity,
}

impl BoxCaster for AvianBoxCaster<'_, '_, '_> {
    fn box_intersect(&self, cast: &BoxCast) -> Option<ProbeHit> {
        let shape = Collider::rectangle(cast.size.x, cast.size.y);
        let filter = SpatialQueryFilter::from_mask(cast.mask).with_excluded_entities([self.exclude]);

        self.spatial_query
            .cast_shape(
                &shape,
                cast.origin,
                0.0,
                cast.direction,
                &ShapeCastConfig::from_max_distance(cast.max_distance),
                &filter,
            )
            .map(|hit| ProbeHit {
                entity: hit.entity,
                point: hit.point1,
            })
    }
}
