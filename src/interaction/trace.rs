//! Scene queries for interaction detection.
//!
//! Interaction ranges are authored in units (100 per metre). The rapier
//! adapter converts at the boundary.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub const UNITS_PER_METER: f32 = 100.0;

/// A forward cast from the instigator's viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRequest {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
    /// Cast length in units
    pub distance: f32,
    /// Sphere radius in units; zero casts a ray
    pub radius: f32,
    /// Collision group bits the cast may hit
    pub channel: u32,
    pub ignore: Option<Entity>,
}

/// Nearest blocking hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    pub entity: Entity,
    /// Distance from the origin in units
    pub distance: f32,
    pub point: Vec3,
}

/// Cast a ray or sphere and return the nearest hit.
pub trait SpatialQuery {
    fn trace(&self, request: &TraceRequest) -> Option<TraceHit>;
}

/// Detection provider that always reports the same hit, for headless apps
/// and scripted sequences with no physics scene. The hit is only returned
/// when it lies within the requested cast length.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScriptedTrace {
    pub hit: Option<TraceHit>,
}

impl ScriptedTrace {
    pub fn hit(entity: Entity, distance: f32) -> Self {
        Self {
            hit: Some(TraceHit {
                entity,
                distance,
                point: Vec3::ZERO,
            }),
        }
    }

    pub fn miss() -> Self {
        Self { hit: None }
    }
}

impl SpatialQuery for ScriptedTrace {
    fn trace(&self, request: &TraceRequest) -> Option<TraceHit> {
        self.hit.filter(|hit| {
            hit.distance <= request.distance && request.ignore != Some(hit.entity)
        })
    }
}

impl SpatialQuery for RapierContext {
    fn trace(&self, request: &TraceRequest) -> Option<TraceHit> {
        let direction = request.direction.normalize_or_zero();
        if direction == Vec3::ZERO || request.distance <= 0.0 {
            return None;
        }

        let max_toi = request.distance / UNITS_PER_METER;
        let mut filter = QueryFilter::default().groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(request.channel),
        ));
        if let Some(ignore) = request.ignore {
            filter = filter.exclude_collider(ignore);
        }

        let toi = if request.radius > 0.0 {
            let ball = Collider::ball(request.radius / UNITS_PER_METER);
            self.cast_shape(
                request.origin,
                Quat::IDENTITY,
                direction,
                &ball,
                ShapeCastOptions::with_max_time_of_impact(max_toi),
                filter,
            )
            .map(|(entity, hit)| (entity, hit.time_of_impact))
        } else {
            self.cast_ray(request.origin, direction, max_toi, true, filter)
        };

        toi.map(|(entity, toi)| TraceHit {
            entity,
            distance: toi * UNITS_PER_METER,
            point: request.origin + direction * toi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(distance: f32, ignore: Option<Entity>) -> TraceRequest {
        TraceRequest {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            distance,
            radius: 0.0,
            channel: u32::MAX,
            ignore,
        }
    }

    #[test]
    fn scripted_hit_respects_cast_length_and_ignore() {
        let target = Entity::from_raw(7);
        let scripted = ScriptedTrace::hit(target, 250.0);

        assert_eq!(scripted.trace(&request(300.0, None)).map(|h| h.entity), Some(target));
        assert!(scripted.trace(&request(200.0, None)).is_none());
        assert!(scripted.trace(&request(300.0, Some(target))).is_none());
        assert!(ScriptedTrace::miss().trace(&request(300.0, None)).is_none());
    }
}
