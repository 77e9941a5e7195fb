//! Time integration and boundary handling
//!
//! The default model is position-based Verlet: velocity is implied by
//! `position - previous_position`, so nothing but positions is integrated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Body;
use crate::settings::SimConfig;

/// How bodies are advanced each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationModel {
    /// Position Verlet with a per-frame displacement clamp
    #[default]
    Verlet,
    /// Semi-implicit Euler on the explicit `velocity` field
    ExplicitVelocity,
}

/// World limits for body centers, before subtracting radii
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    /// Highest allowed y (screen space, y down)
    pub floor: f32,
    /// Lowest allowed y; sits above the visible area
    pub ceiling: f32,
}

impl Bounds {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            left: 0.0,
            right: config.world_width,
            floor: config.world_height,
            ceiling: -config.ceiling_offset,
        }
    }

    /// Center limits for a body of `radius`: (min, max)
    #[inline]
    pub fn limits(&self, radius: f32) -> (Vec2, Vec2) {
        (
            Vec2::new(self.left + radius, self.ceiling + radius),
            Vec2::new(self.right - radius, self.floor - radius),
        )
    }

    /// Whether a body center lies within the limits, with `slack` tolerance
    pub fn contains(&self, body: &Body, slack: f32) -> bool {
        let (min, max) = self.limits(body.radius());
        body.position.x >= min.x - slack
            && body.position.x <= max.x + slack
            && body.position.y >= min.y - slack
            && body.position.y <= max.y + slack
    }
}

/// Sanitize a wall-clock frame time: non-finite or negative becomes 0, long pauses are capped
pub fn clamp_frame_dt(dt: f32, max_frame_dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Discarding invalid frame dt {dt}");
        return 0.0;
    }
    dt.min(max_frame_dt)
}

/// One Verlet step with the displacement clamp
pub fn integrate_verlet(body: &mut Body, dt: f32, gravity: f32, max_displacement: f32) {
    let current = body.position;
    let acceleration = Vec2::new(0.0, gravity);
    let mut next = current + (current - body.previous_position) + acceleration * (dt * dt);

    let displacement = next - body.previous_position;
    let len = displacement.length();
    if len > max_displacement {
        next = body.previous_position + displacement * (max_displacement / len);
    }

    body.previous_position = current;
    body.position = next;
}

/// One explicit-velocity step; `previous_position` still tracks the last position
pub fn integrate_velocity(body: &mut Body, dt: f32, gravity: f32) {
    body.velocity.y += gravity * dt;
    body.previous_position = body.position;
    body.position += body.velocity * dt;
}

/// Clamp a body inside the walls, reflecting its explicit velocity with restitution.
///
/// Returns true if any boundary was hit.
pub fn apply_bounds(body: &mut Body, bounds: &Bounds, restitution: f32) -> bool {
    let (min, max) = bounds.limits(body.radius());
    let mut bounced = false;

    if body.position.y > max.y {
        body.position.y = max.y;
        body.velocity.y = -body.velocity.y * restitution;
        bounced = true;
    }

    if body.position.y < min.y {
        body.position.y = min.y;
        body.velocity.y = -body.velocity.y * restitution;
        bounced = true;
    }

    if body.position.x < min.x {
        body.position.x = min.x;
        body.velocity.x = -body.velocity.x * restitution;
        bounced = true;
    } else if body.position.x > max.x {
        body.position.x = max.x;
        body.velocity.x = -body.velocity.x * restitution;
        bounced = true;
    }

    bounced
}

/// Advance every body and enforce the walls. Returns the number of bounces.
pub fn integrate_all(bodies: &mut [Body], config: &SimConfig, dt: f32) -> usize {
    let bounds = Bounds::from_config(config);
    let mut bounces = 0;
    for body in bodies.iter_mut() {
        match config.integration {
            IntegrationModel::Verlet => {
                integrate_verlet(body, dt, config.gravity, config.max_displacement)
            }
            IntegrationModel::ExplicitVelocity => integrate_velocity(body, dt, config.gravity),
        }
        if apply_bounds(body, &bounds, config.restitution) {
            bounces += 1;
        }
    }
    bounces
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn bounds() -> Bounds {
        Bounds::from_config(&SimConfig::default())
    }

    #[test]
    fn test_verlet_free_fall_from_rest() {
        let mut body = Body::at_rest(Vec2::new(500.0, 500.0), 10.0);
        let dt = 1.0 / 60.0;
        integrate_verlet(&mut body, dt, 500.0, 5.0);

        assert_eq!(body.previous_position, Vec2::new(500.0, 500.0));
        assert!((body.position.y - (500.0 + 500.0 * dt * dt)).abs() < EPS);
        assert_eq!(body.position.x, 500.0);
    }

    #[test]
    fn test_verlet_preserves_implied_velocity() {
        let mut body = Body::at_rest(Vec2::new(100.0, 100.0), 5.0);
        body.previous_position = Vec2::new(98.0, 100.0);
        integrate_verlet(&mut body, 0.0, 500.0, 5.0);
        assert_eq!(body.position, Vec2::new(102.0, 100.0));
        assert_eq!(body.previous_position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_verlet_displacement_clamp() {
        let mut body = Body::at_rest(Vec2::new(100.0, 100.0), 5.0);
        // 30 units per frame implied, far above the clamp
        body.previous_position = Vec2::new(100.0, 70.0);
        integrate_verlet(&mut body, 0.0, 0.0, 5.0);

        // Clamped displacement is measured from the old previous position
        assert!((body.position - Vec2::new(100.0, 75.0)).length() < EPS);
        assert_eq!(body.previous_position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_explicit_velocity_step() {
        let mut body = Body::new(Vec2::new(10.0, 10.0), Vec2::new(60.0, 0.0), 5.0, Default::default());
        integrate_velocity(&mut body, 0.5, 100.0);
        assert_eq!(body.velocity, Vec2::new(60.0, 50.0));
        assert_eq!(body.position, Vec2::new(40.0, 35.0));
        assert_eq!(body.previous_position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_floor_bounce_with_restitution() {
        let b = bounds();
        let floor_y = b.floor - 10.0;
        let mut body = Body::new(
            Vec2::new(500.0, floor_y + 3.0),
            Vec2::new(0.0, 100.0),
            10.0,
            Default::default(),
        );

        assert!(apply_bounds(&mut body, &b, 0.7));
        assert_eq!(body.position.y, floor_y);
        assert!((body.velocity.y - (-70.0)).abs() < EPS);
    }

    #[test]
    fn test_ceiling_is_above_screen() {
        let b = bounds();
        let mut body = Body::new(Vec2::new(500.0, -10.0), Vec2::new(0.0, -50.0), 10.0, Default::default());
        assert!(!apply_bounds(&mut body, &b, 0.7));

        body.position.y = -2000.0;
        assert!(apply_bounds(&mut body, &b, 0.7));
        assert_eq!(body.position.y, b.ceiling + 10.0);
        assert!((body.velocity.y - 35.0).abs() < EPS);
    }

    #[test]
    fn test_side_walls() {
        let b = bounds();
        let mut left = Body::new(Vec2::new(-4.0, 300.0), Vec2::new(-20.0, 0.0), 6.0, Default::default());
        assert!(apply_bounds(&mut left, &b, 0.5));
        assert_eq!(left.position.x, 6.0);
        assert_eq!(left.velocity.x, 10.0);

        let mut right = Body::new(Vec2::new(b.right + 1.0, 300.0), Vec2::new(20.0, 0.0), 6.0, Default::default());
        assert!(apply_bounds(&mut right, &b, 0.5));
        assert_eq!(right.position.x, b.right - 6.0);
        assert_eq!(right.velocity.x, -10.0);
    }

    #[test]
    fn test_inside_body_untouched() {
        let b = bounds();
        let mut body = Body::new(Vec2::new(300.0, 300.0), Vec2::new(3.0, 4.0), 8.0, Default::default());
        let before = body.clone();
        assert!(!apply_bounds(&mut body, &b, 0.7));
        assert_eq!(body, before);
    }

    #[test]
    fn test_clamp_frame_dt() {
        assert_eq!(clamp_frame_dt(f32::NAN, 0.1), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY, 0.1), 0.0);
        assert_eq!(clamp_frame_dt(-0.5, 0.1), 0.0);
        assert_eq!(clamp_frame_dt(3.0, 0.1), 0.1);
        assert_eq!(clamp_frame_dt(0.016, 0.1), 0.016);
    }

    proptest! {
        #[test]
        fn prop_bounds_hold_after_step(
            x in -3000.0f32..3000.0,
            y in -3000.0f32..3000.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
            radius in 1.0f32..40.0,
            verlet in any::<bool>(),
        ) {
            let config = SimConfig {
                integration: if verlet { IntegrationModel::Verlet } else { IntegrationModel::ExplicitVelocity },
                ..Default::default()
            };
            let mut bodies = vec![Body::new(Vec2::new(x, y), Vec2::new(vx, vy), radius, Default::default())];
            integrate_all(&mut bodies, &config, 1.0 / 60.0);

            let b = Bounds::from_config(&config);
            prop_assert!(b.contains(&bodies[0], 0.0));
            prop_assert_eq!(bodies[0].radius(), radius);
        }
    }
}
