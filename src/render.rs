//! Render snapshot
//!
//! Flattens body state into GPU-ready instances. Take a snapshot between
//! frames; it never aliases the live body store.

use bytemuck::{Pod, Zeroable};

use crate::sim::World;

/// One circle to draw
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    /// 1 if the body was in contact this frame
    pub colliding: u32,
    pub color: [f32; 4],
}

/// Fresh snapshot of every body
pub fn snapshot(world: &World) -> Vec<CircleInstance> {
    let mut out = Vec::with_capacity(world.body_count());
    snapshot_into(world, &mut out);
    out
}

/// Snapshot into a reused buffer
pub fn snapshot_into(world: &World, out: &mut Vec<CircleInstance>) {
    out.clear();
    out.extend(world.bodies().iter().map(|body| CircleInstance {
        center: body.position.to_array(),
        radius: body.radius(),
        colliding: body.colliding as u32,
        color: body.color.to_array_f32(),
    }));
}

/// Raw bytes for a vertex/instance buffer upload
pub fn as_bytes(instances: &[CircleInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<CircleInstance>(), 32);
    }

    #[test]
    fn test_snapshot_matches_bodies() {
        let world = World::new(SimConfig {
            body_count: 25,
            ..Default::default()
        })
        .expect("valid");
        let instances = snapshot(&world);

        assert_eq!(instances.len(), 25);
        for (inst, body) in instances.iter().zip(world.bodies()) {
            assert_eq!(inst.center, body.position.to_array());
            assert_eq!(inst.radius, body.radius());
            assert_eq!(inst.color, body.color.to_array_f32());
        }
        assert_eq!(as_bytes(&instances).len(), 25 * 32);
    }

    #[test]
    fn test_snapshot_reuses_buffer() {
        let mut world = World::new(SimConfig {
            body_count: 10,
            ..Default::default()
        })
        .expect("valid");
        let mut buffer = snapshot(&world);
        world.advance(1.0 / 60.0);
        snapshot_into(&world, &mut buffer);
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer[3].center, world.bodies()[3].position.to_array());
    }
}
