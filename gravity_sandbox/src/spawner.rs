//! Places new bodies where a click ray meets the z = 0 plane

use common::{cursor_to_ndc, Camera3D, Plane};
use glam::{Vec2, Vec3};
use rand::Rng;

use crate::error::SpawnError;
use crate::physics_3d::{Body3D, Simulation3D};

/// Random opaque color drawn uniformly from the 24-bit RGB cube
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> [f32; 4] {
    let rgb: u32 = rng.gen_range(0..0x0100_0000);
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub struct Spawner {
    pub plane: Plane,
    pub max_bodies: usize,
    pub body_radius: f32,
}

impl Spawner {
    pub fn new(max_bodies: usize, body_radius: f32) -> Self {
        Self {
            plane: Plane::XY,
            max_bodies,
            body_radius,
        }
    }

    /// Spawn from a cursor position in physical pixels.
    ///
    /// Returns the index of the new body.
    pub fn spawn_at_cursor<R: Rng + ?Sized>(
        &self,
        sim: &mut Simulation3D,
        camera: &Camera3D,
        cursor: Vec2,
        viewport: Vec2,
        rng: &mut R,
    ) -> Result<usize, SpawnError> {
        let ndc = cursor_to_ndc(cursor, viewport).ok_or(SpawnError::EmptyViewport)?;
        self.spawn_at_ndc(sim, camera, ndc, rng)
    }

    /// Spawn from normalized device coordinates
    pub fn spawn_at_ndc<R: Rng + ?Sized>(
        &self,
        sim: &mut Simulation3D,
        camera: &Camera3D,
        ndc: Vec2,
        rng: &mut R,
    ) -> Result<usize, SpawnError> {
        if sim.bodies.len() >= self.max_bodies {
            return Err(SpawnError::StoreFull {
                capacity: self.max_bodies,
            });
        }

        let hit = camera
            .ray_from_ndc(ndc)
            .intersect_plane(&self.plane)
            .ok_or(SpawnError::MissedPlane)?;

        let body = Body3D::at_rest(Vec3::new(hit.x, hit.y, 0.0))
            .with_color(random_color(rng))
            .with_radius(self.body_radius);

        Ok(sim.add_body(body))
    }
}
