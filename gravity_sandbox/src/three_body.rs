//! Unrolled step for exactly three bodies
//!
//! Each of the three pair forces is evaluated once and applied with opposite
//! signs to the two bodies of the pair. The result matches the general
//! pairwise sum in `physics_3d`.

use glam::Vec3;

use crate::physics_3d::{integrate, pairwise_force, Body3D, GravityParams};

/// Net force on each of the three bodies
pub fn three_body_forces(bodies: &[Body3D; 3], params: &GravityParams) -> [Vec3; 3] {
    let [a, b, c] = bodies;

    let f01 = pairwise_force(a.position, b.position, params);
    let f02 = pairwise_force(a.position, c.position, params);
    let f12 = pairwise_force(b.position, c.position, params);

    [f01 + f02, -f01 + f12, -f02 - f12]
}

/// Advance three bodies by one fixed step of `params.dt`
pub fn step_three_body(bodies: &mut [Body3D; 3], params: &GravityParams) {
    let forces = three_body_forces(bodies, params);
    integrate(bodies, &forces, params.dt);
}
