//! 3D N-body gravity with a softened force law and semi-implicit Euler steps

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Softening added to the squared distance in the force denominator
pub const SOFTENING: f32 = 0.1;

/// Constants of one gravity model.
///
/// Every body shares the same `mass`; it is not stored per body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityParams {
    pub g: f32,
    pub mass: f32,
    pub dt: f32,
    pub softening: f32,
}

impl GravityParams {
    /// Click-to-spawn sandbox: G = 1, m = 0.5, dt = 0.1
    pub const fn spawn() -> Self {
        Self {
            g: 1.0,
            mass: 0.5,
            dt: 0.1,
            softening: SOFTENING,
        }
    }

    /// Three-body scene: G = 10, m = 1, dt = 0.05
    pub const fn three_body() -> Self {
        Self {
            g: 10.0,
            mass: 1.0,
            dt: 0.05,
            softening: SOFTENING,
        }
    }
}

/// A body in the simulation. Position and velocity are the physical state;
/// color and radius only affect drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body3D {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: [f32; 4],
    pub radius: f32,
}

impl Body3D {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            color: [1.0, 1.0, 1.0, 1.0],
            radius: 0.5,
        }
    }

    /// A body placed at rest
    pub fn at_rest(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

/// Magnitude of the softened attraction between two bodies `r` apart
pub fn force_magnitude(r: f32, params: &GravityParams) -> f32 {
    (params.g * params.mass * params.mass) / (r * r + params.softening)
}

/// Force on the body at `from` exerted by the body at `to`.
///
/// Coincident bodies have no direction between them and exert no force.
pub fn pairwise_force(from: Vec3, to: Vec3, params: &GravityParams) -> Vec3 {
    let direction = to - from;
    let distance = direction.length();
    if distance == 0.0 {
        return Vec3::ZERO;
    }
    direction / distance * force_magnitude(distance, params)
}

/// Sum the pairwise forces on every body into `forces`.
///
/// `forces` is resized to the body count and zeroed first.
pub fn accumulate_forces(bodies: &[Body3D], params: &GravityParams, forces: &mut Vec<Vec3>) {
    forces.clear();
    forces.resize(bodies.len(), Vec3::ZERO);

    for (i, body) in bodies.iter().enumerate() {
        for (j, other) in bodies.iter().enumerate() {
            if i != j {
                forces[i] += pairwise_force(body.position, other.position, params);
            }
        }
    }
}

/// Semi-implicit Euler: velocity first, then position from the new velocity.
///
/// The accumulated force is applied directly as an acceleration.
pub fn integrate(bodies: &mut [Body3D], forces: &[Vec3], dt: f32) {
    for (body, force) in bodies.iter_mut().zip(forces) {
        body.velocity += *force * dt;
        body.position += body.velocity * dt;
    }
}

/// Growable body store advanced with the general pairwise sum
pub struct Simulation3D {
    pub bodies: Vec<Body3D>,
    pub params: GravityParams,
    pub elapsed_time: f32,
    pub steps: u64,
    forces: Vec<Vec3>,
}

impl Simulation3D {
    pub fn new(params: GravityParams) -> Self {
        Self {
            bodies: Vec::new(),
            params,
            elapsed_time: 0.0,
            steps: 0,
            forces: Vec::new(),
        }
    }

    pub fn add_body(&mut self, body: Body3D) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Remove every body and reset the clock
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.elapsed_time = 0.0;
        self.steps = 0;
    }

    /// Advance all bodies by one fixed step
    pub fn step(&mut self) {
        accumulate_forces(&self.bodies, &self.params, &mut self.forces);
        integrate(&mut self.bodies, &self.forces, self.params.dt);

        self.elapsed_time += self.params.dt;
        self.steps += 1;
    }

    pub fn center_of_mass(&self) -> Vec3 {
        center_of_mass(&self.bodies)
    }

    pub fn total_energy(&self) -> f32 {
        total_energy(&self.bodies, &self.params)
    }
}

/// Mean position; all bodies have equal mass
pub fn center_of_mass(bodies: &[Body3D]) -> Vec3 {
    if bodies.is_empty() {
        return Vec3::ZERO;
    }

    bodies.iter().map(|b| b.position).sum::<Vec3>() / bodies.len() as f32
}

pub fn kinetic_energy(bodies: &[Body3D], params: &GravityParams) -> f32 {
    bodies
        .iter()
        .map(|b| 0.5 * params.mass * b.velocity.length_squared())
        .sum()
}

/// Kinetic plus softened potential energy, `U = -G·m² / sqrt(r² + ε)` per pair
pub fn total_energy(bodies: &[Body3D], params: &GravityParams) -> f32 {
    let mut potential = 0.0;

    for (i, body_i) in bodies.iter().enumerate() {
        for body_j in bodies.iter().skip(i + 1) {
            let r_sq = (body_j.position - body_i.position).length_squared();
            potential -= params.g * params.mass * params.mass / (r_sq + params.softening).sqrt();
        }
    }

    kinetic_energy(bodies, params) + potential
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forces_buffer_tracks_body_count() {
        let params = GravityParams::spawn();
        let mut forces = vec![Vec3::ONE; 5];

        let bodies = [Body3D::at_rest(Vec3::ZERO), Body3D::at_rest(Vec3::X)];
        accumulate_forces(&bodies, &params, &mut forces);

        assert_eq!(forces.len(), 2);
        assert_eq!(forces[0], -forces[1]);
    }

    #[test]
    fn clear_resets_clock() {
        let mut sim = Simulation3D::new(GravityParams::spawn());
        sim.add_body(Body3D::at_rest(Vec3::ZERO));
        sim.step();
        sim.clear();

        assert!(sim.bodies.is_empty());
        assert_eq!(sim.steps, 0);
        assert_eq!(sim.elapsed_time, 0.0);
    }
}
