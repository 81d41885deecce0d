//! Scene state and the per-frame tick.
//!
//! The window host calls [`FrameStep::tick`] once per redraw. All state a
//! scene needs between frames lives in the scene struct.

use common::Camera3D;
use glam::{Vec2, Vec3};
use rand::{rngs::StdRng, SeedableRng};

use crate::config::{SpawnConfig, ThreeBodyConfig};
use crate::error::{ConfigResult, SpawnError};
use crate::physics_3d::{self, Body3D, GravityParams, Simulation3D};
use crate::spawner::Spawner;
use crate::three_body::step_three_body;
use crate::trail::TrailRecorder;

/// Something advanced once per displayed frame
pub trait FrameStep {
    fn tick(&mut self);

    /// Number of ticks since creation or the last reset
    fn steps(&self) -> u64;

    fn bodies(&self) -> &[Body3D];
}

/// Run `frames` ticks back to back
pub fn run_frames<S: FrameStep + ?Sized>(scene: &mut S, frames: usize) {
    for _ in 0..frames {
        scene.tick();
    }
}

/// Click-to-spawn scene: an open body store under the general pairwise step
pub struct SpawnScene {
    pub sim: Simulation3D,
    pub spawner: Spawner,
    rng: StdRng,
}

impl SpawnScene {
    pub fn new(config: &SpawnConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: &SpawnConfig, rng: StdRng) -> Self {
        Self {
            sim: Simulation3D::new(config.gravity),
            spawner: Spawner::new(config.max_bodies, config.body_radius),
            rng,
        }
    }

    /// Handle a click at `cursor` (physical pixels) in a `viewport`-sized window
    pub fn click(
        &mut self,
        camera: &Camera3D,
        cursor: Vec2,
        viewport: Vec2,
    ) -> Result<usize, SpawnError> {
        let result =
            self.spawner
                .spawn_at_cursor(&mut self.sim, camera, cursor, viewport, &mut self.rng);

        match &result {
            Ok(index) => log::debug!(
                "Spawned body {} at {:?}",
                index,
                self.sim.bodies[*index].position
            ),
            Err(err @ SpawnError::StoreFull { .. }) => log::warn!("Click ignored: {err}"),
            Err(err) => log::debug!("Click ignored: {err}"),
        }

        result
    }

    pub fn reset(&mut self) {
        log::info!("Clearing {} bodies", self.sim.bodies.len());
        self.sim.clear();
    }

    pub fn params(&self) -> &GravityParams {
        &self.sim.params
    }
}

impl FrameStep for SpawnScene {
    fn tick(&mut self) {
        self.sim.step();
        log::trace!("spawn step {} ({} bodies)", self.sim.steps, self.sim.bodies.len());
    }

    fn steps(&self) -> u64 {
        self.sim.steps
    }

    fn bodies(&self) -> &[Body3D] {
        &self.sim.bodies
    }
}

/// Three fixed bodies with fading trails.
///
/// Trails record each body's position from *before* the tick, so the newest
/// trail point lags the drawn body by one frame.
pub struct ThreeBodyScene {
    pub bodies: [Body3D; 3],
    pub params: GravityParams,
    pub trails: TrailRecorder,
    initial: [Body3D; 3],
    steps: u64,
    elapsed_time: f32,
}

impl ThreeBodyScene {
    pub fn new(config: &ThreeBodyConfig) -> ConfigResult<Self> {
        let bodies = config.initial_bodies()?;
        Ok(Self::from_bodies(bodies, config.gravity, config.trail_length))
    }

    pub fn from_bodies(bodies: [Body3D; 3], params: GravityParams, trail_length: usize) -> Self {
        Self {
            bodies,
            params,
            trails: TrailRecorder::new(bodies.len(), trail_length),
            initial: bodies,
            steps: 0,
            elapsed_time: 0.0,
        }
    }

    /// Restore the starting bodies and empty every trail
    pub fn reset(&mut self) {
        log::info!("Resetting three-body scene after {} steps", self.steps);
        self.bodies = self.initial;
        self.trails.clear();
        self.steps = 0;
        self.elapsed_time = 0.0;
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn total_energy(&self) -> f32 {
        physics_3d::total_energy(&self.bodies, &self.params)
    }

    pub fn center_of_mass(&self) -> Vec3 {
        physics_3d::center_of_mass(&self.bodies)
    }
}

impl FrameStep for ThreeBodyScene {
    fn tick(&mut self) {
        let before = self.bodies.map(|b| b.position);

        step_three_body(&mut self.bodies, &self.params);
        self.trails.record(&before);

        self.elapsed_time += self.params.dt;
        self.steps += 1;
        log::trace!("three-body step {}", self.steps);
    }

    fn steps(&self) -> u64 {
        self.steps
    }

    fn bodies(&self) -> &[Body3D] {
        &self.bodies
    }
}
