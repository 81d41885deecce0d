//! Softened N-body gravity sandbox
//!
//! Two interactive scenes share this library:
//!
//! - **Spawn**: click anywhere to drop a body onto the `z = 0` plane; every
//!   body attracts every other one.
//! - **Trails**: three bodies orbit each other and leave fading trails of
//!   their last 1000 positions.
//!
//! The physics, trail buffer and spawner are independent of the window and
//! GPU, so the scenes can be ticked headless.

pub mod physics_3d;
pub mod three_body;
pub mod trail;
pub mod spawner;
pub mod driver;
pub mod config;
pub mod error;
pub mod renderer_3d;
pub mod equations_ui;

pub use config::SimConfig;
pub use driver::{FrameStep, SpawnScene, ThreeBodyScene};
pub use error::{ConfigError, SpawnError};
pub use physics_3d::{Body3D, GravityParams, Simulation3D};
pub use trail::{Trail, TrailRecorder};
