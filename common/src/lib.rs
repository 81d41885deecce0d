//! Common utilities for the gravity sandbox
//!
//! This crate provides shared graphics setup, the orbital camera, and the
//! screen-to-world ray casting used to place bodies with the mouse.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
