//! Verlet chain and rope simulation for hosts that supply their own
//! collision queries and instanced mesh renderer.

pub mod alg;
pub mod entity;
pub mod config;
pub mod debug;
pub mod graphics;
pub mod render;
pub mod world;
pub mod spline;
pub mod components;

pub use components::chain;
