//! # Example
//! ```rust
//! use springbox::{config::SandboxConfig, sandbox::Sandbox};
//!
//! let mut sandbox = Sandbox::new(SandboxConfig::new().seed(7)).unwrap();
//! for _ in 0..60 {
//!     sandbox.step();
//! }
//! let snapshot = sandbox.world().snapshot();
//! assert_eq!(snapshot.springs.len(), 3);
//! ```

pub mod config;
pub mod error;
pub mod properties;
pub mod query;
pub mod renderer;
pub mod sandbox;
pub mod scene;
pub mod shape;
pub mod simulator;
pub mod world;

pub use error::{Result, SimulationError};
pub use world::World;
