//! Engine Core - GameObject/Component scene runtime
//!
//! This module provides the object model, the scene registry and the
//! lifecycle scheduler without any GUI or rendering dependencies.

pub mod behaviour;
pub mod components;
pub mod error;
pub mod ids;
pub mod input;
pub mod render;
pub mod resources;
pub mod scene;
pub mod systems;
pub mod time;

pub use behaviour::*;
pub use components::*;
pub use error::*;
pub use ids::*;
pub use input::*;
pub use render::*;
pub use resources::*;
pub use scene::*;
pub use systems::*;
pub use time::*;
