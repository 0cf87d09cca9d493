//! scenekit - GameObject/Component scene runtime with a UI binding layer
//!
//! The workspace is split into:
//! - `engine_core`: object model, scene registry and lifecycle scheduler
//! - `engine_render`: surfaces and the render pass
//! - `engine_ui`: host UI document, UI components and the egui presenter
//!
//! This crate adds the frame driver that ties them together.

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;

pub use config::EngineConfig;
pub use engine::{Engine, HostFacilities};
pub use error::{EngineError, Result};
pub use scheduler::{FrameHandle, FrameScheduler, IntervalScheduler, RefreshScheduler};

pub use engine_core;
pub use engine_render;
pub use engine_ui;
