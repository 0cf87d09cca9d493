//! Engine UI - binds UI components to a retained host node tree
//!
//! UI components are MonoBehaviours that each proxy one node of the
//! [`UiDocument`]. The egui presenter draws the document and feeds input
//! back as events; the debug panels inspect a running scene.

pub mod binding;
pub mod document;
pub mod element;
pub mod hierarchy;
pub mod inspector;
pub mod presenter;
pub mod rect_transform;
pub mod viewport;
pub mod widgets;

pub use binding::{
    ParentTarget, bind, detach, dispatch_events, hide, refresh, resolve_parent, teardown,
};
pub use document::*;
pub use element::*;
pub use hierarchy::*;
pub use inspector::*;
pub use presenter::*;
pub use rect_transform::*;
pub use viewport::*;
pub use widgets::*;
