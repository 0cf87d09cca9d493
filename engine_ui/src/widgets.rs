//! Ready-made UI components
//!
//! Each widget owns a [`UiElement`](crate::UiElement) and exposes semantic
//! properties; the binding layer turns them into host node state.

mod button;
mod canvas;
mod image;
mod input_field;
mod panel;
mod scroll_rect;
mod text;

pub use button::*;
pub use canvas::*;
pub use image::*;
pub use input_field::*;
pub use panel::*;
pub use scroll_rect::*;
pub use text::*;
