//! Component contract and the built-in Transform component

use std::any::Any;

use bitflags::bitflags;
use glam::{Quat, Vec3};

use crate::behaviour::MonoBehaviour;
use crate::render::Renderer;
use crate::scene::GameObject;

/// Type-erased access used for downcasting boxed components.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

bitflags! {
    /// Capabilities a component advertises when it is attached.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const TRANSFORM = 1 << 0;
        const BEHAVIOUR = 1 << 1;
        const RENDERER = 1 << 2;
    }
}

/// A unit of data or behaviour attached to exactly one GameObject.
///
/// Components opt into the lifecycle scheduler by returning themselves from
/// [`Component::as_behaviour_mut`], and into the render pass through
/// [`Component::as_renderer`].
pub trait Component: AsAny + Send + Sync {
    fn as_behaviour_mut(&mut self) -> Option<&mut dyn MonoBehaviour> {
        None
    }

    fn as_renderer(&self) -> Option<&dyn Renderer> {
        None
    }
}

/// Capabilities of a component instance, computed once at attach time.
pub fn capabilities_of(component: &mut dyn Component) -> Capabilities {
    let mut caps = Capabilities::empty();
    if component.as_behaviour_mut().is_some() {
        caps |= Capabilities::BEHAVIOUR;
    }
    if component.as_renderer().is_some() {
        caps |= Capabilities::RENDERER;
    }
    caps
}

pub fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

pub fn downcast_mut<T: Component>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}

/// RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Transform component - hierarchy node plus local position, rotation and scale
///
/// Parent and children are maintained by the [`Scene`](crate::Scene); the
/// world position is never stored, see [`Scene::position`](crate::Scene::position).
#[derive(Debug, Clone)]
pub struct Transform {
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub local_scale: Vec3,
    pub(crate) parent: Option<GameObject>,
    pub(crate) children: Vec<GameObject>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl Transform {
    pub fn parent(&self) -> Option<GameObject> {
        self.parent
    }

    pub fn children(&self) -> &[GameObject] {
        &self.children
    }
}

impl Component for Transform {}
