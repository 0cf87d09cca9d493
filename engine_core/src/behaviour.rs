//! MonoBehaviour lifecycle contract
//!
//! A behaviour implements any subset of the hooks below; the scheduler in
//! [`systems`](crate::systems) decides when each one runs. Hooks return
//! `anyhow::Result` so game logic can use `?` freely. A failing hook is logged
//! and the rest of the frame keeps running.

use std::fmt;

use crate::components::Component;
use crate::ids::ComponentId;
use crate::resources::Resources;
use crate::scene::{GameObject, Scene};
use crate::time::Time;

pub trait MonoBehaviour: Send + Sync {
    /// Called once, the first tick the owner is reachable and active.
    fn awake(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_enable(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once, before the first Update.
    fn start(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_disable(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &mut Context<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Lifecycle hooks the scheduler can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Awake,
    OnEnable,
    Start,
    Update,
    OnDisable,
    OnDestroy,
}

impl Hook {
    pub(crate) fn call(
        self,
        behaviour: &mut dyn MonoBehaviour,
        ctx: &mut Context<'_>,
    ) -> anyhow::Result<()> {
        match self {
            Hook::Awake => behaviour.awake(ctx),
            Hook::OnEnable => behaviour.on_enable(ctx),
            Hook::Start => behaviour.start(ctx),
            Hook::Update => behaviour.update(ctx),
            Hook::OnDisable => behaviour.on_disable(ctx),
            Hook::OnDestroy => behaviour.on_destroy(ctx),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Awake => "Awake",
            Hook::OnEnable => "OnEnable",
            Hook::Start => "Start",
            Hook::Update => "Update",
            Hook::OnDisable => "OnDisable",
            Hook::OnDestroy => "OnDestroy",
        };
        f.write_str(name)
    }
}

/// Everything a hook may touch while it runs.
///
/// The running component is checked out of the scene for the duration of the
/// call, so looking it up through [`Context::scene`] yields `None`.
pub struct Context<'a> {
    scene: &'a mut Scene,
    game_object: GameObject,
    component: ComponentId,
}

impl<'a> Context<'a> {
    pub(crate) fn new(scene: &'a mut Scene, game_object: GameObject, component: ComponentId) -> Self {
        Self {
            scene,
            game_object,
            component,
        }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn game_object(&self) -> GameObject {
        self.game_object
    }

    pub fn component_id(&self) -> ComponentId {
        self.component
    }

    /// The running behaviour's own `enabled` flag
    pub fn is_enabled(&self) -> bool {
        self.scene.is_enabled(self.component)
    }

    pub fn active_in_hierarchy(&self) -> bool {
        self.scene.active_in_hierarchy(self.game_object)
    }

    pub fn resources(&self) -> &Resources {
        self.scene.resources()
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        self.scene.resources_mut()
    }

    /// Clock of the current frame, zeroed when no engine drives the scene
    pub fn time(&self) -> Time {
        self.scene.resources().get::<Time>().copied().unwrap_or_default()
    }

    /// First component of type `T` on the running behaviour's own GameObject
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.scene.get_component::<T>(self.game_object)
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.get_component_mut::<T>(self.game_object)
    }
}
