//! Core systems for the scene runtime

use crate::behaviour::Hook;
use crate::ids::ComponentId;
use crate::scene::{GameObject, Scene};

/// Lifecycle system - drives every reachable MonoBehaviour through
/// Awake / OnEnable / Start / Update / OnDisable once per tick
#[derive(Debug, Default)]
pub struct LifecycleSystem;

impl LifecycleSystem {
    pub fn new() -> Self {
        Self
    }

    /// Run one scheduling pass.
    ///
    /// The set of behaviours is collected up front, so anything attached
    /// during the pass is first ticked on the next one. Destruction queued by
    /// hooks is carried out once every behaviour has been visited.
    pub fn update(&mut self, scene: &mut Scene) {
        let behaviours = scene.behaviours_in_scene();
        for (owner, id) in behaviours {
            Self::step(scene, owner, id);
        }
        scene.flush_destroyed();
    }

    fn step(scene: &mut Scene, owner: GameObject, id: ComponentId) {
        if !scene.has_component(id) {
            return;
        }
        let is_active = scene.active_in_hierarchy(owner);
        let state = scene.ensure_lifecycle(id);

        let mut awake = state.awake;
        if !awake && is_active {
            scene.invoke(id, Hook::Awake);
            scene.update_lifecycle(id, |s| s.awake = true);
            awake = true;
        }

        let should_run = awake && is_active && scene.is_enabled(id);

        if should_run && !state.enabled_in_hierarchy {
            scene.invoke(id, Hook::OnEnable);
            scene.update_lifecycle(id, |s| s.enabled_in_hierarchy = true);
        }

        if should_run && !state.started {
            scene.invoke(id, Hook::Start);
            scene.update_lifecycle(id, |s| s.started = true);
        }

        if should_run {
            scene.invoke(id, Hook::Update);
        }

        if !should_run && state.enabled_in_hierarchy {
            scene.invoke(id, Hook::OnDisable);
            scene.update_lifecycle(id, |s| s.enabled_in_hierarchy = false);
        }
    }
}

/// Renderer component found by the render system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub owner: GameObject,
    pub component: ComponentId,
}

/// Render system - collects enabled renderers on active objects
#[derive(Debug, Default)]
pub struct RenderSystem;

impl RenderSystem {
    /// Renderers in scene traversal order, re-collected on every call
    pub fn update(&mut self, scene: &Scene) -> Vec<Renderable> {
        scene
            .renderers_in_scene()
            .into_iter()
            .filter(|(owner, id)| scene.is_enabled(*id) && scene.active_in_hierarchy(*owner))
            .map(|(owner, component)| Renderable { owner, component })
            .collect()
    }
}
