//! Binding between UI components and their host nodes
//!
//! Every tick a UI component re-derives where its node belongs from the
//! GameObject hierarchy, then pushes layout, visibility and its own state
//! onto the node. Node identity never changes; only placement does.

use engine_core::{ComponentHandle, ComponentId, Context, GameObject, Scene};

use crate::document::{NodeId, UiDocument};
use crate::element::UiBehaviour;
use crate::rect_transform::RectTransform;
use crate::widgets::{Canvas, Image, Panel, ScrollRect};

/// Outcome of parent resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentTarget {
    /// Attach under this node
    Node(NodeId),
    /// The UI ancestor exists but has no node yet
    Await(ComponentId),
    /// Nothing to attach to this tick
    Deferred,
}

/// Where the node of the component `self_id` on `owner` belongs.
///
/// Ancestors are walked from the nearest. At each level a scroll rect wins
/// over a canvas, a canvas over a panel and a panel over an image; the
/// first level hosting any of them decides. Without a UI ancestor the first
/// canvas in the scene is used, then the document root.
pub fn resolve_parent(
    scene: &Scene,
    owner: GameObject,
    self_id: ComponentId,
    self_is_canvas: bool,
) -> ParentTarget {
    let mut cursor = scene.parent(owner);
    while let Some(ancestor) = cursor {
        if let Some(target) = host_at(scene, ancestor) {
            return target;
        }
        cursor = scene.parent(ancestor);
    }

    if !self_is_canvas {
        for handle in scene.components_in_scene::<Canvas>() {
            if handle.id() == self_id {
                continue;
            }
            let Some(canvas) = scene.component(handle) else {
                continue;
            };
            if canvas.element().is_destroyed() {
                continue;
            }
            return match canvas.content_node() {
                Some(node) => ParentTarget::Node(node),
                None => ParentTarget::Await(handle.id()),
            };
        }
    }

    match scene.resources().get::<UiDocument>() {
        Some(document) => ParentTarget::Node(document.root()),
        None => ParentTarget::Deferred,
    }
}

fn host_at(scene: &Scene, game_object: GameObject) -> Option<ParentTarget> {
    host_target::<ScrollRect>(scene, game_object)
        .or_else(|| host_target::<Canvas>(scene, game_object))
        .or_else(|| host_target::<Panel>(scene, game_object))
        .or_else(|| host_target::<Image>(scene, game_object))
}

fn host_target<T: UiBehaviour>(scene: &Scene, game_object: GameObject) -> Option<ParentTarget> {
    let handle = scene.find_component::<T>(game_object)?;
    let host = scene.component(handle)?;
    if host.element().is_destroyed() {
        return None;
    }
    Some(match host.content_node() {
        Some(node) => ParentTarget::Node(node),
        None => ParentTarget::Await(handle.id()),
    })
}

/// Create the node on first use and publish the content node to waiters
fn ensure_node<T: UiBehaviour>(component: &mut T, document: &mut UiDocument, owner: ComponentId) -> NodeId {
    if let Some(node) = component.element().node() {
        return node;
    }
    let node = component.build(document);
    component.element_mut().set_node(node);
    log::debug!("{owner}: created {node}");
    if let Some(content) = component.content_node() {
        let attached = document.publish_content(owner, content);
        if attached > 0 {
            log::debug!("{owner}: attached {attached} waiting node(s) under {content}");
        }
    }
    node
}

/// Bring the component's node up to date with the scene.
///
/// Runs from Awake, OnEnable, Start and Update. A destroyed component or a
/// scene without a document is left alone.
pub fn bind<T: UiBehaviour>(component: &mut T, ctx: &mut Context<'_>) {
    if component.element().is_destroyed() {
        return;
    }
    let self_id = ctx.component_id();
    let owner = ctx.game_object();
    let scene = ctx.scene();
    if !scene.resources().contains::<UiDocument>() {
        log::debug!("{self_id}: no UI document yet, binding deferred");
        return;
    }
    let target = resolve_parent(scene, owner, self_id, component.is_canvas());
    let rect = scene.get_component::<RectTransform>(owner).copied();
    let layout = component.element().node_layout(rect);
    let shown = component.element().visible && ctx.is_enabled() && ctx.active_in_hierarchy();
    let interactable = component.element().interactable;

    let Some(document) = ctx.resources_mut().get_mut::<UiDocument>() else {
        return;
    };
    let node = ensure_node(component, document, self_id);
    match target {
        ParentTarget::Node(parent) => {
            document.cancel_wait(node);
            if document.append_child(parent, node) {
                log::debug!("{self_id}: {node} attached under {parent}");
            }
        }
        ParentTarget::Await(host) => document.await_content(host, node),
        ParentTarget::Deferred => {}
    }
    document.set_layout(node, layout);
    document.set_hidden(node, !shown);
    document.set_interactable(node, interactable);
    component.sync(document, node);
}

/// Feed queued node events to the component, in arrival order
pub fn dispatch_events<T: UiBehaviour>(component: &mut T, ctx: &mut Context<'_>) -> anyhow::Result<()> {
    let Some(node) = component.element().node() else {
        return Ok(());
    };
    let events = match ctx.resources_mut().get_mut::<UiDocument>() {
        Some(document) => document.take_events(node),
        None => return Ok(()),
    };
    for event in events {
        component.handle_event(event, ctx)?;
    }
    Ok(())
}

/// Push component state to its node without re-resolving the parent
pub fn refresh<T: UiBehaviour>(component: &T, ctx: &mut Context<'_>) {
    let Some(node) = component.element().node() else {
        return;
    };
    if let Some(document) = ctx.resources_mut().get_mut::<UiDocument>() {
        component.sync(document, node);
    }
}

/// Hide the node in place
pub fn hide<T: UiBehaviour>(component: &T, ctx: &mut Context<'_>) {
    let Some(node) = component.element().node() else {
        return;
    };
    if let Some(document) = ctx.resources_mut().get_mut::<UiDocument>() {
        document.set_hidden(node, true);
    }
}

/// Remove the node for good; later ticks cannot bring it back
pub fn teardown<T: UiBehaviour>(component: &mut T, ctx: &mut Context<'_>) {
    let owner = ctx.component_id();
    match ctx.resources_mut().get_mut::<UiDocument>() {
        Some(document) => release(component, document, owner),
        None => {
            component.element_mut().take_node();
            component.element_mut().mark_destroyed();
        }
    }
}

fn release<T: UiBehaviour>(component: &mut T, document: &mut UiDocument, owner: ComponentId) {
    component.release_nodes(document);
    if let Some(node) = component.element_mut().take_node() {
        document.remove(node);
        log::debug!("{owner}: removed {node}");
    }
    document.withdraw(owner);
    component.element_mut().mark_destroyed();
}

/// Tear a component's node down from outside a hook.
///
/// Returns false when the scene has no document or the component is not
/// reachable.
pub fn detach<T: UiBehaviour>(scene: &mut Scene, handle: ComponentHandle<T>) -> bool {
    let Some(mut document) = scene.resources_mut().remove::<UiDocument>() else {
        return false;
    };
    let detached = match scene.component_mut(handle) {
        Some(component) => {
            release(component, &mut document, handle.id());
            true
        }
        None => false,
    };
    scene.resources_mut().insert(document);
    detached
}

/// Implement `Component` and `MonoBehaviour` for a [`UiBehaviour`] type so
/// the scheduler keeps its node bound.
macro_rules! impl_ui_behaviour {
    ($ty:ty) => {
        impl ::engine_core::Component for $ty {
            fn as_behaviour_mut(&mut self) -> Option<&mut dyn ::engine_core::MonoBehaviour> {
                Some(self)
            }
        }

        impl ::engine_core::MonoBehaviour for $ty {
            fn awake(&mut self, ctx: &mut ::engine_core::Context<'_>) -> ::anyhow::Result<()> {
                $crate::binding::bind(self, ctx);
                Ok(())
            }

            fn on_enable(&mut self, ctx: &mut ::engine_core::Context<'_>) -> ::anyhow::Result<()> {
                $crate::binding::bind(self, ctx);
                Ok(())
            }

            fn start(&mut self, ctx: &mut ::engine_core::Context<'_>) -> ::anyhow::Result<()> {
                $crate::binding::bind(self, ctx);
                Ok(())
            }

            fn update(&mut self, ctx: &mut ::engine_core::Context<'_>) -> ::anyhow::Result<()> {
                $crate::binding::bind(self, ctx);
                let handled = $crate::binding::dispatch_events(self, ctx);
                // Listeners may have changed what the node shows
                $crate::binding::refresh(self, ctx);
                handled
            }

            fn on_disable(&mut self, ctx: &mut ::engine_core::Context<'_>) -> ::anyhow::Result<()> {
                $crate::binding::hide(self, ctx);
                Ok(())
            }

            fn on_destroy(&mut self, ctx: &mut ::engine_core::Context<'_>) -> ::anyhow::Result<()> {
                $crate::binding::teardown(self, ctx);
                Ok(())
            }
        }
    };
}

pub(crate) use impl_ui_behaviour;
