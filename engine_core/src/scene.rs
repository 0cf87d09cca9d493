//! Scene - registry of GameObjects backed by an hecs world
//!
//! Every GameObject is an hecs entity carrying its bookkeeping record.
//! Components, the [`Transform`] included, live beside the world keyed by
//! [`ComponentId`], and each GameObject keeps a type index over its own
//! components so lookups never scan.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use glam::Vec3;
use hecs::{Entity, World as HecsWorld};

use crate::behaviour::{Context, Hook};
use crate::components::{
    Capabilities, Component, Transform, capabilities_of, downcast_mut, downcast_ref,
};
use crate::error::{Result, SceneError};
use crate::ids::{ComponentId, IdAllocator, InstanceId};
use crate::render::Renderer;
use crate::resources::Resources;

/// Handle to a GameObject living in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObject(Entity);

impl fmt::Display for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game object {}", self.0.id())
    }
}

/// Typed handle to a component attached to a GameObject
pub struct ComponentHandle<T> {
    id: ComponentId,
    owner: GameObject,
    marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    fn new(id: ComponentId, owner: GameObject) -> Self {
        Self {
            id,
            owner,
            marker: PhantomData,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn owner(&self) -> GameObject {
        self.owner
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Per-behaviour scheduler record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleState {
    pub awake: bool,
    pub started: bool,
    pub enabled_in_hierarchy: bool,
}

/// Bookkeeping stored on every GameObject entity
struct GameObjectInfo {
    instance_id: InstanceId,
    name: String,
    active_self: bool,
    /// Set once the object was registered with the scene, directly or through an ancestor
    hosted: bool,
    /// Attachment order; the transform is always first
    components: Vec<ComponentId>,
    by_type: HashMap<TypeId, Vec<ComponentId>>,
}

enum Slot {
    /// Never checked out; hierarchy code reads it while hooks run
    Transform(Transform),
    /// `None` while the component is checked out to run a hook
    Boxed(Option<Box<dyn Component>>),
}

struct ComponentEntry {
    owner: GameObject,
    type_id: TypeId,
    type_name: &'static str,
    capabilities: Capabilities,
    enabled: bool,
    slot: Slot,
}

enum Doomed {
    GameObject(GameObject),
    Component(ComponentId),
}

/// Registry of root GameObjects and owner of everything created through it
pub struct Scene {
    name: String,
    world: HecsWorld,
    ids: IdAllocator,
    roots: Vec<GameObject>,
    components: HashMap<ComponentId, ComponentEntry>,
    lifecycle: HashMap<ComponentId, LifecycleState>,
    pending_destroy: Vec<Doomed>,
    resources: Resources,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Scene")
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: HecsWorld::new(),
            ids: IdAllocator::new(),
            roots: Vec::new(),
            components: HashMap::new(),
            lifecycle: HashMap::new(),
            pending_destroy: Vec::new(),
            resources: Resources::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    // ---------------------------------------------------------------------
    // GameObjects
    // ---------------------------------------------------------------------

    /// Create a detached GameObject with its Transform.
    ///
    /// The object takes part in the lifecycle only once it is reachable from
    /// a root registered with [`Scene::add_game_object`].
    pub fn create_game_object(&mut self, name: impl Into<String>) -> GameObject {
        let instance_id = self.ids.allocate();
        let transform_id = self.ids.allocate_component();

        let mut by_type = HashMap::new();
        by_type.insert(TypeId::of::<Transform>(), vec![transform_id]);
        let info = GameObjectInfo {
            instance_id,
            name: name.into(),
            active_self: true,
            hosted: false,
            components: vec![transform_id],
            by_type,
        };

        let game_object = GameObject(self.world.spawn((info,)));
        self.components.insert(
            transform_id,
            ComponentEntry {
                owner: game_object,
                type_id: TypeId::of::<Transform>(),
                type_name: std::any::type_name::<Transform>(),
                capabilities: Capabilities::TRANSFORM,
                enabled: true,
                slot: Slot::Transform(Transform::default()),
            },
        );
        game_object
    }

    /// Register a GameObject and its whole subtree with the scene.
    ///
    /// Parentless objects join the root set; calling this again is a no-op.
    pub fn add_game_object(&mut self, game_object: GameObject) -> Result<()> {
        let parent = self.transform(game_object)?.parent;
        if parent.is_none() && !self.roots.contains(&game_object) {
            self.roots.push(game_object);
        }
        self.host_subtree(game_object);
        Ok(())
    }

    pub fn roots(&self) -> &[GameObject] {
        &self.roots
    }

    pub fn contains(&self, game_object: GameObject) -> bool {
        self.world.contains(game_object.0)
    }

    pub fn game_object_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn instance_id(&self, game_object: GameObject) -> Result<InstanceId> {
        Ok(self.info(game_object)?.instance_id)
    }

    pub fn game_object_name(&self, game_object: GameObject) -> Result<String> {
        Ok(self.info(game_object)?.name.clone())
    }

    pub fn set_game_object_name(
        &mut self,
        game_object: GameObject,
        name: impl Into<String>,
    ) -> Result<()> {
        self.info_mut(game_object)?.name = name.into();
        Ok(())
    }

    /// First reachable GameObject with the given name, depth-first
    pub fn find(&self, name: &str) -> Option<GameObject> {
        self.game_objects().into_iter().find(|game_object| {
            self.info(*game_object)
                .map(|info| info.name == name)
                .unwrap_or(false)
        })
    }

    pub fn is_hosted(&self, game_object: GameObject) -> bool {
        self.info(game_object)
            .map(|info| info.hosted)
            .unwrap_or(false)
    }

    pub fn active_self(&self, game_object: GameObject) -> bool {
        self.info(game_object)
            .map(|info| info.active_self)
            .unwrap_or(false)
    }

    pub fn set_active(&mut self, game_object: GameObject, active: bool) -> Result<()> {
        self.info_mut(game_object)?.active_self = active;
        Ok(())
    }

    /// True when the object and every ancestor have `active_self` set.
    ///
    /// Walks the parent chain on every call.
    pub fn active_in_hierarchy(&self, game_object: GameObject) -> bool {
        let mut cursor = Some(game_object);
        while let Some(current) = cursor {
            if !self.active_self(current) {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }

    // ---------------------------------------------------------------------
    // Hierarchy
    // ---------------------------------------------------------------------

    pub fn transform(&self, game_object: GameObject) -> Result<&Transform> {
        let id = self.transform_id(game_object)?;
        match self.components.get(&id).map(|entry| &entry.slot) {
            Some(Slot::Transform(transform)) => Ok(transform),
            _ => Err(SceneError::MissingGameObject(game_object)),
        }
    }

    /// Mutate local position, rotation or scale in place
    pub fn with_transform_mut<R>(
        &mut self,
        game_object: GameObject,
        f: impl FnOnce(&mut Transform) -> R,
    ) -> Result<R> {
        Ok(f(self.transform_mut(game_object)?))
    }

    pub fn parent(&self, game_object: GameObject) -> Option<GameObject> {
        self.transform(game_object).ok().and_then(|t| t.parent)
    }

    pub fn children(&self, game_object: GameObject) -> Vec<GameObject> {
        self.transform(game_object)
            .map(|t| t.children.clone())
            .unwrap_or_default()
    }

    /// True when `ancestor` appears on the parent chain of `game_object`
    pub fn is_ancestor_of(&self, ancestor: GameObject, game_object: GameObject) -> bool {
        let mut cursor = self.parent(game_object);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Move `child` under `parent`, or to the root set when `parent` is `None`.
    ///
    /// Re-parenting to the current parent does nothing. Parenting an object
    /// under itself or one of its descendants fails with
    /// [`SceneError::HierarchyCycle`] and leaves the tree untouched.
    pub fn set_parent(&mut self, child: GameObject, parent: Option<GameObject>) -> Result<()> {
        let current = self.transform(child)?.parent;
        if current == parent {
            return Ok(());
        }
        if let Some(parent) = parent {
            self.transform(parent)?;
            if parent == child || self.is_ancestor_of(child, parent) {
                return Err(SceneError::HierarchyCycle { child, parent });
            }
        }

        match current {
            Some(old) => {
                if let Ok(old_transform) = self.transform_mut(old) {
                    old_transform.children.retain(|c| *c != child);
                }
            }
            None => self.roots.retain(|r| *r != child),
        }
        self.transform_mut(child)?.parent = parent;

        match parent {
            Some(parent) => {
                self.transform_mut(parent)?.children.push(child);
                if self.is_hosted(parent) {
                    self.host_subtree(child);
                }
            }
            None => {
                if self.is_hosted(child) {
                    self.roots.push(child);
                }
            }
        }
        Ok(())
    }

    pub fn local_position(&self, game_object: GameObject) -> Result<Vec3> {
        Ok(self.transform(game_object)?.local_position)
    }

    pub fn set_local_position(&mut self, game_object: GameObject, position: Vec3) -> Result<()> {
        self.transform_mut(game_object)?.local_position = position;
        Ok(())
    }

    /// World position: the sum of local offsets up the parent chain
    pub fn position(&self, game_object: GameObject) -> Result<Vec3> {
        let mut world_position = Vec3::ZERO;
        let mut cursor = Some(game_object);
        while let Some(current) = cursor {
            let transform = self.transform(current)?;
            world_position += transform.local_position;
            cursor = transform.parent;
        }
        Ok(world_position)
    }

    /// Store `position` as a local offset from the parent's world position
    pub fn set_position(&mut self, game_object: GameObject, position: Vec3) -> Result<()> {
        let parent_position = match self.parent(game_object) {
            Some(parent) => self.position(parent)?,
            None => Vec3::ZERO,
        };
        self.transform_mut(game_object)?.local_position = position - parent_position;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Attach a component to a GameObject.
    ///
    /// Adding a [`Transform`] returns the object's existing transform. When
    /// the owner is already hosted, behaviours get a lifecycle record right
    /// away but are first ticked on the next scheduler pass.
    pub fn add_component<T: Component>(
        &mut self,
        game_object: GameObject,
        mut component: T,
    ) -> Result<ComponentHandle<T>> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            let id = self.transform_id(game_object)?;
            return Ok(ComponentHandle::new(id, game_object));
        }

        let hosted = self.info(game_object)?.hosted;
        let capabilities = capabilities_of(&mut component);
        let id = self.ids.allocate_component();
        {
            let mut info = self.info_mut(game_object)?;
            info.components.push(id);
            info.by_type.entry(TypeId::of::<T>()).or_default().push(id);
        }
        self.components.insert(
            id,
            ComponentEntry {
                owner: game_object,
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                capabilities,
                enabled: true,
                slot: Slot::Boxed(Some(Box::new(component))),
            },
        );
        if hosted && capabilities.contains(Capabilities::BEHAVIOUR) {
            self.lifecycle.insert(id, LifecycleState::default());
        }
        log::debug!(
            "attached {} as {id} to {game_object}",
            std::any::type_name::<T>()
        );
        Ok(ComponentHandle::new(id, game_object))
    }

    /// Handle to the first component of type `T`, the Transform included
    pub fn find_component<T: Component>(&self, game_object: GameObject) -> Option<ComponentHandle<T>> {
        self.first_of_type::<T>(game_object)
            .map(|id| ComponentHandle::new(id, game_object))
    }

    /// First component of type `T` in attachment order, the Transform included.
    ///
    /// A component that is running a hook is not visible here.
    pub fn get_component<T: Component>(&self, game_object: GameObject) -> Option<&T> {
        let id = self.first_of_type::<T>(game_object)?;
        self.boxed(id).and_then(downcast_ref::<T>)
    }

    pub fn get_component_mut<T: Component>(&mut self, game_object: GameObject) -> Option<&mut T> {
        let id = self.first_of_type::<T>(game_object)?;
        self.boxed_mut(id).and_then(downcast_mut::<T>)
    }

    /// Every component of type `T`, in attachment order
    pub fn get_components<T: Component>(&self, game_object: GameObject) -> Vec<&T> {
        let ids = match self.info(game_object) {
            Ok(info) => info
                .by_type
                .get(&TypeId::of::<T>())
                .cloned()
                .unwrap_or_default(),
            Err(_) => return Vec::new(),
        };
        ids.into_iter()
            .filter_map(|id| self.boxed(id))
            .filter_map(downcast_ref::<T>)
            .collect()
    }

    /// Components on `game_object` advertising all of `capabilities`
    pub fn components_with(
        &self,
        game_object: GameObject,
        capabilities: Capabilities,
    ) -> Vec<ComponentId> {
        self.component_ids(game_object)
            .into_iter()
            .filter(|id| {
                self.components
                    .get(id)
                    .is_some_and(|entry| entry.capabilities.contains(capabilities))
            })
            .collect()
    }

    /// All component ids of a GameObject in attachment order
    pub fn component_ids(&self, game_object: GameObject) -> Vec<ComponentId> {
        self.info(game_object)
            .map(|info| info.components.clone())
            .unwrap_or_default()
    }

    pub fn component<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        self.boxed(handle.id).and_then(downcast_ref::<T>)
    }

    pub fn component_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        self.boxed_mut(handle.id).and_then(downcast_mut::<T>)
    }

    pub fn component_by_id(&self, id: ComponentId) -> Option<&dyn Component> {
        self.boxed(id)
    }

    pub fn has_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    pub fn component_type_name(&self, id: ComponentId) -> Option<&'static str> {
        self.components.get(&id).map(|entry| entry.type_name)
    }

    pub fn capabilities(&self, id: ComponentId) -> Capabilities {
        self.components
            .get(&id)
            .map(|entry| entry.capabilities)
            .unwrap_or_default()
    }

    /// The GameObject a component is attached to
    pub fn owner_of(&self, id: ComponentId) -> Result<GameObject> {
        self.components
            .get(&id)
            .map(|entry| entry.owner)
            .ok_or(SceneError::NotAttached(id))
    }

    pub fn is_enabled(&self, id: ComponentId) -> bool {
        self.components
            .get(&id)
            .map(|entry| entry.enabled)
            .unwrap_or(false)
    }

    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<()> {
        let entry = self
            .components
            .get_mut(&id)
            .ok_or(SceneError::MissingComponent(id))?;
        entry.enabled = enabled;
        Ok(())
    }

    pub fn renderer(&self, id: ComponentId) -> Option<&dyn Renderer> {
        self.boxed(id).and_then(|c| c.as_renderer())
    }

    pub fn lifecycle_state(&self, id: ComponentId) -> Option<LifecycleState> {
        self.lifecycle.get(&id).copied()
    }

    // ---------------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------------

    /// Every GameObject reachable from the roots, depth-first, parents first
    pub fn game_objects(&self) -> Vec<GameObject> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_subtree(*root, &mut out);
        }
        out
    }

    /// Components of type `T` across the scene, re-traversed on every call
    pub fn components_in_scene<T: Component>(&self) -> Vec<ComponentHandle<T>> {
        let wanted = TypeId::of::<T>();
        self.collect_in_scene(|entry| entry.type_id == wanted)
            .into_iter()
            .map(|(owner, id)| ComponentHandle::new(id, owner))
            .collect()
    }

    pub fn behaviours_in_scene(&self) -> Vec<(GameObject, ComponentId)> {
        self.collect_in_scene(|entry| entry.capabilities.contains(Capabilities::BEHAVIOUR))
    }

    pub fn renderers_in_scene(&self) -> Vec<(GameObject, ComponentId)> {
        self.collect_in_scene(|entry| entry.capabilities.contains(Capabilities::RENDERER))
    }

    fn collect_in_scene(
        &self,
        keep: impl Fn(&ComponentEntry) -> bool,
    ) -> Vec<(GameObject, ComponentId)> {
        let mut out = Vec::new();
        for game_object in self.game_objects() {
            for id in self.component_ids(game_object) {
                if self.components.get(&id).is_some_and(&keep) {
                    out.push((game_object, id));
                }
            }
        }
        out
    }

    fn collect_subtree(&self, game_object: GameObject, out: &mut Vec<GameObject>) {
        let mut stack = vec![game_object];
        while let Some(current) = stack.pop() {
            let Ok(transform) = self.transform(current) else {
                continue;
            };
            out.push(current);
            stack.extend(transform.children.iter().rev().copied());
        }
    }

    fn subtree(&self, game_object: GameObject) -> Vec<GameObject> {
        let mut out = Vec::new();
        self.collect_subtree(game_object, &mut out);
        out
    }

    fn host_subtree(&mut self, game_object: GameObject) {
        for object in self.subtree(game_object) {
            let ids = match self.world.get::<&mut GameObjectInfo>(object.0) {
                Ok(mut info) => {
                    info.hosted = true;
                    info.components.clone()
                }
                Err(_) => continue,
            };
            for id in ids {
                let is_behaviour = self
                    .components
                    .get(&id)
                    .is_some_and(|entry| entry.capabilities.contains(Capabilities::BEHAVIOUR));
                if is_behaviour {
                    self.lifecycle.entry(id).or_default();
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Destruction
    // ---------------------------------------------------------------------

    /// Queue a GameObject and its subtree for destruction at the end of the tick
    pub fn destroy(&mut self, game_object: GameObject) {
        if self.contains(game_object) {
            self.pending_destroy.push(Doomed::GameObject(game_object));
        }
    }

    /// Queue a single component for destruction at the end of the tick
    pub fn destroy_component(&mut self, id: ComponentId) -> Result<()> {
        let entry = self
            .components
            .get(&id)
            .ok_or(SceneError::MissingComponent(id))?;
        if matches!(entry.slot, Slot::Transform(_)) {
            return Err(SceneError::TransformIsPermanent(entry.owner));
        }
        self.pending_destroy.push(Doomed::Component(id));
        Ok(())
    }

    pub fn has_pending_destroy(&self) -> bool {
        !self.pending_destroy.is_empty()
    }

    /// Carry out queued destruction.
    ///
    /// Behaviours get OnDisable (when enabled) and OnDestroy (when awoken)
    /// before their records are dropped. Work touching a component that is
    /// currently running a hook stays queued for the next flush.
    pub fn flush_destroyed(&mut self) {
        let doomed = std::mem::take(&mut self.pending_destroy);
        for item in doomed {
            match item {
                Doomed::GameObject(game_object) => self.destroy_game_object_now(game_object),
                Doomed::Component(id) => self.destroy_component_now(id),
            }
        }
    }

    fn destroy_game_object_now(&mut self, game_object: GameObject) {
        if !self.contains(game_object) {
            return;
        }
        let doomed = self.subtree(game_object);
        let ids: Vec<ComponentId> = doomed
            .iter()
            .flat_map(|object| self.component_ids(*object))
            .collect();
        if ids.iter().any(|id| self.is_checked_out(*id)) {
            self.pending_destroy.push(Doomed::GameObject(game_object));
            return;
        }

        for id in &ids {
            self.retire(*id);
        }

        match self.parent(game_object) {
            Some(parent) => {
                if let Ok(parent_transform) = self.transform_mut(parent) {
                    parent_transform.children.retain(|c| *c != game_object);
                }
            }
            None => self.roots.retain(|r| *r != game_object),
        }

        for object in doomed {
            for id in self.component_ids(object) {
                self.components.remove(&id);
                self.lifecycle.remove(&id);
            }
            let _ = self.world.despawn(object.0);
        }
        log::debug!("destroyed {game_object} and its subtree");
    }

    fn destroy_component_now(&mut self, id: ComponentId) {
        let Some(entry) = self.components.get(&id) else {
            return;
        };
        if matches!(entry.slot, Slot::Boxed(None)) {
            self.pending_destroy.push(Doomed::Component(id));
            return;
        }
        let owner = entry.owner;
        let type_id = entry.type_id;

        self.retire(id);
        self.lifecycle.remove(&id);
        self.components.remove(&id);
        if let Ok(mut info) = self.world.get::<&mut GameObjectInfo>(owner.0) {
            info.components.retain(|c| *c != id);
            if let Some(ids) = info.by_type.get_mut(&type_id) {
                ids.retain(|c| *c != id);
                if ids.is_empty() {
                    info.by_type.remove(&type_id);
                }
            }
        }
        log::debug!("destroyed {id} on {owner}");
    }

    fn retire(&mut self, id: ComponentId) {
        let Some(state) = self.lifecycle.get(&id).copied() else {
            return;
        };
        if state.enabled_in_hierarchy {
            self.invoke(id, Hook::OnDisable);
            if let Some(state) = self.lifecycle.get_mut(&id) {
                state.enabled_in_hierarchy = false;
            }
        }
        if state.awake {
            self.invoke(id, Hook::OnDestroy);
        }
    }

    // ---------------------------------------------------------------------
    // Scheduler plumbing
    // ---------------------------------------------------------------------

    /// Lifecycle record of a behaviour, created on first use
    pub(crate) fn ensure_lifecycle(&mut self, id: ComponentId) -> LifecycleState {
        *self.lifecycle.entry(id).or_default()
    }

    pub(crate) fn update_lifecycle(&mut self, id: ComponentId, f: impl FnOnce(&mut LifecycleState)) {
        if let Some(state) = self.lifecycle.get_mut(&id) {
            f(state);
        }
    }

    /// Run one hook on a behaviour behind an error boundary.
    ///
    /// The component is checked out of the scene while the hook runs so the
    /// hook can borrow the scene mutably. Errors and panics are logged and
    /// the component is put back either way. Returns false when nothing ran.
    pub(crate) fn invoke(&mut self, id: ComponentId, hook: Hook) -> bool {
        let Some(entry) = self.components.get_mut(&id) else {
            return false;
        };
        let owner = entry.owner;
        let type_name = entry.type_name;
        let Slot::Boxed(slot) = &mut entry.slot else {
            return false;
        };
        let Some(mut component) = slot.take() else {
            log::warn!("{hook} skipped on {id} ({type_name}): it is already running a hook");
            return false;
        };

        let outcome = {
            let mut ctx = Context::new(self, owner, id);
            panic::catch_unwind(AssertUnwindSafe(|| match component.as_behaviour_mut() {
                Some(behaviour) => hook.call(behaviour, &mut ctx),
                None => Ok(()),
            }))
        };
        self.check_in(id, component);

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log::error!("{hook} failed on {id} ({type_name}): {err:#}"),
            Err(_) => log::error!("{hook} panicked on {id} ({type_name})"),
        }
        true
    }

    fn check_in(&mut self, id: ComponentId, component: Box<dyn Component>) {
        match self.components.get_mut(&id) {
            Some(ComponentEntry {
                slot: Slot::Boxed(slot),
                ..
            }) => *slot = Some(component),
            _ => log::debug!("dropping {id}: its record vanished while a hook was running"),
        }
    }

    fn is_checked_out(&self, id: ComponentId) -> bool {
        matches!(
            self.components.get(&id).map(|entry| &entry.slot),
            Some(Slot::Boxed(None))
        )
    }

    // ---------------------------------------------------------------------
    // Internal accessors
    // ---------------------------------------------------------------------

    fn info(&self, game_object: GameObject) -> Result<hecs::Ref<'_, GameObjectInfo>> {
        self.world
            .get::<&GameObjectInfo>(game_object.0)
            .map_err(|_| SceneError::MissingGameObject(game_object))
    }

    fn info_mut(&mut self, game_object: GameObject) -> Result<hecs::RefMut<'_, GameObjectInfo>> {
        self.world
            .get::<&mut GameObjectInfo>(game_object.0)
            .map_err(|_| SceneError::MissingGameObject(game_object))
    }

    fn transform_id(&self, game_object: GameObject) -> Result<ComponentId> {
        self.info(game_object)?
            .components
            .first()
            .copied()
            .ok_or(SceneError::MissingGameObject(game_object))
    }

    fn transform_mut(&mut self, game_object: GameObject) -> Result<&mut Transform> {
        let id = self.transform_id(game_object)?;
        match self.components.get_mut(&id).map(|entry| &mut entry.slot) {
            Some(Slot::Transform(transform)) => Ok(transform),
            _ => Err(SceneError::MissingGameObject(game_object)),
        }
    }

    fn first_of_type<T: Component>(&self, game_object: GameObject) -> Option<ComponentId> {
        let info = self.info(game_object).ok()?;
        info.by_type
            .get(&TypeId::of::<T>())
            .and_then(|ids| ids.first().copied())
    }

    fn boxed(&self, id: ComponentId) -> Option<&dyn Component> {
        match &self.components.get(&id)?.slot {
            Slot::Transform(transform) => Some(transform as &dyn Component),
            Slot::Boxed(Some(component)) => Some(&**component),
            Slot::Boxed(None) => None,
        }
    }

    fn boxed_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        match &mut self.components.get_mut(&id)?.slot {
            Slot::Transform(transform) => Some(transform as &mut dyn Component),
            Slot::Boxed(Some(component)) => Some(&mut **component),
            Slot::Boxed(None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    #[derive(Debug, PartialEq)]
    struct Tag(&'static str);
    impl Component for Tag {}

    fn chain(scene: &mut Scene, names: &[&str]) -> Vec<GameObject> {
        let mut out: Vec<GameObject> = Vec::new();
        for name in names {
            let object = scene.create_game_object(*name);
            if let Some(parent) = out.last() {
                scene.set_parent(object, Some(*parent)).unwrap();
            }
            out.push(object);
        }
        out
    }

    #[test]
    fn test_game_object_starts_with_transform() {
        let mut scene = Scene::new("test");
        let object = scene.create_game_object("Player");
        let ids = scene.component_ids(object);
        assert_eq!(ids.len(), 1);
        assert_eq!(
            scene.component_type_name(ids[0]),
            Some(std::any::type_name::<Transform>())
        );
        assert_eq!(scene.game_object_name(object).unwrap(), "Player");
        assert!(scene.active_self(object));
        assert!(!scene.is_hosted(object));
    }

    #[test]
    fn test_adding_transform_returns_existing_instance() {
        let mut scene = Scene::new("test");
        let object = scene.create_game_object("Player");
        let first = scene.find_component::<Transform>(object).unwrap();
        let again = scene.add_component(object, Transform::default()).unwrap();
        assert_eq!(first, again);
        assert_eq!(scene.component_ids(object).len(), 1);
    }

    #[test]
    fn test_type_queries_see_the_transform() {
        let mut scene = Scene::new("test");
        let parent = scene.create_game_object("Parent");
        let object = scene.create_game_object("Player");
        scene.set_parent(object, Some(parent)).unwrap();
        scene.set_local_position(object, Vec3::new(1.0, 2.0, 0.0)).unwrap();
        scene.add_game_object(parent).unwrap();

        let transform = scene.get_component::<Transform>(object).unwrap();
        assert_eq!(transform.local_position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(transform.parent(), Some(parent));
        assert_eq!(scene.get_components::<Transform>(object).len(), 1);

        let handle = scene.find_component::<Transform>(object).unwrap();
        assert!(scene.component(handle).is_some());
        assert!(scene.components_in_scene::<Transform>().contains(&handle));

        scene.get_component_mut::<Transform>(object).unwrap().local_scale = Vec3::splat(3.0);
        assert_eq!(scene.transform(object).unwrap().local_scale, Vec3::splat(3.0));
    }

    #[test]
    fn test_component_lookup_and_absence() {
        let mut scene = Scene::new("test");
        let object = scene.create_game_object("Player");
        assert!(scene.get_component::<Health>(object).is_none());

        scene.add_component(object, Health(10)).unwrap();
        scene.add_component(object, Tag("a")).unwrap();
        scene.add_component(object, Health(20)).unwrap();

        assert_eq!(scene.get_component::<Health>(object), Some(&Health(10)));
        assert_eq!(
            scene.get_components::<Health>(object),
            vec![&Health(10), &Health(20)]
        );
        assert_eq!(scene.component_ids(object).len(), 4);

        if let Some(health) = scene.get_component_mut::<Health>(object) {
            health.0 = 11;
        }
        assert_eq!(scene.get_component::<Health>(object), Some(&Health(11)));
    }

    #[test]
    fn test_handles_and_owner() {
        let mut scene = Scene::new("test");
        let object = scene.create_game_object("Player");
        let handle = scene.add_component(object, Tag("hero")).unwrap();
        assert_eq!(scene.owner_of(handle.id()).unwrap(), object);
        assert_eq!(scene.component(handle), Some(&Tag("hero")));
        assert!(scene.is_enabled(handle.id()));
        scene.set_enabled(handle.id(), false).unwrap();
        assert!(!scene.is_enabled(handle.id()));
    }

    #[test]
    fn test_capability_query_keeps_attachment_order() {
        struct Spin;
        impl Component for Spin {
            fn as_behaviour_mut(&mut self) -> Option<&mut dyn crate::MonoBehaviour> {
                Some(self)
            }
        }
        impl crate::MonoBehaviour for Spin {}

        struct Quad;
        impl Component for Quad {
            fn as_renderer(&self) -> Option<&dyn Renderer> {
                Some(self)
            }
        }
        impl Renderer for Quad {
            fn draw(&self, _: &Scene, _: GameObject, _: &mut dyn crate::DrawContext2D) {}
        }

        let mut scene = Scene::new("test");
        let object = scene.create_game_object("Mixed");
        let transform = scene.find_component::<Transform>(object).unwrap();
        scene.add_component(object, Tag("plain")).unwrap();
        let first = scene.add_component(object, Spin).unwrap();
        let quad = scene.add_component(object, Quad).unwrap();
        let second = scene.add_component(object, Spin).unwrap();

        assert_eq!(
            scene.components_with(object, Capabilities::BEHAVIOUR),
            vec![first.id(), second.id()]
        );
        assert_eq!(
            scene.components_with(object, Capabilities::RENDERER),
            vec![quad.id()]
        );
        assert_eq!(
            scene.components_with(object, Capabilities::TRANSFORM),
            vec![transform.id()]
        );
        assert!(
            scene
                .components_with(object, Capabilities::BEHAVIOUR | Capabilities::RENDERER)
                .is_empty()
        );
    }

    #[test]
    fn test_active_in_hierarchy_follows_every_ancestor() {
        let mut scene = Scene::new("test");
        let objects = chain(&mut scene, &["a", "b", "c", "d"]);
        let toggles = [(0, false), (2, false), (0, true), (3, false), (2, true), (3, true)];
        for (index, active) in toggles {
            scene.set_active(objects[index], active).unwrap();
            for (i, object) in objects.iter().enumerate() {
                let expected = objects[..=i].iter().all(|o| scene.active_self(*o));
                assert_eq!(scene.active_in_hierarchy(*object), expected);
            }
        }
    }

    #[test]
    fn test_set_parent_is_idempotent() {
        let mut scene = Scene::new("test");
        let parent = scene.create_game_object("parent");
        let child = scene.create_game_object("child");
        scene.set_parent(child, Some(parent)).unwrap();
        scene.set_parent(child, Some(parent)).unwrap();
        assert_eq!(scene.children(parent), vec![child]);
        assert_eq!(scene.parent(child), Some(parent));
    }

    #[test]
    fn test_reparent_moves_between_child_lists() {
        let mut scene = Scene::new("test");
        let first = scene.create_game_object("first");
        let second = scene.create_game_object("second");
        let child = scene.create_game_object("child");
        scene.set_parent(child, Some(first)).unwrap();
        scene.set_parent(child, Some(second)).unwrap();
        assert!(scene.children(first).is_empty());
        assert_eq!(scene.children(second), vec![child]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut scene = Scene::new("test");
        let objects = chain(&mut scene, &["a", "b", "c"]);
        let err = scene.set_parent(objects[0], Some(objects[2])).unwrap_err();
        assert_eq!(
            err,
            SceneError::HierarchyCycle {
                child: objects[0],
                parent: objects[2]
            }
        );
        assert!(matches!(
            scene.set_parent(objects[1], Some(objects[1])),
            Err(SceneError::HierarchyCycle { .. })
        ));
        assert_eq!(scene.parent(objects[0]), None);
        assert_eq!(scene.children(objects[1]), vec![objects[2]]);
    }

    #[test]
    fn test_world_position_round_trip() {
        let offsets = [
            Vec3::new(1.5, -2.0, 0.25),
            Vec3::new(-0.1, 3.3, 7.0),
            Vec3::new(100.0, 0.001, -5.5),
            Vec3::new(0.3, 0.3, 0.3),
            Vec3::new(-42.0, 17.0, 9.75),
        ];
        for depth in 1..=offsets.len() {
            let mut scene = Scene::new("test");
            let names = vec!["node"; depth];
            let objects = chain(&mut scene, &names);
            for (object, offset) in objects.iter().zip(offsets.iter()) {
                scene.set_local_position(*object, *offset).unwrap();
            }
            let leaf = *objects.last().unwrap();
            let before = scene.local_position(leaf).unwrap();
            let world = scene.position(leaf).unwrap();
            scene.set_position(leaf, world).unwrap();
            let after = scene.local_position(leaf).unwrap();
            assert!((before - after).length() < 1e-3, "depth {depth}");
        }
    }

    #[test]
    fn test_set_position_decomposes_against_parent() {
        let mut scene = Scene::new("test");
        let objects = chain(&mut scene, &["parent", "child"]);
        scene.set_local_position(objects[0], Vec3::new(10.0, 5.0, 0.0)).unwrap();
        scene.set_position(objects[1], Vec3::new(12.0, 5.0, 1.0)).unwrap();
        assert_eq!(scene.local_position(objects[1]).unwrap(), Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(scene.position(objects[1]).unwrap(), Vec3::new(12.0, 5.0, 1.0));
    }

    #[test]
    fn test_add_game_object_hosts_subtree_once() {
        let mut scene = Scene::new("test");
        let objects = chain(&mut scene, &["root", "child", "grandchild"]);
        scene.add_game_object(objects[0]).unwrap();
        scene.add_game_object(objects[0]).unwrap();
        assert_eq!(scene.roots(), &[objects[0]]);
        assert!(objects.iter().all(|o| scene.is_hosted(*o)));
        assert_eq!(scene.game_objects(), objects);
    }

    #[test]
    fn test_parenting_under_hosted_object_hosts_child() {
        let mut scene = Scene::new("test");
        let root = scene.create_game_object("root");
        scene.add_game_object(root).unwrap();
        let late = scene.create_game_object("late");
        scene.set_parent(late, Some(root)).unwrap();
        assert!(scene.is_hosted(late));
        scene.set_parent(late, None).unwrap();
        assert_eq!(scene.roots(), &[root, late]);
    }

    #[test]
    fn test_components_in_scene_are_depth_first() {
        let mut scene = Scene::new("test");
        let root = scene.create_game_object("root");
        let left = scene.create_game_object("left");
        let left_leaf = scene.create_game_object("left_leaf");
        let right = scene.create_game_object("right");
        scene.set_parent(left, Some(root)).unwrap();
        scene.set_parent(left_leaf, Some(left)).unwrap();
        scene.set_parent(right, Some(root)).unwrap();
        scene.add_component(right, Tag("right")).unwrap();
        scene.add_component(left_leaf, Tag("left_leaf")).unwrap();
        scene.add_component(root, Tag("root")).unwrap();
        scene.add_game_object(root).unwrap();

        let order: Vec<&str> = scene
            .components_in_scene::<Tag>()
            .into_iter()
            .filter_map(|handle| scene.component(handle).map(|t| t.0))
            .collect();
        assert_eq!(order, vec!["root", "left_leaf", "right"]);
        assert_eq!(scene.find("left_leaf"), Some(left_leaf));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut scene = Scene::new("test");
        let objects = chain(&mut scene, &["root", "child", "grandchild"]);
        let tag = scene.add_component(objects[2], Tag("leaf")).unwrap();
        scene.add_game_object(objects[0]).unwrap();

        scene.destroy(objects[1]);
        assert!(scene.contains(objects[1]));
        scene.flush_destroyed();

        assert!(!scene.contains(objects[1]));
        assert!(!scene.contains(objects[2]));
        assert!(scene.children(objects[0]).is_empty());
        assert_eq!(scene.owner_of(tag.id()), Err(SceneError::NotAttached(tag.id())));
        assert_eq!(scene.game_object_count(), 1);
    }

    #[test]
    fn test_destroy_single_component() {
        let mut scene = Scene::new("test");
        let object = scene.create_game_object("object");
        let first = scene.add_component(object, Tag("first")).unwrap();
        scene.add_component(object, Tag("second")).unwrap();
        scene.destroy_component(first.id()).unwrap();
        scene.flush_destroyed();
        assert_eq!(scene.get_component::<Tag>(object), Some(&Tag("second")));

        let transform = scene.find_component::<Transform>(object).unwrap();
        assert_eq!(
            scene.destroy_component(transform.id()),
            Err(SceneError::TransformIsPermanent(object))
        );
    }

    #[test]
    fn test_instance_ids_are_scoped_to_scene() {
        let mut first = Scene::new("first");
        let mut second = Scene::new("second");
        let a = first.create_game_object("a");
        first.create_game_object("b");
        let c = second.create_game_object("c");
        assert_eq!(first.instance_id(a).unwrap(), second.instance_id(c).unwrap());
    }
}
