//! Instance identity for scene objects
//!
//! Every GameObject and Component gets an [`InstanceId`] from the allocator of
//! the scene that owns it. Ids are never reused, and two scenes never share a
//! counter.

use std::fmt;

/// Unique id of an object inside one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Id of a component attached to a GameObject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(InstanceId);

impl ComponentId {
    pub fn instance_id(self) -> InstanceId {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component {}", self.0)
    }
}

/// Monotonic id allocator, one per scene
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> InstanceId {
        self.next += 1;
        InstanceId(self.next)
    }

    pub fn allocate_component(&mut self) -> ComponentId {
        ComponentId(self.allocate())
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}
