use thiserror::Error;

use crate::ids::ComponentId;
use crate::scene::GameObject;

/// Result type alias for scene graph operations
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised by structural scene operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("{0} does not exist in this scene")]
    MissingGameObject(GameObject),

    #[error("{0} does not exist in this scene")]
    MissingComponent(ComponentId),

    #[error("{0} is not attached to a game object")]
    NotAttached(ComponentId),

    #[error("cannot parent {child} under {parent}: the hierarchy would contain a cycle")]
    HierarchyCycle {
        child: GameObject,
        parent: GameObject,
    },

    #[error("the transform of {0} cannot be removed from its game object")]
    TransformIsPermanent(GameObject),
}
