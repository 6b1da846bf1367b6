//! # Animation Node Standard Library
//!
//! The built-in node catalog. Each module holds the node kinds of one
//! category; [`standard_registry`] registers all of them.
//!
//! ```rust,ignore
//! let registry = anim_std::standard_registry();
//! for decl in registry.search("plane") {
//!     println!("{} ({})", decl.label, decl.id_name);
//! }
//! ```

use anim_engine::NodeRegistry;
use tracing::debug;

pub mod animation;
pub mod color;
pub mod geometry;
pub mod mesh;
pub mod object;
pub mod rotation;
pub mod system;
pub mod text;

pub use animation::SetKeyframes;
pub use color::ColorMix;
pub use geometry::ProjectPointOnPlane;
pub use mesh::MeshRemoveDoubles;
pub use object::ObjectGroupInput;
pub use rotation::{EulerWiggle, QuaternionMath, QuaternionOperation};
pub use system::GroupInput;
pub use text::Characters;

/// Register every standard node kind.
pub fn register_all(registry: &mut NodeRegistry) {
    registry
        .register(SetKeyframes)
        .register(ColorMix)
        .register(ProjectPointOnPlane)
        .register(MeshRemoveDoubles)
        .register(ObjectGroupInput)
        .register(EulerWiggle)
        .register(QuaternionMath)
        .register(GroupInput)
        .register(Characters);
    debug!(kinds = registry.len(), "registered standard node kinds");
}

/// A registry holding the standard node kinds.
pub fn standard_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_all(&mut registry);
    registry
}
