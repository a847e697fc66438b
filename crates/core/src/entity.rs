//! Entity trait: identity plus the derived aggregate field it carries.

use crate::kind::EntityKind;

/// An entity whose aggregate field is rebuilt by replaying its transactions.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Into<crate::RecordId>;

    /// Which collection this entity lives in.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
