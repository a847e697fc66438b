//! Value object trait: equality by value, not identity.
//!
//! `Quantity`, `PaymentMethod` and `Signed<T>` are value objects: two with the
//! same attributes are interchangeable. Entities (`Customer`, `BatteryType`)
//! are compared by id instead.

/// Marker trait for immutable, value-compared domain objects.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
