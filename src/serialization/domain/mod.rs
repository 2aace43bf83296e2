//! Domain types describing serialized data.
//!
//! These types carry no codec logic: they name a logical type, a concrete
//! representation format, and the erased data itself.

mod representation;
mod resolved_type;
mod serialized_object;
mod serialized_type;

pub use representation::RepresentationType;
pub use resolved_type::{DynamicPayload, KnownType, ResolvedType};
pub use serialized_object::{SerializedData, SerializedObject};
pub use serialized_type::SerializedType;
