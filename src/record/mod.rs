//! Record instances, the bounded list container, and serialization.

pub mod list;
pub mod record;
pub mod serialization;

pub use list::BoundedList;
pub use record::{FieldValue, Input, Record};
