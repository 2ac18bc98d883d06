//! Dynamically typed values and the operator strategies over them

pub mod error;
pub mod operations;
pub mod type_safe;
pub mod type_unsafe;
pub mod variant;
pub mod variant_type;

pub use error::{VariantError, VariantResult};
pub use operations::VariantOperations;
pub use type_safe::TypeSafeVariantOperations;
pub use type_unsafe::TypeUnsafeVariantOperations;
pub use variant::Variant;
pub use variant_type::VariantType;
