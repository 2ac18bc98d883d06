use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a [`Variant`](super::Variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    Null,
    Integer,
    Long,
    Float,
    Double,
    String,
    Boolean,
    DateTime,
    TimeSpan,
    Object,
    Array,
}

impl VariantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Null => "Null",
            VariantType::Integer => "Integer",
            VariantType::Long => "Long",
            VariantType::Float => "Float",
            VariantType::Double => "Double",
            VariantType::String => "String",
            VariantType::Boolean => "Boolean",
            VariantType::DateTime => "DateTime",
            VariantType::TimeSpan => "TimeSpan",
            VariantType::Object => "Object",
            VariantType::Array => "Array",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            VariantType::Integer | VariantType::Long | VariantType::Float | VariantType::Double
        )
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
