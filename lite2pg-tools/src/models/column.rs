use crate::quoting::quote_value_string;
use crate::type_mapper::{map_type, MappedType, TypeDescriptor};

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ColumnDescriptor {
    pub ordinal: u32,
    pub name: String,
    pub source_type: TypeDescriptor,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub is_primary_key_member: bool,
}

impl ColumnDescriptor {
    pub fn target_type(&self) -> MappedType {
        map_type(&self.source_type)
    }

    /// The default value as it should appear after `DEFAULT`.
    ///
    /// Unquoted defaults on text and date/time columns are wrapped in quotes, everything
    /// else is emitted as is. This is a heuristic and not a literal parser, so function
    /// defaults like `CURRENT_TIMESTAMP` on a timestamp column end up quoted as well.
    pub fn get_default_expression(&self) -> Option<String> {
        let default_value = self.default_value.as_ref()?;

        if !default_value.starts_with('\'') && self.target_type().target.is_textual_or_temporal() {
            Some(quote_value_string(default_value))
        } else {
            Some(default_value.clone())
        }
    }
}
