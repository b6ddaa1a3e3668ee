use crate::models::ColumnDescriptor;
use crate::source::RawColumn;
use crate::type_mapper::TypeDescriptor;

impl RawColumn {
    pub fn to_column_descriptor(&self, ordinal: u32) -> ColumnDescriptor {
        ColumnDescriptor {
            ordinal,
            name: self.name.clone(),
            source_type: TypeDescriptor::parse(&self.raw_type),
            not_null: self.not_null,
            default_value: self.default_value.clone(),
            is_primary_key_member: self.primary_key_position > 0,
        }
    }
}

/// Sorts the columns by ordinal and checks that the ordinals are unique and contiguous from 0.
pub(super) fn add_columns(mut raw_columns: Vec<RawColumn>) -> Result<Vec<ColumnDescriptor>, String> {
    if raw_columns.is_empty() {
        return Err("no columns were reported".to_string());
    }

    raw_columns.sort_by_key(|c| c.ordinal);

    let mut columns = Vec::with_capacity(raw_columns.len());

    for (expected, raw) in raw_columns.iter().enumerate() {
        if raw.ordinal != expected as i64 {
            return Err(format!(
                "column `{}` has ordinal {}, expected {}",
                raw.name, raw.ordinal, expected
            ));
        }

        columns.push(raw.to_column_descriptor(expected as u32));
    }

    Ok(columns)
}
