use std::fmt::{Display, Formatter};
use tracing::warn;

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ForeignKeyDescriptor {
    /// Columns of the owning table, in key order.
    pub local_columns: Vec<String>,
    pub referenced_table: String,
    /// Columns of the referenced table, parallel to `local_columns`. Empty when the
    /// reference targets the primary key of the referenced table implicitly.
    pub referenced_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKeyDescriptor {
    pub fn single(local_column: &str, referenced_table: &str, referenced_column: &str) -> Self {
        ForeignKeyDescriptor {
            local_columns: vec![local_column.to_string()],
            referenced_table: referenced_table.to_string(),
            referenced_columns: vec![referenced_column.to_string()],
            on_delete: None,
            on_update: None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Parses the action text reported by the source. Unknown actions are dropped.
    pub fn parse(action: &str) -> Option<Self> {
        let action = action.trim();
        if action.is_empty() {
            return None;
        }

        match action.to_uppercase().as_str() {
            "NO ACTION" => Some(ReferentialAction::NoAction),
            "RESTRICT" => Some(ReferentialAction::Restrict),
            "CASCADE" => Some(ReferentialAction::Cascade),
            "SET NULL" => Some(ReferentialAction::SetNull),
            "SET DEFAULT" => Some(ReferentialAction::SetDefault),
            _ => {
                warn!(action, "Unknown referential action, ignoring it");
                None
            }
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }

    /// `NO ACTION` is what the target does anyway, so it never has to be spelled out.
    pub fn is_no_op(&self) -> bool {
        *self == ReferentialAction::NoAction
    }
}

impl Display for ReferentialAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions() {
        assert_eq!(ReferentialAction::parse("CASCADE"), Some(ReferentialAction::Cascade));
        assert_eq!(ReferentialAction::parse("set null"), Some(ReferentialAction::SetNull));
        assert_eq!(ReferentialAction::parse("NO ACTION"), Some(ReferentialAction::NoAction));
        assert_eq!(ReferentialAction::parse("Set Default"), Some(ReferentialAction::SetDefault));
        assert_eq!(ReferentialAction::parse("RESTRICT"), Some(ReferentialAction::Restrict));
        assert_eq!(ReferentialAction::parse(""), None);
        assert_eq!(ReferentialAction::parse("EXPLODE"), None);
    }
}
