use serde::Serialize;

/// Kind of a ledger row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Record,
    Delete,
}

impl Action {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Action::Record => "record",
            Action::Delete => "delete",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "record" => Some(Action::Record),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Action::Delete)
    }
}
