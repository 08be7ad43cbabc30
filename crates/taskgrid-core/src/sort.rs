use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<String>,
    pub order: SortOrder,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same field: flip the direction. New field: start ascending.
    pub fn apply_click(&mut self, field: &str) -> SortOrder {
        if self.field.as_deref() == Some(field) {
            self.order = self.order.toggled();
        } else {
            self.field = Some(field.to_string());
            self.order = SortOrder::Asc;
        }
        self.order
    }
}
