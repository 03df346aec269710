//! Sort selection for table columns.

use serde::{Deserialize, Serialize};

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

enum_display_fromstr!(
    SortDirection,
    crate::error::ConsoleError::invalid_sort_direction,
    {
        Ascending => "asc",
        Descending => "desc",
    }
);

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// A column sort selection.
///
/// Selecting the column that is already sorted flips the direction;
/// selecting a different column starts over descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> SortSpec<F> {
    pub fn descending(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    pub fn ascending(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }
}

impl<F: PartialEq> SortSpec<F> {
    /// Apply a header click to this spec.
    pub fn select(&mut self, field: F) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field;
            self.direction = SortDirection::Descending;
        }
    }
}
