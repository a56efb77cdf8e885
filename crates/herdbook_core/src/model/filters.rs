//! Transient list filter criteria.

use crate::model::cow::CowStatus;

/// Status selector: everything, or one specific status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CowStatus),
}

impl StatusFilter {
    /// Selector options in picker order: `All` first, then every status.
    pub fn options() -> [StatusFilter; 4] {
        [
            Self::All,
            Self::Only(CowStatus::Active),
            Self::Only(CowStatus::InTreatment),
            Self::Only(CowStatus::Deceased),
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }

    pub fn accepts(self, status: CowStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == status,
        }
    }
}

/// Pen selector: everything, or one exact pen label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PenFilter {
    #[default]
    All,
    Only(String),
}

impl PenFilter {
    pub fn accepts(&self, pen: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == pen,
        }
    }
}

/// Three-part predicate applied to the herd list.
///
/// Replaced wholesale by the store; field-level merging is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CowFilters {
    /// Case-insensitive substring of the ear tag. Empty matches everything.
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub pen_filter: PenFilter,
}
