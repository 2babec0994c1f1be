//! Catalog entity kinds and their table vocabulary.

use std::fmt;

use crate::error::{QueryError, Result};

/// The four filterable catalog entities.
///
/// Callers state the kind explicitly at query construction; the kind
/// decides which columns and special-case token rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Event,
    Presentation,
    Publication,
    Speaker,
}

impl EntityKind {
    /// Maps a database table name to its entity kind. Fails for any table
    /// the composer does not know how to filter; never defaults.
    pub fn from_table(table: &str) -> Result<Self> {
        match table {
            "events" => Ok(Self::Event),
            "presentations" => Ok(Self::Presentation),
            "publications" => Ok(Self::Publication),
            "speakers" => Ok(Self::Speaker),
            _ => Err(QueryError::UnknownEntity(table.to_string())),
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::Presentation => "presentations",
            Self::Publication => "publications",
            Self::Speaker => "speakers",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Presentation => "presentation",
            Self::Publication => "publication",
            Self::Speaker => "speaker",
        }
    }

    /// Date column a 4-digit search token matches against, when years are
    /// special for this kind.
    pub(crate) fn year_column(self) -> Option<&'static str> {
        match self {
            Self::Event => Some("events.start_date"),
            Self::Publication => Some("publications.published_on"),
            Self::Presentation | Self::Speaker => None,
        }
    }

    /// Only presentations carry topic tags.
    pub(crate) fn supports_tags(self) -> bool {
        matches!(self, Self::Presentation)
    }

    /// Only events carry a location (city/state/country).
    pub(crate) fn supports_locations(self) -> bool {
        matches!(self, Self::Event)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}
