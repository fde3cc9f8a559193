use crate::error::{IndexError, Result};

/// Kind of a source location, encoded as a dense integer `0..=9`.
///
/// Unlike `NodeKind`/`EdgeKind`, there is no `Unknown` sentinel — an
/// out-of-range integer is a `BadKind` error rather than a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Token,
    Scope,
    Qualifier,
    LocalSymbol,
    Signature,
    AtomicRange,
    IndexerError,
    FulltextSearch,
    ScreenSearch,
    Unsolved,
}

impl LocationKind {
    pub fn to_i32(self) -> i32 {
        match self {
            LocationKind::Token => 0,
            LocationKind::Scope => 1,
            LocationKind::Qualifier => 2,
            LocationKind::LocalSymbol => 3,
            LocationKind::Signature => 4,
            LocationKind::AtomicRange => 5,
            LocationKind::IndexerError => 6,
            LocationKind::FulltextSearch => 7,
            LocationKind::ScreenSearch => 8,
            LocationKind::Unsolved => 9,
        }
    }

    pub fn from_i32(v: i32) -> Result<LocationKind> {
        match v {
            0 => Ok(LocationKind::Token),
            1 => Ok(LocationKind::Scope),
            2 => Ok(LocationKind::Qualifier),
            3 => Ok(LocationKind::LocalSymbol),
            4 => Ok(LocationKind::Signature),
            5 => Ok(LocationKind::AtomicRange),
            6 => Ok(LocationKind::IndexerError),
            7 => Ok(LocationKind::FulltextSearch),
            8 => Ok(LocationKind::ScreenSearch),
            9 => Ok(LocationKind::Unsolved),
            other => Err(IndexError::BadKind(other as i64)),
        }
    }
}
