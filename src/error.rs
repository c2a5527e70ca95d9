//! Internal control-flow errors
//!
//! None of these are fatal. Duplicate or racing input events are expected,
//! so the dispatch point logs them and carries on.

use thiserror::Error;

use crate::sim::state::{Authority, TileId};

#[derive(Debug, Error)]
pub enum PlaygroundError {
    #[error("tile {0} is not in the registry")]
    UnknownTile(TileId),
    #[error("tile {id} cannot move from {from:?} to {to:?}")]
    InvalidAuthorityTransition {
        id: TileId,
        from: Authority,
        to: Authority,
    },
    #[error("a drag session is already live")]
    SessionAlreadyActive,
    #[error("no drag session is live")]
    NoActiveSession,
    #[error("palette entry {0} does not exist")]
    UnknownPaletteEntry(usize),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}
