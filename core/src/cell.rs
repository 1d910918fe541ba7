use serde::{Deserialize, Serialize};

/// Player-facing state of a cell, the only part of a cell that changes during play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub hazard: bool,
    pub state: CellState,
}

/// What the presentation layer is allowed to know about a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub state: CellState,
    /// Only ever `true` for a revealed hazard.
    pub hazard: bool,
    /// Adjacency count of a revealed safe cell, `None` when it would be zero.
    pub displayed_number: Option<u8>,
}

impl CellView {
    pub const HIDDEN: Self = Self {
        state: CellState::Hidden,
        hazard: false,
        displayed_number: None,
    };

    pub const FLAGGED: Self = Self {
        state: CellState::Flagged,
        hazard: false,
        displayed_number: None,
    };

    pub const REVEALED_HAZARD: Self = Self {
        state: CellState::Revealed,
        hazard: true,
        displayed_number: None,
    };

    pub const fn revealed_safe(adjacent: u8) -> Self {
        Self {
            state: CellState::Revealed,
            hazard: false,
            displayed_number: if adjacent == 0 { None } else { Some(adjacent) },
        }
    }
}
