#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use level::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod level;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid_size: Coord,
    pub hazards: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(grid_size: Coord, hazards: CellCount) -> Self {
        Self { grid_size, hazards }
    }

    /// Validates a square grid of side `grid_size` holding `hazards` hazards.
    ///
    /// At least one hazard and at least one safe cell are required; nothing is clamped.
    pub fn new(grid_size: Coord, hazards: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(grid_size, hazards);
        if grid_size == 0 || hazards == 0 || hazards >= config.total_cells() {
            log::warn!(
                "Rejected configuration, grid {}x{} with {} hazards",
                grid_size,
                grid_size,
                hazards
            );
            return Err(GameError::InvalidConfiguration);
        }
        Ok(config)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.hazards)
    }
}

/// Immutable hazard placement for one board, stored row-major.
///
/// Serialized as its mask alone, the count is recomputed when reading it back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<bool>", into = "Array2<bool>")]
pub struct HazardLayout {
    hazard_mask: Array2<bool>,
    hazard_count: CellCount,
}

impl HazardLayout {
    /// Wraps a square mask, `None` if it is not square or larger than a [`Coord`] allows.
    pub fn from_hazard_mask(hazard_mask: Array2<bool>) -> Option<Self> {
        let (rows, cols) = hazard_mask.dim();
        if rows != cols || Coord::try_from(rows).is_err() {
            return None;
        }
        let hazard_count = hazard_mask
            .iter()
            .filter(|&&is_hazard| is_hazard)
            .count()
            .try_into()
            .ok()?;
        Some(Self {
            hazard_mask,
            hazard_count,
        })
    }

    pub fn empty(grid_size: Coord) -> Self {
        Self {
            hazard_mask: Array2::default((grid_size, grid_size).to_nd_index()),
            hazard_count: 0,
        }
    }

    /// Builds a layout from row-major flat indices; repeated indices count once.
    pub fn from_indices(grid_size: Coord, indices: &[CellCount]) -> Result<Self> {
        let mut layout = Self::empty(grid_size);

        for &index in indices {
            let coords = coords_of(index, grid_size).ok_or(GameError::OutOfBounds)?;
            let cell = &mut layout.hazard_mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                layout.hazard_count += 1;
            }
        }

        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.grid_size(), self.hazard_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let grid_size = self.grid_size();
        if coords.0 < grid_size && coords.1 < grid_size {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn grid_size(&self) -> Coord {
        // constructors only accept square masks whose side fits a Coord
        self.hazard_mask.nrows() as Coord
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.grid_size(), self.grid_size())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.hazard_count
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn contains_hazard(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Hazards among the in-bounds Moore neighbors of `coords`.
    pub fn adjacent_hazard_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, always fits
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    /// Flat indices of every hazard in ascending (row-major) order.
    pub fn hazard_indices(&self) -> Vec<CellCount> {
        let grid_size = self.grid_size();
        self.hazard_mask
            .indexed_iter()
            .filter(|&(_, &is_hazard)| is_hazard)
            .map(|((row, col), _)| flat_index((row as Coord, col as Coord), grid_size))
            .collect()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        let grid_size = self.grid_size();
        neighbors(coords, (grid_size, grid_size))
    }
}

impl TryFrom<Array2<bool>> for HazardLayout {
    type Error = GameError;

    fn try_from(hazard_mask: Array2<bool>) -> Result<Self> {
        Self::from_hazard_mask(hazard_mask).ok_or(GameError::InvalidConfiguration)
    }
}

impl From<HazardLayout> for Array2<bool> {
    fn from(layout: HazardLayout) -> Self {
        layout.hazard_mask
    }
}

impl Index<Coord2> for HazardLayout {
    type Output = bool;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.hazard_mask[(row as usize, col as usize)]
    }
}

/// Answer map, one grid row per line with `1` for a hazard and `0` for a safe cell.
impl fmt::Display for HazardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.hazard_mask.rows() {
            for &is_hazard in row {
                f.write_str(if is_hazard { "1" } else { "0" })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Result of toggling a marker on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerState {
    Placed,
    Removed,
    Unchanged,
}

impl MarkerState {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Placed | Self::Removed => true,
            Self::Unchanged => false,
        }
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
