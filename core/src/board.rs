use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// Owns every cell of one game, from placement to outcome.
///
/// Boards are never reused: a new game or level change replaces the whole value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    hazard_layout: HazardLayout,
    states: Array2<CellState>,
    markers_remaining: CellCount,
    unrevealed_safe_remaining: CellCount,
    outcome: GameOutcome,
    triggered_hazard: Option<Coord2>,
}

impl Board {
    /// Validates `config` and places its hazards randomly from `seed`.
    pub fn new_game(config: GameConfig, seed: u64) -> Result<Self> {
        let config = GameConfig::new(config.grid_size, config.hazards)?;
        let hazard_layout = RandomHazardGenerator::new(seed).generate(config)?;
        Ok(Self::from_layout(hazard_layout))
    }

    pub fn from_layout(hazard_layout: HazardLayout) -> Self {
        let grid_size = hazard_layout.grid_size();
        Self {
            states: Array2::default((grid_size, grid_size).to_nd_index()),
            markers_remaining: hazard_layout.hazard_count(),
            unrevealed_safe_remaining: hazard_layout.safe_cell_count(),
            outcome: GameOutcome::InProgress,
            triggered_hazard: None,
            hazard_layout,
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn grid_size(&self) -> Coord {
        self.hazard_layout.grid_size()
    }

    pub fn game_config(&self) -> GameConfig {
        self.hazard_layout.game_config()
    }

    pub fn hazard_total(&self) -> CellCount {
        self.hazard_layout.hazard_count()
    }

    /// Markers the player may still place; never negative.
    pub fn markers_remaining(&self) -> CellCount {
        self.markers_remaining
    }

    pub fn unrevealed_safe_remaining(&self) -> CellCount {
        self.unrevealed_safe_remaining
    }

    /// Hazard whose reveal lost the game.
    pub fn triggered_hazard(&self) -> Option<Coord2> {
        self.triggered_hazard
    }

    pub fn hazard_layout(&self) -> &HazardLayout {
        &self.hazard_layout
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.hazard_layout.validate_coords(coords)?;
        Ok(Cell {
            hazard: self.hazard_layout[coords],
            state: self.states[coords.to_nd_index()],
        })
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let Cell { hazard, state } = self.cell(coords)?;
        Ok(match (state, hazard) {
            (CellState::Hidden, _) => CellView::HIDDEN,
            (CellState::Flagged, _) => CellView::FLAGGED,
            (CellState::Revealed, true) => CellView::REVEALED_HAZARD,
            (CellState::Revealed, false) => {
                CellView::revealed_safe(self.hazard_layout.adjacent_hazard_count(coords))
            }
        })
    }

    /// Counts neighboring hazards whatever their state, flagged and revealed ones included.
    pub fn adjacent_hazard_count(&self, coords: Coord2) -> Result<u8> {
        let coords = self.hazard_layout.validate_coords(coords)?;
        Ok(self.hazard_layout.adjacent_hazard_count(coords))
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<GameOutcome> {
        let coords = self.hazard_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        if self.states[coords.to_nd_index()] != CellState::Hidden {
            return Ok(self.outcome);
        }

        if self.hazard_layout[coords] {
            self.states[coords.to_nd_index()] = CellState::Revealed;
            self.triggered_hazard = Some(coords);
            log::debug!("Revealed hazard at {:?}", coords);
            self.end_game(GameOutcome::Lost);
            return Ok(self.outcome);
        }

        self.flood_reveal(coords);

        if self.unrevealed_safe_remaining == 0 {
            self.end_game(GameOutcome::Won);
        }
        Ok(self.outcome)
    }

    /// Reveals `start` and, through zero-adjacency cells, its connected safe region.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_coords) = to_visit.pop_front() {
            // queued twice through different neighbors, or flagged meanwhile
            if self.states[visit_coords.to_nd_index()] != CellState::Hidden {
                continue;
            }
            debug_assert!(!self.hazard_layout[visit_coords]);

            self.states[visit_coords.to_nd_index()] = CellState::Revealed;
            self.unrevealed_safe_remaining -= 1;

            let adjacent = self.hazard_layout.adjacent_hazard_count(visit_coords);
            log::trace!(
                "Revealed cell at {:?}, adjacent hazards: {}",
                visit_coords,
                adjacent
            );

            if adjacent == 0 {
                to_visit.extend(
                    self.hazard_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.states[pos.to_nd_index()] == CellState::Hidden),
                );
            }
        }
    }

    pub fn toggle_marker(&mut self, coords: Coord2) -> Result<MarkerState> {
        let coords = self.hazard_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        let state = &mut self.states[coords.to_nd_index()];
        Ok(match *state {
            CellState::Hidden if self.markers_remaining == 0 => {
                log::debug!("No markers left for {:?}", coords);
                MarkerState::Unchanged
            }
            CellState::Hidden => {
                *state = CellState::Flagged;
                self.markers_remaining -= 1;
                MarkerState::Placed
            }
            CellState::Flagged => {
                *state = CellState::Hidden;
                self.markers_remaining += 1;
                MarkerState::Removed
            }
            CellState::Revealed => MarkerState::Unchanged,
        })
    }

    /// Reveals the first hidden hazard in row-major order without ending the game.
    pub fn reveal_hint(&mut self) -> Option<Coord2> {
        if self.is_finished() {
            return None;
        }

        let hazard_layout = &self.hazard_layout;
        let (index, state) = self.states.indexed_iter_mut().find(|((row, col), state)| {
            **state == CellState::Hidden && hazard_layout[(*row as Coord, *col as Coord)]
        })?;
        *state = CellState::Revealed;

        let coords = (index.0 as Coord, index.1 as Coord);
        log::debug!("Hint revealed hazard at {:?}", coords);
        Some(coords)
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.outcome.is_finished() {
            return;
        }
        log::debug!("Game ended: {:?}", outcome);
        self.outcome = outcome;
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.outcome.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn board(grid_size: Coord, hazards: &[CellCount]) -> Board {
        Board::from_layout(HazardLayout::from_indices(grid_size, hazards).unwrap())
    }

    fn revealed_indices(board: &Board) -> Vec<CellCount> {
        let grid_size = board.grid_size();
        (0..mult(grid_size, grid_size))
            .filter(|&index| {
                let coords = coords_of(index, grid_size).unwrap();
                board.cell(coords).unwrap().state == CellState::Revealed
            })
            .collect()
    }

    #[test]
    fn new_game_rejects_full_board() {
        let config = GameConfig::new_unchecked(10, 100);

        assert_eq!(Board::new_game(config, 1), Err(GameError::InvalidConfiguration));
    }

    #[test]
    fn new_game_uses_config_counts() {
        let board = Board::new_game(Level::Basic.config(), 3).unwrap();

        assert_eq!(board.grid_size(), 10);
        assert_eq!(board.hazard_total(), 10);
        assert_eq!(board.markers_remaining(), 10);
        assert_eq!(board.unrevealed_safe_remaining(), 90);
        assert_eq!(board.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn reveal_hazard_loses_and_touches_nothing_else() {
        let mut board = board(3, &[4]);
        board.toggle_marker((0, 0)).unwrap();
        let before = board.clone();

        let outcome = board.reveal((1, 1)).unwrap();

        assert_eq!(outcome, GameOutcome::Lost);
        assert_eq!(board.triggered_hazard(), Some((1, 1)));
        assert_eq!(board.cell_view((1, 1)).unwrap(), CellView::REVEALED_HAZARD);
        assert_eq!(board.unrevealed_safe_remaining(), 8);
        for index in (0..9).filter(|&index| index != 4) {
            let coords = coords_of(index, 3).unwrap();
            assert_eq!(board.cell(coords), before.cell(coords));
        }
    }

    #[test]
    fn flood_reveal_opens_zero_region() {
        let mut board = board(3, &[8]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, GameOutcome::Won);
        assert_eq!(board.cell_view((0, 0)).unwrap(), CellView::revealed_safe(0));
        assert_eq!(board.cell_view((1, 1)).unwrap().displayed_number, Some(1));
        assert_eq!(board.cell((2, 2)).unwrap().state, CellState::Hidden);
    }

    #[test]
    fn flood_reveal_visits_each_cell_once() {
        let mut board = Board::from_layout(HazardLayout::empty(10));

        assert_eq!(board.reveal((0, 0)).unwrap(), GameOutcome::Won);
        assert_eq!(board.unrevealed_safe_remaining(), 0);
        assert_eq!(revealed_indices(&board).len(), 100);
    }

    #[test]
    fn flood_reveal_from_fixed_layout_is_reproducible() {
        let hazards = [3, 14, 22, 37, 45, 58, 61, 76, 83, 99];
        let mut first = board(10, &hazards);
        let mut second = board(10, &hazards);

        assert_eq!(first.reveal((0, 0)).unwrap(), GameOutcome::InProgress);
        second.reveal((0, 0)).unwrap();

        let expected = [
            0, 1, 2, 10, 11, 12, 20, 21, 30, 31, 32, 33, 34, 40, 41, 42, 43, 44, 50, 51, 52, 53,
            54, 55, 62, 63, 64, 65, 72, 73, 74, 75,
        ];
        assert_eq!(revealed_indices(&first), expected);
        assert_eq!(first, second);
        assert_eq!(first.unrevealed_safe_remaining(), 90 - 32);
        assert_eq!(first.cell_view((7, 2)).unwrap().displayed_number, Some(2));
    }

    #[test]
    fn flood_reveal_stops_at_flagged_cells() {
        let mut board = board(4, &[15]);
        board.toggle_marker((0, 3)).unwrap();

        board.reveal((0, 0)).unwrap();

        assert_eq!(board.cell((0, 3)).unwrap().state, CellState::Flagged);
        assert_eq!(board.unrevealed_safe_remaining(), 1);
        assert_eq!(board.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn revealing_every_safe_cell_wins_exactly_at_zero() {
        let mut board = board(5, &[0, 7, 13, 24]);

        for index in (0..25).rev() {
            let coords = coords_of(index, 5).unwrap();
            if board.cell(coords).unwrap().hazard || board.is_finished() {
                continue;
            }
            let outcome = board.reveal(coords).unwrap();
            assert_eq!(
                outcome == GameOutcome::Won,
                board.unrevealed_safe_remaining() == 0
            );
        }

        assert_eq!(board.outcome(), GameOutcome::Won);
    }

    #[test]
    fn reveal_revealed_cell_is_noop() {
        let mut board = board(4, &[0]);
        assert_eq!(board.reveal((0, 1)).unwrap(), GameOutcome::InProgress);
        let before = board.clone();

        assert_eq!(board.reveal((0, 1)).unwrap(), GameOutcome::InProgress);
        assert_eq!(board, before);
    }

    #[test]
    fn reveal_flagged_cell_keeps_game_in_progress() {
        let mut board = board(3, &[0]);
        board.toggle_marker((0, 0)).unwrap();
        let before = board.clone();

        assert_eq!(board.reveal((0, 0)).unwrap(), GameOutcome::InProgress);
        assert_eq!(board, before);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut board = board(3, &[0]);

        assert_eq!(board.reveal((3, 0)), Err(GameError::OutOfBounds));
        assert_eq!(board.toggle_marker((0, 3)), Err(GameError::OutOfBounds));
        assert_eq!(board.cell_view((5, 5)), Err(GameError::OutOfBounds));
        assert_eq!(board.adjacent_hazard_count((3, 3)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn marker_round_trip_restores_board() {
        let mut board = board(4, &[1, 6]);
        let before = board.clone();

        assert_eq!(board.toggle_marker((2, 2)).unwrap(), MarkerState::Placed);
        assert_eq!(board.markers_remaining(), 1);
        assert_eq!(board.cell_view((2, 2)).unwrap(), CellView::FLAGGED);
        assert_eq!(board.toggle_marker((2, 2)).unwrap(), MarkerState::Removed);

        assert_eq!(board, before);
    }

    #[test]
    fn markers_never_go_negative() {
        let mut board = board(4, &[1]);

        assert_eq!(board.toggle_marker((3, 3)).unwrap(), MarkerState::Placed);
        assert_eq!(board.toggle_marker((3, 2)).unwrap(), MarkerState::Unchanged);
        assert_eq!(board.markers_remaining(), 0);
        assert_eq!(board.cell((3, 2)).unwrap().state, CellState::Hidden);
    }

    #[test]
    fn marker_on_revealed_cell_is_noop() {
        let mut board = board(4, &[0]);
        board.reveal((0, 1)).unwrap();

        assert_eq!(board.toggle_marker((0, 1)).unwrap(), MarkerState::Unchanged);
        assert_eq!(board.markers_remaining(), 1);
    }

    #[test]
    fn finished_board_rejects_moves() {
        let mut board = board(2, &[0]);
        assert_eq!(board.reveal((0, 0)).unwrap(), GameOutcome::Lost);
        let before = board.clone();

        assert_eq!(board.reveal((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(board.toggle_marker((1, 1)), Err(GameError::AlreadyEnded));
        assert_eq!(board.reveal_hint(), None);
        assert_eq!(board, before);
    }

    #[test]
    fn hint_reveals_hazards_in_scan_order() {
        let mut board = board(10, &[5, 40]);

        assert_eq!(board.reveal_hint(), Some((0, 5)));
        assert_eq!(board.cell((0, 5)).unwrap().state, CellState::Revealed);
        assert_eq!(board.reveal_hint(), Some((4, 0)));
        assert_eq!(board.reveal_hint(), None);
        assert_eq!(board.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn hint_skips_flagged_hazards() {
        let mut board = board(10, &[5, 40]);
        board.toggle_marker((0, 5)).unwrap();
        board.toggle_marker((4, 0)).unwrap();

        assert_eq!(board.reveal_hint(), None);
        assert_eq!(board.markers_remaining(), 0);
    }

    #[test]
    fn hinted_hazard_still_counts_for_neighbors() {
        let mut board = board(3, &[0]);
        board.reveal_hint();

        assert_eq!(board.adjacent_hazard_count((1, 1)).unwrap(), 1);
        assert_eq!(board.reveal((1, 1)).unwrap(), GameOutcome::InProgress);
        assert_eq!(board.cell_view((1, 1)).unwrap().displayed_number, Some(1));
        assert_eq!(board.unrevealed_safe_remaining(), 7);
    }
}
