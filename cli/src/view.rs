use std::fmt;

use wormsweeper_core::{Board, Cell, CellState, CellView};

/// Text rendering of a board, one row per line with row and column labels.
///
/// Once the game is over the remaining worms are uncovered as `w` and misplaced hooks as `x`.
pub struct BoardView<'a> {
    board: &'a Board,
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    fn symbol(&self, cell: Cell, view: CellView) -> char {
        let finished = self.board.is_finished();
        match (view.state, cell.hazard) {
            (CellState::Hidden, true) if finished => 'w',
            (CellState::Hidden, _) => '#',
            (CellState::Flagged, false) if finished => 'x',
            (CellState::Flagged, _) => 'F',
            (CellState::Revealed, true) => 'W',
            (CellState::Revealed, false) => match view.displayed_number {
                Some(n) => char::from_digit(n.into(), 10).unwrap_or('?'),
                None => '.',
            },
        }
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid_size = self.board.grid_size();
        let width = grid_size.saturating_sub(1).to_string().len();

        write!(f, "{:width$}", "")?;
        for col in 0..grid_size {
            write!(f, " {col:>width$}")?;
        }
        writeln!(f)?;

        for row in 0..grid_size {
            write!(f, "{row:>width$}")?;
            for col in 0..grid_size {
                let cell = self.board.cell((row, col)).map_err(|_| fmt::Error)?;
                let view = self.board.cell_view((row, col)).map_err(|_| fmt::Error)?;
                write!(f, " {:>width$}", self.symbol(cell, view))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wormsweeper_core::{GameOutcome, HazardLayout};

    fn board(grid_size: u8, hazards: &[u16]) -> Board {
        Board::from_layout(HazardLayout::from_indices(grid_size, hazards).unwrap())
    }

    #[test]
    fn fresh_board_is_all_hidden() {
        let board = board(3, &[4]);

        assert_eq!(
            BoardView::new(&board).to_string(),
            "  0 1 2\n0 # # #\n1 # # #\n2 # # #\n"
        );
    }

    #[test]
    fn revealed_cells_show_counts_and_blanks() {
        let mut board = board(3, &[8]);
        board.toggle_marker((2, 2)).unwrap();
        assert_eq!(board.reveal((0, 0)).unwrap(), GameOutcome::Won);

        assert_eq!(
            BoardView::new(&board).to_string(),
            "  0 1 2\n0 . . .\n1 . 1 1\n2 . 1 F\n"
        );
    }

    #[test]
    fn game_in_progress_keeps_far_cells_hidden() {
        let mut board = board(3, &[5, 8]);
        assert_eq!(board.reveal((0, 0)).unwrap(), GameOutcome::InProgress);

        assert_eq!(
            BoardView::new(&board).to_string(),
            "  0 1 2\n0 . 1 #\n1 . 2 #\n2 . 2 #\n"
        );
    }

    #[test]
    fn lost_board_uncovers_worms_and_wrong_hooks() {
        let mut board = board(3, &[0, 8]);
        board.toggle_marker((0, 1)).unwrap();
        board.toggle_marker((2, 2)).unwrap();
        board.reveal((0, 0)).unwrap();

        assert_eq!(
            BoardView::new(&board).to_string(),
            "  0 1 2\n0 W x #\n1 # # #\n2 # # F\n"
        );
    }

    #[test]
    fn wide_grids_pad_labels() {
        let board = board(11, &[0]);
        let rendered = BoardView::new(&board).to_string();
        let mut lines = rendered.lines();

        assert_eq!(lines.next(), Some("    0  1  2  3  4  5  6  7  8  9 10"));
        assert_eq!(lines.next(), Some(" 0  #  #  #  #  #  #  #  #  #  #  #"));
        assert_eq!(lines.last(), Some("10  #  #  #  #  #  #  #  #  #  #  #"));
    }
}
