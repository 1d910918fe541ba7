/// Single coordinate axis used for the grid side length and for row/column positions.
pub type Coord = u8;

/// Count type used for hazard counts, marker supply and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major flat index of `coords` on a square grid of side `grid_size`.
pub const fn flat_index((row, col): Coord2, grid_size: Coord) -> CellCount {
    row as CellCount * grid_size as CellCount + col as CellCount
}

/// Inverse of [`flat_index`], `None` when `index` falls outside the grid.
pub fn coords_of(index: CellCount, grid_size: Coord) -> Option<Coord2> {
    if grid_size == 0 || index >= mult(grid_size, grid_size) {
        return None;
    }
    let side = CellCount::from(grid_size);
    let row = (index / side).try_into().ok()?;
    let col = (index % side).try_into().ok()?;
    Some((row, col))
}

/// In-bounds Moore neighbors of `center` on a `rows` x `cols` grid, row by row.
pub fn neighbors(center: Coord2, (rows, cols): Coord2) -> impl Iterator<Item = Coord2> {
    let (row, col) = center;
    let first_col = col.saturating_sub(1);
    let last_col = col.saturating_add(1);

    (row.saturating_sub(1)..=row.saturating_add(1))
        .flat_map(move |r| (first_col..=last_col).map(move |c| (r, c)))
        .filter(move |&(r, c)| r < rows && c < cols && (r, c) != center)
}
