/// Single coordinate axis used for the grid side and positions.
pub type Coord = u8;

/// Count type used for marked-cell counts and total-cell counts.
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

/// Converts a row-major flat index back into coordinates on a `size`-wide grid.
pub(crate) fn coords_from_flat(index: usize, size: Coord) -> Coord2 {
    let size = usize::from(size);
    let row = index / size;
    let col = index % size;
    // both are < size <= Coord::MAX
    (row as Coord, col as Coord)
}
