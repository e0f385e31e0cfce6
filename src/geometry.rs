//! Coordinate math over a `rows × cols` grid.
//!
//! Every list produced here is already bounds-checked, so modes built from
//! these coordinates can address the light store without further checks.
//! Rings and boxes are the building blocks for borders, nested frames and
//! sub-panels; none of the display logic needs to know the grid size.
//!
//! ## Rust concepts
//! - Inherent `impl` blocks for a type can live in a different module of
//!   the same crate
//! - Iterator adaptors (`map`, `rev`, `chain`) to build coordinate lists
//! - `Result` with `?` to stop at the first out-of-range request

use crate::{Coord, Error, GridSize, Result};

impl GridSize {
    fn out_of_range(&self, what: String) -> Error {
        Error::OutOfRange {
            what,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Whether `coord` addresses a cell of this grid.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as i64) < self.rows as i64
            && (coord.col as i64) < self.cols as i64
    }

    /// Every cell of row `row`, left to right.
    pub fn row_coords(&self, row: i32) -> Result<Vec<Coord>> {
        if row < 0 || row as i64 >= self.rows as i64 {
            return Err(self.out_of_range(format!("row {row}")));
        }
        Ok((0..self.cols as i32).map(|col| Coord::new(row, col)).collect())
    }

    /// Every cell of column `col`, top to bottom.
    pub fn col_coords(&self, col: i32) -> Result<Vec<Coord>> {
        if col < 0 || col as i64 >= self.cols as i64 {
            return Err(self.out_of_range(format!("column {col}")));
        }
        Ok((0..self.rows as i32).map(|row| Coord::new(row, col)).collect())
    }

    /// The border of the rectangle inset by `distance` from every edge.
    ///
    /// Traced clockwise from the inset top-left corner, visiting each cell
    /// once. At exactly half of either dimension there is nothing left to
    /// draw and the list is empty.
    pub fn ring_coords(&self, distance: i32) -> Result<Vec<Coord>> {
        let twice = 2 * distance as i64;
        if distance < 0 || twice > self.rows as i64 || twice > self.cols as i64 {
            return Err(self.out_of_range(format!("ring distance {distance}")));
        }
        if twice == self.rows as i64 || twice == self.cols as i64 {
            return Ok(Vec::new());
        }

        let top = distance;
        let left = distance;
        let bottom = self.rows as i32 - 1 - distance;
        let right = self.cols as i32 - 1 - distance;

        let mut coords: Vec<Coord> = (left..=right).map(|col| Coord::new(top, col)).collect();
        coords.extend((top + 1..=bottom).map(|row| Coord::new(row, right)));
        // A ring one cell thick is a single line: don't trace it back.
        if bottom > top {
            coords.extend((left..right).rev().map(|col| Coord::new(bottom, col)));
        }
        if right > left {
            coords.extend((top + 1..bottom).rev().map(|row| Coord::new(row, left)));
        }
        Ok(coords)
    }

    /// The outermost ring of the grid.
    pub fn edge_coords(&self) -> Result<Vec<Coord>> {
        self.ring_coords(0)
    }

    /// Every cell of the `size` rectangle anchored at `top_left`.
    ///
    /// Enumerated column-major: columns outer, rows inner.
    pub fn box_coords(&self, top_left: Coord, size: GridSize) -> Result<Vec<Coord>> {
        let fits = top_left.row >= 0
            && top_left.col >= 0
            && top_left.row as i64 + size.rows as i64 <= self.rows as i64
            && top_left.col as i64 + size.cols as i64 <= self.cols as i64;
        if !fits {
            return Err(self.out_of_range(format!(
                "{}x{} box at {top_left}",
                size.rows, size.cols
            )));
        }

        let rows = top_left.row..top_left.row + size.rows as i32;
        let cols = top_left.col..top_left.col + size.cols as i32;
        Ok(cols
            .flat_map(|col| rows.clone().map(move |row| Coord::new(row, col)))
            .collect())
    }

    /// Every cell of the grid, column-major.
    pub fn all_coords(&self) -> Vec<Coord> {
        let cols = 0..self.cols as i32;
        cols.flat_map(|col| (0..self.rows as i32).map(move |row| Coord::new(row, col)))
            .collect()
    }

    /// Position of `coord` along a serpentine-wired LED strip.
    ///
    /// The strip runs down even columns and back up odd ones, moving left to
    /// right across the grid.
    pub fn serpentine_index(&self, coord: Coord) -> Result<usize> {
        if !self.contains(coord) {
            return Err(self.out_of_range(format!("strip position {coord}")));
        }
        let rows = self.rows as usize;
        let (row, col) = (coord.row as usize, coord.col as usize);
        let offset = if col % 2 == 0 { row } else { rows - 1 - row };
        Ok(col * rows + offset)
    }

    /// All cells in strip order: element `i` is the cell wired to LED `i`.
    pub fn serpentine_order(&self) -> Vec<Coord> {
        let rows = self.rows as i32;
        (0..self.cols as i32)
            .flat_map(|col| {
                (0..rows).map(move |i| {
                    let row = if col % 2 == 0 { i } else { rows - 1 - i };
                    Coord::new(row, col)
                })
            })
            .collect()
    }
}

/// Top-left corner and size of the smallest box holding every coordinate.
///
/// Returns `None` for an empty list.
pub fn bounding_box(coords: &[Coord]) -> Option<(Coord, GridSize)> {
    let first = coords.first()?;
    let (mut min, mut max) = (*first, *first);
    for c in coords {
        min.row = min.row.min(c.row);
        min.col = min.col.min(c.col);
        max.row = max.row.max(c.row);
        max.col = max.col.max(c.col);
    }
    let size = GridSize::new((max.row - min.row + 1) as u32, (max.col - min.col + 1) as u32);
    Some((min, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashSet;

    fn coords(pairs: &[(i32, i32)]) -> Vec<Coord> {
        pairs.iter().map(|&(r, c)| Coord::new(r, c)).collect()
    }

    fn ring_distance(size: GridSize, c: Coord) -> i32 {
        c.row
            .min(c.col)
            .min(size.rows as i32 - 1 - c.row)
            .min(size.cols as i32 - 1 - c.col)
    }

    // ── Rows and columns ───────────────────────────────────────────

    #[test]
    fn row_coords_span_the_row() {
        let size = GridSize::new(3, 4);
        assert_eq!(
            size.row_coords(1).unwrap(),
            coords(&[(1, 0), (1, 1), (1, 2), (1, 3)])
        );
    }

    #[test]
    fn col_coords_span_the_column() {
        let size = GridSize::new(3, 4);
        assert_eq!(size.col_coords(3).unwrap(), coords(&[(0, 3), (1, 3), (2, 3)]));
    }

    #[rstest]
    #[case(-1)]
    #[case(3)]
    #[case(100)]
    fn row_coords_out_of_range(#[case] row: i32) {
        let err = GridSize::new(3, 4).row_coords(row).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    fn col_coords_out_of_range(#[case] col: i32) {
        let err = GridSize::new(3, 4).col_coords(col).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    // ── Rings ──────────────────────────────────────────────────────

    #[test]
    fn ring_is_traced_clockwise_from_top_left() {
        let size = GridSize::new(3, 4);
        assert_eq!(
            size.ring_coords(0).unwrap(),
            coords(&[
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 3),
                (2, 3),
                (2, 2),
                (2, 1),
                (2, 0),
                (1, 0),
            ])
        );
    }

    #[test]
    fn inner_ring_of_16x16() {
        let ring = GridSize::new(16, 16).ring_coords(1).unwrap();
        assert_eq!(ring.len(), 14 * 4 - 4);
        assert_eq!(ring[0], Coord::new(1, 1));
        assert_eq!(ring[13], Coord::new(1, 14));
        assert_eq!(ring[26], Coord::new(14, 14));
    }

    #[test]
    fn rings_hold_exactly_the_cells_at_their_distance() {
        for rows in 1..=9u32 {
            for cols in 1..=9u32 {
                let size = GridSize::new(rows, cols);
                let max_distance = rows.min(cols).div_ceil(2) as i32;
                for d in 0..max_distance {
                    let ring = size.ring_coords(d).unwrap();
                    let unique: HashSet<Coord> = ring.iter().copied().collect();
                    assert_eq!(unique.len(), ring.len(), "duplicates in {rows}x{cols} ring {d}");

                    let expected: HashSet<Coord> = size
                        .all_coords()
                        .into_iter()
                        .filter(|&c| ring_distance(size, c) == d)
                        .collect();
                    assert_eq!(unique, expected, "{rows}x{cols} ring {d}");

                    let min_row = ring.iter().map(|c| c.row).min().unwrap();
                    let max_row = ring.iter().map(|c| c.row).max().unwrap();
                    let min_col = ring.iter().map(|c| c.col).min().unwrap();
                    let max_col = ring.iter().map(|c| c.col).max().unwrap();
                    assert_eq!((min_row, min_col), (d, d));
                    assert_eq!((max_row, max_col), (rows as i32 - 1 - d, cols as i32 - 1 - d));
                }
            }
        }
    }

    #[rstest]
    #[case(4, 4, 2)]
    #[case(4, 10, 2)]
    #[case(10, 6, 3)]
    fn ring_at_half_a_dimension_is_empty(#[case] rows: u32, #[case] cols: u32, #[case] d: i32) {
        assert!(GridSize::new(rows, cols).ring_coords(d).unwrap().is_empty());
    }

    #[rstest]
    #[case(4, 4, 3)]
    #[case(4, 10, 3)]
    #[case(10, 10, -1)]
    fn ring_past_the_middle_is_out_of_range(#[case] rows: u32, #[case] cols: u32, #[case] d: i32) {
        let err = GridSize::new(rows, cols).ring_coords(d).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    #[test]
    fn odd_grid_centre_ring_is_a_single_line() {
        assert_eq!(
            GridSize::new(3, 5).ring_coords(1).unwrap(),
            coords(&[(1, 1), (1, 2), (1, 3)])
        );
        assert_eq!(GridSize::new(5, 5).ring_coords(2).unwrap(), coords(&[(2, 2)]));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(10, 12)]
    #[case(16, 16)]
    fn edge_is_ring_zero(#[case] rows: u32, #[case] cols: u32) {
        let size = GridSize::new(rows, cols);
        assert_eq!(size.edge_coords().unwrap(), size.ring_coords(0).unwrap());
    }

    // ── Boxes ──────────────────────────────────────────────────────

    #[test]
    fn box_coords_are_column_major() {
        let size = GridSize::new(10, 10);
        assert_eq!(
            size.box_coords(Coord::new(3, 4), GridSize::new(2, 3)).unwrap(),
            coords(&[(3, 4), (4, 4), (3, 5), (4, 5), (3, 6), (4, 6)])
        );
    }

    #[rstest]
    #[case(0, 0, 10, 10)]
    #[case(3, 4, 2, 4)]
    #[case(9, 9, 1, 1)]
    #[case(5, 5, 0, 3)]
    fn box_coords_count(#[case] row: i32, #[case] col: i32, #[case] rows: u32, #[case] cols: u32) {
        let found = GridSize::new(10, 10)
            .box_coords(Coord::new(row, col), GridSize::new(rows, cols))
            .unwrap();
        assert_eq!(found.len(), (rows * cols) as usize);
    }

    #[rstest]
    #[case(9, 0, 2, 1)]
    #[case(0, 9, 1, 2)]
    #[case(-1, 0, 1, 1)]
    #[case(0, -1, 1, 1)]
    #[case(0, 0, 11, 1)]
    fn box_crossing_the_boundary_is_out_of_range(
        #[case] row: i32,
        #[case] col: i32,
        #[case] rows: u32,
        #[case] cols: u32,
    ) {
        let err = GridSize::new(10, 10)
            .box_coords(Coord::new(row, col), GridSize::new(rows, cols))
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }

    #[test]
    fn bounding_box_of_a_ring() {
        let ring = GridSize::new(16, 16).ring_coords(2).unwrap();
        assert_eq!(bounding_box(&ring), Some((Coord::new(2, 2), GridSize::new(12, 12))));
        assert_eq!(bounding_box(&[]), None);
    }

    // ── Serpentine addressing ──────────────────────────────────────

    #[rstest]
    #[case(0, 0, 0)]
    #[case(2, 0, 2)]
    #[case(2, 1, 3)]
    #[case(0, 1, 5)]
    #[case(0, 2, 6)]
    #[case(2, 3, 9)]
    fn serpentine_index_on_3_rows(#[case] row: i32, #[case] col: i32, #[case] expected: usize) {
        let size = GridSize::new(3, 4);
        assert_eq!(size.serpentine_index(Coord::new(row, col)).unwrap(), expected);
    }

    #[test]
    fn serpentine_order_inverts_serpentine_index() {
        let size = GridSize::new(5, 7);
        let order = size.serpentine_order();
        assert_eq!(order.len(), size.light_count());
        for (i, coord) in order.into_iter().enumerate() {
            assert_eq!(size.serpentine_index(coord).unwrap(), i);
        }
    }

    #[test]
    fn serpentine_index_out_of_range() {
        let size = GridSize::new(3, 4);
        assert!(size.serpentine_index(Coord::new(3, 0)).is_err());
        assert!(size.serpentine_index(Coord::new(0, -1)).is_err());
    }
}
