use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use crate::ParseFieldError;

use super::{
    cell::Cell,
    piece::{FallingPiece, Position, Shape},
};

/// Number of columns in the field.
pub const FIELD_WIDTH: usize = 10;
/// Number of rows in the field.
pub const FIELD_HEIGHT: usize = 20;

/// A single row of the field, leftmost column first.
pub type FieldRow = [Cell; FIELD_WIDTH];

const EMPTY_ROW: FieldRow = [Cell::Empty; FIELD_WIDTH];

fn is_full(row: &FieldRow) -> bool {
    row.iter().all(|cell| !cell.is_empty())
}

/// The persistent grid of locked cells.
///
/// `Field` is a fixed 10×20 grid stored row-major with row 0 at the top.
/// Its dimensions never change; it is mutated only by locking a piece
/// ([`Field::fill_piece`]) and clearing rows ([`Field::clear_full_lines`]).
///
/// The same type doubles as the composited view handed to renderers, with the
/// active piece stamped on a copy (see [`Snapshot`](crate::Snapshot)).
///
/// # Example
///
/// ```
/// use blockfall_engine::{FallingPiece, Field, PieceKind, Position};
///
/// let mut field = Field::EMPTY;
/// let piece = FallingPiece::new(PieceKind::I, Position::new(0, 18), 0);
/// assert!(!field.is_colliding(&piece));
///
/// field.fill_piece(&piece);
/// assert_eq!(field.clear_full_lines(), 0);
/// assert!(field.is_colliding(&piece));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    rows: [FieldRow; FIELD_HEIGHT],
}

impl Default for Field {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Field {
    pub const WIDTH: usize = FIELD_WIDTH;
    pub const HEIGHT: usize = FIELD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; FIELD_HEIGHT],
    };

    /// Returns the rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[FieldRow; FIELD_HEIGHT] {
        &self.rows
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the field.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < FIELD_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < FIELD_HEIGHT)?;
        Some((x, y))
    }

    /// Tests whether `shape` placed with its origin at `position` is illegal.
    ///
    /// A placement collides when any occupied cell of the shape falls outside
    /// the columns `[0, WIDTH)`, outside the rows `[0, HEIGHT)`, or onto a
    /// non-empty field cell. Empty cells of the bounding box never collide.
    #[must_use]
    pub fn collides(&self, shape: &Shape, position: Position) -> bool {
        shape.occupied_offsets().any(|(dx, dy)| {
            match Self::index(position.x() + dx, position.y() + dy) {
                Some((x, y)) => !self.rows[y][x].is_empty(),
                None => true,
            }
        })
    }

    #[must_use]
    pub fn is_colliding(&self, piece: &FallingPiece) -> bool {
        self.collides(piece.shape(), piece.position())
    }

    /// Stamps the piece's cells onto the field with its kind.
    ///
    /// This is called when a piece is locked into position. The caller is
    /// expected to have checked [`Self::is_colliding`]; cells outside the
    /// field are skipped rather than re-validated.
    pub fn fill_piece(&mut self, piece: &FallingPiece) {
        let cell = Cell::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            if let Some((x, y)) = Self::index(x, y) {
                self.rows[y][x] = cell;
            }
        }
    }

    /// Like [`Self::fill_piece`], but returns a new field and leaves `self`
    /// untouched.
    #[must_use]
    pub fn merged(&self, piece: &FallingPiece) -> Self {
        let mut field = self.clone();
        field.fill_piece(piece);
        field
    }

    /// Returns the indices of rows with no empty cell, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> ArrayVec<usize, FIELD_HEIGHT> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| is_full(row))
            .map(|(y, _)| y)
            .collect()
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// All full rows are removed at once. The remaining rows keep their
    /// relative order and settle at the bottom; the vacated rows at the top
    /// are refilled with empty rows.
    ///
    /// # Returns
    ///
    /// The number of lines cleared, in `0..=HEIGHT`.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..FIELD_HEIGHT).rev() {
            if is_full(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Like [`Self::clear_full_lines`], but returns the compacted field.
    #[must_use]
    pub fn cleared(&self) -> (Self, usize) {
        let mut field = self.clone();
        let count = field.clear_full_lines();
        (field, count)
    }
}

/// Renders one text line per row: `.` for empty, `#` for anonymous solid
/// cells and the piece letter otherwise.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

/// Parses the text produced by `Display`.
///
/// Blank lines and surrounding whitespace are ignored. Fewer than
/// [`FIELD_HEIGHT`] rows are allowed: the given rows fill the bottom of the
/// field and everything above is empty.
impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > FIELD_HEIGHT {
            return Err(ParseFieldError::TooManyRows { rows: lines.len() });
        }

        let mut field = Self::EMPTY;
        let top = FIELD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != FIELD_WIDTH {
                return Err(ParseFieldError::RowWidth { row: i, width });
            }
            for (x, c) in line.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or(ParseFieldError::UnknownCell { cell: c })?;
                field.rows[top + i][x] = cell;
            }
        }
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceKind;

    fn field(text: &str) -> Field {
        text.parse().unwrap()
    }

    #[test]
    fn test_empty_field() {
        let field = Field::EMPTY;
        assert!(field.is_empty());
        assert_eq!(field.rows().len(), FIELD_HEIGHT);
        assert!(field.rows().iter().all(|row| row.len() == FIELD_WIDTH));
        assert_eq!(field.cell(0, 0), Some(Cell::Empty));
        assert_eq!(field.cell(FIELD_WIDTH, 0), None);
        assert_eq!(field.cell(0, FIELD_HEIGHT), None);
    }

    #[test]
    fn test_collides_with_walls() {
        let field = Field::EMPTY;
        // I-piece spawn orientation occupies row 1 of its 4x4 box.
        let shape = PieceKind::I.shape(0);
        assert!(!field.collides(shape, Position::new(0, 0)));
        assert!(!field.collides(shape, Position::new(6, 0)));
        assert!(field.collides(shape, Position::new(-1, 0)));
        assert!(field.collides(shape, Position::new(7, 0)));
        // Empty top row of the box may hang above the field.
        assert!(!field.collides(shape, Position::new(0, -1)));
        assert!(field.collides(shape, Position::new(0, -2)));
        // Bottom edge.
        assert!(!field.collides(shape, Position::new(0, 18)));
        assert!(field.collides(shape, Position::new(0, 19)));
    }

    #[test]
    fn test_collides_only_with_occupied_cells_of_shape() {
        // Vertical I-piece uses column 1 of its box, so column 0 can hang off
        // the left wall.
        let field = Field::EMPTY;
        let shape = PieceKind::I.shape(1);
        assert!(!field.collides(shape, Position::new(-1, 0)));
        assert!(field.collides(shape, Position::new(-2, 0)));
    }

    #[test]
    fn test_collides_with_stack() {
        let field = field(
            "
            ....#.....
            ",
        );
        let shape = PieceKind::O.shape(0);
        assert!(field.collides(shape, Position::new(3, 18)));
        assert!(field.collides(shape, Position::new(4, 18)));
        assert!(!field.collides(shape, Position::new(5, 18)));
        assert!(!field.collides(shape, Position::new(3, 17)));
    }

    #[test]
    fn test_fill_piece() {
        let mut field = Field::EMPTY;
        let piece = FallingPiece::new(PieceKind::T, Position::new(0, 18), 0);
        field.fill_piece(&piece);
        assert_eq!(field.cell(1, 18), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(field.cell(0, 19), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(field.cell(1, 19), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(field.cell(2, 19), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(field.cell(0, 18), Some(Cell::Empty));
    }

    #[test]
    fn test_merged_leaves_original_untouched() {
        let field = Field::EMPTY;
        let piece = FallingPiece::new(PieceKind::O, Position::new(4, 18), 0);
        let merged = field.merged(&piece);
        assert!(field.is_empty());
        assert_eq!(merged.cell(4, 18), Some(Cell::Piece(PieceKind::O)));
        assert_eq!(merged.cell(5, 19), Some(Cell::Piece(PieceKind::O)));
    }

    #[test]
    fn test_clear_no_full_rows_is_identity() {
        let original = field(
            "
            IIII.....J
            #########.
            ",
        );
        let (cleared, count) = original.cleared();
        assert_eq!(count, 0);
        assert_eq!(cleared, original);
    }

    #[test]
    fn test_clear_single_line() {
        let mut field = field(
            "
            ..T.......
            ##########
            ",
        );
        assert_eq!(field.full_rows().as_slice(), &[19]);
        assert_eq!(field.clear_full_lines(), 1);
        assert_eq!(field.cell(2, 19), Some(Cell::Piece(PieceKind::T)));
        assert_eq!(field.rows()[18], EMPTY_ROW);
        assert_eq!(field.rows().len(), FIELD_HEIGHT);
    }

    #[test]
    fn test_clear_non_adjacent_lines_preserves_order() {
        let mut field = field(
            "
            L.........
            ##########
            .J........
            ##########
            ..S.......
            ",
        );
        assert_eq!(field.clear_full_lines(), 2);
        let expected = self::field(
            "
            L.........
            .J........
            ..S.......
            ",
        );
        assert_eq!(field, expected);
    }

    #[test]
    fn test_clear_entire_field() {
        let mut field = Field::EMPTY;
        for y in 0..FIELD_HEIGHT {
            for x in 0..FIELD_WIDTH {
                field.set_cell(x, y, Cell::Occupied);
            }
        }
        assert_eq!(field.clear_full_lines(), FIELD_HEIGHT);
        assert!(field.is_empty());
    }

    #[test]
    fn test_display_and_parse() {
        let mut field = Field::EMPTY;
        field.set_cell(0, 19, Cell::Piece(PieceKind::Z));
        field.set_cell(9, 19, Cell::Occupied);
        let text = field.to_string();
        assert_eq!(text.lines().count(), FIELD_HEIGHT);
        assert_eq!(text.lines().last(), Some("Z........#"));
        assert_eq!(text.parse::<Field>().unwrap(), field);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "....".parse::<Field>(),
            Err(ParseFieldError::RowWidth { row: 0, width: 4 })
        );
        assert_eq!(
            "....x.....".parse::<Field>(),
            Err(ParseFieldError::UnknownCell { cell: 'x' })
        );
        let too_tall = "..........\n".repeat(FIELD_HEIGHT + 1);
        assert_eq!(
            too_tall.parse::<Field>(),
            Err(ParseFieldError::TooManyRows {
                rows: FIELD_HEIGHT + 1
            })
        );
    }
}
