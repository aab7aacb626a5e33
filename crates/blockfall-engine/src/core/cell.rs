use super::piece::PieceKind;

/// A single cell of the field.
///
/// The value is both the occupancy flag and the color key: anything other
/// than [`Cell::Empty`] is solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Solid cell with no piece identity (puzzle setups, garbage).
    Occupied,
    /// Locked cell of a specific piece type.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub const fn piece_kind(self) -> Option<PieceKind> {
        match self {
            Cell::Piece(kind) => Some(kind),
            Cell::Empty | Cell::Occupied => None,
        }
    }

    /// Text form used by the field's `Display` and `FromStr` impls.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied => '#',
            Cell::Piece(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Occupied),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}
