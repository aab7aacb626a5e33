use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::field::{FIELD_WIDTH, Field};

/// Largest bounding box edge of any rotation state (the I-piece's 4×4 box).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Horizontal offsets tried, in order, when a rotated piece collides.
///
/// The first offset is the unchanged position; the rest are the wall kicks.
pub const WALL_KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

/// Uniform draw over the seven kinds. Consecutive draws are independent, so
/// repeats are possible.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in catalog order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the immutable catalog entry for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// let definition = PieceKind::O.definition();
    /// assert_eq!(definition.rotation_count(), 1);
    /// assert_eq!(definition.shape(0).size(), 2);
    /// ```
    #[must_use]
    pub fn definition(self) -> &'static PieceDefinition {
        &PIECE_DEFINITIONS[self as usize]
    }

    #[must_use]
    pub fn color(self) -> PieceColor {
        self.definition().color()
    }

    #[must_use]
    pub fn shape(self, rotation: usize) -> &'static Shape {
        self.definition().shape(rotation)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('J'), Some(PieceKind::J));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Display color attached to each piece kind.
///
/// Front-ends map these to whatever palette they render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

/// One rotation state of a piece: a square occupancy grid.
///
/// Every rotation state of a given piece shares the same edge length
/// (4 for I, 2 for O, 3 for the rest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self { size: N, cells }
    }

    /// Edge length of the bounding box.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[y][x]
    }

    /// Returns the `(dx, dy)` offsets of occupied cells relative to the
    /// bounding box origin, row by row from the top.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells[..self.size]
            .iter()
            .enumerate()
            .flat_map(move |(dy, row)| {
                row[..self.size]
                    .iter()
                    .enumerate()
                    .filter(|(_, occupied)| **occupied)
                    .map(move |(dx, _)| (dx as i32, dy as i32))
            })
    }
}

/// Catalog entry for a piece kind: its rotation table and color.
///
/// Definitions are process-wide constants obtained through
/// [`PieceKind::definition`] and shared by reference.
#[derive(Debug)]
pub struct PieceDefinition {
    kind: PieceKind,
    rotations: &'static [Shape],
    color: PieceColor,
}

impl PieceDefinition {
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    #[must_use]
    pub const fn rotations(&self) -> &'static [Shape] {
        self.rotations
    }

    #[must_use]
    pub const fn rotation_count(&self) -> usize {
        self.rotations.len()
    }

    /// Returns the rotation state at `rotation`, wrapping around the table.
    #[must_use]
    pub fn shape(&self, rotation: usize) -> &'static Shape {
        &self.rotations[rotation % self.rotations.len()]
    }

    /// Bounding box width of the spawn orientation.
    #[must_use]
    pub fn spawn_width(&self) -> usize {
        self.rotations[0].size()
    }
}

static PIECE_DEFINITIONS: [PieceDefinition; PieceKind::LEN] = [
    PieceDefinition {
        kind: PieceKind::I,
        rotations: &[
            Shape::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
            Shape::from_rows([[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]]),
            Shape::from_rows([[0, 0, 0, 0], [0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]]),
            Shape::from_rows([[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]]),
        ],
        color: PieceColor::Cyan,
    },
    PieceDefinition {
        kind: PieceKind::J,
        rotations: &[
            Shape::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
            Shape::from_rows([[0, 1, 1], [0, 1, 0], [0, 1, 0]]),
            Shape::from_rows([[0, 0, 0], [1, 1, 1], [0, 0, 1]]),
            Shape::from_rows([[0, 1, 0], [0, 1, 0], [1, 1, 0]]),
        ],
        color: PieceColor::Blue,
    },
    PieceDefinition {
        kind: PieceKind::L,
        rotations: &[
            Shape::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
            Shape::from_rows([[0, 1, 0], [0, 1, 0], [0, 1, 1]]),
            Shape::from_rows([[0, 0, 0], [1, 1, 1], [1, 0, 0]]),
            Shape::from_rows([[1, 1, 0], [0, 1, 0], [0, 1, 0]]),
        ],
        color: PieceColor::Orange,
    },
    PieceDefinition {
        kind: PieceKind::O,
        rotations: &[Shape::from_rows([[1, 1], [1, 1]])],
        color: PieceColor::Yellow,
    },
    PieceDefinition {
        kind: PieceKind::S,
        rotations: &[
            Shape::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
            Shape::from_rows([[0, 1, 0], [0, 1, 1], [0, 0, 1]]),
            Shape::from_rows([[0, 0, 0], [0, 1, 1], [1, 1, 0]]),
            Shape::from_rows([[1, 0, 0], [1, 1, 0], [0, 1, 0]]),
        ],
        color: PieceColor::Green,
    },
    PieceDefinition {
        kind: PieceKind::T,
        rotations: &[
            Shape::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
            Shape::from_rows([[0, 1, 0], [0, 1, 1], [0, 1, 0]]),
            Shape::from_rows([[0, 0, 0], [1, 1, 1], [0, 1, 0]]),
            Shape::from_rows([[0, 1, 0], [1, 1, 0], [0, 1, 0]]),
        ],
        color: PieceColor::Purple,
    },
    PieceDefinition {
        kind: PieceKind::Z,
        rotations: &[
            Shape::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
            Shape::from_rows([[0, 0, 1], [0, 1, 1], [0, 1, 0]]),
            Shape::from_rows([[0, 0, 0], [1, 1, 0], [0, 1, 1]]),
            Shape::from_rows([[0, 1, 0], [1, 1, 0], [1, 0, 0]]),
        ],
        color: PieceColor::Red,
    },
];

/// Direction of a single-cell translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    Left,
    Right,
    Down,
}

/// Offset of a piece's bounding box origin within the field.
///
/// # Coordinate System
///
/// - (0, 0) is the top-left cell of the field
/// - X increases rightward (columns)
/// - Y increases downward (rows)
///
/// Coordinates are signed: a bounding box may hang past the left wall as
/// long as its occupied cells do not.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn moved(self, direction: Direction) -> Self {
        match direction {
            Direction::Left => self.shifted(-1, 0),
            Direction::Right => self.shifted(1, 0),
            Direction::Down => self.shifted(0, 1),
        }
    }
}

/// The active piece: kind, bounding box position and rotation index.
///
/// Pieces are immutable values; movement and rotation return new instances
/// and leave legality checks to the caller (see [`Field::is_colliding`]).
///
/// # Example
///
/// ```
/// use blockfall_engine::{Direction, FallingPiece, PieceKind, Position};
///
/// let piece = FallingPiece::spawn(PieceKind::T);
/// assert_eq!(piece.position(), Position::new(4, 0));
///
/// let moved = piece.moved(Direction::Left).rotated();
/// assert_eq!(moved.position(), Position::new(3, 0));
/// assert_eq!(moved.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPiece {
    kind: PieceKind,
    position: Position,
    rotation: usize,
}

impl FallingPiece {
    #[must_use]
    pub const fn new(kind: PieceKind, position: Position, rotation: usize) -> Self {
        Self {
            kind,
            position,
            rotation,
        }
    }

    /// Creates a piece at the spawn position: horizontally centered, top row,
    /// rotation 0.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn spawn(kind: PieceKind) -> Self {
        let half_width = kind.definition().spawn_width() / 2;
        let x = (FIELD_WIDTH / 2) as i32 - half_width as i32;
        Self::new(kind, Position::new(x, 0), 0)
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape(self.rotation)
    }

    /// Returns the field coordinates of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .occupied_offsets()
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub const fn moved(&self, direction: Direction) -> Self {
        Self::new(self.kind, self.position.moved(direction), self.rotation)
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32) -> Self {
        Self::new(self.kind, self.position.shifted(dx, 0), self.rotation)
    }

    /// Advances to the next rotation state, wrapping around the kind's table.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let rotation = (self.rotation + 1) % self.kind.definition().rotation_count();
        Self::new(self.kind, self.position, rotation)
    }

    /// Rotates with simple wall kicks.
    ///
    /// The next rotation state is tried at the current position, then shifted
    /// by each of [`WALL_KICK_OFFSETS`] in order. The first placement that
    /// does not collide is returned.
    ///
    /// This is **not** a Super Rotation System implementation: there are no
    /// per-piece or per-rotation kick tables, and no vertical kicks.
    ///
    /// # Returns
    ///
    /// The rotated piece, or `None` if every offset collides.
    #[must_use]
    pub fn rotated_with_kicks(&self, field: &Field) -> Option<Self> {
        let rotated = self.rotated();
        WALL_KICK_OFFSETS
            .iter()
            .map(|&dx| rotated.shifted(dx))
            .find(|candidate| !field.is_colliding(candidate))
    }
}
