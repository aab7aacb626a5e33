use blockfall_engine::{Cell, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of a piece in its spawn orientation, trimmed to its occupied rows.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<PieceKind>) -> Self {
        Self { piece, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Occupied cells of the spawn shape, relative to the bounding box of the
/// occupied cells, plus that box's size.
fn preview_cells(kind: PieceKind) -> (Vec<(u16, u16)>, (u16, u16)) {
    let offsets: Vec<_> = kind.shape(0).occupied_offsets().collect();
    let min_x = offsets.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = offsets.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let cells: Vec<_> = offsets
        .iter()
        .filter_map(|&(x, y)| Some((u16::try_from(x - min_x).ok()?, u16::try_from(y - min_y).ok()?)))
        .collect();
    let width = cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let height = cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
    (cells, (width, height))
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        CellDisplay::from_cell(Cell::Empty, false).render(area, buf);

        let Some(kind) = self.piece else {
            return;
        };
        let (cells, (width, height)) = preview_cells(kind);
        let piece_area = area.centered(
            Constraint::Length(width * CellDisplay::WIDTH),
            Constraint::Length(height * CellDisplay::HEIGHT),
        );
        let horizontal = Layout::horizontal((0..width).map(|_| Constraint::Length(CellDisplay::WIDTH)))
            .flex(Flex::Center);
        let vertical = Layout::vertical((0..height).map(|_| Constraint::Length(CellDisplay::HEIGHT)));
        let grid: Vec<Vec<Rect>> = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect();

        let occupied = CellDisplay::from_cell(Cell::Piece(kind), false);
        for (x, y) in cells {
            if let Some(grid_cell) = grid.get(usize::from(y)).and_then(|row| row.get(usize::from(x))) {
                Widget::render(&occupied, *grid_cell, buf);
            }
        }
    }
}
