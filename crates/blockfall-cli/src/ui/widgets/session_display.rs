use blockfall_engine::{SessionState, Snapshot};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Full game screen: stats on the left, the board in the middle and the
/// next-piece preview on the right, with a banner over the board whenever
/// the game is not running.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }
}

fn border_color(state: SessionState) -> Color {
    match state {
        SessionState::Idle => color::GRAY,
        SessionState::Running => color::WHITE,
        SessionState::Paused => color::YELLOW,
        SessionState::GameOver => color::RED,
    }
}

fn banner(state: SessionState) -> Option<(&'static str, Style)> {
    match state {
        SessionState::Running => None,
        SessionState::Idle => Some(("PRESS S TO START", Style::new().fg(color::BLACK).bg(color::WHITE))),
        SessionState::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
        SessionState::GameOver => Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED))),
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.snapshot.state();
        let border_style = border_color(state);
        let padded = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::symmetric(1, 0))
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let board = BoardDisplay::new(self.snapshot.board())
            .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
        let next_panel = PieceDisplay::new()
            .piece(self.snapshot.next_piece())
            .block(padded("NEXT"));
        let stats = StatsDisplay::new(self.snapshot.stats()).block(padded("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let board_width = board.width();
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some((text, style)) = banner(state) {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
