use super::GameConfig;

/// Base score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously; the value is
/// multiplied by the level at the time of the lock:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const LINE_CLEAR_SCORES: [usize; 5] = [0, 40, 100, 300, 1200];

/// Outcome of recording one lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub score_gained: usize,
    pub leveled_up: bool,
}

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// Tracks various metrics during a game session:
///
/// - **Score**: `LINE_CLEAR_SCORES[n] * level` per lock clearing `n` lines
/// - **Level**: Starts at 1; rises by one when total lines reach
///   `level * lines_per_level`, up to `max_level`
/// - **Completed pieces**: Total number of pieces locked
/// - **Line clear distribution**: Count of single, double, triple, quad line clears
///
/// Score and level never decrease; only [`GameStats::reset`] brings them back.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    level: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    max_level: usize,
    lines_per_level: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a tracker at level 1 with the default level rules
    /// (10 lines per level, capped at level 20).
    #[must_use]
    pub const fn new() -> Self {
        Self::with_rules(20, 10)
    }

    #[must_use]
    pub const fn with_rules(max_level: usize, lines_per_level: usize) -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            max_level,
            lines_per_level,
        }
    }

    #[must_use]
    pub const fn from_config(config: &GameConfig) -> Self {
        Self::with_rules(config.max_level, config.lines_per_level)
    }

    /// Returns the current score.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn max_level(&self) -> usize {
        self.max_level
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the total number of lines cleared across all line clears.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of locks with 0 lines cleared
    /// - `[1]`: Number of singles (1 line)
    /// - `[2]`: Number of doubles (2 lines)
    /// - `[3]`: Number of triples (3 lines)
    /// - `[4]`: Number of quads (4 lines)
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Zeroes every counter and returns to level 1, keeping the level rules.
    pub const fn reset(&mut self) {
        *self = Self::with_rules(self.max_level, self.lines_per_level);
    }

    /// Updates statistics after a piece lock.
    ///
    /// A lock clearing no lines only counts the piece. Otherwise the score
    /// grows by the line-clear value times the current level, and the level
    /// rises by at most one step per call, however far the threshold is
    /// passed.
    ///
    /// # Arguments
    ///
    /// * `cleared_lines` - Number of lines cleared (0-4)
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> ScoreUpdate {
        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        if cleared_lines == 0 {
            return ScoreUpdate::default();
        }

        let base = LINE_CLEAR_SCORES[cleared_lines.min(LINE_CLEAR_SCORES.len() - 1)];
        let score_gained = base * self.level;
        self.score += score_gained;
        self.total_cleared_lines += cleared_lines;

        let leveled_up = self.total_cleared_lines >= self.level * self.lines_per_level
            && self.level < self.max_level;
        if leveled_up {
            self.level += 1;
        }
        ScoreUpdate {
            score_gained,
            leveled_up,
        }
    }
}
