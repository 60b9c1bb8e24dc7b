use crossterm::style::{Color, Stylize};

use std::fmt;

/// The display/search state of a single grid cell.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// An open cell.
    #[default]
    Path,
    /// A blocking cell. The only state a solver cannot enter.
    Wall,
    /// The starting cell of the maze.
    Start,
    /// The target cell of the maze.
    End,
    /// A cell touched by the exploration replay.
    Visited,
    /// A cell on the replayed solution path.
    Solution,
}

impl CellState {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    /// Everything except a wall can be walked through, including cells already
    /// marked by a previous replay.
    pub fn is_traversable(self) -> bool {
        self != CellState::Wall
    }

    /// Cells that playback marks and `reset` restores to `Path`.
    pub fn is_replay_mark(self) -> bool {
        matches!(self, CellState::Visited | CellState::Solution)
    }

    /// Plain-text symbol used by layouts and the unstyled grid dump.
    pub fn symbol(self) -> char {
        match self {
            CellState::Path => '.',
            CellState::Wall => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Visited => 'o',
            CellState::Solution => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | ' ' => Some(CellState::Path),
            '#' => Some(CellState::Wall),
            'S' => Some(CellState::Start),
            'E' => Some(CellState::End),
            'o' => Some(CellState::Visited),
            '*' => Some(CellState::Solution),
            _ => None,
        }
    }
}

/// Styled two-column glyph for the terminal renderer.
impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            CellState::Path => "  ".with(Color::Reset),
            CellState::Wall => "⬜".with(Color::White),
            CellState::Start => "🟩".with(Color::Green),
            CellState::End => "🟥".with(Color::Red),
            CellState::Visited => "· ".with(Color::Blue),
            CellState::Solution => "🟨".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            debug_assert_eq!(
                styled_symbol.content().width(),
                CellState::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_walls_block() {
        assert!(!CellState::Wall.is_traversable());
        for state in [
            CellState::Path,
            CellState::Start,
            CellState::End,
            CellState::Visited,
            CellState::Solution,
        ] {
            assert!(state.is_traversable(), "{state:?} should be traversable");
        }
    }

    #[test]
    fn test_symbols_are_reversible() {
        for state in [
            CellState::Path,
            CellState::Wall,
            CellState::Start,
            CellState::End,
            CellState::Visited,
            CellState::Solution,
        ] {
            assert_eq!(CellState::from_symbol(state.symbol()), Some(state));
        }
        assert_eq!(CellState::from_symbol('x'), None);
    }
}
