use crossterm::event::KeyCode;

use crate::{
    error::Result,
    maze::{Coord, Direction},
    session::Session,
};

pub const EDIT_HELP: &str =
    "Arrows: move  1: start  2: end  w: wall  e: empty board  Space: step  Enter: animate  m/Esc: done";

/// Keyboard cursor for designing a board by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Editor {
    cursor: Coord,
}

impl Editor {
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Apply an edit key to the session.
    /// Returns `None` for keys the editor does not handle, otherwise the status
    /// message or the error the edit produced.
    pub fn handle_key(&mut self, session: &mut Session, code: KeyCode) -> Option<Result<String>> {
        let direction = match code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = direction {
            // Moves off the board leave the cursor where it is
            if let Some(next) = direction.offset(self.cursor, 1, session.grid()) {
                self.cursor = next;
            }
            return Some(Ok(self.describe(session)));
        }

        let cursor = self.cursor;
        let result = match code {
            KeyCode::Char('1') => session
                .set_start(cursor)
                .map(|()| format!("Start set at {:?}", cursor)),
            KeyCode::Char('2') => session
                .set_end(cursor)
                .map(|()| format!("End set at {:?}", cursor)),
            KeyCode::Char('w') => session
                .toggle_wall(cursor)
                .map(|state| format!("{:?} is now {:?}", cursor, state)),
            KeyCode::Char('e') => session
                .clear_board()
                .map(|()| "Board emptied. Place a start and an end.".to_string()),
            _ => return None,
        };
        Some(result)
    }

    /// Cursor position and the state of the cell under it.
    pub fn describe(&self, session: &Session) -> String {
        format!(
            "Editing {:?}: {:?}",
            self.cursor,
            session.grid()[self.cursor]
        )
    }
}
