use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::board::{Grid, Marks};
use crate::score;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
  pub id: Uuid,
  pub name: String,
  pub board: Grid,
  pub marks: Marks,
  pub line_count: u8,
  pub joined_at: DateTime<Utc>,
}

impl Player {
  pub fn new(id: Uuid, name: &str, board: Grid) -> Self {
    let marks = Marks::default();
    Player {
      id,
      name: String::from(name),
      board,
      line_count: score::count_lines(&marks),
      marks,
      joined_at: Utc::now(),
    }
  }

  /// Flips one cell and refreshes the cached line count in the same
  /// call, so the cache can never drift from the marks.
  pub fn mark(&mut self, row: usize, col: usize) {
    self.marks[row][col] = !self.marks[row][col];
    self.line_count = score::count_lines(&self.marks);
  }
}
