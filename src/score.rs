use crate::board::{Marks, BOARD_SIZE};

/// Counts completed lines over a mark grid: 5 rows, 5 columns and the
/// two diagonals, for at most 12. Recomputed in full on every call so
/// the result only ever depends on the current grid.
pub fn count_lines(marks: &Marks) -> u8 {
  let rows = (0..BOARD_SIZE)
    .filter(|&row| (0..BOARD_SIZE).all(|col| marks[row][col]))
    .count();
  let cols = (0..BOARD_SIZE)
    .filter(|&col| (0..BOARD_SIZE).all(|row| marks[row][col]))
    .count();
  let main_diagonal = (0..BOARD_SIZE).all(|i| marks[i][i]) as usize;
  let anti_diagonal = (0..BOARD_SIZE).all(|i| marks[i][BOARD_SIZE - 1 - i]) as usize;

  (rows + cols + main_diagonal + anti_diagonal) as u8
}
