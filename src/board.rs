use rand::seq::SliceRandom;

pub const BOARD_SIZE: usize = 5;
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

pub type Grid = [[String; BOARD_SIZE]; BOARD_SIZE];
pub type Marks = [[bool; BOARD_SIZE]; BOARD_SIZE];

/// Deals a player's personal board: a fresh permutation of the room's
/// 25 prompts, laid out row-major. The source list is never mutated, so
/// every player shuffles an independent copy.
pub fn generate(items: &[String]) -> Grid {
  debug_assert_eq!(items.len(), BOARD_CELLS);

  let mut deck = items.to_vec();
  deck.shuffle(&mut rand::thread_rng());

  let mut cells = deck.into_iter();
  std::array::from_fn(|_| std::array::from_fn(|_| cells.next().unwrap_or_default()))
}
