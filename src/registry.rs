use std::collections::HashMap;

use log::info;
use rand::Rng;
use tokio::sync::RwLock;

use crate::board::BOARD_CELLS;
use crate::error::{Error, Result};
use crate::model::room::Room;
use crate::proto::RoomCreatedOutput;

const ROOM_CODE_LENGTH: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_ITEM_LENGTH: usize = 100;

/// Process-wide table of live rooms. Initialized empty, filled by
/// creation requests, torn down only with the process. Codes are not
/// checked for collisions; 36^6 ids make a repeat negligible at the
/// expected room count.
pub struct RoomRegistry {
  base_url: String,
  rooms: RwLock<HashMap<String, Room>>,
}

impl RoomRegistry {
  pub fn new(base_url: &str) -> Self {
    RoomRegistry {
      base_url: String::from(base_url.trim_end_matches('/')),
      rooms: Default::default(),
    }
  }

  /// Validates the newline-separated prompt list and opens a room.
  /// Blank lines are discarded and each prompt is capped at 100
  /// characters; anything other than exactly 25 surviving prompts is a
  /// validation failure and no room is created.
  pub async fn create(&self, title: &str, items_text: &str) -> Result<RoomCreatedOutput> {
    let items: Vec<String> = items_text
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(|line| truncate(line, MAX_ITEM_LENGTH))
      .collect();

    if items.len() != BOARD_CELLS {
      return Err(Error::Validation(format!(
        "a room needs exactly {} prompts, got {}",
        BOARD_CELLS,
        items.len()
      )));
    }

    let room = Room::new(room_code(), String::from(title.trim()), items);
    let output = RoomCreatedOutput::new(
      &room.id,
      self.join_url(&room.id),
      self.board_url(&room.id),
      &room.title,
    );

    info!("Created room {}", room.id);
    self.rooms.write().await.insert(room.id.clone(), room);

    Ok(output)
  }

  pub async fn with_room<F, T>(&self, room_id: &str, f: F) -> Option<T>
  where
    F: FnOnce(&Room) -> T,
  {
    self.rooms.read().await.get(room_id).map(f)
  }

  pub async fn with_room_mut<F, T>(&self, room_id: &str, f: F) -> Option<T>
  where
    F: FnOnce(&mut Room) -> T,
  {
    self.rooms.write().await.get_mut(room_id).map(f)
  }

  pub fn join_url(&self, room_id: &str) -> String {
    format!("{}/join/{}", self.base_url, room_id)
  }

  pub fn board_url(&self, room_id: &str) -> String {
    format!("{}/board/{}", self.base_url, room_id)
  }
}

fn room_code() -> String {
  let mut rng = rand::thread_rng();
  (0..ROOM_CODE_LENGTH)
    .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
    .collect()
}

fn truncate(value: &str, max_chars: usize) -> String {
  value.chars().take(max_chars).collect()
}
