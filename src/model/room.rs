use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::player::Player;

/// One live bingo session. `items` is fixed at creation and always
/// holds exactly 25 prompts; players come and go with their
/// connections.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
  pub id: String,
  pub title: String,
  pub items: Vec<String>,
  pub created_at: DateTime<Utc>,
  pub players: HashMap<Uuid, Player>,
}

impl Room {
  pub fn new(id: String, title: String, items: Vec<String>) -> Self {
    Room {
      id,
      title,
      items,
      created_at: Utc::now(),
      players: HashMap::new(),
    }
  }
}
