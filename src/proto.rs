use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{Grid, Marks};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Input {

  #[serde(rename = "join")] // { 'join': { 'roomId': 'AB12CD', 'name': 'alice' } }
  Join(JoinInput),

  #[serde(rename = "toggle")]
  Toggle(ToggleInput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInput {
  pub room_id: String,
  pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleInput {
  pub row: usize,
  pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomInput {
  pub title: String,
  pub items: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Output {

  #[serde(rename = "error")]
  Error(OutputError),

  #[serde(rename = "alive")]
  Alive,

  #[serde(rename = "board")]
  Board(BoardOutput),

  #[serde(rename = "leaderboard")]
  Leaderboard(LeaderboardOutput),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum OutputError {

  #[serde(rename = "room-not-found")]
  RoomNotFound,

  #[serde(rename = "not-joined")]
  NotJoined,
}

#[derive(Debug, Clone)]
pub struct InputParcel {
  pub client_id: Uuid,
  pub input: Input,
}

impl InputParcel {
  pub fn new(client_id: Uuid, input: Input) -> Self {
    InputParcel { client_id, input }
  }
}

#[derive(Debug, Clone)]
pub struct OutputParcel {
  pub client_id: Uuid,
  pub output: Output,
}

impl OutputParcel {
  pub fn new(client_id: Uuid, output: Output) -> Self {
    OutputParcel { client_id, output }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedOutput {
  pub room_id: String,
  pub join_url: String,
  pub board_url: String,
  pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomError {
  pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOutput {
  pub title: String,
  pub name: String,
  pub board: Grid,
  pub marks: Marks,
  pub line_count: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
  pub name: String,
  pub line_count: u8,
  pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardOutput {
  pub players: Vec<LeaderboardEntry>,
  pub timestamp: DateTime<Utc>,
}

impl RoomCreatedOutput {
  pub fn new(room_id: &str, join_url: String, board_url: String, title: &str) -> Self {
    RoomCreatedOutput {
      room_id: String::from(room_id),
      join_url,
      board_url,
      title: String::from(title),
    }
  }
}

impl CreateRoomError {
  pub fn new(error: String) -> Self {
    CreateRoomError { error }
  }
}

impl BoardOutput {
  pub fn new(title: &str, name: &str, board: Grid, marks: Marks, line_count: u8) -> Self {
    BoardOutput {
      title: String::from(title),
      name: String::from(name),
      board,
      marks,
      line_count,
    }
  }
}

impl LeaderboardEntry {
  pub fn new(name: &str, line_count: u8, joined_at: DateTime<Utc>) -> Self {
    LeaderboardEntry {
      name: String::from(name),
      line_count,
      joined_at,
    }
  }
}

impl LeaderboardOutput {
  pub fn new(players: Vec<LeaderboardEntry>, timestamp: DateTime<Utc>) -> Self {
    LeaderboardOutput { players, timestamp }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_input_decodes_from_tagged_json() {
    let input: Input =
      serde_json::from_str(r#"{"type":"join","payload":{"roomId":"AB12CD","name":"alice"}}"#)
        .unwrap();
    assert_eq!(
      input,
      Input::Join(JoinInput {
        room_id: String::from("AB12CD"),
        name: String::from("alice"),
      })
    );
  }

  #[test]
  fn toggle_input_decodes_from_tagged_json() {
    let input: Input =
      serde_json::from_str(r#"{"type":"toggle","payload":{"row":1,"col":4}}"#).unwrap();
    assert_eq!(input, Input::Toggle(ToggleInput { row: 1, col: 4 }));
  }

  #[test]
  fn error_output_encodes_its_code() {
    let json = serde_json::to_string(&Output::Error(OutputError::RoomNotFound)).unwrap();
    assert_eq!(json, r#"{"type":"error","payload":{"code":"room-not-found"}}"#);
  }

  #[test]
  fn leaderboard_output_uses_camel_case_fields() {
    let output = Output::Leaderboard(LeaderboardOutput::new(
      vec![LeaderboardEntry::new("alice", 3, Utc::now())],
      Utc::now(),
    ));
    let json = serde_json::to_string(&output).unwrap();
    assert!(json.contains(r#""type":"leaderboard""#));
    assert!(json.contains(r#""lineCount":3"#));
    assert!(json.contains(r#""joinedAt""#));
  }
}
