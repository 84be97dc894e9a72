use std::cmp;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::{future, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{self, Duration};
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::board::{self, BOARD_SIZE};
use crate::model::player::Player;
use crate::proto::*;
use crate::registry::RoomRegistry;

const OUTPUT_CHANNEL_SIZE: usize = 1024;
const MAX_NAME_LENGTH: usize = 40;
const DEFAULT_NAME: &str = "anonymous";

#[derive(Clone, Copy, Default)]
pub struct HubOptions {
  pub alive_interval: Option<Duration>,
}

/// Where a connection stands in its lifecycle. `Disconnected` is
/// terminal; a later join from the same person is a brand-new session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
  Unjoined,
  Joined(String),
  Disconnected,
}

/// Mediates every join/toggle/disconnect against the room registry and
/// fans results back out over one broadcast channel. All inbound
/// parcels are drained by a single `run` task, so room mutations are
/// processed strictly in arrival order.
pub struct Hub {
  alive_interval: Option<Duration>,
  output_sender: broadcast::Sender<OutputParcel>,
  registry: Arc<RoomRegistry>,
  sessions: RwLock<HashMap<Uuid, SessionState>>,
}

impl Hub {
  pub fn new(options: HubOptions, registry: Arc<RoomRegistry>) -> Self {
    let (output_sender, _) = broadcast::channel(OUTPUT_CHANNEL_SIZE);
    Hub {
      alive_interval: options.alive_interval,
      output_sender,
      registry,
      sessions: Default::default(),
    }
  }

  fn send_targeted(&self, client_id: Uuid, output: Output) {
    if self.output_sender.receiver_count() > 0 {
      self.output_sender.send(OutputParcel::new(client_id, output)).ok();
    }
  }

  fn send_error(&self, client_id: Uuid, error: OutputError) {
    self.send_targeted(client_id, Output::Error(error));
  }

  async fn send_alive(&self) {
    if self.output_sender.receiver_count() == 0 {
      return;
    }

    self
      .sessions
      .read()
      .await
      .iter()
      .filter(|(_, state)| **state != SessionState::Disconnected)
      .for_each(|(client_id, _)| {
        self.send_targeted(*client_id, Output::Alive);
      });
  }

  pub fn subscribe(&self) -> broadcast::Receiver<OutputParcel> {
    self.output_sender.subscribe()
  }

  pub async fn on_connect(&self, client_id: Uuid) {
    self
      .sessions
      .write()
      .await
      .insert(client_id, SessionState::Unjoined);
  }

  pub async fn on_disconnect(&self, client_id: Uuid) {
    let previous = self
      .sessions
      .write()
      .await
      .insert(client_id, SessionState::Disconnected);

    if let Some(SessionState::Joined(room_id)) = previous {
      let removed = self
        .registry
        .with_room_mut(&room_id, |room| room.players.remove(&client_id).is_some())
        .await;

      if removed == Some(true) {
        info!("Client {} left room {}", client_id, room_id);
        self.publish_leaderboard(&room_id).await;
      }
    }
  }

  async fn tick_alive(&self) {
    let alive_interval = match self.alive_interval {
      Some(alive_interval) => alive_interval,
      // no keep-alive configured, park this branch of the select
      None => future::pending().await,
    };

    loop {
      time::sleep(alive_interval).await;
      self.send_alive().await;
    }
  }

  pub async fn run(&self, receiver: UnboundedReceiver<InputParcel>) {
    let ticking_alive = self.tick_alive();
    let processing =
      UnboundedReceiverStream::new(receiver).for_each(|input_parcel| self.process(input_parcel));

    tokio::select! {
      _ = ticking_alive => {},
      _ = processing => {},
    }
  }

  pub async fn process(&self, input_parcel: InputParcel) {
    match input_parcel.input {
      Input::Join(input) => self.process_join(input_parcel.client_id, input).await,
      Input::Toggle(input) => self.process_toggle(input_parcel.client_id, input).await,
    }
  }

  async fn process_join(&self, client_id: Uuid, input: JoinInput) {
    // join is only valid before the session has settled on a room
    match self.sessions.read().await.get(&client_id) {
      None | Some(SessionState::Unjoined) => {}
      Some(state) => {
        warn!("Client {} sent join while {:?}", client_id, state);
        return;
      }
    }

    let room_id = input.room_id.trim().to_uppercase();
    let name = sanitize_name(&input.name);

    let joined = self
      .registry
      .with_room_mut(&room_id, |room| {
        let player = Player::new(client_id, &name, board::generate(&room.items));
        let output = BoardOutput::new(
          &room.title,
          &player.name,
          player.board.clone(),
          player.marks,
          player.line_count,
        );
        room.players.insert(client_id, player);
        output
      })
      .await;

    let output = match joined {
      Some(output) => output,
      None => {
        self.send_error(client_id, OutputError::RoomNotFound);
        return;
      }
    };

    self
      .sessions
      .write()
      .await
      .insert(client_id, SessionState::Joined(room_id.clone()));
    info!("Client {} joined room {}", client_id, room_id);

    self.send_targeted(client_id, Output::Board(output));
    self.publish_leaderboard(&room_id).await;
  }

  async fn process_toggle(&self, client_id: Uuid, input: ToggleInput) {
    let room_id = match self.sessions.read().await.get(&client_id) {
      Some(SessionState::Joined(room_id)) => room_id.clone(),
      // a toggle still queued behind a disconnect is a benign race
      Some(SessionState::Disconnected) => return,
      _ => {
        self.send_error(client_id, OutputError::NotJoined);
        return;
      }
    };

    if input.row >= BOARD_SIZE || input.col >= BOARD_SIZE {
      // coordinates come from our own board page, drop strays quietly
      debug!(
        "Client {} sent out-of-range toggle ({}, {})",
        client_id, input.row, input.col
      );
      return;
    }

    let toggled = self
      .registry
      .with_room_mut(&room_id, |room| {
        let title = room.title.clone();
        room.players.get_mut(&client_id).map(|player| {
          player.mark(input.row, input.col);
          BoardOutput::new(
            &title,
            &player.name,
            player.board.clone(),
            player.marks,
            player.line_count,
          )
        })
      })
      .await
      .flatten();

    if let Some(output) = toggled {
      self.send_targeted(client_id, Output::Board(output));
      self.publish_leaderboard(&room_id).await;
    }
  }

  /// Ranks the room's players by line count, earlier joiners winning
  /// ties, and pushes the full list to every player of the room. A
  /// room that vanished mid-call is a no-op.
  pub async fn publish_leaderboard(&self, room_id: &str) {
    let ranking = self
      .registry
      .with_room(room_id, |room| {
        let mut entries: Vec<LeaderboardEntry> = room
          .players
          .values()
          .map(|player| LeaderboardEntry::new(&player.name, player.line_count, player.joined_at))
          .collect();
        entries.sort_by_key(|entry| (cmp::Reverse(entry.line_count), entry.joined_at));

        let recipients: Vec<Uuid> = room.players.keys().copied().collect();
        (entries, recipients)
      })
      .await;

    let (entries, recipients) = match ranking {
      Some(ranking) => ranking,
      None => return,
    };

    let output = Output::Leaderboard(LeaderboardOutput::new(entries, Utc::now()));
    for client_id in recipients {
      self.send_targeted(client_id, output.clone());
    }
  }
}

fn sanitize_name(name: &str) -> String {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return String::from(DEFAULT_NAME);
  }
  trimmed.chars().take(MAX_NAME_LENGTH).collect()
}
