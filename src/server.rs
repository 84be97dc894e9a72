use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Duration;
use tokio_stream::wrappers::{BroadcastStream, UnboundedReceiverStream};
use warp::http::StatusCode;
use warp::ws::WebSocket;
use warp::Filter;

use crate::client::Client;
use crate::error::Error;
use crate::hub::{Hub, HubOptions};
use crate::proto::{CreateRoomError, CreateRoomInput, InputParcel};
use crate::registry::RoomRegistry;

pub struct Server {
  port: u16,
  registry: Arc<RoomRegistry>,
  hub: Arc<Hub>,
}

impl Server {
  pub fn new(port: u16, base_url: &str) -> Self {
    let registry = Arc::new(RoomRegistry::new(base_url));
    Server {
      port,
      hub: Arc::new(Hub::new(
        HubOptions {
          alive_interval: Some(Duration::from_secs(5)),
        },
        registry.clone(),
      )),
      registry,
    }
  }

  pub async fn run(&self) {
    let (input_sender, input_receiver) = mpsc::unbounded_channel::<InputParcel>();

    let registry = self.registry.clone();
    let create_room = warp::path!("rooms")
      .and(warp::post())
      .and(warp::body::json())
      .and(warp::any().map(move || registry.clone()))
      .and_then(Self::create_room);

    let hub = self.hub.clone();
    let socket = warp::path!("ws")
      .and(warp::ws())
      .and(warp::any().map(move || input_sender.clone()))
      .and(warp::any().map(move || hub.clone()))
      .map(
        move |ws: warp::ws::Ws, input_sender: UnboundedSender<InputParcel>, hub: Arc<Hub>| {
          ws.on_upgrade(move |web_socket| async move {
            tokio::spawn(Self::process_client(hub, web_socket, input_sender));
          })
        },
      );

    let shutdown = async {
      tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C signal handler");
    };

    let routes = create_room.or(socket);
    let (_, serving) =
      warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], self.port), shutdown);
    let running_hub = self.hub.run(input_receiver);

    tokio::select! {
      _ = serving => {},
      _ = running_hub => {},
    }
  }

  async fn create_room(
    input: CreateRoomInput,
    registry: Arc<RoomRegistry>,
  ) -> Result<impl warp::Reply, warp::Rejection> {
    match registry.create(&input.title, &input.items).await {
      Ok(created) => Ok(warp::reply::with_status(
        warp::reply::json(&created),
        StatusCode::CREATED,
      )),
      Err(err) => Ok(warp::reply::with_status(
        warp::reply::json(&CreateRoomError::new(err.to_string())),
        StatusCode::BAD_REQUEST,
      )),
    }
  }

  async fn process_client(
    hub: Arc<Hub>,
    web_socket: WebSocket,
    input_sender: UnboundedSender<InputParcel>,
  ) {
    let output_receiver = hub.subscribe();
    let (ws_sink, ws_stream) = web_socket.split();
    let client = Client::new();

    hub.on_connect(client.id).await;
    info!("Client {} connected", client.id);

    let reading = client
      .read_input(ws_stream)
      .try_for_each(|input_parcel| async {
        input_sender
          .send(input_parcel)
          .map_err(|err| Error::System(err.to_string()))
      });

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(UnboundedReceiverStream::new(rx).forward(ws_sink));

    let writing = client
      .write_output(BroadcastStream::new(output_receiver))
      .try_for_each(|message| async {
        tx.send(Ok(message)).map_err(|err| Error::System(err.to_string()))
      });

    if let Err(err) = tokio::select! {
      result = reading => result,
      result = writing => result,
    } {
      error!("Client connection error: {}", err);
    }

    hub.on_disconnect(client.id).await;
    info!("Client {} disconnected", client.id);
  }
}
