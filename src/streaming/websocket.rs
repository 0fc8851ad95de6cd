// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! WebSocket server for real-time observer fan-out
//!
//! Every connected dashboard receives the same telemetry/event stream from
//! the shared pipeline. The only inbound command is `update_background`,
//! which schedules a background capture on the next frame.

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, RwLock};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::core::{EventBus, Pipeline, WireMessage};

/// Inbound command that schedules a background capture.
const CMD_UPDATE_BACKGROUND: &str = "update_background";

/// WebSocket server
pub struct WebSocketServer {
    port: u16,
    max_clients: usize,
    clients: Arc<RwLock<HashMap<String, SocketAddr>>>,
    bus: Arc<EventBus>,
    pipeline: Arc<Pipeline>,
}

impl WebSocketServer {
    pub fn new(port: u16, max_clients: usize, bus: Arc<EventBus>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            port,
            max_clients,
            clients: Arc::new(RwLock::new(HashMap::new())),
            bus,
            pipeline,
        }
    }

    pub async fn start(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("WebSocket server listening on ws://{}", addr);

        let clients = self.clients.clone();
        let max_clients = self.max_clients;
        let bus = self.bus.clone();
        let pipeline = self.pipeline.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accept_result = listener.accept() => {
                        match accept_result {
                            Ok((stream, addr)) => {
                                let client_count = clients.read().await.len();
                                if client_count >= max_clients {
                                    warn!("Max clients reached, rejecting connection from {}", addr);
                                    continue;
                                }

                                let clients = clients.clone();
                                let wire_rx = bus.subscribe();
                                let pipeline = pipeline.clone();

                                tokio::spawn(handle_connection(stream, addr, clients, wire_rx, pipeline));
                            }
                            Err(e) => {
                                error!("Accept error: {}", e);
                            }
                        }
                    }
                    _ = shutdown.recv() => {
                        info!("WebSocket server shutting down");
                        break;
                    }
                }
            }
        });

        Ok(())
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    clients: Arc<RwLock<HashMap<String, SocketAddr>>>,
    mut wire_rx: broadcast::Receiver<WireMessage>,
    pipeline: Arc<Pipeline>,
) {
    let client_id = uuid::Uuid::new_v4().to_string();

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("WebSocket handshake failed for {}: {}", addr, e);
            return;
        }
    };

    info!("Observer connected from {} (id: {})", addr, client_id);

    {
        let mut clients = clients.write().await;
        clients.insert(client_id.clone(), addr);
    }

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        tokio::select! {
            // Incoming commands from the observer
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if text.trim() == CMD_UPDATE_BACKGROUND {
                            info!("Background capture requested by {}", addr);
                            pipeline.request_background_capture();
                        } else {
                            debug!("Ignoring unknown command from {}: {}", addr, text);
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("WebSocket closed by client {}", addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sender.send(Message::Pong(data)).await;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", addr, e);
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }

            // Outgoing fan-out from the pipeline
            msg = wire_rx.recv() => {
                match msg {
                    Ok(wire) => {
                        let json = match serde_json::to_string(&wire) {
                            Ok(json) => json,
                            Err(e) => {
                                error!("Failed to serialize wire message: {}", e);
                                continue;
                            }
                        };
                        if let Err(e) = ws_sender.send(Message::Text(json.into())).await {
                            warn!("Failed to send to {}: {}", addr, e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow observer: it loses frames, nobody else does.
                        warn!("Observer {} lagged, skipped {} messages", addr, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    {
        let mut clients = clients.write().await;
        clients.remove(&client_id);
    }

    info!("Observer {} disconnected", addr);
}
