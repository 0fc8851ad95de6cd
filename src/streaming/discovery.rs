// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! UDP discovery responder
//!
//! Embedded frame producers on the local network broadcast a probe string;
//! the responder answers with this host's IPv4 address so the producer can
//! find the ingest endpoint without manual configuration.

use anyhow::Result;
use std::net::{IpAddr, Ipv4Addr};
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Answers discovery probes with the local IPv4 address.
pub struct DiscoveryResponder {
    port: u16,
    probe: String,
}

impl DiscoveryResponder {
    pub fn new(port: u16, probe: &str) -> Self {
        Self {
            port,
            probe: probe.to_string(),
        }
    }

    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let socket = UdpSocket::bind(("0.0.0.0", self.port)).await?;
        socket.set_broadcast(true)?;

        info!("Discovery responder listening on udp/{}", self.port);

        let mut buf = [0u8; 256];
        loop {
            tokio::select! {
                recv = socket.recv_from(&mut buf) => {
                    match recv {
                        Ok((len, peer)) => {
                            let payload = String::from_utf8_lossy(&buf[..len]);
                            if payload.trim() == self.probe {
                                let reply = local_ipv4().to_string();
                                if let Err(e) = socket.send_to(reply.as_bytes(), peer).await {
                                    warn!("Discovery reply to {} failed: {}", peer, e);
                                } else {
                                    info!("Discovery probe from {}, replied with {}", peer, reply);
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Discovery receive error: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Discovery responder shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Best-effort local IPv4: the address a routed UDP socket binds to, falling
/// back to loopback when the host is offline. No packets are sent.
fn local_ipv4() -> Ipv4Addr {
    let probe = || -> std::io::Result<IpAddr> {
        let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip())
    };
    match probe() {
        Ok(IpAddr::V4(ip)) => ip,
        _ => Ipv4Addr::LOCALHOST,
    }
}
