//! Browser reload notification channel.
//!
//! A WebSocket listener on its own port (serve port + 1). Connected browsers
//! hold the socket open; after each successful rebuild the watcher calls
//! [`ReloadHub::broadcast_reload`] and every live client receives a `reload`
//! text message. Clients may connect at any time; dead clients are pruned on
//! the next broadcast.

use crate::log;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    thread,
};
use tungstenite::{Message, WebSocket};

/// Message pushed to browsers after a successful rebuild.
const RELOAD_MESSAGE: &str = "reload";

/// Shared set of connected browser clients plus the accept loop's port.
pub struct ReloadHub {
    clients: Mutex<Vec<WebSocket<TcpStream>>>,
    port: u16,
}

impl ReloadHub {
    /// Bind the notification listener and spawn its accept thread.
    ///
    /// Binding failures are fatal at startup; accept failures after that are
    /// logged and skipped so one broken handshake cannot kill the channel.
    pub fn bind(addr: SocketAddr) -> Result<Arc<Self>> {
        let listener = TcpListener::bind(addr)
            .with_context(|| format!("Failed to bind reload channel on {addr}"))?;
        let port = listener
            .local_addr()
            .context("Failed to query reload channel address")?
            .port();

        let hub = Arc::new(Self {
            clients: Mutex::new(Vec::new()),
            port,
        });

        let accept_hub = Arc::clone(&hub);
        thread::spawn(move || accept_loop(&listener, &accept_hub));

        Ok(hub)
    }

    /// Port the channel listens on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Number of currently connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Broadcast a reload message to all connected clients.
    ///
    /// Clients whose socket errors are dropped from the set.
    pub fn broadcast_reload(&self) {
        let mut clients = self.clients.lock();
        let before = clients.len();
        clients.retain_mut(|ws| ws.send(Message::text(RELOAD_MESSAGE)).is_ok());

        let after = clients.len();
        if after > 0 || before > after {
            log!("serve"; "reload sent to {after} client(s)");
        }
    }

    /// Snippet served inside generated HTML pages (directory listings) that
    /// connects to the channel and reloads on any message.
    pub fn client_script(port: u16) -> String {
        format!(
            r#"<script>new WebSocket("ws://" + location.hostname + ":{port}").onmessage = () => location.reload();</script>"#
        )
    }
}

fn accept_loop(listener: &TcpListener, hub: &Arc<ReloadHub>) {
    for stream in listener.incoming() {
        let Ok(stream) = stream else { continue };
        match tungstenite::accept(stream) {
            Ok(ws) => hub.clients.lock().push(ws),
            Err(err) => log!("serve"; "reload handshake failed: {err}"),
        }
    }
}
