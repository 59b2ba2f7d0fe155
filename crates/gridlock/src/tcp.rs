//! Peer channel over TCP: one JSON message per line.
//!
//! The joiner opens with its session code on a line of its own; the host
//! answers `OK` on a match and drops the connection otherwise.

use crate::event::Event;
use gridlock_session::{ChannelEvent, Message, SessionCode, Transport, TransportError};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

const ACK: &str = "OK";
const HANDSHAKE_LIMIT: usize = 32;

/// Outbound half of a TCP peer link. Inbound traffic and lifecycle changes
/// arrive on the event channel given at construction.
#[derive(Debug)]
pub struct TcpTransport {
    outgoing: mpsc::UnboundedSender<String>,
    open: Arc<AtomicBool>,
}

impl Transport for TcpTransport {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn send(&mut self, message: &Message) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::new("link is not open"));
        }
        let raw = message
            .encode()
            .map_err(|e| TransportError::new(e.to_string()))?;
        self.outgoing
            .send(raw)
            .map_err(|_| TransportError::new("link writer has stopped"))
    }

    fn close(&mut self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

/// Binds the host's listening socket.
pub async fn listen(addr: impl ToSocketAddrs) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening for a peer");
    Ok(listener)
}

/// Waits on `listener` for a peer presenting `code`.
pub fn host(
    listener: TcpListener,
    code: SessionCode,
    events: mpsc::UnboundedSender<Event>,
) -> TcpTransport {
    spawn_link(accept_peer(listener, code), events)
}

/// Connects to a host and presents `code`.
pub fn join(addr: String, code: SessionCode, events: mpsc::UnboundedSender<Event>) -> TcpTransport {
    spawn_link(dial_host(addr, code), events)
}

fn spawn_link<F>(connect: F, events: mpsc::UnboundedSender<Event>) -> TcpTransport
where
    F: Future<Output = io::Result<TcpStream>> + Send + 'static,
{
    let (outgoing, rx) = mpsc::unbounded_channel();
    let open = Arc::new(AtomicBool::new(false));
    tokio::spawn(drive(connect, rx, Arc::clone(&open), events));
    TcpTransport { outgoing, open }
}

fn notify(events: &mpsc::UnboundedSender<Event>, event: ChannelEvent) {
    if events.send(Event::Channel(event)).is_err() {
        debug!("Dispatch loop gone, dropping channel event");
    }
}

async fn drive<F>(
    connect: F,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    open: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<Event>,
) where
    F: Future<Output = io::Result<TcpStream>>,
{
    let stream = match connect.await {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "Peer connection failed");
            notify(&events, ChannelEvent::Error(e.to_string()));
            return;
        }
    };

    let (read, mut write) = stream.into_split();
    open.store(true, Ordering::SeqCst);
    notify(&events, ChannelEvent::Open);

    let writer = tokio::spawn(async move {
        while let Some(mut line) = outgoing.recv().await {
            line.push('\n');
            if let Err(e) = write.write_all(line.as_bytes()).await {
                warn!(error = %e, "Peer write failed");
                break;
            }
        }
    });

    let mut lines = BufReader::new(read).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => notify(&events, ChannelEvent::Data(line)),
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Peer read failed");
                notify(&events, ChannelEvent::Error(e.to_string()));
                break;
            }
        }
    }

    open.store(false, Ordering::SeqCst);
    writer.abort();
    info!("Peer link closed");
    notify(&events, ChannelEvent::Close);
}

#[instrument(skip(listener, code))]
async fn accept_peer(listener: TcpListener, code: SessionCode) -> io::Result<TcpStream> {
    loop {
        let (mut stream, peer) = listener.accept().await?;
        let offered = match read_handshake(&mut stream).await {
            Ok(line) => line,
            Err(e) => {
                warn!(%peer, error = %e, "Handshake failed");
                continue;
            }
        };
        match SessionCode::parse(&offered) {
            Ok(offered) if offered == code => {
                stream.write_all(format!("{ACK}\n").as_bytes()).await?;
                info!(%peer, "Peer joined");
                return Ok(stream);
            }
            _ => warn!(%peer, "Rejected peer with wrong session code"),
        }
    }
}

#[instrument(skip(code))]
async fn dial_host(addr: String, code: SessionCode) -> io::Result<TcpStream> {
    let mut stream = TcpStream::connect(&addr).await?;
    stream.write_all(format!("{code}\n").as_bytes()).await?;
    let reply = read_handshake(&mut stream).await?;
    if reply.trim() != ACK {
        return Err(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "host rejected the session code",
        ));
    }
    info!("Joined host");
    Ok(stream)
}

/// Reads one handshake line byte by byte so nothing after it is consumed.
async fn read_handshake(stream: &mut TcpStream) -> io::Result<String> {
    let mut bytes = Vec::new();
    loop {
        let byte = stream.read_u8().await?;
        if byte == b'\n' {
            break;
        }
        bytes.push(byte);
        if bytes.len() > HANDSHAKE_LIMIT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "handshake line too long",
            ));
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
