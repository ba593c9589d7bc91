use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};

use crate::dispatcher::StandardDispatcher;
use crate::errors::OscError;
use crate::message::{Argument, Message};
use crate::packet::Packet;

/// Largest datagram the receive loop will accept.
const MAX_DATAGRAM_SIZE: usize = 65535;

/// A UDP endpoint that sends and receives OSC packets over one socket.
///
/// A node is both client and server: `send_to` works at any time, and
/// `listen_and_serve` runs a receive loop that hands every decoded packet
/// to a dispatcher. Wrap the node in an `Arc` to drive the loop from one
/// thread and `close` it from another.
pub struct Node {
    socket: UdpSocket,
    running: AtomicBool,
}

impl Node {
    /// Bind to the given local address (`"0.0.0.0:0"` picks an ephemeral
    /// port).
    pub fn bind(local_addr: &str) -> Result<Node, OscError> {
        let socket = UdpSocket::bind(local_addr)?;
        Ok(Node {
            socket,
            running: AtomicBool::new(false),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, OscError> {
        Ok(self.socket.local_addr()?)
    }

    /// Bound each blocking read in `listen_and_serve`. Without a timeout a
    /// read blocks until a datagram or `close` arrives.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), OscError> {
        self.socket.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Encode and send one packet.
    pub fn send_to<A: ToSocketAddrs>(&self, addr: A, packet: &Packet) -> Result<(), OscError> {
        let data = packet.encode();
        self.socket.send_to(&data, addr)?;
        debug!("sent {} byte packet", data.len());
        Ok(())
    }

    /// Build a message from `path` plus `args` and send it.
    pub fn send_msg_to<A: ToSocketAddrs>(
        &self,
        addr: A,
        path: &str,
        args: impl IntoIterator<Item = Argument>,
    ) -> Result<(), OscError> {
        let mut msg = Message::new(path);
        msg.arguments.extend(args);
        self.send_to(addr, &Packet::Message(msg))
    }

    /// Receive datagrams and hand every decoded packet to `dispatcher`,
    /// together with the sender's address, until `close` is called or the
    /// transport fails.
    ///
    /// A datagram that fails to decode is logged and skipped; one bad peer
    /// does not take the server down. A dispatch error ends the loop and is
    /// returned. Ending the loop via `close` returns `Ok(())`.
    pub fn listen_and_serve(&self, dispatcher: &StandardDispatcher) -> Result<(), OscError> {
        self.running.store(true, Ordering::SeqCst);
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        loop {
            let (len, sender) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(err) => {
                    if !self.running.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                    match err.kind() {
                        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
                            continue;
                        }
                        _ => return Err(err.into()),
                    }
                }
            };
            if !self.running.load(Ordering::SeqCst) {
                return Ok(());
            }
            let packet = match Packet::decode(&buf[..len]) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!("dropping undecodable {len}-byte datagram from {sender}: {err}");
                    continue;
                }
            };
            dispatcher.dispatch(&packet, Some(sender))?;
        }
    }

    /// Stop a concurrent `listen_and_serve` loop. The loop exits with
    /// `Ok(())`; closing is a shutdown signal, not a transport error.
    pub fn close(&self) -> Result<(), OscError> {
        self.running.store(false, Ordering::SeqCst);
        // A blocked recv only notices the flag once something arrives, so
        // poke our own port with an empty datagram.
        let port = self.socket.local_addr()?.port();
        let wake = UdpSocket::bind(("127.0.0.1", 0))?;
        wake.send_to(&[], ("127.0.0.1", port))?;
        Ok(())
    }
}
