//! UDP datagram adapter.
//!
//! Implements [`DatagramPort`] over a non-blocking `std::net::UdpSocket`.
//! ESP-IDF provides the std socket API through lwIP, so the same code runs
//! on the device and on the host.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use log::info;

use crate::app::ports::{DatagramPort, LinkError};

pub struct UdpDatagramSocket {
    socket: UdpSocket,
}

impl UdpDatagramSocket {
    /// Bind on all interfaces at `port` (0 picks an ephemeral port).
    pub fn bind(port: u16) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))
            .map_err(|_| LinkError::SocketFailed)?;
        socket
            .set_nonblocking(true)
            .map_err(|_| LinkError::SocketFailed)?;
        info!("UDP: bound {:?}", socket.local_addr().ok());
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok()
    }
}

impl DatagramPort for UdpDatagramSocket {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, LinkError> {
        match self.socket.recv_from(buf) {
            Ok(received) => Ok(Some(received)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(_) => Err(LinkError::RecvFailed),
        }
    }

    fn send(&mut self, peer: SocketAddr, data: &[u8]) -> Result<(), LinkError> {
        match self.socket.send_to(data, peer) {
            Ok(n) if n == data.len() => Ok(()),
            _ => Err(LinkError::SendFailed),
        }
    }
}
