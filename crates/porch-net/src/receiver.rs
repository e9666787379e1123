use crate::{FrameAssembler, NetError, TransportConfig};
use std::net::SocketAddr;
use tokio::net::{ToSocketAddrs, UdpSocket};

// Largest possible UDP payload; peers may use a bigger max_datagram than ours
const RECV_BUF_LEN: usize = 64 * 1024;

/// Receives chunked datagrams and yields reassembled frames.
pub struct FrameReceiver {
    socket: UdpSocket,
    assembler: FrameAssembler,
    buf: Vec<u8>,
}

impl FrameReceiver {
    /// Bind the listening socket.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, NetError> {
        Self::bind_with(addr, TransportConfig::default()).await
    }

    pub async fn bind_with(
        addr: impl ToSocketAddrs,
        config: TransportConfig,
    ) -> Result<Self, NetError> {
        let socket = UdpSocket::bind(addr).await?;

        Ok(Self {
            socket,
            assembler: FrameAssembler::new(config.window()),
            buf: vec![0u8; RECV_BUF_LEN],
        })
    }

    /// Receive the next complete frame.
    ///
    /// Loops over incoming datagrams until the assembler completes a frame.
    /// Datagrams failing validation are logged and skipped; only socket
    /// errors are returned.
    pub async fn recv(&mut self) -> Result<Vec<u8>, NetError> {
        loop {
            let (len, peer) = self.socket.recv_from(&mut self.buf).await?;

            match self.assembler.push(&self.buf[..len]) {
                Ok(Some(frame)) => return Ok(frame),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Discarding datagram from {}: {}", peer, e);
                }
            }
        }
    }

    /// Number of frames fully reassembled so far.
    pub fn frames_completed(&self) -> u64 {
        self.assembler.frames_completed()
    }

    /// Number of partial frames discarded so far.
    pub fn frames_dropped(&self) -> u64 {
        self.assembler.frames_dropped()
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
        Ok(self.socket.local_addr()?)
    }
}
