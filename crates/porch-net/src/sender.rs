use crate::{protocol, NetError, TransportConfig};
use std::net::SocketAddr;
use tokio::net::{ToSocketAddrs, UdpSocket};

/// Sends frames as chunked datagrams to one receiver.
pub struct FrameSender {
    socket: UdpSocket,
    config: TransportConfig,
    next_frame_id: u32,
}

impl FrameSender {
    /// Bind an ephemeral local port and direct all traffic at `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, NetError> {
        Self::connect_with(addr, TransportConfig::default()).await
    }

    pub async fn connect_with(
        addr: impl ToSocketAddrs,
        config: TransportConfig,
    ) -> Result<Self, NetError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(addr).await?;

        Ok(Self {
            socket,
            config,
            next_frame_id: 0,
        })
    }

    /// Chunk and transmit one frame.
    ///
    /// Datagrams go out back to back; UDP gives no delivery guarantee, the
    /// receiver's assembler absorbs loss and reordering.
    ///
    /// # Errors
    ///
    /// `FrameTooLarge` if the frame exceeds the chunkable size, `Io` on
    /// socket errors.
    pub async fn send(&mut self, frame: &[u8]) -> Result<(), NetError> {
        let datagrams = protocol::chunk_frame(self.next_frame_id, frame, self.config.max_payload())?;

        for datagram in &datagrams {
            self.socket.send(datagram).await?;
        }

        self.next_frame_id = self.next_frame_id.wrapping_add(1);
        Ok(())
    }

    /// Frame id the next `send` will use.
    pub fn next_frame_id(&self) -> u32 {
        self.next_frame_id
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
        Ok(self.socket.local_addr()?)
    }
}
