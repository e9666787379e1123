/// Configuration for the datagram frame transport.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    max_datagram: usize,
    window: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            // Below the common 1500-byte MTU with headroom for IP/UDP headers
            max_datagram: 1400,
            window: 8,
        }
    }
}

impl TransportConfig {
    /// Set the maximum datagram size in bytes (header included).
    ///
    /// Values smaller than one header plus one payload byte are raised to
    /// that minimum.
    pub fn with_max_datagram(mut self, max_datagram: usize) -> Self {
        self.max_datagram = max_datagram.max(crate::HEADER_LEN + 1);
        self
    }

    /// Set how many frames may be in flight in the assembler at once.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn max_datagram(&self) -> usize {
        self.max_datagram
    }

    /// Payload bytes available per datagram.
    pub fn max_payload(&self) -> usize {
        self.max_datagram - crate::HEADER_LEN
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
