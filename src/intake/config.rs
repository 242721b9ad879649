use std::net::SocketAddr;

/// Intake module configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Listen address (default: 127.0.0.1)
    pub listen_addr: String,
    /// Listen port (default: 9800)
    pub listen_port: u16,
    /// Maximum payload size in bytes (default: 65536)
    pub max_payload_bytes: usize,
    /// Deduplication table capacity per relay (default: 1024)
    pub dedup_capacity: usize,
    /// Deduplication entry TTL in seconds (default: 300)
    pub dedup_ttl_secs: u64,
    /// Buffered events awaiting dispatch (default: 1024)
    pub channel_capacity: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1".to_string(),
            listen_port: 9800,
            max_payload_bytes: 65536,
            dedup_capacity: 1024,
            dedup_ttl_secs: 300,
            channel_capacity: 1024,
        }
    }
}

impl IntakeConfig {
    /// Socket address string to bind to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Parsed bind address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr().parse()
    }
}
