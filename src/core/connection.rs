use std::net::IpAddr;

/// Socket type as reported by the platform; `Other` keeps the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    Stream,
    Datagram,
    #[allow(dead_code)]
    Other(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub kind: SocketKind,
    pub local_addr: IpAddr,
    pub local_port: u16,
    pub remote_addr: IpAddr,
    pub remote_port: u16,
    pub status: String,
    pub pid: u32,                      // 0 when no process owns the socket
}

/// One display-ready line of the connection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub protocol: &'static str,
    pub local: String,
    pub remote: String,
    pub status: String,
    pub pid: u32,
    pub process_name: String,
}

impl DisplayRow {
    pub fn from_record(record: &ConnectionRecord, process_name: String) -> Self {
        let local_ip = record.local_addr.to_string();
        Self {
            protocol: protocol_label(record.kind, &local_ip),
            local: format!("{}:{}", local_ip, record.local_port),
            remote: format!("{}:{}", record.remote_addr, record.remote_port),
            status: record.status.clone(),
            pid: record.pid,
            process_name,
        }
    }
}

/// Labels a socket by type, treating any local address literal containing
/// a colon as IPv6.
pub fn protocol_label(kind: SocketKind, local_ip: &str) -> &'static str {
    let is_ipv6 = local_ip.contains(':');
    match kind {
        SocketKind::Stream if is_ipv6 => "TCP6",
        SocketKind::Stream => "TCP",
        SocketKind::Datagram if is_ipv6 => "UDP6",
        SocketKind::Datagram => "UDP",
        SocketKind::Other(_) => "Unknown",
    }
}
