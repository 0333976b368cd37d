use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use netstat2::{
    get_sockets_info, AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo, SocketInfo, TcpState,
};
use thiserror::Error;

use super::connection::{ConnectionRecord, SocketKind};

#[derive(Error, Debug)]
pub enum EnumerationError {
    #[error("failed to enumerate sockets: {0}")]
    Platform(String),
}

/// Lists every active connection on the host.
pub trait ConnectionEnumerator {
    /// # Errors
    ///
    /// Returns `EnumerationError` when the platform socket tables cannot be read.
    fn enumerate(&mut self) -> Result<Vec<ConnectionRecord>, EnumerationError>;
}

/// Reads TCP and UDP sockets of both address families through `netstat2`.
#[derive(Debug, Default)]
pub struct NetstatEnumerator;

impl NetstatEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl ConnectionEnumerator for NetstatEnumerator {
    fn enumerate(&mut self) -> Result<Vec<ConnectionRecord>, EnumerationError> {
        let af_flags = AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6;
        let proto_flags = ProtocolFlags::TCP | ProtocolFlags::UDP;
        let sockets_info = get_sockets_info(af_flags, proto_flags)
            .map_err(|e| EnumerationError::Platform(e.to_string()))?;

        Ok(sockets_info.iter().map(to_record).collect())
    }
}

fn to_record(si: &SocketInfo) -> ConnectionRecord {
    // A socket shared by several processes is attributed to the first one.
    let pid = si.associated_pids.first().copied().unwrap_or(0);

    match &si.protocol_socket_info {
        ProtocolSocketInfo::Tcp(tcp_si) => ConnectionRecord {
            kind: SocketKind::Stream,
            local_addr: tcp_si.local_addr,
            local_port: tcp_si.local_port,
            remote_addr: tcp_si.remote_addr,
            remote_port: tcp_si.remote_port,
            status: tcp_state_name(&tcp_si.state).to_string(),
            pid,
        },
        ProtocolSocketInfo::Udp(udp_si) => ConnectionRecord {
            kind: SocketKind::Datagram,
            local_addr: udp_si.local_addr,
            local_port: udp_si.local_port,
            remote_addr: unspecified_like(udp_si.local_addr),
            remote_port: 0,
            status: "NONE".to_string(),
            pid,
        },
    }
}

fn unspecified_like(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    }
}

pub fn tcp_state_name(state: &TcpState) -> &'static str {
    match state {
        TcpState::Closed => "CLOSE",
        TcpState::Listen => "LISTEN",
        TcpState::SynSent => "SYN_SENT",
        TcpState::SynReceived => "SYN_RECV",
        TcpState::Established => "ESTABLISHED",
        TcpState::FinWait1 => "FIN_WAIT1",
        TcpState::FinWait2 => "FIN_WAIT2",
        TcpState::CloseWait => "CLOSE_WAIT",
        TcpState::Closing => "CLOSING",
        TcpState::LastAck => "LAST_ACK",
        TcpState::TimeWait => "TIME_WAIT",
        _ => "UNKNOWN",
    }
}
