use super::connection::DisplayRow;
use super::enumerator::{ConnectionEnumerator, EnumerationError};
use super::process::ProcessResolver;

pub type Snapshot = Vec<DisplayRow>;

/// Turns the current system state into display rows.
pub struct SnapshotSource<E, R> {
    enumerator: E,
    resolver: R,
}

impl<E: ConnectionEnumerator, R: ProcessResolver> SnapshotSource<E, R> {
    pub fn new(enumerator: E, resolver: R) -> Self {
        Self { enumerator, resolver }
    }

    /// Rows keep enumeration order. Sockets without an owner, or whose owner
    /// exited before it could be resolved, are dropped.
    ///
    /// # Errors
    ///
    /// Only a failure of the enumerator itself is reported.
    pub fn refresh(&mut self) -> Result<Snapshot, EnumerationError> {
        let records = self.enumerator.enumerate()?;
        self.resolver.begin_cycle();

        let mut snapshot = Vec::with_capacity(records.len());
        for record in &records {
            if record.pid == 0 {
                continue;
            }

            match self.resolver.resolve_name(record.pid) {
                Ok(name) => snapshot.push(DisplayRow::from_record(record, name)),
                Err(e) => tracing::trace!("skipping socket: {e}"),
            }
        }

        tracing::debug!("snapshot: {} of {} sockets kept", snapshot.len(), records.len());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::{ConnectionRecord, SocketKind};
    use crate::core::process::ResolveError;
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};

    struct MockEnumerator {
        result: Option<Vec<ConnectionRecord>>,
    }

    impl ConnectionEnumerator for MockEnumerator {
        fn enumerate(&mut self) -> Result<Vec<ConnectionRecord>, EnumerationError> {
            self.result
                .clone()
                .ok_or_else(|| EnumerationError::Platform("access denied".to_string()))
        }
    }

    #[derive(Default)]
    struct MockResolver {
        names: HashMap<u32, String>,
        cycles: usize,
    }

    impl ProcessResolver for MockResolver {
        fn begin_cycle(&mut self) {
            self.cycles += 1;
        }

        fn resolve_name(&mut self, pid: u32) -> Result<String, ResolveError> {
            self.names.get(&pid).cloned().ok_or(ResolveError::NotFound { pid })
        }
    }

    fn record(
        pid: u32,
        local: [u8; 4],
        local_port: u16,
        remote: [u8; 4],
        remote_port: u16,
    ) -> ConnectionRecord {
        ConnectionRecord {
            kind: SocketKind::Stream,
            local_addr: IpAddr::V4(Ipv4Addr::from(local)),
            local_port,
            remote_addr: IpAddr::V4(Ipv4Addr::from(remote)),
            remote_port,
            status: "ESTABLISHED".to_string(),
            pid,
        }
    }

    #[test]
    fn drops_unowned_and_unresolved_sockets() {
        let enumerator = MockEnumerator {
            result: Some(vec![
                record(0, [10, 0, 0, 1], 22, [10, 0, 0, 2], 50000),
                record(7, [10, 0, 0, 1], 5353, [10, 0, 0, 3], 5353),
                record(42, [127, 0, 0, 1], 8080, [93, 184, 216, 34], 443),
            ]),
        };
        let resolver = MockResolver {
            names: HashMap::from([(42, "curl".to_string())]),
            ..Default::default()
        };
        let mut source = SnapshotSource::new(enumerator, resolver);

        let snapshot = source.refresh().expect("refresh");

        assert_eq!(snapshot.len(), 1);
        let row = &snapshot[0];
        assert_eq!(row.protocol, "TCP");
        assert_eq!(row.local, "127.0.0.1:8080");
        assert_eq!(row.remote, "93.184.216.34:443");
        assert_eq!(row.pid, 42);
        assert_eq!(row.process_name, "curl");
    }

    #[test]
    fn keeps_enumeration_order() {
        let enumerator = MockEnumerator {
            result: Some(vec![
                record(3, [10, 0, 0, 1], 3000, [10, 0, 0, 9], 1),
                record(1, [10, 0, 0, 1], 1000, [10, 0, 0, 9], 1),
                record(2, [10, 0, 0, 1], 2000, [10, 0, 0, 9], 1),
            ]),
        };
        let resolver = MockResolver {
            names: HashMap::from([
                (1, "one".to_string()),
                (2, "two".to_string()),
                (3, "three".to_string()),
            ]),
            ..Default::default()
        };
        let mut source = SnapshotSource::new(enumerator, resolver);

        let pids: Vec<u32> = source.refresh().expect("refresh").iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![3, 1, 2]);
    }

    #[test]
    fn length_counts_owned_and_resolved_records() {
        let records: Vec<ConnectionRecord> = (0..10)
            .map(|pid| record(pid, [10, 0, 0, 1], 1000 + pid as u16, [10, 0, 0, 2], 80))
            .collect();
        let names = (0..10)
            .filter(|pid| pid % 3 != 0)
            .map(|pid| (pid, format!("proc-{pid}")))
            .collect();
        let mut source = SnapshotSource::new(
            MockEnumerator { result: Some(records) },
            MockResolver { names, ..Default::default() },
        );

        // pids 1..9 are owned; of those, 3, 6 and 9 do not resolve
        assert_eq!(source.refresh().expect("refresh").len(), 6);
    }

    #[test]
    fn enumeration_failure_propagates() {
        let mut source = SnapshotSource::new(
            MockEnumerator { result: None },
            MockResolver::default(),
        );

        let err = source.refresh().expect_err("should fail");
        assert!(matches!(err, EnumerationError::Platform(_)));
        assert_eq!(source.resolver.cycles, 0);
    }

    #[test]
    fn resolver_refreshed_once_per_cycle() {
        let mut source = SnapshotSource::new(
            MockEnumerator { result: Some(vec![]) },
            MockResolver::default(),
        );

        source.refresh().expect("refresh");
        source.refresh().expect("refresh");
        assert_eq!(source.resolver.cycles, 2);
    }
}
