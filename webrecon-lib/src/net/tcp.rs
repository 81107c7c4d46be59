//! TCP connect probing.

use super::Connector;
use crate::error::ReconError;
use crate::types::ProbeTarget;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Connector that performs a full TCP handshake and drops the stream.
///
/// Host names are resolved as part of the connect, so a name that does not
/// resolve fails the same way as a refused port.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, target: &ProbeTarget, limit: Duration) -> Result<(), ReconError> {
        let address = target.address();

        match timeout(limit, TcpStream::connect(address.as_str())).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(ReconError::connect_failed(address, e.to_string())),
            Err(_elapsed) => Err(ReconError::connect_failed(
                address,
                format!("timed out after {:?}", limit),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let result = TcpConnector::new()
            .connect(&ProbeTarget::new("127.0.0.1", port), Duration::from_secs(1))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn refused_port_is_connect_failed() {
        // Bind then drop to get a port that is very likely closed
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let err = TcpConnector::new()
            .connect(&ProbeTarget::new("127.0.0.1", port), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::ConnectFailed { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn unresolvable_host_is_connect_failed() {
        let err = TcpConnector::new()
            .connect(
                &ProbeTarget::new("does-not-exist.invalid", 80),
                Duration::from_secs(5),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::ConnectFailed { .. }));
    }
}
