//! Completion listener: a TCP socket whose accepted connections are "one job finished" tokens.
mod host;

use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    net::{TcpListener, TcpSocket, TcpStream, lookup_host},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use pace_model::{CallbackAddress, JobName};

use crate::config::ListenerConfig;

/// Upper bound on the correlation payload read from a callback connection.
const MAX_CORRELATION_BYTES: u64 = 64;

/// Failure to bind the listener socket. Fatal: the run cannot start without it.
#[derive(Debug, Error)]
#[error("failed to bind completion listener on {addr}: {source}")]
pub struct BindError {
    pub addr: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum ListenError {
    /// No signal within the configured accept timeout. Recoverable.
    #[error("no completion signal within {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("wait for completion signal cancelled")]
    Cancelled,

    /// The listening socket itself failed.
    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),
}

/// One accepted callback connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSignal {
    pub peer: SocketAddr,
    /// Job name the worker sent, when correlation is enabled and the payload was valid.
    pub job: Option<JobName>,
}

/// Source of completion signals consumed by the controller.
#[async_trait]
pub trait CompletionSource: Send {
    /// Block until one signal arrives, the wait times out, or `cancel` fires.
    async fn await_completion(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<CompletionSignal, ListenError>;
}

/// Owns the bound callback socket for the lifetime of a run; dropping it closes the socket.
#[derive(Debug)]
pub struct CompletionListener {
    inner: TcpListener,
    accept_timeout: Option<Duration>,
    read_correlation: bool,
    correlation_read: Duration,
}

impl CompletionListener {
    /// Bind `host:port` with the configured backlog.
    #[instrument(level = "debug", skip(cfg), fields(host = %cfg.host, port = cfg.port))]
    pub async fn bind(cfg: &ListenerConfig) -> Result<Self, BindError> {
        let addr_text = format!("{}:{}", cfg.host, cfg.port);
        let bind_err = |source: io::Error| BindError {
            addr: addr_text.clone(),
            source,
        };

        let addr = lookup_host(addr_text.as_str())
            .await
            .map_err(bind_err)?
            .next()
            .ok_or_else(|| {
                bind_err(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    "host resolved to no addresses",
                ))
            })?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_err)?;
        // TIME_WAIT entries left by closed callbacks must not block a rebind.
        #[cfg(unix)]
        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let inner = socket.listen(cfg.backlog).map_err(bind_err)?;
        let local = inner.local_addr().map_err(bind_err)?;

        info!(addr = %local, backlog = cfg.backlog, "completion listener bound");
        Ok(Self {
            inner,
            accept_timeout: cfg.accept_timeout(),
            read_correlation: cfg.read_correlation,
            correlation_read: cfg.correlation_read(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Address workers should call back on.
    ///
    /// Order: configured `advertise_host`, the machine hostname resolved to IPv4, the bound IP when it is
    /// a concrete address, then loopback.
    pub async fn advertise(&self, cfg: &ListenerConfig) -> io::Result<CallbackAddress> {
        let bound = self.local_addr()?;
        if let Some(host) = &cfg.advertise_host {
            return Ok(CallbackAddress::new(host.clone(), bound.port()));
        }

        match resolve_hostname_v4().await {
            Ok(ip) => return Ok(CallbackAddress::new(ip.to_string(), bound.port())),
            Err(e) => debug!(error = %e, "hostname resolution failed; falling back to bound address"),
        }

        let ip = if bound.ip().is_unspecified() {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            bound.ip()
        };
        Ok(CallbackAddress::new(ip.to_string(), bound.port()))
    }

    /// Accept exactly one connection and close it.
    ///
    /// The accept timeout bounds only the wait for a connection. Once one is accepted it always
    /// yields a signal; the correlation read has its own bound.
    pub async fn await_completion(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CompletionSignal, ListenError> {
        let (stream, peer) = match self.accept_timeout {
            Some(limit) => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ListenError::Cancelled),
                res = tokio::time::timeout(limit, self.accept_one()) => match res {
                    Ok(conn) => conn?,
                    Err(_) => return Err(ListenError::Timeout { waited_ms: limit.as_millis() as u64 }),
                },
            },
            None => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ListenError::Cancelled),
                conn = self.accept_one() => conn?,
            },
        };

        let job = if self.read_correlation {
            self.read_job_name(stream, peer).await
        } else {
            None
        };
        trace!(%peer, job = ?job, "completion signal accepted");
        Ok(CompletionSignal { peer, job })
    }

    async fn accept_one(&self) -> Result<(TcpStream, SocketAddr), ListenError> {
        loop {
            match self.inner.accept().await {
                Ok(conn) => return Ok(conn),
                Err(e) if is_transient(&e) => {
                    warn!(error = %e, "transient accept error; waiting for next connection");
                }
                Err(e) => return Err(ListenError::Accept(e)),
            }
        }
    }

    /// Read one short line from the worker and parse it as a job name.
    async fn read_job_name(&self, stream: TcpStream, peer: SocketAddr) -> Option<JobName> {
        let mut reader = BufReader::new(stream.take(MAX_CORRELATION_BYTES));
        let mut line = String::new();

        match tokio::time::timeout(self.correlation_read, reader.read_line(&mut line)).await {
            Ok(Ok(_)) => match JobName::parse(&line) {
                Ok(name) => Some(name),
                Err(e) => {
                    if !line.trim().is_empty() {
                        debug!(%peer, error = %e, "ignoring malformed correlation payload");
                    }
                    None
                }
            },
            Ok(Err(e)) => {
                debug!(%peer, error = %e, "failed to read correlation payload");
                None
            }
            Err(_) => {
                debug!(%peer, "no correlation payload within read window");
                None
            }
        }
    }
}

#[async_trait]
impl CompletionSource for CompletionListener {
    async fn await_completion(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<CompletionSignal, ListenError> {
        CompletionListener::await_completion(self, cancel).await
    }
}

/// Errors tied to one incoming connection rather than the listening socket.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

async fn resolve_hostname_v4() -> io::Result<IpAddr> {
    let name = host::local_hostname()?;
    lookup_host((name.as_str(), 0))
        .await?
        .map(|addr| addr.ip())
        .find(IpAddr::is_ipv4)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("hostname '{name}' has no IPv4 address"),
            )
        })
}
