use crate::products::unexpected::FetchError;
use chrono::{DateTime, NaiveDateTime, ParseError, TimeZone, Utc};
use openssl::ssl::{HandshakeError, SslConnector, SslMethod, SslVerifyMode};
use std::{
    io::{self, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, instrument, trace};


/// Format of certificate time as printed by OpenSSL, like "Mar  5 12:00:00 2025 GMT"
const OPENSSL_TIME_FORMAT: &str = "%b %d %H:%M:%S%.f %Y GMT";


/// Source of certificate expiration dates
pub trait CertificateFetcher: Send + Sync {
    /// Fetch leaf certificate "not valid after" of given host.
    /// The whole operation is bounded by timeout.
    fn fetch(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<DateTime<Utc>, FetchError>;
}


impl<T: CertificateFetcher + ?Sized> CertificateFetcher for &T {
    fn fetch(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<DateTime<Utc>, FetchError> {
        (**self).fetch(hostname, port, timeout)
    }
}


/// Fetches certificates over a live TLS handshake using OpenSSL.
///
/// Certificate chain and hostname are not verified: whatever leaf the server
/// presents for given server name is read.
#[derive(Debug, Copy, Clone, Default)]
pub struct TlsFetcher;


impl CertificateFetcher for TlsFetcher {
    #[instrument(level = "debug", skip(self))]
    fn fetch(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<DateTime<Utc>, FetchError> {
        let deadline = Deadline::new(hostname, timeout);
        let addresses = resolve(hostname, port, &deadline)?;
        let stream = connect(hostname, &addresses, &deadline)?;
        let not_after = read_not_after(hostname, stream, &deadline)?;
        trace!("Certificate of: {} is valid until: {}", hostname, not_after);
        parse_not_after(&not_after).map_err(|err| {
            FetchError::CertificateParseFailure(
                hostname.to_string(),
                format!("unparsable expiry: \"{}\" ({})", not_after, err),
            )
        })
    }
}


/// Parse certificate time in OpenSSL text form, day may be space padded
pub fn parse_not_after(not_after: &str) -> Result<DateTime<Utc>, ParseError> {
    let normalized = not_after.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, OPENSSL_TIME_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
}


/// Time budget of a single fetch
#[derive(Debug)]
struct Deadline {
    hostname: String,
    timeout: Duration,
    at: Instant,
}


impl Deadline {
    fn new(hostname: &str, timeout: Duration) -> Deadline {
        Deadline {
            hostname: hostname.to_string(),
            timeout,
            at: Instant::now() + timeout,
        }
    }


    /// Time left, or Timeout error once it's over
    fn remaining(&self) -> Result<Duration, FetchError> {
        let remaining = self.at.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            Err(self.exceeded())
        } else {
            Ok(remaining)
        }
    }


    fn exceeded(&self) -> FetchError {
        FetchError::Timeout(self.hostname.clone(), self.timeout.as_secs())
    }
}


fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}


/// Socket that gives every read and write only what's left of the deadline
#[derive(Debug)]
struct DeadlineStream<'a> {
    stream: TcpStream,
    deadline: &'a Deadline,
}


impl DeadlineStream<'_> {
    fn budget(&self) -> io::Result<Duration> {
        let remaining = self.deadline.at.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("deadline of {}s exceeded", self.deadline.timeout.as_secs()),
            ))
        } else {
            Ok(remaining)
        }
    }
}


impl Read for DeadlineStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let budget = self.budget()?;
        self.stream.set_read_timeout(Some(budget))?;
        self.stream.read(buf)
    }
}


impl Write for DeadlineStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let budget = self.budget()?;
        self.stream.set_write_timeout(Some(budget))?;
        self.stream.write(buf)
    }


    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}


/// Resolve host addresses. Std resolver can't time out, so it's asked from a
/// separate thread which is abandoned when the deadline passes.
fn resolve(
    hostname: &str,
    port: u16,
    deadline: &Deadline,
) -> Result<Vec<SocketAddr>, FetchError> {
    let (sender, receiver) = mpsc::channel();
    let host = hostname.to_string();
    let _resolver = thread::Builder::new()
        .name(format!("resolve-{}", hostname))
        .spawn(move || {
            let addresses = (host.as_str(), port)
                .to_socket_addrs()
                .map(|addresses| addresses.collect::<Vec<SocketAddr>>());
            sender.send(addresses).unwrap_or_default();
        })
        .map_err(|err| FetchError::DnsOrConnectFailure(hostname.to_string(), err.to_string()))?;

    match receiver.recv_timeout(deadline.remaining()?) {
        Ok(Ok(addresses)) if !addresses.is_empty() => {
            trace!("Resolved: {} to: {:?}", hostname, addresses);
            Ok(addresses)
        }
        Ok(Ok(_)) => {
            Err(FetchError::DnsOrConnectFailure(
                hostname.to_string(),
                "no addresses found".to_string(),
            ))
        }
        Ok(Err(err)) => {
            Err(FetchError::DnsOrConnectFailure(
                hostname.to_string(),
                err.to_string(),
            ))
        }
        Err(RecvTimeoutError::Timeout) => Err(deadline.exceeded()),
        Err(RecvTimeoutError::Disconnected) => {
            Err(FetchError::DnsOrConnectFailure(
                hostname.to_string(),
                "resolver thread terminated".to_string(),
            ))
        }
    }
}


/// Connect to first reachable address
fn connect(
    hostname: &str,
    addresses: &[SocketAddr],
    deadline: &Deadline,
) -> Result<TcpStream, FetchError> {
    let mut last_error = None;
    for address in addresses {
        let remaining = deadline.remaining()?;
        trace!("Connecting to: {}", address);
        match TcpStream::connect_timeout(address, remaining) {
            Ok(stream) => return Ok(stream),
            Err(err) if is_timeout(&err) && deadline.remaining().is_err() => {
                return Err(deadline.exceeded())
            }
            Err(err) => {
                debug!("Connection to: {} ({}) failed: {}", hostname, address, err);
                last_error = Some(err);
            }
        }
    }
    Err(FetchError::DnsOrConnectFailure(
        hostname.to_string(),
        last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "no addresses to connect to".to_string()),
    ))
}


/// Perform TLS handshake with SNI, read leaf certificate expiry in OpenSSL text form
fn read_not_after(
    hostname: &str,
    stream: TcpStream,
    deadline: &Deadline,
) -> Result<String, FetchError> {
    let handshake_failure =
        |details: String| FetchError::TlsHandshakeFailure(hostname.to_string(), details);

    let mut builder = SslConnector::builder(SslMethod::tls_client())
        .map_err(|err| handshake_failure(err.to_string()))?;
    builder.set_verify(SslVerifyMode::NONE);
    let mut configuration = builder
        .build()
        .configure()
        .map_err(|err| handshake_failure(err.to_string()))?;
    configuration.set_verify_hostname(false);
    configuration.set_use_server_name_indication(true);

    let tls_stream = configuration
        .connect(hostname, DeadlineStream { stream, deadline })
        .map_err(|err| {
            match err {
                HandshakeError::WouldBlock(_) => deadline.exceeded(),
                HandshakeError::Failure(mid_handshake)
                    if mid_handshake.error().io_error().map_or(false, is_timeout)
                        || deadline.remaining().is_err() =>
                {
                    deadline.exceeded()
                }
                HandshakeError::Failure(mid_handshake) => {
                    handshake_failure(mid_handshake.error().to_string())
                }
                HandshakeError::SetupFailure(stack) => handshake_failure(stack.to_string()),
            }
        })?;

    tls_stream
        .ssl()
        .peer_certificate()
        .map(|certificate| certificate.not_after().to_string())
        .ok_or_else(|| {
            FetchError::CertificateParseFailure(
                hostname.to_string(),
                "no leaf certificate presented".to_string(),
            )
        })
}
