// HTTP/1.1 Transport über einen embassy-net TcpSocket, `https://` über embedded-tls
use alloc::vec;
use alloc::vec::Vec;

use defmt::{Debug2Format, debug, warn};
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, with_timeout};
use embedded_io_async::{Read, Write};
use embedded_tls::{Aes128GcmSha256, TlsConfig, TlsConnection, TlsContext, UnsecureProvider};
use esp_core::http::{HttpUrl, Request, Scheme, parse_response, write_request};
use esp_core::{Response, Transport, TransportError};
use esp_hal::rng::Rng;
use rand_core::{CryptoRng, RngCore};

use crate::config::{
    DNS_TIMEOUT_SECS, HTTP_MAX_RESPONSE_SIZE, HTTP_TIMEOUT_SECS, TCP_RX_BUFFER_SIZE,
    TCP_TX_BUFFER_SIZE, TLS_READ_RECORD_SIZE, TLS_WRITE_RECORD_SIZE,
};

/// Ein Request pro TCP-Verbindung (`Connection: close`)
///
/// `http://` geht direkt über den Socket, `https://` über eine TLS 1.3
/// Verbindung. Das Server-Zertifikat wird nicht geprüft (kein CA-Store
/// auf dem Gerät). Liest bis der Server die Verbindung schließt, jede
/// vollständige Antwort wird geliefert, unabhängig vom Status-Code.
pub struct HttpTransport {
    stack: Stack<'static>,
    rng: TlsRng,
}

impl HttpTransport {
    /// `rng` muss nach dem Start des Funkmoduls erzeugt werden (echte Zufallszahlen)
    pub fn new(stack: Stack<'static>, rng: Rng) -> Self {
        Self {
            stack,
            rng: TlsRng(rng),
        }
    }
}

impl Transport for HttpTransport {
    async fn submit(&mut self, request: &Request<'_>) -> Result<Response, TransportError> {
        let url = HttpUrl::parse(request.url)?;

        let address = resolve_hostname(self.stack, url.host).await?;
        debug!(
            "HTTP: {=str} {=str} via {}:{} ({})",
            request.method.as_str(),
            url.path,
            Debug2Format(&address),
            url.port,
            url.scheme
        );

        let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
        let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];
        let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)));

        socket
            .connect((address, url.port))
            .await
            .map_err(|_| TransportError::ConnectionFailed)?;

        let bytes = write_request(request, &url);
        let response = match url.scheme {
            Scheme::Http => exchange(&mut socket, &bytes).await,
            Scheme::Https => {
                // Record-Buffer auf dem Heap, ein TLS-Record kann 16 KB groß sein
                let mut read_record = vec![0u8; TLS_READ_RECORD_SIZE];
                let mut write_record = vec![0u8; TLS_WRITE_RECORD_SIZE];
                let config = TlsConfig::new()
                    .with_server_name(url.host)
                    .enable_rsa_signatures();

                let mut tls = TlsConnection::new(&mut socket, &mut read_record, &mut write_record);
                let provider = UnsecureProvider::new::<Aes128GcmSha256>(&mut self.rng);
                match tls.open(TlsContext::new(&config, provider)).await {
                    Ok(()) => exchange(&mut tls, &bytes).await,
                    Err(e) => {
                        warn!("HTTP: TLS handshake failed: {}", Debug2Format(&e));
                        Err(TransportError::Tls)
                    }
                }
            }
        };
        socket.close();

        parse_response(&response?)
    }
}

/// Schreibt den Request und liest bis zum Verbindungsende (max. `HTTP_MAX_RESPONSE_SIZE`)
async fn exchange<C: Read + Write>(conn: &mut C, bytes: &[u8]) -> Result<Vec<u8>, TransportError> {
    conn.write_all(bytes).await.map_err(|_| TransportError::Io)?;
    conn.flush().await.map_err(|_| TransportError::Io)?;

    let mut response = Vec::new();
    let mut chunk = [0u8; 512];
    loop {
        match conn.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let room = HTTP_MAX_RESPONSE_SIZE.saturating_sub(response.len());
                response.extend_from_slice(&chunk[..n.min(room)]);
                if room <= n {
                    break;
                }
            }
            // Server schließt nach `Connection: close` teils ohne sauberes Ende
            Err(_) if !response.is_empty() => break,
            Err(_) => return Err(TransportError::Io),
        }
    }
    Ok(response)
}

/// Löst Hostname zu IPv4-Adresse auf, IP-Literale ohne DNS
async fn resolve_hostname(stack: Stack<'static>, host: &str) -> Result<Ipv4Address, TransportError> {
    if let Ok(address) = host.parse::<Ipv4Address>() {
        return Ok(address);
    }

    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(host, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .into_iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(TransportError::DnsResolutionFailed),
        Ok(Err(_)) => Err(TransportError::DnsResolutionFailed),
        Err(_) => Err(TransportError::Timeout),
    }
}

/// Hardware-RNG des ESP32-C6 für den TLS-Handshake
///
/// Bei aktivem Funkmodul liefert `Rng` echte Zufallszahlen.
struct TlsRng(Rng);

impl RngCore for TlsRng {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.0.random()) << 32) | u64::from(self.0.random())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.0.random().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for TlsRng {}
