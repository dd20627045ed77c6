// Netzwerk-Kollaborateure des Notifiers
//
// WifiConnectivity: Link + DHCP über den embassy-net Stack
// HttpTransport: HTTP/1.1 PUT über TcpSocket, https:// mit TLS 1.3

pub mod connectivity;
pub mod transport;

pub use connectivity::WifiConnectivity;
pub use transport::HttpTransport;
