use axum::extract::connect_info::Connected;
use axum::serve::IncomingStream;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Server-side address of the connection a request arrived on.
///
/// Attached to every request by [`crate::serve`] as
/// `ConnectInfo<LocalAddr>`. Behind a platform router this is the container
/// address the router forwarded to, not the public route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAddr(pub Option<SocketAddr>);

impl Connected<IncomingStream<'_, TcpListener>> for LocalAddr {
    fn connect_info(stream: IncomingStream<'_, TcpListener>) -> Self {
        LocalAddr(stream.io().local_addr().ok())
    }
}
