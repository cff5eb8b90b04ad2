use redis::aio::MultiplexedConnection;
use tracing::debug;

use crate::Error;

/// The Facade translates typed method calls into single commands against a
/// remote Redis server and translates replies back into typed return values.
/// It holds no state of its own beyond the client handle: every call acquires
/// a connection, runs exactly one command, and releases the connection. All
/// consistency guarantees (atomicity of multi-key commands, ordering of
/// concurrent writers) belong to the server.
///
/// Operations are grouped by data-type category in the [`crate::ops`]
/// modules: keys, strings, hashes, lists.
pub struct Facade {
    client: redis::Client,
}

impl Facade {
    /// Builds a facade from a connection URL, e.g. `redis://127.0.0.1:6379/`.
    /// The URL is validated here; no connection is opened until the first
    /// command runs.
    pub fn open(url: &str) -> Result<Facade, Error> {
        let client = redis::Client::open(url)?;
        debug!("facade bound to {:?}", client.get_connection_info().addr);
        Ok(Facade { client })
    }

    /// Acquires a connection for a single command. Connections are scoped to
    /// one call and never held across calls, so blocking commands (BLPOP and
    /// friends) cannot stall an unrelated caller.
    pub(crate) async fn conn(&self) -> Result<MultiplexedConnection, Error> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }
}
