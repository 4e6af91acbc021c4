//! Mock client configuration.

use nogres_core::ConfiguredError;

/// Initial state and behavior of a [`MockClient`](crate::MockClient) or pool.
///
/// # Example
///
/// ```
/// use nogres_client::MockConfig;
///
/// let config = MockConfig::new()
///     .start_connected(true)
///     .pool_connects_on_query(false);
/// assert!(config.start_connected);
/// ```
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Error every `connect` delivers until cleared.
    pub connect_error: Option<ConfiguredError>,
    /// Begin in the connected state, skipping the explicit `connect`.
    pub start_connected: bool,
    /// Have the pool connect its client before each query, like a real pool
    /// checking out a connection.
    pub pool_connects_on_query: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            connect_error: None,
            start_connected: false,
            pool_connects_on_query: true,
        }
    }
}

impl MockConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a connect error from the start.
    #[must_use]
    pub fn connect_error(mut self, error: impl Into<ConfiguredError>) -> Self {
        self.connect_error = Some(error.into());
        self
    }

    #[must_use]
    pub fn start_connected(mut self, connected: bool) -> Self {
        self.start_connected = connected;
        self
    }

    #[must_use]
    pub fn pool_connects_on_query(mut self, enabled: bool) -> Self {
        self.pool_connects_on_query = enabled;
        self
    }
}
