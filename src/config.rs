//! Server configuration.
//!
//! Built with `typed-builder`, the same way as every other configuration
//! struct in the crate.

use std::path::PathBuf;

use strum::{AsRefStr, Display, EnumString};
use typed_builder::TypedBuilder;

/// What a write request does when another write transaction is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum WriterPolicy {
    /// Wait for the other writer to finish
    #[default]
    Block,
    /// Fail the request with an internal error
    FailFast,
}

/// Configuration for a [`UserServer`](crate::server::UserServer).
///
/// # Examples
///
/// ```
/// use users_store::config::{ServerConfig, WriterPolicy};
///
/// // Create with defaults: seeded from the bundled samples
/// let config = ServerConfig::builder().build();
/// assert!(config.load_samples);
///
/// // Start empty and fail fast on concurrent writes
/// let config = ServerConfig::builder()
///     .load_samples(false)
///     .writer_policy(WriterPolicy::FailFast)
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct ServerConfig {
    /// Seed the store when the server is constructed
    #[builder(default = true)]
    pub load_samples: bool,

    /// Seed from this JSON file instead of the bundled samples
    #[builder(default, setter(strip_option, into))]
    pub samples_path: Option<PathBuf>,

    /// Behaviour of write requests under contention
    #[builder(default)]
    pub writer_policy: WriterPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .load_samples(true)
            .samples_path("/tmp/users.json")
            .writer_policy(WriterPolicy::FailFast)
            .build();

        assert_eq!(config.samples_path, Some(PathBuf::from("/tmp/users.json")));
        assert_eq!(config.writer_policy, WriterPolicy::FailFast);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert!(config.load_samples);
        assert_eq!(config.samples_path, None);
        assert_eq!(config.writer_policy, WriterPolicy::Block);
    }

    #[test]
    fn test_writer_policy_names() {
        assert_eq!(WriterPolicy::FailFast.to_string(), "fail-fast");
        assert_eq!(WriterPolicy::from_str("block").unwrap(), WriterPolicy::Block);
    }
}
