pub mod config;
pub mod error;
pub mod extract;
pub mod password;
pub mod ports;

pub use config::{BotConfig, Config, RemoteConfig, StoreConfig};
pub use error::{ConfigError, RemoteError, StoreError};
pub use ports::{ContactStore, ContactTable, RemoteOutput, RemoteRunner};
