//! Configuration management using figment.
//!
//! Values resolve in three layers, later wins: serialized defaults, an
//! optional `docgate.toml`, then `DOCGATE_`-prefixed environment variables
//! with `__` as the section separator (`DOCGATE_SERVER__PORT=8080`).

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub mongo: MongoConfig,
    pub redis: RedisConfig,
    pub client: ClientConfig,
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("docgate.toml"))
            .merge(Env::prefixed("DOCGATE_").split("__"))
            .extract()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "portfolio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
        }
    }
}

/// Where the static client bundle lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub dir: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dir: "client".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = Config::default();
        assert_eq!(config.server.socket_addr(), "0.0.0.0:5000");
        assert_eq!(config.mongo.database, "portfolio");
        assert!(config.redis.url.starts_with("redis://"));
        assert_eq!(config.client.dir, "client");
    }
}
