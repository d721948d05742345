//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

const fn default_cors_permissive() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Allow any origin. Turn off when the API sits behind a same-origin proxy.
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_permissive: default_cors_permissive(),
        }
    }
}
