use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub data_root: PathBuf,
    pub places_url: String,
    pub places_user_agent: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let data_root = env::var("DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let places_url = env::var("PLACES_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string());

        // Nominatim refuses anonymous clients.
        let places_user_agent =
            env::var("PLACES_USER_AGENT").unwrap_or_else(|_| "voyage/0.1".to_string());

        Ok(Self {
            listen_addr,
            data_root,
            places_url,
            places_user_agent,
        })
    }
}
