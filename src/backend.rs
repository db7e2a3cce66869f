use core::fmt::Write;
use heapless::String;

use crate::config::Config;
use crate::constants::{AUTH_HEADER_MAX, REST_PATH, URL_MAX};

#[derive(Debug, PartialEq)]
pub enum BackendError {
    UrlTooLong,
    AuthorizationTooLong,
}

/// Backend credentials as seen by the REST client
#[derive(Clone, Copy)]
pub struct Backend<'a> {
    base_url: &'a str,
    api_key: &'a str,
    device_id: &'a str,
}

impl<'a> Backend<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            base_url: config.backend_url.trim_end_matches('/'),
            api_key: config.backend_api_key,
            device_id: config.device_id,
        }
    }

    /// Value for the `apikey` header
    pub fn api_key(&self) -> &'a str {
        self.api_key
    }

    /// Device record every upload is tagged with
    pub fn device_id(&self) -> &'a str {
        self.device_id
    }

    /// `<base>/rest/v1/<table>`
    pub fn rest_url(&self, table: &str) -> Result<String<URL_MAX>, BackendError> {
        let mut url = String::new();
        write!(url, "{}{}{}", self.base_url, REST_PATH, table.trim_start_matches('/'))
            .map_err(|_| BackendError::UrlTooLong)?;
        Ok(url)
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> Result<String<AUTH_HEADER_MAX>, BackendError> {
        let mut header = String::new();
        write!(header, "Bearer {}", self.api_key)
            .map_err(|_| BackendError::AuthorizationTooLong)?;
        Ok(header)
    }
}
