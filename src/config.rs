use core::fmt;

use crate::calibration::{Calibration, CalibrationError};
use crate::validate::{
    is_https_url, is_placeholder, is_uuid, MAX_API_KEY_LEN, MAX_BACKEND_URL_LEN, MAX_PSK_LEN,
    MAX_SSID_LEN, PLACEHOLDER_API_KEY, PLACEHOLDER_BACKEND_URL, PLACEHOLDER_DEVICE_ID,
    PLACEHOLDER_WIFI_PSK, PLACEHOLDER_WIFI_SSID,
};

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    WifiSsidMissing,
    WifiSsidTooLong,
    WifiPskMissing,
    WifiPskTooLong,
    BackendUrlMissing,
    BackendUrlInvalid,
    BackendUrlTooLong,
    BackendApiKeyMissing,
    BackendApiKeyTooLong,
    DeviceIdMissing,
    DeviceIdInvalid,
    Calibration(CalibrationError),
}

impl From<CalibrationError> for ConfigError {
    fn from(e: CalibrationError) -> Self {
        ConfigError::Calibration(e)
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct Config {
    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key (password)
    pub wifi_psk: &'static str,

    // Backend base URL (HTTPS), e.g. https://<project>.supabase.co
    pub backend_url: &'static str,

    // Backend API key, sent as the bearer token
    pub backend_api_key: &'static str,

    // Device UUID as registered in the backend (tags every telemetry upload)
    pub device_id: &'static str,

    // Sensor calibration constants
    pub calibration: Calibration,
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

impl Config {
    /// The configuration provisioned into this firmware image.
    pub const fn resolve() -> Self {
        CONFIG
    }

    /// False while any field still holds its template value.
    pub fn is_provisioned(&self) -> bool {
        ![
            self.wifi_ssid,
            self.wifi_psk,
            self.backend_url,
            self.backend_api_key,
            self.device_id,
        ]
        .iter()
        .any(|value| is_placeholder(value))
    }

    /// Check every field before the values are handed to the WiFi stack, the
    /// backend client or the sensor reader. Fields are checked in declaration
    /// order and the first failure is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wifi_ssid.is_empty() || self.wifi_ssid == PLACEHOLDER_WIFI_SSID {
            return Err(ConfigError::WifiSsidMissing);
        }
        if self.wifi_ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::WifiSsidTooLong);
        }

        if self.wifi_psk.is_empty() || self.wifi_psk == PLACEHOLDER_WIFI_PSK {
            return Err(ConfigError::WifiPskMissing);
        }
        if self.wifi_psk.len() > MAX_PSK_LEN {
            return Err(ConfigError::WifiPskTooLong);
        }

        if self.backend_url == PLACEHOLDER_BACKEND_URL {
            return Err(ConfigError::BackendUrlMissing);
        }
        if !is_https_url(self.backend_url) {
            return Err(ConfigError::BackendUrlInvalid);
        }
        if self.backend_url.len() > MAX_BACKEND_URL_LEN {
            return Err(ConfigError::BackendUrlTooLong);
        }

        if self.backend_api_key.is_empty() || self.backend_api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::BackendApiKeyMissing);
        }
        if self.backend_api_key.len() > MAX_API_KEY_LEN {
            return Err(ConfigError::BackendApiKeyTooLong);
        }

        if self.device_id == PLACEHOLDER_DEVICE_ID {
            return Err(ConfigError::DeviceIdMissing);
        }
        if !is_uuid(self.device_id) {
            return Err(ConfigError::DeviceIdInvalid);
        }

        self.calibration.validate()?;

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_psk", &"<redacted>")
            .field("backend_url", &self.backend_url)
            .field("backend_api_key", &"<redacted>")
            .field("device_id", &self.device_id)
            .field("calibration", &self.calibration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;
    use crate::backend::Backend;

    const DEPLOYED: Config = Config {
        wifi_ssid: "HomeNet",
        wifi_psk: "secret123",
        backend_url: "https://cqgaapheftzunhsawzaf.supabase.co",
        backend_api_key: "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.payload.signature",
        device_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        calibration: Calibration::new(0.5, 1.02, -0.3),
    };

    #[test]
    fn test_deployed_config_is_valid() {
        assert!(DEPLOYED.is_provisioned());
        assert_eq!(DEPLOYED.validate(), Ok(()));
    }

    #[test]
    fn test_template_config_is_not_provisioned() {
        let template = Config {
            wifi_ssid: PLACEHOLDER_WIFI_SSID,
            wifi_psk: PLACEHOLDER_WIFI_PSK,
            device_id: PLACEHOLDER_DEVICE_ID,
            ..DEPLOYED
        };
        assert!(!template.is_provisioned());
        assert_eq!(template.validate(), Err(ConfigError::WifiSsidMissing));
    }

    #[test]
    fn test_each_placeholder_is_detected() {
        let cases = [
            (
                Config {
                    wifi_psk: PLACEHOLDER_WIFI_PSK,
                    ..DEPLOYED
                },
                ConfigError::WifiPskMissing,
            ),
            (
                Config {
                    backend_url: PLACEHOLDER_BACKEND_URL,
                    ..DEPLOYED
                },
                ConfigError::BackendUrlMissing,
            ),
            (
                Config {
                    backend_api_key: PLACEHOLDER_API_KEY,
                    ..DEPLOYED
                },
                ConfigError::BackendApiKeyMissing,
            ),
            (
                Config {
                    device_id: PLACEHOLDER_DEVICE_ID,
                    ..DEPLOYED
                },
                ConfigError::DeviceIdMissing,
            ),
        ];

        for (config, expected) in cases {
            assert!(!config.is_provisioned());
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_empty_credentials() {
        let config = Config {
            wifi_ssid: "",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::WifiSsidMissing));

        let config = Config {
            wifi_psk: "",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::WifiPskMissing));

        let config = Config {
            backend_api_key: "",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::BackendApiKeyMissing));
    }

    #[test]
    fn test_wifi_length_limits() {
        let config = Config {
            wifi_ssid: "an-ssid-that-is-far-too-long-for-802.11",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::WifiSsidTooLong));

        let config = Config {
            wifi_psk: "0123456789012345678901234567890123456789012345678901234567890123456789",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::WifiPskTooLong));
    }

    #[test]
    fn test_malformed_values() {
        let config = Config {
            backend_url: "http://cqgaapheftzunhsawzaf.supabase.co",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::BackendUrlInvalid));

        let config = Config {
            device_id: "3fa85f64",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::DeviceIdInvalid));

        let config = Config {
            calibration: Calibration::new(0.5, 0.0, -0.3),
            ..DEPLOYED
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Calibration(CalibrationError::UnusableMultiplier))
        );
    }

    #[test]
    fn test_backend_limits_match_request_buffers() {
        static KEY_TOO_LONG: [u8; MAX_API_KEY_LEN + 1] = [b'k'; MAX_API_KEY_LEN + 1];
        static KEY_AT_LIMIT: [u8; MAX_API_KEY_LEN] = [b'k'; MAX_API_KEY_LEN];

        let long_key = core::str::from_utf8(&KEY_TOO_LONG).unwrap();
        let config = Config {
            backend_api_key: long_key,
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::BackendApiKeyTooLong));

        // The longest accepted key still fits the Authorization header
        let key = core::str::from_utf8(&KEY_AT_LIMIT).unwrap();
        let config = Config {
            backend_api_key: key,
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Ok(()));
        assert!(Backend::from_config(&config).authorization().is_ok());

        let long_url = concat!(
            "https://",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa.",
            "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb.co"
        );
        let config = Config {
            backend_url: long_url,
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::BackendUrlTooLong));
    }

    #[test]
    fn test_base_url_with_query_is_rejected() {
        let config = Config {
            backend_url: "https://x.supabase.co/?a=b",
            ..DEPLOYED
        };
        assert_eq!(config.validate(), Err(ConfigError::BackendUrlInvalid));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", DEPLOYED);
        assert!(debug.contains("HomeNet"));
        assert!(debug.contains("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert!(!debug.contains("secret123"));
        assert!(!debug.contains("eyJhbGci"));
    }

    #[test]
    fn test_resolve_returns_provisioned_table() {
        assert_eq!(Config::resolve(), CONFIG);
    }
}
