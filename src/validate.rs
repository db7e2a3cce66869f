// Syntactic checks on provisioned values.
//
// This module only depends on `core`: the build script includes it with
// `#[path]` to reject malformed provisioning files before the firmware image
// is produced.

/// Template value shipped for the WiFi SSID
pub const PLACEHOLDER_WIFI_SSID: &str = "YOUR_WIFI_SSID";
/// Template value shipped for the WiFi password
pub const PLACEHOLDER_WIFI_PSK: &str = "YOUR_WIFI_PASSWORD";
/// Template value shipped for the backend base URL
pub const PLACEHOLDER_BACKEND_URL: &str = "https://your-project.supabase.co";
/// Template value shipped for the backend API key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_BACKEND_API_KEY";
/// Template value shipped for the device identifier
pub const PLACEHOLDER_DEVICE_ID: &str = "YOUR_DEVICE_UUID_HERE";

const PLACEHOLDERS: [&str; 5] = [
    PLACEHOLDER_WIFI_SSID,
    PLACEHOLDER_WIFI_PSK,
    PLACEHOLDER_BACKEND_URL,
    PLACEHOLDER_API_KEY,
    PLACEHOLDER_DEVICE_ID,
];

/// Maximum SSID length accepted by the WiFi driver
pub const MAX_SSID_LEN: usize = 32;
/// Maximum pre-shared key length accepted by the WiFi driver
pub const MAX_PSK_LEN: usize = 64;
/// Maximum backend base URL length, leaving room for the REST path and table
pub const MAX_BACKEND_URL_LEN: usize = 96;
/// Maximum backend API key length (JWT anon keys run ~200 bytes)
pub const MAX_API_KEY_LEN: usize = 312;

/// Returns true if `value` is one of the template placeholders.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDERS.contains(&value)
}

/// Validate an `https://host[:port][/path]` base URL.
///
/// The host must be a dotted sequence of non-empty labels made of ASCII
/// alphanumerics and `-` (no leading or trailing `-`). REST paths are
/// appended to the URL, so a query or fragment is rejected. Whitespace and
/// control characters are rejected anywhere in the URL.
pub fn is_https_url(url: &str) -> bool {
    if url
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '?' || c == '#')
    {
        return false;
    }

    const SCHEME: &str = "https://";
    let rest = match url.get(..SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => &url[SCHEME.len()..],
        _ => return false,
    };

    let authority_end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    // Userinfo is not something a device should carry in its base URL
    if authority.contains('@') {
        return false;
    }

    let (host, port) = match authority.split_once(':') {
        Some((h, p)) => (h, Some(p)),
        None => (authority, None),
    };

    if let Some(port) = port {
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match port.parse::<u16>() {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
    }

    is_hostname(host)
}

fn is_hostname(host: &str) -> bool {
    if host.is_empty() || host.len() > 253 {
        return false;
    }

    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// Validate a UUID in canonical 8-4-4-4-12 hexadecimal form (either case).
pub fn is_uuid(value: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let mut parts = value.split('-');
    for expected in GROUPS {
        match parts.next() {
            Some(group) if group.len() == expected => {
                if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return false;
                }
            }
            _ => return false,
        }
    }

    // Reject trailing groups (e.g. "...-afa6-00")
    parts.next().is_none()
}

/// A usable multiplier: finite and non-zero.
pub fn is_usable_multiplier(value: f32) -> bool {
    value.is_finite() && value != 0.0
}

/// Build-time view of a provisioning file
pub struct Provisioning<'a> {
    pub wifi_ssid: &'a str,
    pub wifi_psk: &'a str,
    pub backend_url: &'a str,
    pub backend_api_key: &'a str,
    pub device_id: &'a str,
    pub ph_offset: f32,
    pub tds_multiplier: f32,
    pub turbidity_offset: f32,
}

/// Reason a provisioning file cannot be compiled into the firmware
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    WifiSsidEmpty,
    WifiSsidTooLong,
    WifiPskEmpty,
    WifiPskTooLong,
    BackendUrlInvalid,
    BackendUrlTooLong,
    BackendApiKeyEmpty,
    BackendApiKeyTooLong,
    DeviceIdInvalid,
    OffsetNotFinite,
    MultiplierUnusable,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::WifiSsidEmpty => "wifi_ssid must not be empty",
            Rejection::WifiSsidTooLong => "wifi_ssid is longer than 32 bytes",
            Rejection::WifiPskEmpty => "wifi_psk must not be empty",
            Rejection::WifiPskTooLong => "wifi_psk is longer than 64 bytes",
            Rejection::BackendUrlInvalid => {
                "backend_url is not a valid https URL without query or fragment"
            }
            Rejection::BackendUrlTooLong => "backend_url is longer than 96 bytes",
            Rejection::BackendApiKeyEmpty => "backend_api_key must not be empty",
            Rejection::BackendApiKeyTooLong => "backend_api_key is longer than 312 bytes",
            Rejection::DeviceIdInvalid => "device_id is not a valid UUID",
            Rejection::OffsetNotFinite => "calibration offsets must be finite",
            Rejection::MultiplierUnusable => {
                "calibration.tds_multiplier must be finite and non-zero"
            }
        }
    }
}

impl<'a> Provisioning<'a> {
    /// Names of the fields still holding their template value.
    pub fn placeholder_fields(&self) -> impl Iterator<Item = &'static str> + 'a {
        [
            ("wifi_ssid", self.wifi_ssid),
            ("wifi_psk", self.wifi_psk),
            ("backend_url", self.backend_url),
            ("backend_api_key", self.backend_api_key),
            ("device_id", self.device_id),
        ]
        .into_iter()
        .filter(|(_, value)| is_placeholder(value))
        .map(|(field, _)| field)
    }

    /// Reject malformed values. Placeholders pass so the template builds.
    pub fn check(&self) -> Result<(), Rejection> {
        if self.wifi_ssid.is_empty() {
            return Err(Rejection::WifiSsidEmpty);
        }
        if self.wifi_ssid.len() > MAX_SSID_LEN {
            return Err(Rejection::WifiSsidTooLong);
        }
        if self.wifi_psk.is_empty() {
            return Err(Rejection::WifiPskEmpty);
        }
        if self.wifi_psk.len() > MAX_PSK_LEN {
            return Err(Rejection::WifiPskTooLong);
        }
        if !is_https_url(self.backend_url) {
            return Err(Rejection::BackendUrlInvalid);
        }
        if self.backend_url.len() > MAX_BACKEND_URL_LEN {
            return Err(Rejection::BackendUrlTooLong);
        }
        if self.backend_api_key.is_empty() {
            return Err(Rejection::BackendApiKeyEmpty);
        }
        if self.backend_api_key.len() > MAX_API_KEY_LEN {
            return Err(Rejection::BackendApiKeyTooLong);
        }
        if !is_placeholder(self.device_id) && !is_uuid(self.device_id) {
            return Err(Rejection::DeviceIdInvalid);
        }
        if !self.ph_offset.is_finite() || !self.turbidity_offset.is_finite() {
            return Err(Rejection::OffsetNotFinite);
        }
        if !is_usable_multiplier(self.tds_multiplier) {
            return Err(Rejection::MultiplierUnusable);
        }
        Ok(())
    }
}
