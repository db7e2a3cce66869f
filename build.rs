use std::{env, error::Error, fs, path::Path, path::PathBuf};

use serde::Deserialize;

#[path = "src/validate.rs"]
#[allow(dead_code)]
mod validate;

const DEFAULT_CONFIG: &str = "cfg.toml";
const EXAMPLE_CONFIG: &str = "cfg.toml.example";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    wifi_ssid: String,
    wifi_psk: String,
    backend_url: String,
    backend_api_key: String,
    device_id: String,
    #[serde(default)]
    calibration: RawCalibration,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawCalibration {
    ph_offset: f32,
    tds_multiplier: f32,
    turbidity_offset: f32,
}

impl Default for RawCalibration {
    fn default() -> Self {
        Self {
            ph_offset: 0.0,
            tds_multiplier: 1.0,
            turbidity_offset: 0.0,
        }
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("WATER_TANK_CONFIG") {
        return PathBuf::from(path);
    }
    if Path::new(DEFAULT_CONFIG).exists() {
        return PathBuf::from(DEFAULT_CONFIG);
    }
    println!(
        "cargo:warning={} not found, building with {}",
        DEFAULT_CONFIG, EXAMPLE_CONFIG
    );
    PathBuf::from(EXAMPLE_CONFIG)
}

// Placeholders only warn so the template still builds; anything else that is
// malformed fails the build.
fn check(raw: &RawConfig) -> Result<(), &'static str> {
    let provisioning = validate::Provisioning {
        wifi_ssid: &raw.wifi_ssid,
        wifi_psk: &raw.wifi_psk,
        backend_url: &raw.backend_url,
        backend_api_key: &raw.backend_api_key,
        device_id: &raw.device_id,
        ph_offset: raw.calibration.ph_offset,
        tds_multiplier: raw.calibration.tds_multiplier,
        turbidity_offset: raw.calibration.turbidity_offset,
    };

    for field in provisioning.placeholder_fields() {
        println!(
            "cargo:warning={} is still the template value, the firmware will not start",
            field
        );
    }

    provisioning.check().map_err(|e| e.message())
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = config_path();

    // Tell Cargo to rerun if the provisioning file or its location changes
    println!("cargo:rerun-if-env-changed=WATER_TANK_CONFIG");
    println!("cargo:rerun-if-changed={}", path.display());
    // A missing file would rerun the script on every build, so creating
    // cfg.toml after building from the example needs `touch build.rs`
    if Path::new(DEFAULT_CONFIG).exists() {
        println!("cargo:rerun-if-changed={}", DEFAULT_CONFIG);
    }
    println!("cargo:rerun-if-changed=src/validate.rs");

    // Read and parse
    let toml_str = fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    check(&raw).map_err(|e| format!("{}: {}", path.display(), e))?;

    // Generate Rust code
    let code = format!(
        r#"
        pub const CONFIG: Config = Config {{
            wifi_ssid: {ssid:?},
            wifi_psk: {psk:?},
            backend_url: {url:?},
            backend_api_key: {key:?},
            device_id: {id:?},
            calibration: Calibration::new({ph:?}, {tds:?}, {turb:?}),
        }};
    "#,
        ssid = raw.wifi_ssid,
        psk = raw.wifi_psk,
        url = raw.backend_url,
        key = raw.backend_api_key,
        id = raw.device_id,
        ph = raw.calibration.ph_offset,
        tds = raw.calibration.tds_multiplier,
        turb = raw.calibration.turbidity_offset,
    );

    // Integration tests re-parse the same file
    let abs = fs::canonicalize(&path)?;
    println!("cargo:rustc-env=WATER_TANK_CONFIG_PATH={}", abs.display());

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    fs::write(dest_path, code)?;
    Ok(())
}
