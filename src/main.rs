#![no_std]
#![no_main]

use static_cell::StaticCell;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println::logger::init_logger;

use water_tank_monitor::constants::*;
use water_tank_monitor::{Backend, Config};

esp_bootloader_esp_idf::esp_app_desc!();

static RESOLVED: StaticCell<Config> = StaticCell::new();

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    init_logger(log::LevelFilter::Info);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    log::info!("Water tank monitor v{}", VERSION);

    // Resolved once, shared read-only for the lifetime of the device
    let config: &'static Config = RESOLVED.init(Config::resolve());

    if let Err(e) = config.validate() {
        // Nothing downstream can work with a template or malformed config:
        // keep reporting until the device is reflashed
        loop {
            log::error!("Invalid configuration: {:?}", e);
            if !config.is_provisioned() {
                log::error!("Fill in cfg.toml and reflash the firmware");
            }
            Timer::after(Duration::from_secs(HALT_REPORT_INTERVAL_SECS)).await;
        }
    }

    log::info!("Configuration: {:?}", config);

    let backend = Backend::from_config(config);
    match backend.rest_url("sensor_readings") {
        Ok(url) => log::info!("Telemetry endpoint: {}", url),
        Err(e) => log::warn!("Telemetry endpoint unavailable: {:?}", e),
    }

    let mut buf = [0u8; CALIBRATION_JSON_MAX];
    match config.calibration.to_settings_json(&mut buf) {
        Ok(len) => log::info!(
            "Active calibration: {}",
            core::str::from_utf8(&buf[..len]).unwrap_or("<invalid utf-8>")
        ),
        Err(e) => log::warn!("Failed to encode calibration: {:?}", e),
    }
}
