#[cfg(target_os = "espidf")]
use hashart_inkplate::{
    esp::{EspPower, HttpFetcher, WifiConnection},
    ssd1680::Ssd1680,
    Config, EpaperSurface, LoopController, LoopSettings,
};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::{delay::Delay, gpio, peripherals::Peripherals, prelude::*, spi},
    nvs::EspDefaultNvsPartition,
};

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("Reset reason: {:?}", esp_idf_svc::hal::reset::ResetReason::get());

    // Fail before touching hardware when the build was not configured
    let config = Config::from_build_env()?;
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {:#}", e);
        return Err(e);
    }
    log::info!("Profile {:?}, image {}", config.profile, config.endpoint.url());

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let spi_driver = spi::SpiDeviceDriver::new_single(
        peripherals.spi2,
        pins.gpio12,                    // SCK
        pins.gpio11,                    // MOSI
        Option::<gpio::AnyIOPin>::None, // No MISO needed for display
        Some(pins.gpio45),              // CS
        &spi::SpiDriverConfig::new().dma(spi::Dma::Disabled),
        &spi::SpiConfig::new().baudrate(4.MHz().into()),
    )?;

    // Display power rail, held high for as long as the driver lives
    let mut power_pin = gpio::PinDriver::output(pins.gpio7)?;
    power_pin.set_high()?;

    let delay = Delay::default();
    delay.delay_ms(100); // Wait for power to stabilize

    let epd = Ssd1680::new(
        spi_driver,
        gpio::PinDriver::input(pins.gpio48)?,  // BUSY
        gpio::PinDriver::output(pins.gpio46)?, // DC
        gpio::PinDriver::output(pins.gpio47)?, // RST
        delay,
    )
    .map_err(|e| anyhow::anyhow!("Could not create EPD driver: {:?}", e))?;

    let surface = EpaperSurface::new(epd, HttpFetcher::new())?;
    let wifi = WifiConnection::new(peripherals.modem, sys_loop, nvs, &config.wifi)?;

    let mut controller =
        LoopController::new(surface, wifi, EspPower, LoopSettings::from(&config));

    // Returns once an exhausted reconnect has issued the restart
    controller.run();
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("hashart-inkplate runs on ESP-IDF targets only, use `cargo test` on the host");
}
