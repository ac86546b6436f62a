use std::env;

fn main() {
    // Host builds (unit tests) have no ESP-IDF environment to export
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    for key in [
        "HASHART_WIFI_SSID",
        "HASHART_WIFI_PASSWORD",
        "HASHART_BASE_URL",
        "HASHART_PIECE",
        "HASHART_IMAGE_WIDTH",
        "HASHART_IMAGE_HEIGHT",
        "HASHART_SEED",
        "HASHART_PROFILE",
        "HASHART_DITHER",
        "HASHART_INVERT",
        "HASHART_SLEEP_SECS",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }
}
