//! Build-time configuration
//!
//! Everything is baked in with `option_env!` when the firmware is compiled:
//!
//! ```sh
//! HASHART_WIFI_SSID=home HASHART_WIFI_PASSWORD=secret123 \
//! HASHART_BASE_URL=https://art.example.com cargo build --release
//! ```
//!
//! Unset values fall back to placeholders which [`Config::validate`] refuses,
//! so a frame flashed without editing fails on boot with a readable message
//! instead of retrying a network that does not exist.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::raster::RenderOptions;
use crate::retry::ReconnectPolicy;

pub const PLACEHOLDER_SSID: &str = "[your ssid here]";
pub const PLACEHOLDER_PASSWORD: &str = "[your password here]";
pub const PLACEHOLDER_HOST: &str = "FILLMEIN";

const MAX_SSID_LEN: usize = 32;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=64;

/// WiFi station credentials
#[derive(Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

// Keep the passphrase out of the logs
impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"***")
            .finish()
    }
}

/// Art server route: `{base}/{piece}/{width}/{height}/{seed}.png`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEndpoint {
    pub base: String,
    pub piece: String,
    pub width: u32,
    pub height: u32,
    pub seed: String,
}

impl ImageEndpoint {
    pub fn url(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}.png",
            self.base.trim_end_matches('/'),
            self.piece,
            self.width,
            self.height,
            self.seed
        )
    }
}

/// Reconnect robustness and sleep length, bundled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Bounded reconnect polling, restart when exhausted, 5 minute sleep
    #[default]
    Robust,
    /// One reconnect request without verification, 1 minute sleep
    Simple,
}

impl Profile {
    pub fn policy(&self) -> ReconnectPolicy {
        match self {
            Profile::Robust => ReconnectPolicy::ROBUST,
            Profile::Simple => ReconnectPolicy::SIMPLE,
        }
    }

    pub fn sleep(&self) -> Duration {
        match self {
            Profile::Robust => Duration::from_secs(5 * 60),
            Profile::Simple => Duration::from_secs(60),
        }
    }
}

impl FromStr for Profile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "robust" => Ok(Profile::Robust),
            "simple" => Ok(Profile::Simple),
            other => bail!("Unknown profile '{}', expected 'robust' or 'simple'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub wifi: WifiCredentials,
    pub endpoint: ImageEndpoint,
    pub profile: Profile,
    pub render: RenderOptions,
    pub sleep: Duration,
}

impl Config {
    /// Values baked in at compile time
    pub fn from_build_env() -> Result<Self> {
        Self::from_lookup(|key| match key {
            "HASHART_WIFI_SSID" => option_env!("HASHART_WIFI_SSID"),
            "HASHART_WIFI_PASSWORD" => option_env!("HASHART_WIFI_PASSWORD"),
            "HASHART_BASE_URL" => option_env!("HASHART_BASE_URL"),
            "HASHART_PIECE" => option_env!("HASHART_PIECE"),
            "HASHART_IMAGE_WIDTH" => option_env!("HASHART_IMAGE_WIDTH"),
            "HASHART_IMAGE_HEIGHT" => option_env!("HASHART_IMAGE_HEIGHT"),
            "HASHART_SEED" => option_env!("HASHART_SEED"),
            "HASHART_PROFILE" => option_env!("HASHART_PROFILE"),
            "HASHART_DITHER" => option_env!("HASHART_DITHER"),
            "HASHART_INVERT" => option_env!("HASHART_INVERT"),
            "HASHART_SLEEP_SECS" => option_env!("HASHART_SLEEP_SECS"),
            _ => None,
        })
    }

    /// Build from any key lookup, unset keys take their defaults
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Result<Self> {
        let get = |key: &str, default: &'a str| lookup(key).unwrap_or(default).to_string();

        let profile: Profile = get("HASHART_PROFILE", "robust").parse()?;
        let sleep = match lookup("HASHART_SLEEP_SECS") {
            Some(secs) => Duration::from_secs(parse_number("HASHART_SLEEP_SECS", secs)?),
            None => profile.sleep(),
        };

        Ok(Self {
            wifi: WifiCredentials {
                ssid: get("HASHART_WIFI_SSID", PLACEHOLDER_SSID),
                password: get("HASHART_WIFI_PASSWORD", PLACEHOLDER_PASSWORD),
            },
            endpoint: ImageEndpoint {
                base: get("HASHART_BASE_URL", "https://FILLMEIN"),
                piece: get("HASHART_PIECE", "random"),
                width: parse_number("HASHART_IMAGE_WIDTH", &get("HASHART_IMAGE_WIDTH", "800"))?,
                height: parse_number("HASHART_IMAGE_HEIGHT", &get("HASHART_IMAGE_HEIGHT", "600"))?,
                seed: get("HASHART_SEED", "random"),
            },
            profile,
            render: RenderOptions {
                dither: parse_flag("HASHART_DITHER", &get("HASHART_DITHER", "true"))?,
                invert: parse_flag("HASHART_INVERT", &get("HASHART_INVERT", "true"))?,
            },
            sleep,
        })
    }

    /// Refuse placeholders and values the WiFi stack or art server would reject
    pub fn validate(&self) -> Result<()> {
        let ssid = &self.wifi.ssid;
        if ssid.is_empty() || ssid == PLACEHOLDER_SSID {
            bail!("WiFi SSID is not configured, set HASHART_WIFI_SSID before building");
        }
        if ssid.len() > MAX_SSID_LEN {
            bail!("WiFi SSID is {} bytes, at most {} allowed", ssid.len(), MAX_SSID_LEN);
        }

        let password = &self.wifi.password;
        if password == PLACEHOLDER_PASSWORD {
            bail!("WiFi password is not configured, set HASHART_WIFI_PASSWORD before building");
        }
        if !password.is_empty() && !PASSWORD_LEN.contains(&password.len()) {
            bail!(
                "WiFi password must be empty (open network) or {}-{} bytes",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            );
        }

        let base = &self.endpoint.base;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("Image base URL '{}' must start with http:// or https://", base);
        }
        if base.contains(PLACEHOLDER_HOST) {
            bail!("Image base URL is not configured, set HASHART_BASE_URL before building");
        }

        for (name, value) in [("piece", &self.endpoint.piece), ("seed", &self.endpoint.seed)] {
            if value.is_empty() || value.contains('/') {
                bail!("Image {} '{}' must be a non-empty path segment", name, value);
            }
        }
        if self.endpoint.width == 0 || self.endpoint.height == 0 {
            bail!(
                "Image size {}x{} must be non-zero",
                self.endpoint.width,
                self.endpoint.height
            );
        }
        if self.sleep.is_zero() {
            bail!("Sleep duration must be non-zero");
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{} = '{}' is not a number", key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{} = '{}' is not a boolean", key, value)),
    }
}
