use std::time::Duration;

use anyhow::{bail, Result};
use embedded_svc::http::client::Client;
use embedded_svc::io::Read;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};

use crate::traits::ImageFetcher;

/// Refuse bodies larger than this, a decoded 800x600 gray image is already ~470 KiB
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
const TIMEOUT: Duration = Duration::from_secs(30);

/// GET over HTTP(S), trusting the ESP-IDF certificate bundle
#[derive(Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>> {
        let connection = EspHttpConnection::new(&HttpConfiguration {
            buffer_size: Some(4096),
            timeout: Some(TIMEOUT),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })?;
        let mut client = Client::wrap(connection);

        log::info!("GET {}", url);
        let mut response = client.get(url)?.submit()?;

        let status = response.status();
        if !(200..300).contains(&status) {
            bail!("HTTP {} from {}", status, url);
        }

        let mut body = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = response.read(&mut buf)?;
            if n == 0 {
                break;
            }
            if body.len() + n > MAX_BODY_BYTES {
                bail!("Response from {} exceeds {} bytes", url, MAX_BODY_BYTES);
            }
            body.extend_from_slice(&buf[..n]);
        }
        Ok(body)
    }
}
