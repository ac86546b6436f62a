use anyhow::{anyhow, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use crate::config::WifiCredentials;
use crate::traits::NetworkConnection;

/// Station-mode WiFi link to the one configured network
pub struct WifiConnection {
    wifi: BlockingWifi<EspWifi<'static>>,
    ssid: String,
}

impl WifiConnection {
    pub fn new(
        modem: Modem,
        sys_loop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        credentials: &WifiCredentials,
    ) -> Result<Self> {
        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sys_loop.clone(), Some(nvs))?,
            sys_loop,
        )?;

        let auth_method = if credentials.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let wifi_config = Configuration::Client(ClientConfiguration {
            ssid: credentials
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("SSID '{}' is too long", credentials.ssid))?,
            password: credentials
                .password
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("WiFi password is too long"))?,
            auth_method,
            ..Default::default()
        });
        wifi.set_configuration(&wifi_config)?;

        Ok(Self {
            wifi,
            ssid: credentials.ssid.clone(),
        })
    }

    pub fn get_ip_info(&self) -> Result<esp_idf_svc::ipv4::IpInfo> {
        Ok(self.wifi.wifi().sta_netif().get_ip_info()?)
    }
}

impl NetworkConnection for WifiConnection {
    fn begin(&mut self) -> Result<()> {
        info!("Attempting to connect to network: {}", self.ssid);
        self.wifi.start()?;
        // Non-blocking, the controller polls is_connected
        self.wifi.wifi_mut().connect()?;
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        let associated = matches!(self.wifi.is_connected(), Ok(true));
        let up = associated && matches!(self.wifi.is_up(), Ok(true));
        if up {
            if let Ok(ip_info) = self.get_ip_info() {
                log::debug!("IP: {}", ip_info.ip);
            }
        }
        up
    }

    fn reconnect(&mut self) -> Result<()> {
        if let Err(e) = self.wifi.wifi_mut().disconnect() {
            warn!("Disconnect before reconnect failed: {}", e);
        }
        self.wifi.wifi_mut().connect()?;
        Ok(())
    }
}
