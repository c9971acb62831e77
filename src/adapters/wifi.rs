//! Wi-Fi station-mode adapter.
//!
//! Implements [`LinkPort`]: the domain asks whether the station is
//! associated and requests reconnects; the scheduler paces the attempts.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::EspWifi` in station
//!   mode, power save disabled for minimum command latency.
//! - **all other targets**: a simulated link whose state tests control.
//!
//! Credentials are baked in at build time from `BRIDGE_WIFI_SSID` and
//! `BRIDGE_WIFI_PASS`; nothing is persisted.

use log::info;

use crate::app::ports::{LinkError, LinkPort};

/// Build-time station credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

impl Credentials {
    /// Credentials from the build environment, validated.
    pub fn from_build_env() -> Result<Self, LinkError> {
        let creds = Self {
            ssid: option_env!("BRIDGE_WIFI_SSID").unwrap_or(""),
            password: option_env!("BRIDGE_WIFI_PASS").unwrap_or(""),
        };
        creds.validate()?;
        Ok(creds)
    }

    /// SSID must be 1-32 printable ASCII bytes; a WPA2 password is 8-64
    /// bytes, or empty for an open network.
    pub fn validate(&self) -> Result<(), LinkError> {
        let ssid_ok = (1..=32).contains(&self.ssid.len())
            && self.ssid.bytes().all(|b| (0x20..=0x7E).contains(&b));
        if !ssid_ok {
            return Err(LinkError::NoCredentials);
        }
        if !self.password.is_empty() && !(8..=64).contains(&self.password.len()) {
            return Err(LinkError::NoCredentials);
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Device
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct WifiLink {
    wifi: esp_idf_svc::wifi::EspWifi<'static>,
}

#[cfg(target_os = "espidf")]
impl WifiLink {
    /// Configure the station, start the driver and issue the first
    /// connect.  Does not wait for association.
    pub fn start(
        modem: esp_idf_svc::hal::modem::Modem,
        sys_loop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
        creds: Credentials,
        hostname: &str,
    ) -> Result<Self, LinkError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

        let mut wifi =
            EspWifi::new(modem, sys_loop, Some(nvs)).map_err(|_| LinkError::ConnectFailed)?;

        if let Err(e) = wifi.sta_netif_mut().set_hostname(hostname) {
            log::warn!("WiFi: hostname not set ({})", e);
        }

        let auth_method = if creds.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: creds.ssid.try_into().map_err(|_| LinkError::NoCredentials)?,
            password: creds
                .password
                .try_into()
                .map_err(|_| LinkError::NoCredentials)?,
            auth_method,
            ..Default::default()
        }))
        .map_err(|_| LinkError::ConnectFailed)?;

        wifi.start().map_err(|_| LinkError::ConnectFailed)?;

        let rc = unsafe {
            esp_idf_svc::sys::esp_wifi_set_ps(esp_idf_svc::sys::wifi_ps_type_t_WIFI_PS_NONE)
        };
        if rc != 0 {
            log::warn!("WiFi: power save not disabled (rc={})", rc);
        }

        wifi.connect().map_err(|_| LinkError::ConnectFailed)?;
        info!("WiFi: connecting to '{}' as {}", creds.ssid, hostname);
        Ok(Self { wifi })
    }
}

#[cfg(target_os = "espidf")]
impl LinkPort for WifiLink {
    fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn reconnect(&mut self) -> Result<(), LinkError> {
        info!("WiFi: reconnect");
        self.wifi.connect().map_err(|_| LinkError::ConnectFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation
// ───────────────────────────────────────────────────────────────

/// Host-side link whose association state is set by the caller.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct WifiLink {
    connected: bool,
    reconnects: u32,
}

#[cfg(not(target_os = "espidf"))]
impl WifiLink {
    pub fn start(creds: Credentials) -> Result<Self, LinkError> {
        creds.validate()?;
        info!("WiFi(sim): station '{}' up", creds.ssid);
        Ok(Self {
            connected: true,
            reconnects: 0,
        })
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn reconnects(&self) -> u32 {
        self.reconnects
    }
}

#[cfg(not(target_os = "espidf"))]
impl LinkPort for WifiLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reconnect(&mut self) -> Result<(), LinkError> {
        self.reconnects += 1;
        info!("WiFi(sim): reconnect #{}", self.reconnects);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
