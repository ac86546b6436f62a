//! Connect, render, sleep
//!
//! ```text
//!   boot ──► CONNECTING ──first association──► STEADY ◄─┐
//!                ▲                               │      │ clear, draw, refresh, sleep
//!                └──────── restart ◄── reconnect ┴──────┘
//!                          (robust profile, polls exhausted)
//! ```

use std::time::Duration;

use anyhow::Result;
use embedded_graphics::prelude::Point;

use crate::config::Config;
use crate::raster::RenderOptions;
use crate::retry::{self, Escalation, ReconnectPolicy, Recovery};
use crate::traits::{DisplaySurface, NetworkConnection, Power, Refresh};

/// Status poll interval while waiting for the first association
pub const CONNECT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Image drawn and sleep completed
    Rendered,
    /// Reconnect gave up and a restart was issued
    Restarting,
}

/// Everything one cycle needs besides the capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    pub url: String,
    pub origin: Point,
    pub render: RenderOptions,
    pub policy: ReconnectPolicy,
    pub sleep: Duration,
}

impl From<&Config> for LoopSettings {
    fn from(config: &Config) -> Self {
        Self {
            url: config.endpoint.url(),
            origin: Point::zero(),
            render: config.render,
            policy: config.profile.policy(),
            sleep: config.sleep,
        }
    }
}

/// Owns the display, network and power capabilities for the lifetime of the firmware
pub struct LoopController<D, N, P> {
    display: D,
    network: N,
    power: P,
    settings: LoopSettings,
    phase: Phase,
}

impl<D, N, P> LoopController<D, N, P>
where
    D: DisplaySurface,
    N: NetworkConnection,
    P: Power,
{
    pub fn new(display: D, network: N, power: P, settings: LoopSettings) -> Self {
        Self {
            display,
            network,
            power,
            settings,
            phase: Phase::Connecting,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Show the loading screen and block until the first association
    pub fn connect(&mut self) {
        self.phase = Phase::Connecting;

        shown(self.display.clear(), "Clear");
        shown(self.display.print("Loading art"), "Print");
        shown(self.display.refresh(Refresh::Full), "Full refresh");

        log::info!("Joining WiFi");
        if let Err(e) = self.network.begin() {
            log::error!("Failed to start WiFi: {:#}", e);
        }

        let mut polls = 0u32;
        while !self.network.is_connected() {
            self.power.delay(CONNECT_POLL);
            polls += 1;
            shown(self.display.print("."), "Print");
            shown(self.display.refresh(Refresh::Partial), "Partial refresh");
        }
        log::info!("WiFi connected after {} polls", polls);

        shown(self.display.println("Connected!"), "Print");
        shown(self.display.refresh(Refresh::Partial), "Partial refresh");

        self.phase = Phase::Steady;
    }

    /// One steady-state cycle. Only an exhausted robust reconnect leaves it early.
    pub fn cycle(&mut self) -> CycleOutcome {
        let recovery = retry::recover(&self.settings.policy, &mut self.network, &mut self.power);
        if let Recovery::Exhausted { polls } = recovery {
            match self.settings.policy.escalation {
                Escalation::Restart => {
                    log::error!("Restarting after {} failed reconnect polls", polls);
                    self.power.restart();
                    self.phase = Phase::Connecting;
                    return CycleOutcome::Restarting;
                }
                Escalation::Ignore => log::warn!("Rendering without network"),
            }
        }

        shown(self.display.clear(), "Clear");
        if let Err(e) =
            self.display
                .draw_image(&self.settings.url, self.settings.origin, self.settings.render)
        {
            log::warn!("Image not drawn: {:#}", e);
        }
        shown(self.display.refresh(Refresh::Full), "Full refresh");

        log::info!("Sleeping for {} s", self.settings.sleep.as_secs());
        if let Err(e) = self.power.sleep(self.settings.sleep) {
            log::warn!("Light sleep failed: {:#}, waiting instead", e);
            self.power.delay(self.settings.sleep);
        }
        CycleOutcome::Rendered
    }

    /// Connect, then cycle until a restart is issued
    pub fn run(&mut self) {
        self.connect();
        while self.cycle() != CycleOutcome::Restarting {}
    }
}

/// Log a failed panel operation and carry on
fn shown(result: Result<()>, what: &str) {
    if let Err(e) = result {
        log::warn!("{} failed: {:#}", what, e);
    }
}
