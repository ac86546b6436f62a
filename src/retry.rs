//! Bounded reconnect with backoff
//!
//! One routine covers both profiles: the robust one polls after the backoff
//! and asks for a restart when the bound runs out, the simple one requests a
//! reconnect, waits once and carries on whatever happened.

use std::time::Duration;

use crate::traits::{NetworkConnection, Power};

/// What to do when the link is still down after the last poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Reboot the device, reconnecting from scratch
    Restart,
    /// Carry on without network
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Wait after issuing the reconnect request
    pub backoff: Duration,
    /// Wait between status polls
    pub poll_interval: Duration,
    /// Status polls before giving up, 0 skips verification entirely
    pub max_polls: u32,
    pub escalation: Escalation,
}

impl ReconnectPolicy {
    pub const ROBUST: Self = Self {
        backoff: Duration::from_secs(5),
        poll_interval: Duration::from_secs(1),
        max_polls: 10,
        escalation: Escalation::Restart,
    };

    pub const SIMPLE: Self = Self {
        backoff: Duration::from_secs(5),
        poll_interval: Duration::from_secs(1),
        max_polls: 0,
        escalation: Escalation::Ignore,
    };
}

/// Result of one [`recover`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Link was up, nothing was done
    Connected,
    /// Link came back after `polls` poll intervals
    Reconnected { polls: u32 },
    /// Reconnect requested but not checked
    Unverified,
    /// Still down after every poll
    Exhausted { polls: u32 },
}

/// Make sure the link is up, or report why it is not
///
/// The escalation action itself is left to the caller.
pub fn recover<N, P>(policy: &ReconnectPolicy, network: &mut N, power: &mut P) -> Recovery
where
    N: NetworkConnection,
    P: Power,
{
    if network.is_connected() {
        return Recovery::Connected;
    }

    log::warn!("WiFi disconnected, requesting reconnect");
    if let Err(e) = network.reconnect() {
        log::warn!("Reconnect request failed: {:#}", e);
    }
    power.delay(policy.backoff);

    if policy.max_polls == 0 {
        return Recovery::Unverified;
    }

    let mut polls = 0;
    loop {
        if network.is_connected() {
            log::info!("WiFi reconnected after {} polls", polls);
            return Recovery::Reconnected { polls };
        }
        power.delay(policy.poll_interval);
        polls += 1;
        if polls >= policy.max_polls {
            log::error!("WiFi still down after {} polls", polls);
            return Recovery::Exhausted { polls };
        }
    }
}
