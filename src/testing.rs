//! Recording fakes of the loop capabilities, all writing into one shared log
//! so tests can assert on the interleaving.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Result};
use embedded_graphics::prelude::Point;

use crate::raster::RenderOptions;
use crate::traits::{DisplaySurface, NetworkConnection, Power, Refresh};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Clear,
    Print(String),
    DrawImage(String, RenderOptions),
    Refresh(Refresh),
    Begin,
    Status(bool),
    Reconnect,
    Delay(Duration),
    Sleep(Duration),
    Restart,
}

#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

pub struct FakeDisplay {
    log: Log,
    pub fail_draw: bool,
    pub fail_refresh: bool,
}

impl FakeDisplay {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_draw: false,
            fail_refresh: false,
        }
    }
}

impl DisplaySurface for FakeDisplay {
    fn clear(&mut self) -> Result<()> {
        self.log.push(Event::Clear);
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.log.push(Event::Print(text.to_string()));
        Ok(())
    }

    fn draw_image(&mut self, url: &str, _origin: Point, options: RenderOptions) -> Result<()> {
        self.log.push(Event::DrawImage(url.to_string(), options));
        if self.fail_draw {
            bail!("HTTP 500");
        }
        Ok(())
    }

    fn refresh(&mut self, refresh: Refresh) -> Result<()> {
        self.log.push(Event::Refresh(refresh));
        if self.fail_refresh {
            bail!("BUSY stuck");
        }
        Ok(())
    }
}

/// Link that reports down for the first `up_after` status checks (forever when `None`),
/// and down again for good once `drop_after` checks have been made.
pub struct FakeNetwork {
    log: Log,
    up_after: Option<u32>,
    pub drop_after: Option<u32>,
    checks: u32,
}

impl FakeNetwork {
    pub fn new(log: &Log, up_after: Option<u32>) -> Self {
        Self {
            log: log.clone(),
            up_after,
            drop_after: None,
            checks: 0,
        }
    }
}

impl NetworkConnection for FakeNetwork {
    fn begin(&mut self) -> Result<()> {
        self.log.push(Event::Begin);
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        self.checks += 1;
        let dropped = matches!(self.drop_after, Some(n) if self.checks > n);
        let up = !dropped && matches!(self.up_after, Some(n) if self.checks > n);
        self.log.push(Event::Status(up));
        up
    }

    fn reconnect(&mut self) -> Result<()> {
        self.log.push(Event::Reconnect);
        Ok(())
    }
}

pub struct FakePower {
    log: Log,
    pub fail_sleep: bool,
}

impl FakePower {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_sleep: false,
        }
    }
}

impl Power for FakePower {
    fn delay(&mut self, duration: Duration) {
        self.log.push(Event::Delay(duration));
    }

    fn sleep(&mut self, duration: Duration) -> Result<()> {
        self.log.push(Event::Sleep(duration));
        if self.fail_sleep {
            bail!("ESP_ERR_INVALID_STATE");
        }
        Ok(())
    }

    fn restart(&mut self) {
        self.log.push(Event::Restart);
    }
}
