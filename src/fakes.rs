//! Host-side stand-ins for the `embedded-hal` traits the panel driver needs.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bus {
    Dc(bool),
    Rst(bool),
    Write(Vec<u8>),
}

pub type Trace = Rc<RefCell<Vec<Bus>>>;

pub struct FakeSpi(pub Trace);

impl spi::ErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                self.0.borrow_mut().push(Bus::Write(bytes.to_vec()));
            }
        }
        Ok(())
    }
}

pub struct FakeDc(pub Trace);

impl digital::ErrorType for FakeDc {
    type Error = Infallible;
}

impl OutputPin for FakeDc {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Bus::Dc(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Bus::Dc(true));
        Ok(())
    }
}

pub struct FakeRst(pub Trace);

impl digital::ErrorType for FakeRst {
    type Error = Infallible;
}

impl OutputPin for FakeRst {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Bus::Rst(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Bus::Rst(true));
        Ok(())
    }
}

/// BUSY line reporting high for the first `high_reads` polls.
pub struct FakeBusy {
    pub high_reads: u32,
    pub reads: Rc<RefCell<u32>>,
}

impl FakeBusy {
    pub fn idle() -> Self {
        Self {
            high_reads: 0,
            reads: Rc::new(RefCell::new(0)),
        }
    }
}

impl digital::ErrorType for FakeBusy {
    type Error = Infallible;
}

impl InputPin for FakeBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let mut reads = self.reads.borrow_mut();
        *reads += 1;
        Ok(*reads <= self.high_reads)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Fold the raw pin/bus trace into `(command, data)` pairs.
pub fn commands(trace: &Trace) -> Vec<(u8, Vec<u8>)> {
    let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
    let mut data_mode = false;
    for event in trace.borrow().iter() {
        match event {
            Bus::Dc(level) => data_mode = *level,
            Bus::Rst(_) => {}
            Bus::Write(bytes) if !data_mode => {
                for byte in bytes {
                    out.push((*byte, Vec::new()));
                }
            }
            Bus::Write(bytes) => {
                if let Some((_, data)) = out.last_mut() {
                    data.extend_from_slice(bytes);
                }
            }
        }
    }
    out
}

pub fn command_bytes(trace: &Trace) -> Vec<u8> {
    commands(trace).into_iter().map(|(cmd, _)| cmd).collect()
}
