//! Actuator drivers
//!
//! One driver instance per physical device. Three variants: plain on/off
//! relays (fan stages, gas furnace, coach-heat stages), compressors with a
//! mandatory minimum off-time before restart, and the reversing valve with a
//! settling window on both transitions. Drivers own all per-device timing
//! state; the supervisor never touches output lines directly.
//!
//! The compressor and valve are event-driven state machines with guarded
//! transitions, encoded as a `match` over (state, event) pairs. Deadlines
//! replace sleeping: a driver whose guard has not yet passed simply stays in
//! its delay state until a later `tick` observes the deadline.

use crate::ports::{OutputPin, OutputPort};

/// Capability set shared by every driver variant
pub trait Device {
    /// Request the device on. Idempotent; gated transitions may defer the
    /// actual output change to a later `tick`.
    fn start(&mut self, now: u64, outputs: &mut dyn OutputPort);

    /// Request the device off. Idempotent.
    fn stop(&mut self, now: u64, outputs: &mut dyn OutputPort);

    /// Advance any armed deadline. No-op for plain relays.
    fn tick(&mut self, now: u64, outputs: &mut dyn OutputPort);

    /// Whether the output line is currently energized
    fn is_on(&self) -> bool;

    /// Tick at which the current or last run began
    fn start_time(&self) -> Option<u64>;

    /// Total energized time, including the current run
    fn run_time_ms(&self, now: u64) -> u64;

    /// Whether a deadline is armed and the driver needs ticking to progress
    fn is_polling(&self) -> bool {
        false
    }

    /// Whether the device has been continuously energized for `ms`
    fn on_for(&self, now: u64, ms: u64) -> bool {
        self.is_on()
            && self
                .start_time()
                .is_some_and(|t| now.saturating_sub(t) >= ms)
    }
}

/// Plain on/off relay driver
#[derive(Debug)]
pub struct Relay {
    pin: OutputPin,
    on: bool,
    start_time: Option<u64>,
    accumulated_run_ms: u64,
}

impl Relay {
    pub fn new(pin: OutputPin) -> Self {
        Self {
            pin,
            on: false,
            start_time: None,
            accumulated_run_ms: 0,
        }
    }
}

impl Device for Relay {
    fn start(&mut self, now: u64, outputs: &mut dyn OutputPort) {
        if !self.on {
            outputs.set(self.pin, true);
            self.start_time = Some(now);
            self.on = true;
        }
    }

    fn stop(&mut self, now: u64, outputs: &mut dyn OutputPort) {
        if self.on {
            outputs.set(self.pin, false);
            if let Some(t) = self.start_time {
                self.accumulated_run_ms += now.saturating_sub(t);
            }
            self.on = false;
        }
    }

    fn tick(&mut self, _now: u64, _outputs: &mut dyn OutputPort) {}

    fn is_on(&self) -> bool {
        self.on
    }

    fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    fn run_time_ms(&self, now: u64) -> u64 {
        let current = match (self.on, self.start_time) {
            (true, Some(t)) => now.saturating_sub(t),
            _ => 0,
        };
        self.accumulated_run_ms + current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompressorState {
    Stop,
    Delay,
    Run,
}

/// Compressor driver with restart protection
///
/// A freshly constructed compressor records its construction tick as the
/// last stop, so even the first start waits out the full restart delay.
#[derive(Debug)]
pub struct Compressor {
    pin: OutputPin,
    state: CompressorState,
    restart_delay_ms: u64,
    requested: bool,
    start_time: Option<u64>,
    stop_time: u64,
    accumulated_run_ms: u64,
}

impl Compressor {
    pub fn new(pin: OutputPin, restart_delay_ms: u64, now: u64) -> Self {
        Self {
            pin,
            state: CompressorState::Stop,
            restart_delay_ms,
            requested: false,
            start_time: None,
            stop_time: now,
            accumulated_run_ms: 0,
        }
    }

    /// Whether the supervisor currently wants this compressor running
    pub fn requested(&self) -> bool {
        self.requested
    }

    /// Tick of the last Run → Stop transition
    pub fn stop_time(&self) -> u64 {
        self.stop_time
    }
}

impl Device for Compressor {
    fn start(&mut self, _now: u64, _outputs: &mut dyn OutputPort) {
        if self.state == CompressorState::Stop {
            self.state = CompressorState::Delay;
            self.requested = true;
        }
    }

    fn stop(&mut self, now: u64, outputs: &mut dyn OutputPort) {
        match self.state {
            CompressorState::Delay => {
                self.state = CompressorState::Stop;
                self.requested = false;
            }
            CompressorState::Run => {
                outputs.set(self.pin, false);
                self.stop_time = now;
                if let Some(t) = self.start_time {
                    self.accumulated_run_ms += now.saturating_sub(t);
                }
                self.state = CompressorState::Stop;
                self.requested = false;
            }
            CompressorState::Stop => {}
        }
    }

    fn tick(&mut self, now: u64, outputs: &mut dyn OutputPort) {
        if self.state == CompressorState::Delay
            && now >= self.stop_time.saturating_add(self.restart_delay_ms)
        {
            outputs.set(self.pin, true);
            self.start_time = Some(now);
            self.state = CompressorState::Run;
        }
    }

    fn is_on(&self) -> bool {
        self.state == CompressorState::Run
    }

    fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    fn run_time_ms(&self, now: u64) -> u64 {
        let current = match (self.state, self.start_time) {
            (CompressorState::Run, Some(t)) => now.saturating_sub(t),
            _ => 0,
        };
        self.accumulated_run_ms + current
    }

    fn is_polling(&self) -> bool {
        self.state == CompressorState::Delay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValveState {
    Stop,
    DelayOn,
    Run,
    DelayOff,
}

/// Reversing-valve driver with settling windows on both transitions
///
/// The refrigerant circuit needs time to equalize around a valve position
/// change; compressors must not run against an unsettled circuit. The same
/// elapsed-time guard closes both the DelayOn and DelayOff windows.
#[derive(Debug)]
pub struct ReversingValve {
    pin: OutputPin,
    state: ValveState,
    settle_ms: u64,
    on: bool,
    requested: bool,
    delay_started_at: u64,
    start_time: Option<u64>,
    accumulated_run_ms: u64,
}

impl ReversingValve {
    pub fn new(pin: OutputPin, settle_ms: u64) -> Self {
        Self {
            pin,
            state: ValveState::Stop,
            settle_ms,
            on: false,
            requested: false,
            delay_started_at: 0,
            start_time: None,
            accumulated_run_ms: 0,
        }
    }

    /// Whether the supervisor currently wants the valve in the heat position
    pub fn requested(&self) -> bool {
        self.requested
    }

    /// Valve is energized and its settling window has elapsed; only now may
    /// compressors run on the heat-pump circuit.
    pub fn settled_on(&self) -> bool {
        self.state == ValveState::Run
    }

    fn settle_elapsed(&self, now: u64) -> bool {
        now >= self.delay_started_at.saturating_add(self.settle_ms)
    }
}

impl Device for ReversingValve {
    fn start(&mut self, now: u64, _outputs: &mut dyn OutputPort) {
        match self.state {
            ValveState::Stop | ValveState::DelayOff => {
                self.state = ValveState::DelayOn;
                self.delay_started_at = now;
                self.requested = true;
            }
            ValveState::DelayOn | ValveState::Run => {}
        }
    }

    fn stop(&mut self, now: u64, _outputs: &mut dyn OutputPort) {
        match self.state {
            ValveState::DelayOn | ValveState::Run => {
                self.state = ValveState::DelayOff;
                self.delay_started_at = now;
                self.requested = false;
            }
            ValveState::Stop | ValveState::DelayOff => {}
        }
    }

    fn tick(&mut self, now: u64, outputs: &mut dyn OutputPort) {
        match self.state {
            ValveState::DelayOn if self.settle_elapsed(now) => {
                outputs.set(self.pin, true);
                self.on = true;
                self.start_time = Some(now);
                self.state = ValveState::Run;
            }
            ValveState::DelayOff if self.settle_elapsed(now) => {
                outputs.set(self.pin, false);
                self.on = false;
                if let Some(t) = self.start_time {
                    self.accumulated_run_ms += now.saturating_sub(t);
                }
                self.state = ValveState::Stop;
            }
            _ => {}
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }

    fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    fn run_time_ms(&self, now: u64) -> u64 {
        let current = match (self.is_on(), self.start_time) {
            (true, Some(t)) => now.saturating_sub(t),
            _ => 0,
        };
        self.accumulated_run_ms + current
    }

    fn is_polling(&self) -> bool {
        matches!(self.state, ValveState::DelayOn | ValveState::DelayOff)
    }
}
