//! Host capability ports: monotonic clock and actuator output sink
//!
//! The control core never touches pins or wall-clock time directly. The host
//! injects both capabilities at construction as trait objects, which keeps
//! the core deterministic and testable on any platform.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::debug;

/// Opaque handle for one actuator output line.
///
/// The meaning of the number is platform-specific (a GPIO line on an MCU
/// bridge, a slot in a relay board map, a key in a host-side mock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OutputPin(pub u16);

/// Monotonic millisecond clock capability
pub trait Clock: Send {
    /// Monotonically non-decreasing tick count in milliseconds
    fn now_ms(&self) -> u64;
}

/// Actuator output sink capability
pub trait OutputPort: Send {
    /// Drive a named output line to the energized (`true`) or released state
    fn set(&mut self, pin: OutputPin, on: bool);
}

/// Wall process clock anchored at construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for simulations and tests
///
/// Clones share the same underlying counter, so a handle kept by the test
/// can advance time while the controller owns its boxed copy.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}

/// In-memory output sink; the host mock of the pin image
///
/// Clones share one pin image so a test or supervisor UI can observe levels
/// while the controller owns its boxed copy. Level changes are logged.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutputs {
    pins: Arc<Mutex<HashMap<u16, bool>>>,
}

impl MemoryOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of one output line (false when never driven)
    pub fn level(&self, pin: OutputPin) -> bool {
        match self.pins.lock() {
            Ok(pins) => pins.get(&pin.0).copied().unwrap_or(false),
            Err(_) => false,
        }
    }
}

impl OutputPort for MemoryOutputs {
    fn set(&mut self, pin: OutputPin, on: bool) {
        if let Ok(mut pins) = self.pins.lock() {
            let prev = pins.insert(pin.0, on);
            if prev != Some(on) {
                debug!("output {} -> {}", pin.0, if on { "ON" } else { "OFF" });
            }
        }
    }
}
