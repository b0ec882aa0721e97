//! # Hestia - RV HVAC control core
//!
//! A deterministic, tick-driven control core for an RV HVAC installation:
//! two air-conditioning compressors, an electric reversing valve for
//! heat-pump operation, a gas furnace, a two-stage variable-coolant coach
//! heater and a two-stage blower fan, all tracking a user temperature
//! setpoint under electromechanical safety and lifetime constraints.
//!
//! ## Features
//!
//! - **Deterministic Control**: all timing is deadline-based on an injected
//!   monotonic clock; no operation blocks or sleeps
//! - **Actuator Protection**: compressor restart delay, fan-before-compressor
//!   airflow delay, compressor stagger and reversing-valve settling are
//!   enforced by per-device state machines and supervisor interlocks
//! - **Availability Aware**: every start request is gated on per-device
//!   availability and user enablement
//! - **Host Agnostic**: pin I/O and the clock are capability traits; the
//!   core runs identically against real outputs or an in-memory mock
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! The crate follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `error`: Error types and the crate-wide `Result`
//! - `hardware`: Hardware item identities and usability flags
//! - `ports`: Clock and output-sink capability traits plus host-side mocks
//! - `actuator`: Per-device driver state machines
//! - `controller`: The supervisor, its sequencing logic and runtime loop

pub mod actuator;
pub mod config;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod logging;
pub mod ports;

// Re-export commonly used types
pub use config::Config;
pub use controller::Controller;
pub use error::{HestiaError, Result};
