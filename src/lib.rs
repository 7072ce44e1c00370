//! This crate provides register level access to the CAEN V6533 family of 6 channel VME high voltage
//! power supply boards (V6533N, V6533P, V6533M).
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! | | |
//! |---|---|
//! | Channels | 6 |
//! | Voltage | 0 - 4000 V, 0.1 V resolution |
//! | Current | 0 - 3100 uA, 0.05 uA resolution (0.005 uA in the low IMON range) |
//! | Ramp rates | 0 - 500 V/s |
//! | Data width | D16 |
//!
//! The board is reached through any implementation of [`bus::VmeBus`]. Mapping VME addresses to
//! local ones is left to the platform's VME library; [`bus::MappedWindow`] can sit on top of a
//! region that library has mapped.
//!
//! The base address is set with the board's rotary switches. Out of the box it is `0x3210_0000`
//! in A32, which the board also answers at `0x10_0000` in A24. See [`address::BoardConfig`].
//!
//! ```ignore
//! let config = BoardConfig::default();
//! let mut hv = V6533::new(bus, config);
//! hv.set_voltage_setpoint_v(Channel::Ch0, 1500.0)?;
//! hv.set_power_state(Channel::Ch0, PowerState::On)?;
//! let vmon = hv.read_voltage_v(Channel::Ch0)?;
//! ```

#![cfg_attr(feature = "no-std", no_std)]

pub mod address;
pub mod bus;
pub mod error;
pub mod psu;
pub mod register;
pub mod scaling;
pub mod types;

pub use address::{AddressModifier, BoardConfig, Channel};
pub use psu::{ChannelMonitor, V6533};

#[cfg(test)]
mod mock_bus;
