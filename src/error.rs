//! Our error types for the V6533 driver.

use thiserror::Error;

use crate::register::Register;

pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error type for V6533 register access.
///
/// `E` is the error type of the underlying [`VmeBus`](crate::bus::VmeBus), passed through untouched.
#[derive(Error, Debug)]
pub enum Error<E: core::fmt::Debug> {
    #[error("VME bus error: {0:?}")]
    Bus(E),
    #[error(transparent)]
    InvalidChannel(#[from] InvalidChannel),
    #[error(transparent)]
    InvalidRange(#[from] OutOfRange),
    #[error("Unexpected value {raw:#06x} in register {register:?}")]
    InvalidValue { register: Register, raw: u16 },
    #[error("Register {0:?} is read only")]
    ReadOnlyRegister(Register),
    #[error("Address {0:#010x} outside of the VME address space")]
    AddressOutOfRange(u32),
}

/// A channel index outside of `0..CHANNEL_COUNT`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid channel index {0}")]
pub struct InvalidChannel(pub u8);

/// A physical value which can't be represented by the target register.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Value {value} outside of [{min}, {max}]")]
pub struct OutOfRange {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}
