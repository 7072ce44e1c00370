//! The VME bus primitive the driver sits on.
//!
//! Translating a bus address into something the CPU can reach is the job of the platform's VME
//! library (a bridge driver, a kernel module, ...). This crate only needs ordered 16-bit reads and
//! writes at a bus address, which is what [`VmeBus`] describes.
//!
//! [`MappedWindow`] implements the trait on top of a region which has already been mapped into the
//! local address space by such a library.

use thiserror::Error;

use crate::address::AddressModifier;

/// Ordered D16 accesses on a VME bus.
pub trait VmeBus {
    type Error: core::fmt::Debug;

    /// Perform one 16-bit read cycle.
    fn read_u16(&mut self, am: AddressModifier, address: u32) -> Result<u16, Self::Error>;

    /// Perform one 16-bit write cycle.
    fn write_u16(&mut self, am: AddressModifier, address: u32, value: u16)
    -> Result<(), Self::Error>;
}

impl<B: VmeBus + ?Sized> VmeBus for &mut B {
    type Error = B::Error;

    fn read_u16(&mut self, am: AddressModifier, address: u32) -> Result<u16, Self::Error> {
        (**self).read_u16(am, address)
    }

    fn write_u16(
        &mut self,
        am: AddressModifier,
        address: u32,
        value: u16,
    ) -> Result<(), Self::Error> {
        (**self).write_u16(am, address, value)
    }
}

/// Errors of a [`MappedWindow`] access.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    #[error("Address {0:#010x} is outside of the mapped window")]
    OutOfWindow(u32),
    #[error("Address {0:#010x} is not 16-bit aligned")]
    Misaligned(u32),
    #[error("Window was mapped for AM {mapped:#04x}, access used AM {requested:#04x}")]
    WrongAddressSpace { mapped: u8, requested: u8 },
}

/// A slice of VME address space mapped into local memory.
///
/// Bus address `bus_base + n` corresponds to local address `local_base + n`.
pub struct MappedWindow {
    bus_base: u32,
    am: AddressModifier,
    local_base: *mut u8,
    len: usize,
}

impl MappedWindow {
    /// Wrap a region previously returned by a bus-to-local translation.
    ///
    /// # Safety
    ///
    /// `local_base` must point to `len` bytes which stay mapped for the lifetime of the window,
    /// must be 2-byte aligned, and must mirror the VME region starting at `bus_base` in the
    /// address space selected by `am`. Nothing else may access the region through a reference
    /// while the window exists.
    pub unsafe fn new(bus_base: u32, am: AddressModifier, local_base: *mut u8, len: usize) -> Self {
        Self {
            bus_base,
            am,
            local_base,
            len,
        }
    }

    /// First bus address covered by this window.
    pub fn bus_base(&self) -> u32 {
        self.bus_base
    }

    /// Number of bytes covered by this window.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset into the window of a 16-bit access at `address`.
    fn offset_of(&self, am: AddressModifier, address: u32) -> Result<usize, WindowError> {
        if am != self.am {
            return Err(WindowError::WrongAddressSpace {
                mapped: self.am.code(),
                requested: am.code(),
            });
        }
        if address % 2 != 0 {
            return Err(WindowError::Misaligned(address));
        }
        let offset = address
            .checked_sub(self.bus_base)
            .ok_or(WindowError::OutOfWindow(address))? as usize;
        match offset.checked_add(2) {
            Some(end) if end <= self.len => Ok(offset),
            _ => Err(WindowError::OutOfWindow(address)),
        }
    }
}

impl VmeBus for MappedWindow {
    type Error = WindowError;

    fn read_u16(&mut self, am: AddressModifier, address: u32) -> Result<u16, Self::Error> {
        let offset = self.offset_of(am, address)?;
        // SAFETY: the offset is inside the window and aligned, see `MappedWindow::new`.
        let value = unsafe { core::ptr::read_volatile(self.local_base.add(offset) as *const u16) };
        Ok(value)
    }

    fn write_u16(
        &mut self,
        am: AddressModifier,
        address: u32,
        value: u16,
    ) -> Result<(), Self::Error> {
        let offset = self.offset_of(am, address)?;
        // SAFETY: the offset is inside the window and aligned, see `MappedWindow::new`.
        unsafe { core::ptr::write_volatile(self.local_base.add(offset) as *mut u16, value) };
        Ok(())
    }
}
