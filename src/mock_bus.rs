//! We use this mocking module in unit tests to emulate a VME crate with one board in it.

use crate::{address::AddressModifier, bus::VmeBus};

/// One recorded bus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCycle {
    Read { am: AddressModifier, address: u32 },
    Write { am: AddressModifier, address: u32, value: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    /// Simulated bus error (no DTACK).
    BusError,
    /// The sparse memory ran out of slots.
    MemoryFull,
    /// The cycle log ran out of slots.
    LogFull,
}

/// Our mock type used to emulate the VME bus.
///
/// Unwritten addresses read back as zero.
pub struct MockBus {
    /// Sparse 16-bit register memory
    memory: heapless::LinearMap<u32, u16, 64>,
    /// Every cycle issued on the bus, in order
    cycles: heapless::Vec<BusCycle, 64>,
    /// Flag to simulate bus errors
    should_error: bool,
}

impl VmeBus for MockBus {
    type Error = MockBusError;

    fn read_u16(&mut self, am: AddressModifier, address: u32) -> Result<u16, Self::Error> {
        if self.should_error {
            return Err(MockBusError::BusError);
        }
        self.cycles
            .push(BusCycle::Read { am, address })
            .map_err(|_| MockBusError::LogFull)?;
        Ok(self.memory.get(&address).copied().unwrap_or(0))
    }

    fn write_u16(
        &mut self,
        am: AddressModifier,
        address: u32,
        value: u16,
    ) -> Result<(), Self::Error> {
        if self.should_error {
            return Err(MockBusError::BusError);
        }
        self.cycles
            .push(BusCycle::Write { am, address, value })
            .map_err(|_| MockBusError::LogFull)?;
        self.poke(address, value)
    }
}

impl MockBus {
    /// Create a new MockBus with empty memory
    pub fn new() -> Self {
        Self {
            memory: heapless::LinearMap::new(),
            cycles: heapless::Vec::new(),
            should_error: false,
        }
    }

    /// Preload a register without recording a bus cycle
    pub fn poke(&mut self, address: u32, value: u16) -> Result<(), MockBusError> {
        self.memory
            .insert(address, value)
            .map(|_| ())
            .map_err(|_| MockBusError::MemoryFull)
    }

    /// Current content of a register without recording a bus cycle
    pub fn peek(&self, address: u32) -> Option<u16> {
        self.memory.get(&address).copied()
    }

    /// Cycles issued so far
    pub fn cycles(&self) -> &[BusCycle] {
        &self.cycles
    }

    /// Forget the recorded cycles
    pub fn clear_cycles(&mut self) {
        self.cycles.clear();
    }

    /// Configure whether bus cycles should fail
    pub fn set_error(&mut self, should_error: bool) {
        self.should_error = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AM: AddressModifier = AddressModifier::A24;

    #[test]
    fn test_unwritten_reads_zero() {
        let mut bus = MockBus::new();
        assert_eq!(bus.read_u16(AM, 0x10_0080), Ok(0));
        assert_eq!(bus.peek(0x10_0080), None);
    }

    #[test]
    fn test_write_then_read() {
        let mut bus = MockBus::new();
        bus.write_u16(AM, 0x10_0080, 1234).unwrap();
        assert_eq!(bus.read_u16(AM, 0x10_0080), Ok(1234));
        assert_eq!(
            bus.cycles(),
            &[
                BusCycle::Write {
                    am: AM,
                    address: 0x10_0080,
                    value: 1234
                },
                BusCycle::Read {
                    am: AM,
                    address: 0x10_0080
                },
            ]
        );
    }

    #[test]
    fn test_poke_is_not_recorded() {
        let mut bus = MockBus::new();
        bus.poke(0x10_0058, 0x0100).unwrap();
        assert!(bus.cycles().is_empty());
        assert_eq!(bus.peek(0x10_0058), Some(0x0100));
    }

    #[test]
    fn test_error_simulation() {
        let mut bus = MockBus::new();
        bus.set_error(true);
        assert_eq!(bus.read_u16(AM, 0x10_0080), Err(MockBusError::BusError));
        assert_eq!(bus.write_u16(AM, 0x10_0080, 1), Err(MockBusError::BusError));
        assert!(bus.cycles().is_empty());

        bus.set_error(false);
        assert!(bus.write_u16(AM, 0x10_0080, 1).is_ok());
    }

    #[test]
    fn test_clear_cycles() {
        let mut bus = MockBus::new();
        bus.read_u16(AM, 0x10_0080).unwrap();
        bus.clear_cycles();
        assert!(bus.cycles().is_empty());
    }
}
