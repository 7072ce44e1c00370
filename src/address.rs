//! VME address computation for board and channel registers.

use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

use crate::error::InvalidChannel;

/// Default jumper setting of the board.
///
/// The switches read `3210`, which is `0x3210_0000` in A32. In A24 only the
/// two leading digits take part, giving `0x10_0000`.
pub const DEFAULT_BOARD_ADDRESS: u32 = 0x0010_0000;

/// Byte distance between two consecutive channel register blocks.
///
/// Channel register offsets already include the first block, so the block of channel `n`
/// starts at `base + (n + 1) * CHANNEL_STRIDE`.
pub const CHANNEL_STRIDE: u32 = 0x80;

/// Number of HV channels on a V6533.
pub const CHANNEL_COUNT: usize = 6;

/// VME address modifier used for every access to the board.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressModifier {
    /// Standard (A24) non-privileged data access.
    #[default]
    A24 = 0x39,
    /// Extended (A32) non-privileged data access.
    A32 = 0x09,
}

impl AddressModifier {
    /// The raw AM code driven onto the bus.
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Width in bits of the address space selected by this modifier.
    pub const fn address_bits(&self) -> u32 {
        match self {
            AddressModifier::A24 => 24,
            AddressModifier::A32 => 32,
        }
    }

    /// Whether `address` can be reached with this modifier.
    pub const fn contains(&self, address: u32) -> bool {
        match self {
            AddressModifier::A24 => address < (1 << 24),
            AddressModifier::A32 => true,
        }
    }
}

impl From<AddressModifier> for u8 {
    fn from(value: AddressModifier) -> Self {
        value.code()
    }
}

/// One of the six HV channels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, EnumIter, EnumCountMacro)]
#[repr(u8)]
pub enum Channel {
    Ch0 = 0,
    Ch1 = 1,
    Ch2 = 2,
    Ch3 = 3,
    Ch4 = 4,
    Ch5 = 5,
}

impl Channel {
    /// Zero based channel index.
    pub const fn index(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Channel {
    type Error = InvalidChannel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Channel::Ch0),
            1 => Ok(Channel::Ch1),
            2 => Ok(Channel::Ch2),
            3 => Ok(Channel::Ch3),
            4 => Ok(Channel::Ch4),
            5 => Ok(Channel::Ch5),
            _ => Err(InvalidChannel(value)),
        }
    }
}

impl From<Channel> for u8 {
    fn from(value: Channel) -> Self {
        value.index()
    }
}

/// Where a board lives on the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Base address as set by the board's rotary switches.
    pub base_address: u32,
    /// Address modifier used for all accesses.
    pub address_modifier: AddressModifier,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BOARD_ADDRESS,
            address_modifier: AddressModifier::default(),
        }
    }
}

impl BoardConfig {
    pub const fn new(base_address: u32, address_modifier: AddressModifier) -> Self {
        Self {
            base_address,
            address_modifier,
        }
    }

    /// Use a different base address.
    pub fn with_base_address(mut self, base_address: u32) -> Self {
        self.base_address = base_address;
        self
    }

    /// Use a different address modifier.
    pub fn with_address_modifier(mut self, address_modifier: AddressModifier) -> Self {
        self.address_modifier = address_modifier;
        self
    }
}

/// Bus address of a board level register, `None` if it does not fit in 32 bits.
#[inline]
pub const fn board_register_address(base_address: u32, offset: u16) -> Option<u32> {
    base_address.checked_add(offset as u32)
}

/// Bus address of a channel register, `None` if it does not fit in 32 bits.
#[inline]
pub const fn channel_register_address(
    base_address: u32,
    channel: Channel,
    offset: u16,
) -> Option<u32> {
    match base_address.checked_add(channel.index() as u32 * CHANNEL_STRIDE) {
        Some(block) => block.checked_add(offset as u32),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn board_address() {
        assert_eq!(
            board_register_address(DEFAULT_BOARD_ADDRESS, 0x50),
            Some(0x10_0050)
        );
        assert_eq!(board_register_address(0x3210_0000, 0x5C), Some(0x3210_005C));
    }

    #[test]
    fn address_overflow() {
        assert_eq!(board_register_address(0xFFFF_FFC0, 0x58), None);
        assert_eq!(board_register_address(0xFFFF_FF00, 0x58), Some(0xFFFF_FF58));
        // Block offset alone overflows for channel 5, the register offset for channel 0.
        assert_eq!(
            channel_register_address(0xFFFF_FF80, Channel::Ch5, 0x80),
            None
        );
        assert_eq!(
            channel_register_address(0xFFFF_FF50, Channel::Ch0, 0xB8),
            None
        );
        assert_eq!(
            channel_register_address(0xFFFF_FC00, Channel::Ch5, 0xB8),
            Some(0xFFFF_FF38)
        );
    }

    #[test]
    fn channel_address() {
        // VSET of channel 0 sits directly after the board registers.
        assert_eq!(
            channel_register_address(DEFAULT_BOARD_ADDRESS, Channel::Ch0, 0x80),
            Some(0x10_0080)
        );
        assert_eq!(
            channel_register_address(DEFAULT_BOARD_ADDRESS, Channel::Ch1, 0x80),
            Some(0x10_0100)
        );
        assert_eq!(
            channel_register_address(DEFAULT_BOARD_ADDRESS, Channel::Ch5, 0xB8),
            Some(0x10_0000 + 5 * 0x80 + 0xB8)
        );
    }

    #[test]
    fn channel_conversions() {
        for channel in Channel::iter() {
            assert_eq!(Channel::try_from(channel.index()), Ok(channel));
        }
        assert_eq!(Channel::try_from(6), Err(InvalidChannel(6)));
        assert_eq!(Channel::COUNT, CHANNEL_COUNT);
    }

    #[test]
    fn address_modifier_codes() {
        assert_eq!(AddressModifier::default(), AddressModifier::A24);
        assert_eq!(u8::from(AddressModifier::A24), 0x39);
        assert_eq!(u8::from(AddressModifier::A32), 0x09);
    }

    #[test]
    fn address_modifier_reach() {
        assert!(AddressModifier::A24.contains(0x00FF_FFFE));
        assert!(!AddressModifier::A24.contains(0x3210_0080));
        assert!(AddressModifier::A32.contains(0x3210_0080));
    }

    #[test]
    fn board_config_builder() {
        let config = BoardConfig::default();
        assert_eq!(config.base_address, 0x10_0000);
        assert_eq!(config.address_modifier, AddressModifier::A24);

        let config = config
            .with_base_address(0x3210_0000)
            .with_address_modifier(AddressModifier::A32);
        assert_eq!(config, BoardConfig::new(0x3210_0000, AddressModifier::A32));
    }
}
