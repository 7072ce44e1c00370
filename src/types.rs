//! Decoded register values: enumerated settings, status bit fields and the trip time.

use modular_bitfield::prelude::*;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{
    address::{CHANNEL_COUNT, Channel},
    error::OutOfRange,
};

/// Trip time ticks. One tick is one count of the TRIP_TIME register.
pub type Deciseconds = fugit::Duration<u32, 1, 10>;

/// Channel ON/OFF, as held by the PW register.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PowerState {
    #[default]
    Off = 0x00,
    On = 0x01,
}

impl From<PowerState> for bool {
    fn from(value: PowerState) -> Self {
        match value {
            PowerState::Off => false,
            PowerState::On => true,
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        match value {
            true => PowerState::On,
            false => PowerState::Off,
        }
    }
}

impl TryFrom<u16> for PowerState {
    type Error = u16;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(PowerState::Off),
            0x01 => Ok(PowerState::On),
            other => Err(other),
        }
    }
}

/// What the channel does when switched off or tripped.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerDownMode {
    /// Output drops to zero at the fastest available rate.
    Kill = 0x00,
    /// Output ramps down at the RAMP_DOWN rate.
    Ramp = 0x01,
}

impl TryFrom<u16> for PowerDownMode {
    type Error = u16;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(PowerDownMode::Kill),
            0x01 => Ok(PowerDownMode::Ramp),
            other => Err(other),
        }
    }
}

/// Output polarity, fixed in hardware.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative = 0x00,
    Positive = 0x01,
}

impl TryFrom<u16> for Polarity {
    type Error = u16;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Polarity::Negative),
            0x01 => Ok(Polarity::Positive),
            other => Err(other),
        }
    }
}

/// Which current monitor register holds the valid reading.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImonRange {
    /// Read IMONH, [0 : 3100] uA.
    High = 0x00,
    /// Read IMONL, [0 : 300] uA.
    Low = 0x01,
}

impl TryFrom<u16> for ImonRange {
    type Error = u16;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ImonRange::High),
            0x01 => Ok(ImonRange::Low),
            other => Err(other),
        }
    }
}

/// Time an over current condition may last before the channel trips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TripTime {
    Finite(Deciseconds),
    /// The channel never trips.
    Infinite,
}

impl TripTime {
    /// Raw register value the board treats as infinite (1000 s).
    pub const INFINITE_RAW: u16 = 10_000;

    pub fn from_raw(raw: u16) -> Self {
        if raw >= Self::INFINITE_RAW {
            TripTime::Infinite
        } else {
            TripTime::Finite(Deciseconds::from_ticks(raw as u32))
        }
    }

    pub fn to_raw(&self) -> Result<u16, OutOfRange> {
        match self {
            TripTime::Infinite => Ok(Self::INFINITE_RAW),
            TripTime::Finite(duration) if duration.ticks() <= Self::INFINITE_RAW as u32 => {
                Ok(duration.ticks() as u16)
            }
            TripTime::Finite(duration) => Err(OutOfRange {
                value: duration.ticks() as f32 / 10.0,
                min: 0.0,
                max: 1000.0,
            }),
        }
    }
}

impl From<Deciseconds> for TripTime {
    fn from(value: Deciseconds) -> Self {
        TripTime::Finite(value)
    }
}

/// Board status word.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStatus {
    pub ch0_alarm: bool,
    pub ch1_alarm: bool,
    pub ch2_alarm: bool,
    pub ch3_alarm: bool,
    pub ch4_alarm: bool,
    pub ch5_alarm: bool,
    #[skip]
    __: B2,
    pub power_fail: bool,
    pub over_power: bool,
    pub maxv_uncalibrated: bool,
    pub maxi_uncalibrated: bool,
    #[skip]
    __: B4,
}

impl From<u16> for BoardStatus {
    fn from(value: u16) -> Self {
        BoardStatus::from_bytes(value.to_le_bytes())
    }
}

impl From<BoardStatus> for u16 {
    fn from(value: BoardStatus) -> Self {
        u16::from_le_bytes(value.into_bytes())
    }
}

impl BoardStatus {
    /// Whether the alarm bit of `channel` is set.
    pub fn channel_alarm(&self, channel: Channel) -> bool {
        u16::from(*self) & (1 << channel.index()) != 0
    }

    /// All channels currently in alarm.
    pub fn alarmed_channels(&self) -> heapless::Vec<Channel, CHANNEL_COUNT> {
        Channel::iter().filter(|ch| self.channel_alarm(*ch)).collect()
    }
}

/// Conditions reported by the channel status word, by bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum ChannelCondition {
    On = 0,
    RampUp = 1,
    RampDown = 2,
    OverCurrent = 3,
    OverVoltage = 4,
    UnderVoltage = 5,
    MaxV = 6,
    MaxI = 7,
    Trip = 8,
    OverPower = 9,
    OverTemperature = 10,
    Disabled = 11,
    Interlock = 12,
    Uncalibrated = 13,
}

impl ChannelCondition {
    pub const COUNT: usize = 14;
}

/// Channel status word.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStatus {
    pub on: bool,
    pub ramp_up: bool,
    pub ramp_down: bool,
    pub over_current: bool,
    pub over_voltage: bool,
    pub under_voltage: bool,
    pub max_v: bool,
    pub max_i: bool,
    pub trip: bool,
    pub over_power: bool,
    pub over_temperature: bool,
    pub disabled: bool,
    pub interlock: bool,
    pub uncalibrated: bool,
    #[skip]
    __: B2,
}

impl From<u16> for ChannelStatus {
    fn from(value: u16) -> Self {
        ChannelStatus::from_bytes(value.to_le_bytes())
    }
}

impl From<ChannelStatus> for u16 {
    fn from(value: ChannelStatus) -> Self {
        u16::from_le_bytes(value.into_bytes())
    }
}

impl ChannelStatus {
    pub fn is_set(&self, condition: ChannelCondition) -> bool {
        u16::from(*self) & (1 << condition as u8) != 0
    }

    /// All conditions currently flagged.
    pub fn active_conditions(
        &self,
    ) -> heapless::Vec<ChannelCondition, { ChannelCondition::COUNT }> {
        ChannelCondition::iter().filter(|c| self.is_set(*c)).collect()
    }

    /// Whether any fault condition (as opposed to on/ramping) is flagged.
    pub fn has_fault(&self) -> bool {
        u16::from(*self) & 0b0011_1111_1111_1000 != 0
    }
}

/// Microcontroller firmware release.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareRelease {
    pub minor: u8,
    pub major: u8,
}

impl From<u16> for FirmwareRelease {
    fn from(value: u16) -> Self {
        FirmwareRelease::from_bytes(value.to_le_bytes())
    }
}

impl core::fmt::Display for FirmwareRelease {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_status_bits() {
        let status = BoardStatus::from(0b0000_1001_0010_0001);
        assert!(status.ch0_alarm());
        assert!(status.ch5_alarm());
        assert!(!status.ch1_alarm());
        assert!(status.power_fail());
        assert!(!status.over_power());
        assert!(status.maxi_uncalibrated());
        assert_eq!(
            status.alarmed_channels().as_slice(),
            &[Channel::Ch0, Channel::Ch5]
        );
    }

    #[test]
    fn board_status_reserved_bits_ignored() {
        let status = BoardStatus::from(0b1111_0000_1100_0000);
        assert!(status.alarmed_channels().is_empty());
        assert!(!status.power_fail());
    }

    #[test]
    fn channel_status_bits() {
        let status = ChannelStatus::from(0b0001_0001_0000_0011);
        assert!(status.on());
        assert!(status.ramp_up());
        assert!(status.trip());
        assert!(status.interlock());
        assert!(status.has_fault());
        assert_eq!(
            status.active_conditions().as_slice(),
            &[
                ChannelCondition::On,
                ChannelCondition::RampUp,
                ChannelCondition::Trip,
                ChannelCondition::Interlock
            ]
        );
    }

    #[test]
    fn channel_condition_matches_bitfield() {
        // Every named condition must land on the accessor of the same bit.
        for condition in ChannelCondition::iter() {
            let status = ChannelStatus::from(1u16 << condition as u8);
            assert_eq!(status.active_conditions().as_slice(), &[condition]);
        }
        assert_eq!(ChannelCondition::iter().count(), ChannelCondition::COUNT);
    }

    #[test]
    fn ramping_is_not_a_fault() {
        assert!(!ChannelStatus::from(0b0111).has_fault());
        assert!(ChannelStatus::from(1 << 13).has_fault());
    }

    #[test]
    fn firmware_release() {
        let release = FirmwareRelease::from(0x0312);
        assert_eq!(release.major(), 3);
        assert_eq!(release.minor(), 0x12);
        assert_eq!(format!("{}", release), "3.18");
    }

    #[test]
    fn trip_time_conversions() {
        assert_eq!(TripTime::from_raw(25), TripTime::Finite(Deciseconds::from_ticks(25)));
        assert_eq!(TripTime::from_raw(10_000), TripTime::Infinite);
        assert_eq!(TripTime::from_raw(10_001), TripTime::Infinite);
        assert_eq!(TripTime::from_raw(u16::MAX), TripTime::Infinite);
        assert_eq!(
            TripTime::from_raw(9_999),
            TripTime::Finite(Deciseconds::from_ticks(9_999))
        );
        assert_eq!(TripTime::Infinite.to_raw(), Ok(10_000));
        assert_eq!(TripTime::from(Deciseconds::secs(12)).to_raw(), Ok(120));
        assert!(TripTime::Finite(Deciseconds::secs(1001)).to_raw().is_err());
    }

    #[test]
    fn enumerated_values() {
        assert_eq!(PowerState::try_from(1), Ok(PowerState::On));
        assert_eq!(PowerState::from(false), PowerState::Off);
        assert_eq!(PowerDownMode::try_from(1), Ok(PowerDownMode::Ramp));
        assert_eq!(Polarity::try_from(0), Ok(Polarity::Negative));
        assert_eq!(ImonRange::try_from(1), Ok(ImonRange::Low));
        assert_eq!(ImonRange::try_from(2), Err(2));
    }
}
