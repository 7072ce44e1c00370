//! This module is used to define the registers on the V6533.
//!
//! Every register is a 16-bit word. Board registers are addressed from the board base address,
//! channel registers from `base + channel * CHANNEL_STRIDE`.

use strum_macros::EnumIter;

use crate::scaling::{self, Scale};

/// Whether a register can be written.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// Engineering unit of a register value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unit {
    Volt,
    MicroAmp,
    Second,
    VoltPerSecond,
    Celsius,
    /// Enumerated values or bit fields.
    Raw,
}

/// Board registers. __All board registers are read only.__
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u16)]
pub enum BoardRegister {
    /// __R__ - Maximum allowed voltage, set by the front panel trimmer.
    ///
    /// [0 : 4100] V, resolution 1 V.
    VMax = 0x50,
    /// __R__ - Maximum allowed current, set by the front panel trimmer.
    ///
    /// [0 : 3100] uA, resolution 1 uA.
    IMax = 0x54,
    /// __R__ - Board status.
    ///
    /// See [`BoardStatus`](crate::types::BoardStatus).
    Status = 0x58,
    /// __R__ - Microcontroller firmware release.
    ///
    /// See [`FirmwareRelease`](crate::types::FirmwareRelease).
    FwRel = 0x5C,
}

/// Per channel registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u16)]
pub enum ChannelRegister {
    /// __R/W__ - Voltage set value.
    ///
    /// [0 : 4000] V, resolution 0.1 V.
    VSet = 0x80,
    /// __R/W__ - Current set value.
    ///
    /// [0 : 3100] uA, resolution 0.05 uA.
    ISet = 0x84,
    /// __R__ - Voltage readback.
    ///
    /// [0 : 4000] V, resolution 0.1 V.
    VMon = 0x88,
    /// __R__ - Current readback while IMON RANGE is HIGH.
    ///
    /// [0 : 3100] uA, resolution 0.05 uA.
    IMonH = 0x8C,
    /// __R/W__ - Channel ON/OFF.
    /// * `0` - Off.
    /// * `1` - On.
    Pw = 0x90,
    /// __R__ - Channel status.
    ///
    /// See [`ChannelStatus`](crate::types::ChannelStatus).
    ChStatus = 0x94,
    /// __R/W__ - Trip time.
    ///
    /// [0 : 1000] s, resolution 0.1 s. 1000 s means infinite.
    TripTime = 0x98,
    /// __R/W__ - Software maximum voltage.
    ///
    /// [0 : 4000] V, resolution 0.1 V.
    SvMax = 0x9C,
    /// __R/W__ - Ramp down rate.
    ///
    /// [0 : 500] V/s, resolution 1 V/s.
    RampDown = 0xA0,
    /// __R/W__ - Ramp up rate.
    ///
    /// [0 : 500] V/s, resolution 1 V/s.
    RampUp = 0xA4,
    /// __R/W__ - Power down mode.
    /// * `0` - Kill.
    /// * `1` - Ramp.
    PwDown = 0xA8,
    /// __R__ - Polarity.
    /// * `0` - Negative.
    /// * `1` - Positive.
    Polarity = 0xAC,
    /// __R__ - Temperature, signed.
    ///
    /// [-40 : 125] degC, resolution 1 degC.
    Temperature = 0xB0,
    /// __R/W__ - Current monitor range.
    /// * `0` - High.
    /// * `1` - Low.
    ImonRange = 0xB4,
    /// __R__ - Current readback while IMON RANGE is LOW.
    ///
    /// [0 : 300] uA, resolution 0.005 uA.
    IMonL = 0xB8,
}

/// Any register of the board. Used for error reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    Board(BoardRegister),
    Channel(ChannelRegister),
}

impl From<BoardRegister> for Register {
    fn from(value: BoardRegister) -> Self {
        Register::Board(value)
    }
}

impl From<ChannelRegister> for Register {
    fn from(value: ChannelRegister) -> Self {
        Register::Channel(value)
    }
}

/// One row of the register map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegisterInfo {
    /// Name as used in the CAEN documentation.
    pub name: &'static str,
    pub offset: u16,
    pub access: Access,
    pub unit: Unit,
    /// `None` for enumerated values and bit fields.
    pub scale: Option<Scale>,
    /// Whether the raw word is two's complement.
    pub signed: bool,
}

impl RegisterInfo {
    const fn new(name: &'static str, offset: u16, access: Access, unit: Unit) -> Self {
        Self {
            name,
            offset,
            access,
            unit,
            scale: None,
            signed: false,
        }
    }

    const fn scaled(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }
}

impl BoardRegister {
    pub const fn offset(&self) -> u16 {
        *self as u16
    }

    pub const fn info(&self) -> RegisterInfo {
        use Access::ReadOnly as R;
        let offset = self.offset();
        match self {
            BoardRegister::VMax => {
                RegisterInfo::new("VMAX", offset, R, Unit::Volt).scaled(scaling::MAX_VOLTAGE)
            }
            BoardRegister::IMax => {
                RegisterInfo::new("IMAX", offset, R, Unit::MicroAmp).scaled(scaling::MAX_CURRENT)
            }
            BoardRegister::Status => RegisterInfo::new("STATUS", offset, R, Unit::Raw),
            BoardRegister::FwRel => RegisterInfo::new("FWREL", offset, R, Unit::Raw),
        }
    }
}

impl ChannelRegister {
    pub const fn offset(&self) -> u16 {
        *self as u16
    }

    pub const fn access(&self) -> Access {
        self.info().access
    }

    pub const fn info(&self) -> RegisterInfo {
        use Access::{ReadOnly as R, ReadWrite as RW};
        use ChannelRegister as CR;
        let offset = self.offset();
        match self {
            CR::VSet => RegisterInfo::new("VSET", offset, RW, Unit::Volt).scaled(scaling::VOLTAGE),
            CR::ISet => {
                RegisterInfo::new("ISET", offset, RW, Unit::MicroAmp).scaled(scaling::CURRENT_HIGH)
            }
            CR::VMon => RegisterInfo::new("VMON", offset, R, Unit::Volt).scaled(scaling::VOLTAGE),
            CR::IMonH => {
                RegisterInfo::new("IMONH", offset, R, Unit::MicroAmp).scaled(scaling::CURRENT_HIGH)
            }
            CR::Pw => RegisterInfo::new("PW", offset, RW, Unit::Raw),
            CR::ChStatus => RegisterInfo::new("CHSTATUS", offset, R, Unit::Raw),
            CR::TripTime => {
                RegisterInfo::new("TRIP_TIME", offset, RW, Unit::Second).scaled(scaling::TRIP_TIME)
            }
            CR::SvMax => {
                RegisterInfo::new("SVMAX", offset, RW, Unit::Volt).scaled(scaling::VOLTAGE)
            }
            CR::RampDown => RegisterInfo::new("RAMP_DOWN", offset, RW, Unit::VoltPerSecond)
                .scaled(scaling::RAMP_RATE),
            CR::RampUp => RegisterInfo::new("RAMP_UP", offset, RW, Unit::VoltPerSecond)
                .scaled(scaling::RAMP_RATE),
            CR::PwDown => RegisterInfo::new("PWDOWN", offset, RW, Unit::Raw),
            CR::Polarity => RegisterInfo::new("POLARITY", offset, R, Unit::Raw),
            CR::Temperature => RegisterInfo::new("TEMPERATURE", offset, R, Unit::Celsius)
                .scaled(scaling::TEMPERATURE)
                .signed(),
            CR::ImonRange => RegisterInfo::new("IMON_RANGE", offset, RW, Unit::Raw),
            CR::IMonL => {
                RegisterInfo::new("IMONL", offset, R, Unit::MicroAmp).scaled(scaling::CURRENT_LOW)
            }
        }
    }

    /// Whether this register accepts writes.
    pub const fn is_writable(&self) -> bool {
        matches!(self.access(), Access::ReadWrite)
    }
}

impl From<BoardRegister> for u16 {
    fn from(value: BoardRegister) -> Self {
        value as u16
    }
}

impl From<ChannelRegister> for u16 {
    fn from(value: ChannelRegister) -> Self {
        value as u16
    }
}
