use crate::{
    address::{BoardConfig, Channel, board_register_address, channel_register_address},
    bus::VmeBus,
    error::{Error, Result},
    register::{BoardRegister, ChannelRegister, Register},
    scaling::{self, Scale},
    types::{
        BoardStatus, ChannelStatus, FirmwareRelease, ImonRange, Polarity, PowerDownMode,
        PowerState, TripTime,
    },
};

/// You can create a V6533 using any bus which implements [`VmeBus`].
///
/// For its methods, we generally use the nomenclature that "set" means to write a configuration and "get" means
/// to read back a configuration value. Where as "read" means to get a measured value.
pub struct V6533<B: VmeBus> {
    bus: B,
    config: BoardConfig,
}

/// One consistent look at a channel's monitored values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMonitor {
    pub voltage_v: f32,
    pub current_ua: f32,
    /// Range the current was read in.
    pub imon_range: ImonRange,
    pub status: ChannelStatus,
    pub temperature_c: i16,
}

impl<B: VmeBus> V6533<B> {
    /// Create a new V6533 instance on the given bus.
    pub fn new(bus: B, config: BoardConfig) -> Self {
        log::debug!(
            "V6533 at {:#010x}, AM {:#04x}",
            config.base_address,
            config.address_modifier.code()
        );
        Self { bus, config }
    }

    /// The board location this instance talks to.
    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// Give the bus back.
    pub fn release(self) -> B {
        self.bus
    }

    /// Return the hardware voltage limit (front panel trimmer) in volts.
    pub fn get_max_voltage_v(&mut self) -> Result<u16, B::Error> {
        self.read_board_register(BoardRegister::VMax)
    }

    /// Return the hardware current limit (front panel trimmer) in microamps.
    pub fn get_max_current_ua(&mut self) -> Result<u16, B::Error> {
        self.read_board_register(BoardRegister::IMax)
    }

    /// Return the board status word.
    pub fn get_board_status(&mut self) -> Result<BoardStatus, B::Error> {
        let raw = self.read_board_register(BoardRegister::Status)?;
        Ok(BoardStatus::from(raw))
    }

    /// Read the microcontroller firmware release.
    pub fn get_firmware_release(&mut self) -> Result<FirmwareRelease, B::Error> {
        let raw = self.read_board_register(BoardRegister::FwRel)?;
        Ok(FirmwareRelease::from(raw))
    }

    /// Set the channel voltage. Value supplied in volts, [0 : 4000].
    pub fn set_voltage_setpoint_v(
        &mut self,
        channel: Channel,
        voltage_v: f32,
    ) -> Result<(), B::Error> {
        self.write_scaled(channel, ChannelRegister::VSet, scaling::VOLTAGE, voltage_v)
    }

    /// Get the channel voltage setting in volts.
    pub fn get_voltage_setpoint_v(&mut self, channel: Channel) -> Result<f32, B::Error> {
        self.read_scaled(channel, ChannelRegister::VSet, scaling::VOLTAGE)
    }

    /// Set the channel current limit. Value supplied in microamps, [0 : 3100].
    pub fn set_current_limit_ua(
        &mut self,
        channel: Channel,
        current_ua: f32,
    ) -> Result<(), B::Error> {
        self.write_scaled(channel, ChannelRegister::ISet, scaling::CURRENT_HIGH, current_ua)
    }

    /// Get the channel current limit in microamps.
    pub fn get_current_limit_ua(&mut self, channel: Channel) -> Result<f32, B::Error> {
        self.read_scaled(channel, ChannelRegister::ISet, scaling::CURRENT_HIGH)
    }

    /// Return the measured output voltage in volts.
    pub fn read_voltage_v(&mut self, channel: Channel) -> Result<f32, B::Error> {
        self.read_scaled(channel, ChannelRegister::VMon, scaling::VOLTAGE)
    }

    /// Return the measured output current in microamps from the high range monitor.
    ///
    /// Only meaningful while the IMON range is [`ImonRange::High`].
    pub fn read_current_high_ua(&mut self, channel: Channel) -> Result<f32, B::Error> {
        self.read_scaled(channel, ChannelRegister::IMonH, scaling::CURRENT_HIGH)
    }

    /// Return the measured output current in microamps from the low range monitor.
    ///
    /// Only meaningful while the IMON range is [`ImonRange::Low`].
    pub fn read_current_low_ua(&mut self, channel: Channel) -> Result<f32, B::Error> {
        self.read_scaled(channel, ChannelRegister::IMonL, scaling::CURRENT_LOW)
    }

    /// Return the measured output current in microamps, from whichever monitor the
    /// channel's IMON range selects.
    pub fn read_current_ua(&mut self, channel: Channel) -> Result<f32, B::Error> {
        let range = self.get_imon_range(channel)?;
        self.read_current_in_range(channel, range)
    }

    fn read_current_in_range(
        &mut self,
        channel: Channel,
        range: ImonRange,
    ) -> Result<f32, B::Error> {
        match range {
            ImonRange::High => self.read_current_high_ua(channel),
            ImonRange::Low => self.read_current_low_ua(channel),
        }
    }

    /// Switch the channel on or off.
    pub fn set_power_state(
        &mut self,
        channel: Channel,
        state: impl Into<PowerState>,
    ) -> Result<(), B::Error> {
        let state: PowerState = state.into();
        self.write_channel_register(channel, ChannelRegister::Pw, state as u16)
    }

    /// Read whether the channel is switched on.
    pub fn get_power_state(&mut self, channel: Channel) -> Result<PowerState, B::Error> {
        self.read_enum(channel, ChannelRegister::Pw)
    }

    /// Return the channel status word.
    pub fn get_channel_status(&mut self, channel: Channel) -> Result<ChannelStatus, B::Error> {
        let raw = self.read_channel_register(channel, ChannelRegister::ChStatus)?;
        Ok(ChannelStatus::from(raw))
    }

    /// Set how long an over current may last before the channel trips.
    pub fn set_trip_time(
        &mut self,
        channel: Channel,
        trip_time: impl Into<TripTime>,
    ) -> Result<(), B::Error> {
        let raw = trip_time.into().to_raw().inspect_err(|err| {
            log::warn!("TRIP_TIME ch{}: {}", channel.index(), err);
        })?;
        self.write_channel_register(channel, ChannelRegister::TripTime, raw)
    }

    /// Get the channel trip time.
    pub fn get_trip_time(&mut self, channel: Channel) -> Result<TripTime, B::Error> {
        let raw = self.read_channel_register(channel, ChannelRegister::TripTime)?;
        Ok(TripTime::from_raw(raw))
    }

    /// Set the software voltage limit. Value supplied in volts, [0 : 4000].
    pub fn set_software_max_voltage_v(
        &mut self,
        channel: Channel,
        voltage_v: f32,
    ) -> Result<(), B::Error> {
        self.write_scaled(channel, ChannelRegister::SvMax, scaling::VOLTAGE, voltage_v)
    }

    /// Get the software voltage limit in volts.
    pub fn get_software_max_voltage_v(&mut self, channel: Channel) -> Result<f32, B::Error> {
        self.read_scaled(channel, ChannelRegister::SvMax, scaling::VOLTAGE)
    }

    /// Set the ramp down rate in V/s, [0 : 500].
    pub fn set_ramp_down_rate(
        &mut self,
        channel: Channel,
        rate_v_per_s: u16,
    ) -> Result<(), B::Error> {
        self.write_scaled(
            channel,
            ChannelRegister::RampDown,
            scaling::RAMP_RATE,
            rate_v_per_s as f32,
        )
    }

    /// Get the ramp down rate in V/s.
    pub fn get_ramp_down_rate(&mut self, channel: Channel) -> Result<u16, B::Error> {
        self.read_channel_register(channel, ChannelRegister::RampDown)
    }

    /// Set the ramp up rate in V/s, [0 : 500].
    pub fn set_ramp_up_rate(
        &mut self,
        channel: Channel,
        rate_v_per_s: u16,
    ) -> Result<(), B::Error> {
        self.write_scaled(
            channel,
            ChannelRegister::RampUp,
            scaling::RAMP_RATE,
            rate_v_per_s as f32,
        )
    }

    /// Get the ramp up rate in V/s.
    pub fn get_ramp_up_rate(&mut self, channel: Channel) -> Result<u16, B::Error> {
        self.read_channel_register(channel, ChannelRegister::RampUp)
    }

    /// Choose between killing and ramping the output when switching off.
    pub fn set_power_down_mode(
        &mut self,
        channel: Channel,
        mode: PowerDownMode,
    ) -> Result<(), B::Error> {
        self.write_channel_register(channel, ChannelRegister::PwDown, mode as u16)
    }

    /// Get the power down mode.
    pub fn get_power_down_mode(&mut self, channel: Channel) -> Result<PowerDownMode, B::Error> {
        self.read_enum(channel, ChannelRegister::PwDown)
    }

    /// Read the channel polarity.
    pub fn get_polarity(&mut self, channel: Channel) -> Result<Polarity, B::Error> {
        self.read_enum(channel, ChannelRegister::Polarity)
    }

    /// Return the channel temperature in degrees Celsius.
    pub fn read_temperature_c(&mut self, channel: Channel) -> Result<i16, B::Error> {
        let raw = self.read_channel_register(channel, ChannelRegister::Temperature)?;
        Ok(raw as i16)
    }

    /// Select which current monitor is active.
    pub fn set_imon_range(&mut self, channel: Channel, range: ImonRange) -> Result<(), B::Error> {
        self.write_channel_register(channel, ChannelRegister::ImonRange, range as u16)
    }

    /// Get the active current monitor range.
    pub fn get_imon_range(&mut self, channel: Channel) -> Result<ImonRange, B::Error> {
        self.read_enum(channel, ChannelRegister::ImonRange)
    }

    /// Read voltage, current, status and temperature of one channel.
    pub fn read_channel_monitor(&mut self, channel: Channel) -> Result<ChannelMonitor, B::Error> {
        let imon_range = self.get_imon_range(channel)?;
        Ok(ChannelMonitor {
            voltage_v: self.read_voltage_v(channel)?,
            current_ua: self.read_current_in_range(channel, imon_range)?,
            imon_range,
            status: self.get_channel_status(channel)?,
            temperature_c: self.read_temperature_c(channel)?,
        })
    }

    /// Read a board register.
    pub fn read_board_register(&mut self, register: BoardRegister) -> Result<u16, B::Error> {
        let address = board_register_address(self.config.base_address, register.offset());
        self.read_raw(address)
    }

    /// Read a channel register.
    pub fn read_channel_register(
        &mut self,
        channel: Channel,
        register: ChannelRegister,
    ) -> Result<u16, B::Error> {
        let address =
            channel_register_address(self.config.base_address, channel, register.offset());
        self.read_raw(address)
    }

    /// Write a channel register. Read only registers are refused without touching the bus.
    pub fn write_channel_register(
        &mut self,
        channel: Channel,
        register: ChannelRegister,
        value: u16,
    ) -> Result<(), B::Error> {
        if !register.is_writable() {
            log::warn!(
                "refusing write to read only {} ch{}",
                register.info().name,
                channel.index()
            );
            return Err(Error::ReadOnlyRegister(Register::Channel(register)));
        }
        let address =
            channel_register_address(self.config.base_address, channel, register.offset());
        log::debug!("{} ch{} <- {:#06x}", register.info().name, channel.index(), value);
        self.write_raw(address, value)
    }

    fn read_scaled(
        &mut self,
        channel: Channel,
        register: ChannelRegister,
        scale: Scale,
    ) -> Result<f32, B::Error> {
        let raw = self.read_channel_register(channel, register)?;
        Ok(scale.to_units(raw))
    }

    fn write_scaled(
        &mut self,
        channel: Channel,
        register: ChannelRegister,
        scale: Scale,
        value: f32,
    ) -> Result<(), B::Error> {
        let raw = scale.to_raw(value).inspect_err(|err| {
            log::warn!("{} ch{}: {}", register.info().name, channel.index(), err)
        })?;
        self.write_channel_register(channel, register, raw)
    }

    fn read_enum<T: TryFrom<u16, Error = u16>>(
        &mut self,
        channel: Channel,
        register: ChannelRegister,
    ) -> Result<T, B::Error> {
        let raw = self.read_channel_register(channel, register)?;
        T::try_from(raw).map_err(|raw| Error::InvalidValue {
            register: Register::Channel(register),
            raw,
        })
    }

    /// Refuse addresses that overflowed or that the address modifier cannot reach.
    fn checked_address(&self, address: Option<u32>) -> Result<u32, B::Error> {
        match address {
            Some(address) if self.config.address_modifier.contains(address) => Ok(address),
            Some(address) => Err(Error::AddressOutOfRange(address)),
            None => Err(Error::AddressOutOfRange(self.config.base_address)),
        }
    }

    fn read_raw(&mut self, address: Option<u32>) -> Result<u16, B::Error> {
        let address = self.checked_address(address)?;
        let value = self
            .bus
            .read_u16(self.config.address_modifier, address)
            .map_err(Error::Bus)?;
        log::trace!("read {:#010x} -> {:#06x}", address, value);
        Ok(value)
    }

    fn write_raw(&mut self, address: Option<u32>, value: u16) -> Result<(), B::Error> {
        let address = self.checked_address(address)?;
        log::trace!("write {:#010x} <- {:#06x}", address, value);
        self.bus
            .write_u16(self.config.address_modifier, address, value)
            .map_err(Error::Bus)
    }
}
