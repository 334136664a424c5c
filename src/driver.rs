//! The TCA9535 register driver.
//!
//! [`Driver`] keeps shadow copies of the three writable registers (configuration, polarity
//! inversion, output port) so that mask-based updates need no read-modify-write round trip on the
//! bus.  A shadow is only updated after the device acknowledged the write, so it always holds the
//! value the chip actually has.
use crate::I2cExt;

/// Fixed part of the TCA9535 slave address; A2..A0 select the lower three bits.
pub const BASE_ADDRESS: u8 = 0x20;

/// Bus clock the driver is characterized at.  Configure the HAL's I2C peripheral with it.
pub const BUS_FREQUENCY_HZ: u32 = 100_000;

/// Per-transaction timeout to configure on the HAL's I2C peripheral, where supported.
pub const TRANSACTION_TIMEOUT_MS: u32 = 100;

/// Number of I/O pins: two ports of eight.
pub const PIN_COUNT: u8 = 16;

/// Power-on reset value of the configuration register: every pin is an input.
pub const RESET_DIRECTION: u16 = 0xffff;
/// Power-on reset value of the polarity inversion register: nothing inverted.
pub const RESET_POLARITY: u16 = 0x0000;
/// Power-on reset value of the output port register: all outputs high.
pub const RESET_OUTPUT: u16 = 0xffff;

/// Port 0 register addresses.  The port 1 register of each pair sits at the next address and is
/// reached through the chip's auto-increment, so 16-bit accesses only ever name port 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regs {
    InputPort = 0x00,
    OutputPort = 0x02,
    PolarityInversion = 0x04,
    Configuration = 0x06,
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

fn pin_mask(pin: u8) -> u16 {
    assert!(pin < PIN_COUNT, "TCA9535 has no pin {}", pin);
    1 << pin
}

/// Register-level driver for one TCA9535.
///
/// Bit `n` of every 16-bit value is pin `n`: pins 0-7 are `P00..P07` (port 0), pins 8-15 are
/// `P10..P17` (port 1).  On the wire, values travel port 0 first.
///
/// # Panics
/// Methods taking a single `pin` panic if it is not below [`PIN_COUNT`].
pub struct Driver<I2C> {
    i2c: I2C,
    addr: u8,
    direction: u16,
    polarity: u16,
    out: u16,
}

impl<I2C> Driver<I2C> {
    /// Create a driver for the chip at 7-bit address `addr`.
    ///
    /// No bus traffic happens here: the shadow registers assume the chip is in its power-on
    /// reset state.
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            direction: RESET_DIRECTION,
            polarity: RESET_POLARITY,
            out: RESET_OUTPUT,
        }
    }

    /// Create a driver from the levels of the A0, A1 and A2 address pins.
    pub fn with_address_pins(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        let addr = BASE_ADDRESS | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self::new(i2c, addr)
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Last value written to the configuration register (1 = input).
    pub fn direction(&self) -> u16 {
        self.direction
    }

    /// Last value written to the polarity inversion register (1 = inverted).
    pub fn polarity_inversion(&self) -> u16 {
        self.polarity
    }

    /// Last value written to the output port register.
    pub fn output_level(&self) -> u16 {
        self.out
    }

    /// Whether `pin` was last set HIGH in the output register.  Does not touch the bus.
    pub fn is_output_pin_set_high(&self, pin: u8) -> bool {
        self.out & pin_mask(pin) != 0
    }

    /// Give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: crate::I2cBus> Driver<I2C> {
    fn write_register(&mut self, reg: Regs, value: u16) -> Result<(), I2C::BusError> {
        debug!(
            "tca9535@{=u8:#x}: reg {=u8:#x} <- {=u16:#x}",
            self.addr,
            u8::from(reg),
            value
        );
        self.i2c.write_reg16(self.addr, reg, value)
    }

    /// Write the configuration register.  A set bit makes the pin an input.
    pub fn set_direction(&mut self, direction: u16) -> Result<(), I2C::BusError> {
        self.write_register(Regs::Configuration, direction)?;
        self.direction = direction;
        Ok(())
    }

    /// Turn the pins in `mask` into outputs, leaving the others as they are.
    pub fn set_pins_as_output(&mut self, mask: u16) -> Result<(), I2C::BusError> {
        self.set_direction(self.direction & !mask)
    }

    /// Turn the pins in `mask` into inputs, leaving the others as they are.
    pub fn set_pins_as_input(&mut self, mask: u16) -> Result<(), I2C::BusError> {
        self.set_direction(self.direction | mask)
    }

    /// Write the polarity inversion register.  A set bit inverts the reported input level.
    pub fn set_polarity_inversion(&mut self, polarity: u16) -> Result<(), I2C::BusError> {
        self.write_register(Regs::PolarityInversion, polarity)?;
        self.polarity = polarity;
        Ok(())
    }

    pub fn set_pins_polarity_normal(&mut self, mask: u16) -> Result<(), I2C::BusError> {
        self.set_polarity_inversion(self.polarity & !mask)
    }

    pub fn set_pins_polarity_inverse(&mut self, mask: u16) -> Result<(), I2C::BusError> {
        self.set_polarity_inversion(self.polarity | mask)
    }

    /// Replace the whole output port register.
    ///
    /// Levels of pins configured as inputs are stored by the chip and take effect once the pin
    /// becomes an output.
    pub fn set_output_level(&mut self, level: u16) -> Result<(), I2C::BusError> {
        self.write_register(Regs::OutputPort, level)?;
        self.out = level;
        Ok(())
    }

    /// Drive the pins in `mask` HIGH.
    pub fn set_output_pins(&mut self, mask: u16) -> Result<(), I2C::BusError> {
        self.set_output_level(self.out | mask)
    }

    /// Drive the pins in `mask` LOW.
    pub fn clear_output_pins(&mut self, mask: u16) -> Result<(), I2C::BusError> {
        self.set_output_level(self.out & !mask)
    }

    pub fn set_output_pin_high(&mut self, pin: u8) -> Result<(), I2C::BusError> {
        self.set_output_pins(pin_mask(pin))
    }

    pub fn set_output_pin_low(&mut self, pin: u8) -> Result<(), I2C::BusError> {
        self.clear_output_pins(pin_mask(pin))
    }

    pub fn set_output_pin_value(&mut self, pin: u8, value: bool) -> Result<(), I2C::BusError> {
        if value {
            self.set_output_pin_high(pin)
        } else {
            self.set_output_pin_low(pin)
        }
    }

    /// Read both input ports in one transaction.
    ///
    /// This is always a live read; polarity inversion is applied by the chip.  Nothing is cached.
    pub fn get_input_level(&mut self) -> Result<u16, I2C::BusError> {
        let level = self.i2c.read_reg16(self.addr, Regs::InputPort)?;
        debug!("tca9535@{=u8:#x}: input {=u16:#x}", self.addr, level);
        Ok(level)
    }

    /// Read the level of a single pin.
    ///
    /// Every call is its own bus transaction.  For a consistent snapshot of several pins, call
    /// [`get_input_level()`][Driver::get_input_level] once and test the bits.
    pub fn get_pin_value(&mut self, pin: u8) -> Result<bool, I2C::BusError> {
        let mask = pin_mask(pin);
        Ok(self.get_input_level()? & mask != 0)
    }

    pub fn is_pin_high(&mut self, pin: u8) -> Result<bool, I2C::BusError> {
        self.get_pin_value(pin)
    }

    pub fn is_pin_low(&mut self, pin: u8) -> Result<bool, I2C::BusError> {
        self.get_pin_value(pin).map(|high| !high)
    }
}

impl<I2C: crate::I2cBus> crate::PortDriver for Driver<I2C> {
    type Error = I2C::BusError;

    fn set(&mut self, mask_high: u16, mask_low: u16) -> Result<(), Self::Error> {
        self.set_output_level((self.out | mask_high) & !mask_low)
    }

    fn is_set(&self, mask_high: u16, mask_low: u16) -> u16 {
        (self.out & mask_high) | (!self.out & mask_low)
    }

    fn get(&mut self, mask_high: u16, mask_low: u16) -> Result<u16, Self::Error> {
        let in_ = self.get_input_level()?;
        Ok((in_ & mask_high) | (!in_ & mask_low))
    }
}

impl<I2C: crate::I2cBus> crate::PortDriverTotemPole for Driver<I2C> {
    fn set_direction(
        &mut self,
        mask: u16,
        dir: crate::Direction,
        state: bool,
    ) -> Result<(), Self::Error> {
        match dir {
            crate::Direction::Input => self.set_pins_as_input(mask),
            crate::Direction::Output => {
                // set state before switching direction to prevent glitch
                if state {
                    self.set_output_pins(mask)?;
                } else {
                    self.clear_output_pins(mask)?;
                }
                self.set_pins_as_output(mask)
            }
        }
    }
}

impl<I2C: crate::I2cBus> crate::PortDriverPolarity for Driver<I2C> {
    fn set_polarity(&mut self, mask: u16, inverted: bool) -> Result<(), Self::Error> {
        if inverted {
            self.set_pins_polarity_inverse(mask)
        } else {
            self.set_pins_polarity_normal(mask)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Driver;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    const ADDR: u8 = 0x20;

    #[test]
    fn construction_assumes_reset_state() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let drv = Driver::new(bus.clone(), ADDR);
        assert_eq!(drv.address(), ADDR);
        assert_eq!(drv.direction(), 0xffff);
        assert_eq!(drv.polarity_inversion(), 0x0000);
        assert_eq!(drv.output_level(), 0xffff);

        bus.done();
    }

    #[test]
    fn address_pins() {
        let bus = mock_i2c::Mock::new(&[]);

        let drv = Driver::with_address_pins(bus, false, false, false);
        assert_eq!(drv.address(), 0x20);
        let drv = Driver::with_address_pins(drv.release(), true, false, true);
        assert_eq!(drv.address(), 0x25);
        let drv = Driver::with_address_pins(drv.release(), true, true, true);
        assert_eq!(drv.address(), 0x27);

        drv.release().done();
    }

    #[test]
    fn set_direction_writes_configuration_register() {
        let expectations = [mock_i2c::Transaction::write(ADDR, vec![0x06, 0xff, 0x00])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        drv.set_direction(0x00ff).unwrap();
        assert_eq!(drv.direction(), 0x00ff);

        bus.done();
    }

    #[test]
    fn direction_masks() {
        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xf0, 0xff]),
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xf0, 0x0f]),
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xf3, 0x0f]),
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xff, 0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        let mut expected = drv.direction();
        for (output, mask) in [(true, 0x000f), (true, 0xf000), (false, 0x0003), (false, 0xffff)] {
            if output {
                drv.set_pins_as_output(mask).unwrap();
                expected &= !mask;
            } else {
                drv.set_pins_as_input(mask).unwrap();
                expected |= mask;
            }
            assert_eq!(drv.direction(), expected);
        }

        bus.done();
    }

    #[test]
    fn polarity_masks() {
        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x04, 0x5a, 0xa5]),
            mock_i2c::Transaction::write(ADDR, vec![0x04, 0x5a, 0xa5]),
            mock_i2c::Transaction::write(ADDR, vec![0x04, 0x50, 0xa5]),
            mock_i2c::Transaction::write(ADDR, vec![0x04, 0x50, 0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        drv.set_polarity_inversion(0xa55a).unwrap();
        assert_eq!(drv.polarity_inversion(), 0xa55a);
        drv.set_pins_polarity_inverse(0x0002).unwrap();
        assert_eq!(drv.polarity_inversion(), 0xa55a);
        drv.set_pins_polarity_normal(0x000f).unwrap();
        assert_eq!(drv.polarity_inversion(), 0xa550);
        drv.set_pins_polarity_inverse(0xff00).unwrap();
        assert_eq!(drv.polarity_inversion(), 0xff50);

        bus.done();
    }

    #[test]
    fn output_masks() {
        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0x00, 0x00]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0x81, 0x00]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0x81, 0xf0]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0x01, 0x30]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        drv.set_output_level(0x0000).unwrap();
        assert_eq!(drv.output_level(), 0x0000);
        drv.set_output_pins(0x0081).unwrap();
        assert_eq!(drv.output_level(), 0x0081);
        drv.set_output_pins(0xf000).unwrap();
        assert_eq!(drv.output_level(), 0xf081);
        drv.clear_output_pins(0xc080).unwrap();
        assert_eq!(drv.output_level(), 0x3001);

        bus.done();
    }

    #[test]
    fn single_output_pins() {
        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xff, 0x7f]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xfe, 0x7f]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xfe, 0xff]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xff, 0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        drv.set_output_pin_low(15).unwrap();
        assert!(!drv.is_output_pin_set_high(15));
        drv.set_output_pin_value(0, false).unwrap();
        assert!(!drv.is_output_pin_set_high(0));
        drv.set_output_pin_high(15).unwrap();
        assert!(drv.is_output_pin_set_high(15));
        drv.set_output_pin_value(0, true).unwrap();
        assert!(drv.is_output_pin_set_high(0));

        bus.done();
    }

    #[test]
    fn failed_writes_keep_shadow_registers() {
        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0x00, 0xff])
                .with_error(ErrorKind::NoAcknowledge(
                    embedded_hal::i2c::NoAcknowledgeSource::Address,
                )),
            mock_i2c::Transaction::write(ADDR, vec![0x04, 0x01, 0x00])
                .with_error(ErrorKind::Bus),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xfe, 0xff])
                .with_error(ErrorKind::ArbitrationLoss),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0x34, 0x12])
                .with_error(ErrorKind::Other),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        assert!(drv.set_pins_as_output(0x00ff).is_err());
        assert_eq!(drv.direction(), 0xffff);
        assert_eq!(drv.set_pins_polarity_inverse(0x0001), Err(ErrorKind::Bus));
        assert_eq!(drv.polarity_inversion(), 0x0000);
        assert_eq!(drv.set_output_pin_low(0), Err(ErrorKind::ArbitrationLoss));
        assert_eq!(drv.output_level(), 0xffff);
        assert_eq!(drv.set_output_level(0x1234), Err(ErrorKind::Other));
        assert_eq!(drv.output_level(), 0xffff);

        bus.done();
    }

    #[test]
    fn input_level_is_low_byte_first() {
        let expectations = [
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x34, 0x12]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        assert_eq!(drv.get_input_level().unwrap(), 0x1234);
        // live read, shadows untouched
        assert_eq!(drv.output_level(), 0xffff);
        assert_eq!(drv.direction(), 0xffff);

        bus.done();
    }

    #[test]
    fn write_and_read_share_byte_order() {
        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0x34, 0x12]),
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x34, 0x12]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        drv.set_output_level(0x1234).unwrap();
        assert_eq!(drv.get_input_level().unwrap(), drv.output_level());

        bus.done();
    }

    #[test]
    fn pin_reads_are_separate_transactions() {
        let expectations = [
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x01, 0x80]),
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x01, 0x80]),
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x01, 0x80]),
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x00, 0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        assert!(drv.get_pin_value(0).unwrap());
        assert!(drv.is_pin_high(15).unwrap());
        assert!(drv.is_pin_low(1).unwrap());
        assert!(drv.is_pin_low(15).unwrap());

        bus.done();
    }

    #[test]
    fn failed_read_is_reported() {
        let expectations = [
            mock_i2c::Transaction::write_read(ADDR, vec![0x00], vec![0x00, 0x00])
                .with_error(ErrorKind::Other),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        assert_eq!(drv.is_pin_high(3), Err(ErrorKind::Other));

        bus.done();
    }

    #[test]
    #[should_panic]
    fn pin_out_of_range() {
        let bus = mock_i2c::Mock::new(&[]);

        let drv = Driver::new(bus, ADDR);
        drv.is_output_pin_set_high(16);
    }

    #[test]
    fn port_driver_direction_writes_level_first() {
        use crate::{Direction, PortDriver, PortDriverTotemPole};

        let expectations = [
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xfe, 0xff]),
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xfe, 0xff]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xfe, 0xff]),
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xfe, 0xfe]),
            mock_i2c::Transaction::write(ADDR, vec![0x06, 0xff, 0xfe]),
            mock_i2c::Transaction::write(ADDR, vec![0x02, 0xff, 0xfe]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut drv = Driver::new(bus.clone(), ADDR);
        // the inherent `set_direction()` takes a whole register value
        PortDriverTotemPole::set_direction(&mut drv, 0x0001, Direction::Output, false).unwrap();
        PortDriverTotemPole::set_direction(&mut drv, 0x0100, Direction::Output, true).unwrap();
        PortDriverTotemPole::set_direction(&mut drv, 0x0001, Direction::Input, false).unwrap();
        assert_eq!(drv.direction(), 0xfeff);

        drv.toggle(0x0101).unwrap();
        assert_eq!(drv.is_set(0x0001, 0x0100), 0x0101);

        bus.done();
    }
}
