use embedded_hal::i2c::{self, I2c};

/// Blanket trait for types implementing `i2c::I2c`
pub trait I2cBus: I2c {
    type BusError: From<<Self as i2c::ErrorType>::Error>;
}

impl<T, E> I2cBus for T
where
    T: I2c<Error = E>,
    E: i2c::Error,
{
    type BusError = E;
}

/// 16-bit register access for chips with paired port registers.
///
/// The register address selects port 0; the chip auto-increments to port 1 within the same
/// transaction.  Values are sent and received port 0 first, i.e. low byte first.
pub(crate) trait I2cExt {
    type Error;

    fn write_reg16<R: Into<u8>>(&mut self, addr: u8, reg: R, value: u16)
        -> Result<(), Self::Error>;
    fn read_reg16<R: Into<u8>>(&mut self, addr: u8, reg: R) -> Result<u16, Self::Error>;
}

impl<I2C: I2cBus> I2cExt for I2C {
    type Error = I2C::BusError;

    fn write_reg16<R: Into<u8>>(
        &mut self,
        addr: u8,
        reg: R,
        value: u16,
    ) -> Result<(), Self::Error> {
        let [port0, port1] = value.to_le_bytes();
        self.write(addr, &[reg.into(), port0, port1])?;
        Ok(())
    }

    fn read_reg16<R: Into<u8>>(&mut self, addr: u8, reg: R) -> Result<u16, Self::Error> {
        let mut buf = [0x00; 2];
        self.write_read(addr, &[reg.into()], &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }
}
