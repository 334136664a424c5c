use core::marker::PhantomData;
use embedded_hal::digital::{self as hal_digital, ErrorType};

/// Representation of a single TCA9535 pin.
///
/// `Pin` is not constructed directly, this type is created by instantiating a
/// [`Tca9535`][crate::Tca9535] and then getting access to all its pins using the `.split()`
/// method.  The pin mode is part of the type; switching modes consumes the pin.
pub struct Pin<'a, MODE, MUTEX> {
    pin_mask: u16,
    port_driver: &'a MUTEX,
    _m: PhantomData<MODE>,
}

/// Error returned by pin operations: the bus error of the underlying driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinError<PDE>(pub PDE);

impl<PDE> PinError<PDE> {
    pub fn into_inner(self) -> PDE {
        self.0
    }
}

impl<PDE: core::fmt::Debug> hal_digital::Error for PinError<PDE> {
    fn kind(&self) -> hal_digital::ErrorKind {
        hal_digital::ErrorKind::Other
    }
}

impl<'a, MODE, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    pub(crate) fn new(pin_number: u8, port_driver: &'a MUTEX) -> Self {
        assert!(pin_number < crate::driver::PIN_COUNT);
        Self {
            pin_mask: 1 << pin_number,
            port_driver,
            _m: PhantomData,
        }
    }

    pub(crate) fn pin_mask(&self) -> u16 {
        self.pin_mask
    }

    pub(crate) fn port_driver(&self) -> &'a MUTEX {
        self.port_driver
    }

    fn into_mode<NEW>(self) -> Pin<'a, NEW, MUTEX> {
        Pin {
            pin_mask: self.pin_mask,
            port_driver: self.port_driver,
            _m: PhantomData,
        }
    }
}

impl<'a, MODE, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver + crate::PortDriverTotemPole,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Configure this pin as an input.
    pub fn into_input(self) -> Result<Pin<'a, crate::mode::Input, MUTEX>, PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin_mask, crate::Direction::Input, false))
            .map_err(PinError)?;
        Ok(self.into_mode())
    }

    /// Configure this pin as an output with an initial LOW state.
    ///
    /// The LOW state is written to the output port before the configuration register changes.
    pub fn into_output(self) -> Result<Pin<'a, crate::mode::Output, MUTEX>, PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin_mask, crate::Direction::Output, false))
            .map_err(PinError)?;
        Ok(self.into_mode())
    }

    /// Configure this pin as an output with an initial HIGH state.
    ///
    /// The HIGH state is written to the output port before the configuration register changes.
    pub fn into_output_high(
        self,
    ) -> Result<Pin<'a, crate::mode::Output, MUTEX>, PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set_direction(self.pin_mask, crate::Direction::Output, true))
            .map_err(PinError)?;
        Ok(self.into_mode())
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver + crate::PortDriverPolarity,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Turn on hardware polarity inversion for this pin.
    pub fn into_inverted(self) -> Result<Self, PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set_polarity(self.pin_mask, true))
            .map_err(PinError)?;
        Ok(self)
    }

    /// Set hardware polarity inversion for this pin.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set_polarity(self.pin_mask, inverted))
            .map_err(PinError)
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Read the pin's input state and return `true` if it is HIGH.
    ///
    /// Each call reads the input port from the chip.
    pub fn is_high(&self) -> Result<bool, PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.get(self.pin_mask, 0))
            .map(|mask| mask == self.pin_mask)
            .map_err(PinError)
    }

    /// Read the pin's input state and return `true` if it is LOW.
    pub fn is_low(&self) -> Result<bool, PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.get(0, self.pin_mask))
            .map(|mask| mask == self.pin_mask)
            .map_err(PinError)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    /// Set the pin's output state to HIGH.
    ///
    /// The TCA9535 outputs are push-pull, so the pin actively drives HIGH.
    pub fn set_high(&mut self) -> Result<(), PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set(self.pin_mask, 0))
            .map_err(PinError)
    }

    /// Set the pin's output state to LOW.
    pub fn set_low(&mut self) -> Result<(), PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.set(0, self.pin_mask))
            .map_err(PinError)
    }

    /// Return `true` if the pin's output state is HIGH.
    ///
    /// This answers from the driver's output shadow register and does not touch the bus.
    pub fn is_set_high(&self) -> bool {
        self.port_driver
            .lock(|drv| drv.is_set(self.pin_mask, 0) == self.pin_mask)
    }

    /// Return `true` if the pin's output state is LOW.
    pub fn is_set_low(&self) -> bool {
        self.port_driver
            .lock(|drv| drv.is_set(0, self.pin_mask) == self.pin_mask)
    }

    /// Toggle the pin's output state.
    pub fn toggle(&mut self) -> Result<(), PinError<PD::Error>> {
        self.port_driver
            .lock(|drv| drv.toggle(self.pin_mask))
            .map_err(PinError)
    }
}

impl<'a, MODE, MUTEX, PD> ErrorType for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: core::fmt::Debug,
    MUTEX: crate::PortMutex<Port = PD>,
{
    type Error = PinError<PD::Error>;
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, PD> hal_digital::InputPin for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: core::fmt::Debug,
    MUTEX: crate::PortMutex<Port = PD>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> hal_digital::OutputPin for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: core::fmt::Debug,
    MUTEX: crate::PortMutex<Port = PD>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, PD> hal_digital::StatefulOutputPin
    for Pin<'a, MODE, MUTEX>
where
    PD: crate::PortDriver,
    PD::Error: core::fmt::Debug,
    MUTEX: crate::PortMutex<Port = PD>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Pin::is_set_high(self))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(Pin::is_set_low(self))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}
