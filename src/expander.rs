//! Pin-level access to a TCA9535, for use with drivers built on `embedded-hal` digital traits.
use crate::Driver;

/// A [`Driver`] behind a [`PortMutex`][crate::PortMutex], split into individual pins.
pub struct Tca9535<M>(M);

impl<I2C> Tca9535<core::cell::RefCell<Driver<I2C>>>
where
    I2C: crate::I2cBus,
{
    /// Create an expander from the levels of its A0, A1 and A2 address pins.
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::with_mutex(i2c, a0, a1, a2)
    }
}

impl<I2C, M> Tca9535<M>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    pub fn with_mutex(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::from_driver(Driver::with_address_pins(i2c, a0, a1, a2))
    }

    /// Wrap an existing driver, keeping its polarity and output shadow registers.
    ///
    /// The pins handed out by [`split()`][Tca9535::split] are typed as inputs, so the driver must
    /// still have every pin configured as an input.
    ///
    /// # Panics
    /// If the driver's direction shadow is not [`RESET_DIRECTION`][crate::RESET_DIRECTION].
    pub fn from_driver(driver: Driver<I2C>) -> Self {
        assert_eq!(
            driver.direction(),
            crate::RESET_DIRECTION,
            "pins must all be inputs to be split"
        );
        Self(M::create(driver))
    }

    pub fn split(&mut self) -> Parts<'_, I2C, M> {
        Parts {
            io0_0: crate::Pin::new(0, &self.0),
            io0_1: crate::Pin::new(1, &self.0),
            io0_2: crate::Pin::new(2, &self.0),
            io0_3: crate::Pin::new(3, &self.0),
            io0_4: crate::Pin::new(4, &self.0),
            io0_5: crate::Pin::new(5, &self.0),
            io0_6: crate::Pin::new(6, &self.0),
            io0_7: crate::Pin::new(7, &self.0),
            io1_0: crate::Pin::new(8, &self.0),
            io1_1: crate::Pin::new(9, &self.0),
            io1_2: crate::Pin::new(10, &self.0),
            io1_3: crate::Pin::new(11, &self.0),
            io1_4: crate::Pin::new(12, &self.0),
            io1_5: crate::Pin::new(13, &self.0),
            io1_6: crate::Pin::new(14, &self.0),
            io1_7: crate::Pin::new(15, &self.0),
        }
    }
}

/// The sixteen pins of one TCA9535, named after the datasheet's `Pxy` (port `x`, bit `y`).
pub struct Parts<'a, I2C, M = core::cell::RefCell<Driver<I2C>>>
where
    I2C: crate::I2cBus,
    M: crate::PortMutex<Port = Driver<I2C>>,
{
    pub io0_0: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_1: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_2: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_3: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_4: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_5: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_6: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_7: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_0: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_1: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_2: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_3: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_4: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_5: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_6: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_7: crate::Pin<'a, crate::mode::Input, M>,
}
