/// Mask-based access to the expander's pins, used by [`Pin`][crate::Pin].
///
/// Bit `n` of every mask refers to pin `n`; port 0 occupies the low byte and port 1 the high
/// byte.
pub trait PortDriver {
    type Error;

    /// Drive the pins in `mask_high` HIGH and the pins in `mask_low` LOW in one register write.
    ///
    /// Pins in neither mask keep their current output level.
    fn set(&mut self, mask_high: u16, mask_low: u16) -> Result<(), Self::Error>;

    /// Compare the last written output levels against the masks.
    ///
    /// A bit in the result is 1 when the pin is in `mask_high` and was set HIGH, or is in
    /// `mask_low` and was set LOW.  Bits outside both masks are always 0.  This must not touch
    /// the bus.
    fn is_set(&self, mask_high: u16, mask_low: u16) -> u16;

    /// Compare the live input levels against the masks.
    ///
    /// Same result encoding as [`is_set()`][PortDriver::is_set], but the levels come from a fresh
    /// read of the input port.
    fn get(&mut self, mask_high: u16, mask_low: u16) -> Result<u16, Self::Error>;

    fn toggle(&mut self, mask: u16) -> Result<(), Self::Error> {
        let mask_high = self.is_set(0, mask);
        let mask_low = self.is_set(mask, 0);
        self.set(mask_high, mask_low)
    }
}

pub trait PortDriverTotemPole: PortDriver {
    /// Switch the pins in `mask` to `dir`.
    ///
    /// When switching to [`Direction::Output`], the output level `state` is written first so the
    /// pins never drive a stale level.
    fn set_direction(&mut self, mask: u16, dir: Direction, state: bool) -> Result<(), Self::Error>;
}

pub trait PortDriverPolarity: PortDriver {
    /// Invert (or restore) the reported input level of the pins in `mask`.
    fn set_polarity(&mut self, mask: u16, inverted: bool) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// Pin modes, tracked in the type of each [`Pin`][crate::Pin].
pub mod mode {
    /// Modes whose level can be driven.
    pub trait HasOutput {}
    /// Modes whose level can be read.
    pub trait HasInput {}

    /// Configuration bit set: the pin is high-impedance and its level is read from the input
    /// port.  All pins start out like this after power-on.
    pub struct Input;
    impl HasInput for Input {}

    /// Configuration bit cleared: the pin drives the level held in the output port.
    pub struct Output;
    impl HasOutput for Output {}
}
