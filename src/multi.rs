/// Set multiple pins at the same time.
///
/// The usual method of setting multiple pins
///
/// ```no_run
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let mut tca = tca9535::Tca9535::new(i2c, false, false, false);
/// # let p = tca.split();
/// # let mut io0 = p.io0_0.into_output().unwrap();
/// # let mut io1 = p.io1_0.into_output().unwrap();
/// io0.set_high().unwrap();
/// io1.set_low().unwrap();
/// ```
///
/// writes the output port twice, so the two pins change state at different times.  The
/// `write_multiple()` function merges the changes into a single output port write:
///
/// ## Example
/// ```no_run
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let mut tca = tca9535::Tca9535::new(i2c, false, false, false);
/// # let p = tca.split();
/// # let mut io0 = p.io0_0.into_output().unwrap();
/// # let mut io1 = p.io1_0.into_output().unwrap();
/// tca9535::write_multiple(
///     [&mut io0, &mut io1],
///     [true, false],
/// ).unwrap();
/// ```
///
/// An empty pin list does nothing and does not touch the bus.
///
/// # Panics
/// If the pins do not all belong to the same chip.
pub fn write_multiple<PD, MUTEX, MODE: crate::mode::HasOutput, const N: usize>(
    pins: [&mut crate::Pin<'_, MODE, MUTEX>; N],
    states: [bool; N],
) -> Result<(), crate::PinError<PD::Error>>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    let mut mask_set_high = 0x0000;
    let mut mask_set_low = 0x0000;

    let Some(port_driver) = pins.first().map(|p| p.port_driver()) else {
        return Ok(());
    };
    for (pin, state) in pins.iter().zip(states.iter()) {
        assert!(core::ptr::eq(pin.port_driver(), port_driver));
        if *state {
            mask_set_high |= pin.pin_mask();
        } else {
            mask_set_low |= pin.pin_mask();
        }
    }

    port_driver
        .lock(|drv| drv.set(mask_set_high, mask_set_low))
        .map_err(crate::PinError)
}

/// Read multiple pins at the same time.
///
/// Checking inputs one after the other
///
/// ```no_run
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let mut tca = tca9535::Tca9535::new(i2c, false, false, false);
/// # let p = tca.split();
/// # let io0 = p.io0_0;
/// # let io1 = p.io1_0;
/// if io0.is_high().unwrap() {
///     // ...
/// } else if io1.is_high().unwrap() {
///     // ...
/// }
/// ```
///
/// reads the input ports once per pin, and the levels may change in between.  `read_multiple()`
/// takes all levels from a single input port read:
///
/// ## Example
/// ```no_run
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let mut tca = tca9535::Tca9535::new(i2c, false, false, false);
/// # let p = tca.split();
/// # let io0 = p.io0_0;
/// # let io1 = p.io1_0;
/// let values = tca9535::read_multiple([&io0, &io1]).unwrap();
/// if values[0] {
///     // ...
/// } else if values[1] {
///     // ...
/// }
/// ```
///
/// An empty pin list returns an empty array without reading the chip.
///
/// # Panics
/// If the pins do not all belong to the same chip.
pub fn read_multiple<PD, MUTEX, MODE: crate::mode::HasInput, const N: usize>(
    pins: [&crate::Pin<'_, MODE, MUTEX>; N],
) -> Result<[bool; N], crate::PinError<PD::Error>>
where
    PD: crate::PortDriver,
    MUTEX: crate::PortMutex<Port = PD>,
{
    let mask = pins.iter().map(|p| p.pin_mask()).fold(0, |m, p| m | p);
    let Some(port_driver) = pins.first().map(|p| p.port_driver()) else {
        return Ok([false; N]);
    };
    for pin in pins.iter() {
        assert!(core::ptr::eq(pin.port_driver(), port_driver));
    }
    let mask_in = port_driver
        .lock(|drv| drv.get(mask, 0))
        .map_err(crate::PinError)?;

    let mut ret = [false; N];
    for (pin, state) in pins.iter().zip(ret.iter_mut()) {
        *state = mask_in & pin.pin_mask() != 0;
    }

    Ok(ret)
}
