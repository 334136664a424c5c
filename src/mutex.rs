/// Common interface for the mutex guarding a [`Driver`][crate::Driver] shared by its pins.
///
/// All pins of one chip share the driver (and with it the shadow registers), so every pin access
/// goes through this lock.  Which mutex fits depends on where the pins are used:
///
/// | Mutex | Feature Name | Notes |
/// | --- | --- | --- |
/// | [`core::cell::RefCell`] | _always available_ | For sharing within a single execution context. |
/// | [`std::sync::Mutex`][mutex-std] | `std` | For platforms where `std` is available. |
/// | [`critical_section::Mutex`][mutex-cs]`<RefCell<_>>` | `critical-section` | For sharing with interrupt handlers on bare metal. |
///
/// [mutex-std]: https://doc.rust-lang.org/std/sync/struct.Mutex.html
/// [mutex-cs]: https://docs.rs/critical-section/latest/critical_section/struct.Mutex.html
///
/// Other mutex types need a newtype because of the orphan rule:
///
/// ```
/// struct MyMutex<T>(std::sync::Mutex<T>);
///
/// impl<T> tca9535::PortMutex for MyMutex<T> {
///     type Port = T;
///
///     fn create(v: T) -> Self {
///         Self(std::sync::Mutex::new(v))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
///         let mut v = self.0.lock().unwrap();
///         f(&mut v)
///     }
/// }
/// ```
pub trait PortMutex {
    /// The driver wrapped inside this mutex.
    type Port;

    /// Create a new mutex of this type.
    fn create(v: Self::Port) -> Self;

    /// Lock the mutex and give a closure access to the driver inside.
    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R;
}

impl<T> PortMutex for core::cell::RefCell<T> {
    type Port = T;

    fn create(v: Self::Port) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> PortMutex for std::sync::Mutex<T> {
    type Port = T;

    fn create(v: Self::Port) -> Self {
        std::sync::Mutex::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        // shadow registers only change after a completed write, a poisoned lock still holds a
        // consistent driver
        let mut v = self.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut v)
    }
}

#[cfg(feature = "critical-section")]
impl<T> PortMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Port = T;

    fn create(v: Self::Port) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(v))
    }

    fn lock<R, F: FnOnce(&mut Self::Port) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut v = self.borrow_ref_mut(cs);
            f(&mut v)
        })
    }
}
