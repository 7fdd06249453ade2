//! Raw analog channel abstraction.
//!
//! `embedded-hal` 1.0 dropped its ADC trait, so board code wraps each
//! converter channel in this one.

/// A single analog channel returning raw converter counts.
pub trait AnalogInput {
    type Error: core::fmt::Debug;

    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    type Error = T::Error;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        T::read_raw(self)
    }
}
