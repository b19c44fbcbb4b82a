//! Infrastructure: clock port and its implementations.

pub mod clock;
pub mod ports;

pub use clock::SystemClock;
pub use ports::ClockPort;
