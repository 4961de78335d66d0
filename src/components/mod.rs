//! The library's value components.

pub mod duration;
pub mod instant;
pub mod range;

#[doc(inline)]
pub use duration::{Duration, DurationComponents};
#[doc(inline)]
pub use instant::{DateTimeComponents, Instant};
#[doc(inline)]
pub use range::{Range, RangeIter};
