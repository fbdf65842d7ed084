pub mod person;
pub mod wake_event;

pub use person::*;
pub use wake_event::*;
