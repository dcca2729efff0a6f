// HTTP routes
pub mod events;
pub mod health;
pub mod reference;

pub use events::*;
pub use health::*;
pub use reference::*;
