//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services are concrete structs, not traits.

mod bootstrap;
mod navigation;

pub use bootstrap::{BootstrapOptions, Bootstrapper};
pub use navigation::NavigationService;
