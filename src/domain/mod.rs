//! Pure domain helpers shared by both service roles.
//!
//! Nothing in here touches the network or the clock; every function
//! is a plain transform that the handlers compose.

pub mod cep;
pub mod location;
pub mod units;

pub use cep::{Cep, InvalidCep};
pub use units::KelvinPolicy;
