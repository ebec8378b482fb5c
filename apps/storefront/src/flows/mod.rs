//! Multi-step user actions built on the state containers.

mod order;
mod registration;

pub use order::{OrderFlow, OrderPlaced};
pub use registration::{
    RegistrationFlow, RegistrationOutcome, REGISTRATION_FAILED, REGISTRATION_SUCCEEDED,
};
