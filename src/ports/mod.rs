//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the learning core and implemented by the
//! opponents, observers and storage adapters around it.

pub mod observer;
pub mod policy;
pub mod repository;

pub use observer::Observer;
pub use policy::Policy;
pub use repository::AgentRepository;
