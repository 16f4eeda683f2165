//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits defined in the ports
//! module. Adapters depend on the ports, not the other way around.

pub mod msgpack_repository;

pub use msgpack_repository::MsgPackRepository;
