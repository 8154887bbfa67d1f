//! Platform-free core of namima: ripple field, particle swarm, energy
//! feedback, the declared audio graph and the generative scheduler, all
//! coordinated by [`Engine`]. Front-ends supply a [`Clock`] and an
//! [`AudioBackend`].

pub mod backend;
pub mod clock;
pub mod config;
pub mod constants;
pub mod energy;
pub mod engine;
pub mod error;
pub mod field;
pub mod graph;
pub mod music;
pub mod params;
pub mod particles;
pub mod ramp;
pub mod scheduler;
pub mod sources;
pub mod transport;

pub use backend::*;
pub use clock::*;
pub use config::*;
pub use energy::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use graph::*;
pub use music::*;
pub use params::*;
pub use particles::*;
pub use ramp::*;
pub use scheduler::*;
pub use sources::*;
pub use transport::*;
