pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod routes;
pub mod runner;

pub use camera::{Direction, FlyCamera};
pub use config::ViewerConfig;
pub use error::FlightError;
pub use input::{InputState, Key, MoveSpeeds};
pub use runner::FlightRunner;
