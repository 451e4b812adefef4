//! Formation shooter: a fixed-tick arcade shooter simulation with a
//! terminal front end.
//!
//! The simulation core (`entities`, `kinematics`, `enemy`, `formation`,
//! `collision`, `combat`, `spawn`, `director`, `compute`) is free of I/O.
//! `assets`, `audio`, `input` and `display` are the collaborators the
//! binary wires around it.

pub mod assets;
pub mod audio;
pub mod collision;
pub mod combat;
pub mod compute;
pub mod config;
pub mod director;
pub mod display;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod events;
pub mod formation;
pub mod input;
pub mod kinematics;
pub mod spawn;

pub use config::GameConfig;
pub use entities::GameState;
pub use error::GameError;
