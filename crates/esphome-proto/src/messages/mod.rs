//! Concrete message structs, grouped by the area of the device they concern.

pub mod camera;
pub mod core;
pub mod entities;
pub mod logs;
pub mod noise;
