pub mod assignment;
pub mod collision;
pub mod controller;
pub mod emission;
pub mod lifecycle;
