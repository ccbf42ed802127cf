pub mod boundary;
pub mod domain;
pub mod gauss_points;
pub mod geometric;
pub mod kernel;
