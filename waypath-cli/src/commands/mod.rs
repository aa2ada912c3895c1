pub mod batch;
pub mod distance;
pub mod input;
pub mod route;
