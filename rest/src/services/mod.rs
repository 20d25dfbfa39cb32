pub mod error;
pub mod youtube;
