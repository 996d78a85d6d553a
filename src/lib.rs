pub mod clock;
pub mod config;
pub mod hw;
pub mod measure;
pub mod node;
pub mod reading;
pub mod upload;
pub mod wait;
