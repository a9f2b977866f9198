pub mod address;
pub mod client;
pub mod states;
pub mod upload;
