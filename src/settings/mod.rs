pub mod credentials;
pub mod targets;
