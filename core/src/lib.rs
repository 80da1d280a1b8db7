pub mod device;
pub mod export;
pub mod inventory;
pub mod resolver;
