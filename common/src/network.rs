pub mod destination;
pub mod link;
