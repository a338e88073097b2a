pub mod owner;
pub mod portfolio;
