pub mod audit;
pub mod authz;
pub mod dev;
pub mod health;
