pub mod gateway;
pub mod interface;
pub mod route;
