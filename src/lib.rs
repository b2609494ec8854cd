// Library for tests to access modules

pub mod api_client;
pub mod breakdown;
pub mod config;
pub mod models;
pub mod routes;
pub mod traffic;
pub mod worker;
