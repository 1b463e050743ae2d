pub mod cli;
mod database;
mod http_err;
pub mod identities;
mod passwords;
mod repos;
mod server;
