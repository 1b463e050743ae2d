#[cfg(test)]
pub mod memory;
mod users;
mod verifications;

pub use users::DynUserRepo;
pub use verifications::DynVerificationRepo;
