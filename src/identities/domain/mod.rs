pub mod email;
pub mod password_resets;
pub mod verifications;
