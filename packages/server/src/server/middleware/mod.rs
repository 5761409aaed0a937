// HTTP middleware
pub mod server_push;

pub use server_push::*;
