pub mod push;
pub mod resource;
pub mod settings;

pub use push::*;
pub use resource::*;
pub use settings::*;
