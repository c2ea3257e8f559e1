pub mod export;
pub mod import;
pub mod snapshot;

pub use export::*;
pub use import::*;
pub use snapshot::*;
