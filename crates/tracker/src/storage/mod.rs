//! Storage layer for task persistence.

mod file;
mod record;
mod traits;

pub use file::FileStorage;
pub use record::{LineCodec, MalformedLine, StoredLine};
pub use traits::Storage;
