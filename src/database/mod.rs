pub mod directory;
pub mod manager;
pub mod memory;
pub mod models;
pub mod pg_directory;

pub use directory::{DirectoryError, UserDirectory};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDirectory;
pub use pg_directory::PgUserDirectory;
