/// Host entries and global settings
pub mod host;
