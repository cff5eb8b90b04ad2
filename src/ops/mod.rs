pub mod hashes;
pub mod keys;
pub mod lists;
pub mod strings;
