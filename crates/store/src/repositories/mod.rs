//! Typed repositories over the string-keyed store.

pub mod profile_repo;

pub use profile_repo::ProfileRepo;
