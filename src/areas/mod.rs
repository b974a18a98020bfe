//! Tree operations: path resolution, nested-branch lookup, orphan purge,
//! subtree copy/instantiate, branching, recursive deletion, repository
//! bookkeeping, and the text serialization/parsing pair.

pub mod branching;
pub mod copy;
pub mod delete;
pub mod nested;
pub mod parse;
pub mod path;
pub mod purge;
pub mod repository;
pub mod serialize;
