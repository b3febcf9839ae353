//! Core repository components
//!
//! This module contains the stateful building blocks of a repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area tracking what the next commit will contain
//! - `refs`: Reference management (branches, HEAD)
//! - `repository`: Path handle tying the other areas together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
