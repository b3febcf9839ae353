//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the areas and plumbing commands into the workflows a
//! user runs. Each returns plain data; printing is left to the binary.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `status`: Compare the working tree against the index
//! - `commit`: Create a new commit
//! - `checkout`: Switch or create branches
//! - `cherry-pick`: Apply the changes of one commit as a new commit
//! - `rebase`: Replay the current branch on top of another
//! - `log`: Show commit history

pub mod add;
pub mod checkout;
pub mod cherry_pick;
pub mod commit;
pub mod init;
pub mod log;
pub mod rebase;
pub mod status;
