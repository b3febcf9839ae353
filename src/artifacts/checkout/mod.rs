//! Checkout planning
//!
//! Switching branches rewrites the working tree to match the target commit:
//! - files tracked now but absent from the target are deleted
//! - files whose blob differs are rewritten
//! - files only in the target are created
//!
//! Checkout only runs on a clean working tree, so there are no local changes to
//! protect while applying the plan.

pub mod migration;
