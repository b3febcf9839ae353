use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::errors::CalpError;

impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        let index = self.load_index()?;
        Status::new(self).initialize(&index)
    }

    /// Fail with the blocking status unless the working tree matches the index
    pub fn require_clean(&self) -> anyhow::Result<()> {
        let status = self.status()?;

        if status.is_clean() {
            Ok(())
        } else {
            Err(CalpError::UncommittedChanges(status).into())
        }
    }
}
