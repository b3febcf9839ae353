use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::CalpError;
use anyhow::Context;
use derive_new::new;

pub const REF_PREFIX: &str = "refs/heads/";

/// Path of a reference file relative to the metadata directory, e.g. `HEAD` or
/// `refs/heads/master`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn head() -> Self {
        Self(crate::areas::refs::HEAD_REF_NAME.to_string())
    }

    pub fn is_detached_head(&self) -> bool {
        self.0 == crate::areas::refs::HEAD_REF_NAME
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

impl From<&BranchName> for SymRefName {
    fn from(branch_name: &BranchName) -> Self {
        Self(format!("{REF_PREFIX}{branch_name}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            return Err(CalpError::InvalidBranchName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(CalpError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    /// Branch a symbolic ref points at, if it lives under `refs/heads/`
    pub fn try_parse_sym_ref_name(sym_ref_name: &SymRefName) -> anyhow::Result<Self> {
        match sym_ref_name.0.strip_prefix(REF_PREFIX) {
            Some(name) => Self::try_parse(name.to_string()),
            None => anyhow::bail!(
                "symbolic ref name must start with '{}', got '{}'",
                REF_PREFIX,
                sym_ref_name.0
            ),
        }
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
