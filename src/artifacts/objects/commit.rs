//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - Zero or one parent commit ID (history is a single-parent chain)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Header values may span several lines: a line starting with a single space continues
//! the previous value. Keys may repeat. Headers are kept in their original order and
//! with their raw values so that decoding and re-encoding reproduces the same bytes.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::CalpError;
use anyhow::Context;
use bytes::Bytes;
use std::borrow::Cow;
use std::io::BufRead;

const DEFAULT_AUTHOR_NAME: &str = "calp";
const DEFAULT_AUTHOR_EMAIL: &str = "calp@localhost";

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Format author name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Format complete author info as stored in a commit header
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load author information from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE.
    /// A missing name or email falls back to a default identity; a missing or
    /// unparsable date falls back to the current time.
    pub fn load_from_env() -> Self {
        let name = std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| {
            tracing::debug!("GIT_AUTHOR_NAME not set, using default author name");
            DEFAULT_AUTHOR_NAME.to_string()
        });
        let email = std::env::var("GIT_AUTHOR_EMAIL").unwrap_or_else(|_| {
            tracing::debug!("GIT_AUTHOR_EMAIL not set, using default author email");
            DEFAULT_AUTHOR_EMAIL.to_string()
        });
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, email, ts),
            None => Author::new(name, email),
        }
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let offset = chrono::DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .map_err(|_| anyhow::anyhow!("Invalid timezone"))?
        .offset()
        .to_owned();
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Commit object
///
/// `headers` is the authoritative, ordered list of `key value` pairs; `tree_oid` and
/// `parents` are typed views over it, extracted once at construction. The message is
/// kept as raw bytes and only decoded for display.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    headers: Vec<(String, String)>,
    tree_oid: ObjectId,
    parents: Vec<ObjectId>,
    message: Bytes,
}

impl Commit {
    /// Create a new commit; the author is also recorded as committer
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        let mut headers = vec![("tree".to_string(), tree_oid.to_string())];
        if let Some(parent) = &parent {
            headers.push(("parent".to_string(), parent.to_string()));
        }
        headers.push(("author".to_string(), author.display()));
        headers.push(("committer".to_string(), author.display()));

        Commit {
            headers,
            tree_oid,
            parents: parent.into_iter().collect(),
            message: Bytes::from(message),
        }
    }

    /// Get the first line of the commit message
    pub fn short_message(&self) -> String {
        self.message().lines().next().unwrap_or("").to_string()
    }

    /// Message decoded as UTF-8, with invalid sequences replaced
    pub fn message(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }

    pub fn raw_message(&self) -> &[u8] {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First value recorded under `key`
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_key, _)| header_key == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn author(&self) -> Option<Author> {
        self.header("author")
            .and_then(|author| Author::try_from(author).ok())
    }
}

fn malformed(reason: impl Into<String>) -> CalpError {
    CalpError::MalformedObject {
        kind: "commit",
        reason: reason.into(),
    }
}

fn find_byte(content: &[u8], from: usize, needle: u8) -> Option<usize> {
    content
        .get(from..)?
        .iter()
        .position(|&byte| byte == needle)
        .map(|offset| from + offset)
}

fn utf8(bytes: &[u8], what: &str) -> Result<String, CalpError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| malformed(format!("{what} is not valid UTF-8")))
}

/// Scan the header section, returning the ordered headers and the message bytes
fn parse_headers(content: &[u8]) -> Result<(Vec<(String, String)>, &[u8]), CalpError> {
    let mut headers = Vec::new();
    let mut cursor = 0;

    loop {
        match content.get(cursor) {
            None => return Err(malformed("missing blank line before message")),
            Some(b'\n') => return Ok((headers, &content[cursor + 1..])),
            Some(_) => {}
        }

        let line_end = find_byte(content, cursor, b'\n')
            .ok_or_else(|| malformed("unterminated header line"))?;
        let space = find_byte(content, cursor, b' ')
            .filter(|&space| space < line_end)
            .ok_or_else(|| malformed("header line without a value"))?;

        // a newline followed by a space continues the current value
        let mut value_end = line_end;
        while content.get(value_end + 1) == Some(&b' ') {
            value_end = find_byte(content, value_end + 1, b'\n')
                .ok_or_else(|| malformed("unterminated continuation line"))?;
        }

        let key = utf8(&content[cursor..space], "header key")?;
        let value = utf8(&content[space + 1..value_end], "header value")?;
        headers.push((key, value));

        cursor = value_end + 1;
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (key, value) in &self.headers {
            content.extend_from_slice(key.as_bytes());
            content.push(b' ');
            content.extend_from_slice(value.as_bytes());
            content.push(b'\n');
        }
        content.push(b'\n');
        content.extend_from_slice(&self.message);

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .context("Unable to read commit body")?;

        let (headers, message) = parse_headers(&content)?;
        let message = Bytes::copy_from_slice(message);

        let mut tree_values = headers.iter().filter(|(key, _)| key == "tree");
        let tree_oid = match (tree_values.next(), tree_values.next()) {
            (Some((_, value)), None) => ObjectId::try_parse(value.clone())
                .map_err(|_| malformed(format!("invalid tree hash {value:?}")))?,
            (None, _) => return Err(malformed("missing tree header").into()),
            (Some(_), Some(_)) => return Err(malformed("more than one tree header").into()),
        };

        let parents = headers
            .iter()
            .filter(|(key, _)| key == "parent")
            .map(|(_, value)| {
                ObjectId::try_parse(value.clone())
                    .map_err(|_| malformed(format!("invalid parent hash {value:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Commit {
            headers,
            tree_oid,
            parents,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
