use std::fmt;

use uuid::Uuid;

use crate::{domain::JOB_NAME_LEN, error::ModelError};

/// Unique scheduler job name.
///
/// Derived from a random 128-bit UUID: hex digits without dashes, uppercased, truncated to [`JOB_NAME_LEN`] characters.
/// Output and error files of the job are named after it, and a worker may echo it back on completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobName(String);

impl JobName {
    /// Generate a fresh name from a random (v4) UUID.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Derive the name from a given UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        let mut s = id.simple().to_string().to_ascii_uppercase();
        s.truncate(JOB_NAME_LEN);
        Self(s)
    }

    /// Validate a name received from outside (e.g. a worker callback payload).
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let raw = raw.trim();
        if raw.len() != JOB_NAME_LEN {
            return Err(ModelError::InvalidJobName {
                name: raw.to_string(),
                reason: "unexpected length",
            });
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        {
            return Err(ModelError::InvalidJobName {
                name: raw.to_string(),
                reason: "expected uppercase alphanumeric characters",
            });
        }
        Ok(Self(raw.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_name_has_fixed_shape() {
        let name = JobName::generate();
        assert_eq!(name.as_str().len(), JOB_NAME_LEN);
        assert!(
            name.as_str()
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        );
    }

    #[test]
    fn from_uuid_truncates_uppercased_hex() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(JobName::from_uuid(id).as_str(), "67E5504410B1426F9247");
    }

    #[test]
    fn generated_names_do_not_collide() {
        let names: HashSet<JobName> = (0..10_000).map(|_| JobName::generate()).collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn parse_accepts_generated_names() {
        let name = JobName::generate();
        let parsed = JobName::parse(&format!("{name}\n")).unwrap();
        assert_eq!(parsed, name);
    }

    #[test]
    fn parse_rejects_malformed_names() {
        let bad = ["", "SHORT", "67e5504410b1426f9247", "67E5504410B1426F924!", "67E5504410B1426F92477"];
        for raw in bad {
            assert!(JobName::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
