//! Cross-artifact references

use crate::domain::ids::Gid;
use serde::{Deserialize, Serialize};

/// A directed edge from one artifact's backing file to another artifact
///
/// References without a target GID are unset slots and are never followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Name of the slot holding the reference
    pub label: String,

    /// Target artifact, if the slot is filled
    pub gid: Option<Gid>,
}

impl Reference {
    pub fn new(label: impl Into<String>, gid: Option<Gid>) -> Self {
        Self {
            label: label.into(),
            gid,
        }
    }
}
