use smallvec::SmallVec;

/// A commit record handed to the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Unique commit ID (opaque token, only compared for equality)
    pub id: String,
    /// Parent commit IDs, first parent first
    pub parents: SmallVec<[String; 1]>,
    /// Author name
    pub author: String,
    /// Commit message (short)
    pub message: String,
    /// Commit timestamp (unix seconds)
    pub timestamp: i64,
}

impl Commit {
    pub fn new<I, S>(id: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            author: String::new(),
            message: String::new(),
            timestamp: 0,
        }
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
