use std::fmt;

/// Why a tag descriptor could not be turned into a tag identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamingFailure {
    Empty,
    /// The type descriptor does not derive from an element.
    NotAnElementType,
    /// The identifier derived from a type name has no `-` separator.
    MissingSeparator { derived: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingError {
    pub input: String,
    pub reason: NamingFailure,
}

impl fmt::Display for NamingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid tag name: ", self.input)?;
        match &self.reason {
            NamingFailure::Empty => f.write_str("empty name"),
            NamingFailure::NotAnElementType => f.write_str("type does not derive from an element"),
            NamingFailure::MissingSeparator { derived } => {
                write!(f, "derived name `{derived}` has no `-` separator")
            }
        }
    }
}

impl std::error::Error for NamingError {}

/// A close operation named a tag other than the open scope's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeMismatchError {
    pub expected: String,
    pub actual: String,
    /// Node name of the render root, for locating the offending component.
    pub root: String,
}

impl fmt::Display for ScopeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrong end tag: expected {}, open scope is {} (in component {})",
            self.expected, self.actual, self.root
        )
    }
}

impl std::error::Error for ScopeMismatchError {}

/// Failure of one reconciliation operation. Fatal for the reconciler
/// instance: already-applied mutations stay, queued operations never run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    Naming(NamingError),
    ScopeMismatch(ScopeMismatchError),
    /// A close with no open scope above the render root.
    UnbalancedClose { root: String },
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::Naming(err) => err.fmt(f),
            ReconcileError::ScopeMismatch(err) => err.fmt(f),
            ReconcileError::UnbalancedClose { root } => {
                write!(f, "close without an open scope (in component {root})")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::Naming(err) => Some(err),
            ReconcileError::ScopeMismatch(err) => Some(err),
            ReconcileError::UnbalancedClose { .. } => None,
        }
    }
}

impl From<NamingError> for ReconcileError {
    fn from(err: NamingError) -> Self {
        ReconcileError::Naming(err)
    }
}

impl From<ScopeMismatchError> for ReconcileError {
    fn from(err: ScopeMismatchError) -> Self {
        ReconcileError::ScopeMismatch(err)
    }
}
