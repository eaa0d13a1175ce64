use std::fmt;

/// Statement interfaces a caller may ask a statement to be viewed as.
///
/// The set is closed; [`SqliteStatement`](super::SqliteStatement) satisfies
/// [`SUPPORTED`](StatementCapability::SUPPORTED) and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementCapability {
    /// The generic [`SqlStatement`](super::SqlStatement) contract.
    Statement,
    /// The concrete `SQLite` statement.
    SqliteStatement,
    /// Statements with bound parameters.
    PreparedStatement,
    /// Stored-procedure calls.
    CallableStatement,
}

impl StatementCapability {
    pub const SUPPORTED: [StatementCapability; 2] = [
        StatementCapability::Statement,
        StatementCapability::SqliteStatement,
    ];

    #[must_use]
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

impl fmt::Display for StatementCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementCapability::Statement => "Statement",
            StatementCapability::SqliteStatement => "SqliteStatement",
            StatementCapability::PreparedStatement => "PreparedStatement",
            StatementCapability::CallableStatement => "CallableStatement",
        };
        f.write_str(name)
    }
}
