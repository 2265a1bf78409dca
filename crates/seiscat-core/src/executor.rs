//! Statement executor trait and implementations
//!
//! A `StatementExecutor` runs the store-side operations named by a system
//! command. Each operation reports an integer sentinel; zero is success and
//! any other value fails the whole command.

use crate::errors::{Result, SeisCatError};
use crate::model::ExecutableStatement;

/// Runs one statement descriptor against a catalog store
pub trait StatementExecutor {
    /// Execute `statement` and return its sentinel
    ///
    /// # Errors
    ///
    /// Returns an error when the statement cannot be run at all (unknown
    /// operation, bad parameters, storage failure). A statement that runs
    /// but reports failure returns `Ok` with a non-zero sentinel.
    fn execute(&self, statement: &ExecutableStatement) -> Result<i64>;
}

/// Run statements in order, stopping at the first non-zero sentinel
///
/// Returns the number of statements run.
///
/// # Errors
///
/// Returns `SeisCatError::StatementFailed` for a non-zero sentinel, or the
/// executor's own error.
pub fn run_statements(
    executor: &dyn StatementExecutor,
    statements: &[ExecutableStatement],
) -> Result<usize> {
    for statement in statements {
        let sentinel = executor.execute(statement)?;
        if sentinel != 0 {
            tracing::warn!(
                op = "run_statements",
                statement = %statement,
                sentinel = sentinel,
                "statement reported failure"
            );
            return Err(SeisCatError::StatementFailed {
                statement: statement.to_string(),
                sentinel,
            });
        }
    }
    Ok(statements.len())
}
