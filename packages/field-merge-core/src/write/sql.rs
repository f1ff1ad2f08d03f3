//! SQL rendering of conditional writes.

use super::{Condition, ConditionalWrite, Operator};
use crate::error::MergeError;

/// Bound parameter of a rendered statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Id(u64),
}

/// Parameterized statement with numbered placeholders (`?1`, `?2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub text: String,
    pub params: Vec<SqlParam>,
}

impl ConditionalWrite {
    /// Renders the write as a single guarded `UPDATE`.
    ///
    /// Values are always bound, never inlined. Table and column names are
    /// restricted to plain identifiers.
    ///
    /// # Arguments
    /// * `table` - Target table name
    /// * `identity` - Name of the identity column
    ///
    /// # Returns
    /// `Result<SqlStatement, MergeError>`
    pub fn to_sql(&self, table: &str, identity: &str) -> Result<SqlStatement, MergeError> {
        if self.assignments.is_empty() {
            return Err(MergeError::Validation(
                "conditional write has no assignments".to_string(),
            ));
        }
        check_identifier(table)?;
        check_identifier(identity)?;

        let mut params = Vec::new();

        let mut sets = Vec::with_capacity(self.assignments.len());
        for assignment in &self.assignments {
            check_identifier(&assignment.column)?;
            params.push(SqlParam::Text(assignment.value.clone()));
            sets.push(format!("{} = ?{}", assignment.column, params.len()));
        }

        params.push(SqlParam::Id(self.record_id()));
        let mut text = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            table,
            sets.join(", "),
            identity,
            params.len()
        );

        for clause in &self.predicate.clauses {
            let mut alternatives = Vec::with_capacity(clause.any_of.len());
            for condition in &clause.any_of {
                alternatives.push(render_condition(condition, &mut params)?);
            }
            text.push_str(" AND (");
            text.push_str(&alternatives.join(" OR "));
            text.push(')');
        }

        Ok(SqlStatement { text, params })
    }
}

fn render_condition(condition: &Condition, params: &mut Vec<SqlParam>) -> Result<String, MergeError> {
    check_identifier(&condition.column)?;
    let column = &condition.column;
    match (condition.operator, &condition.value) {
        (Operator::IsNullOrEmpty, _) => Ok(format!("({} IS NULL OR {} = '')", column, column)),
        (Operator::Eq, Some(value)) => {
            params.push(SqlParam::Text(value.clone()));
            Ok(format!("{} = ?{}", column, params.len()))
        }
        (Operator::Eq, None) => Ok(format!("{} IS NULL", column)),
    }
}

fn check_identifier(name: &str) -> Result<(), MergeError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MergeError::Validation(format!(
            "'{}' is not a valid SQL identifier",
            name
        )))
    }
}
