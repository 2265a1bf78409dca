//! Command envelope builder
//!
//! A `CommandEnvelope` collects the description of one analyst action while
//! the analyst fills in an edit. It has two independent halves:
//!
//! - the **system command**: executable statements plus locator arguments
//! - the **provenance record**: attribute-level before/after values
//!
//! Vocabulary checks are permissive: an out-of-vocabulary command type,
//! data type or attribute name is logged as a warning and kept on the
//! envelope, and building continues.
//!
//! ## Example
//!
//! ```
//! use seiscat_core::CommandEnvelope;
//! use serde_json::json;
//!
//! let mut env = CommandEnvelope::new("hypocentreedit", "hypocentre", 2001, "ISC");
//! env.record_field_edit("depth", json!(33), Some(json!(10)));
//! assert!(env.is_valid());
//! assert!(env.warnings().is_empty());
//! ```

use crate::errors::{Result, SeisCatError};
use crate::model::{
    AttributeName, AttributeRecord, CommandType, DataType, ExecutableStatement,
    ProvenanceRecord, SystemCommand,
};
use serde_json::Value;

const OP_CONSTRUCT: &str = "construct_envelope";
const OP_ADD_ATTRIBUTE: &str = "add_attribute";

/// Out-of-vocabulary value seen while building an envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Which vocabulary was violated: `commandType`, `dataType` or `attribute`
    pub field: &'static str,
    pub value: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized {} '{}'", self.field, self.value)
    }
}

/// Encoded description of one analyst edit
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEnvelope {
    command_type: CommandType,
    data_type: DataType,
    target_id: i64,
    agency: String,
    attributes: Vec<AttributeRecord>,
    statements: Vec<ExecutableStatement>,
    locator_args: String,
    warnings: Vec<ValidationWarning>,
}

impl CommandEnvelope {
    /// Construct an empty envelope for one target
    pub fn new(
        command_type: impl Into<CommandType>,
        data_type: impl Into<DataType>,
        target_id: i64,
        agency: impl Into<String>,
    ) -> Self {
        let mut env = Self {
            command_type: command_type.into(),
            data_type: data_type.into(),
            target_id,
            agency: agency.into(),
            attributes: Vec::new(),
            statements: Vec::new(),
            locator_args: String::new(),
            warnings: Vec::new(),
        };

        if !env.command_type.is_recognized() {
            let value = env.command_type.to_string();
            env.warn(OP_CONSTRUCT, "commandType", value);
        }
        if !env.data_type.is_recognized() {
            let value = env.data_type.to_string();
            env.warn(OP_CONSTRUCT, "dataType", value);
        }
        env
    }

    fn warn(&mut self, op: &'static str, field: &'static str, value: String) {
        tracing::warn!(
            op = op,
            field = field,
            value = value.as_str(),
            target_id = self.target_id,
            "unrecognized {} in command envelope",
            field
        );
        self.warnings.push(ValidationWarning { field, value });
    }

    /// Append one attribute change; either value may be absent
    pub fn add_attribute(
        &mut self,
        name: impl Into<AttributeName>,
        new_value: Option<Value>,
        old_value: Option<Value>,
    ) -> &mut Self {
        let name = name.into();
        if !name.is_recognized() {
            self.warn(OP_ADD_ATTRIBUTE, "attribute", name.to_string());
        }
        self.attributes
            .push(AttributeRecord::new(name, new_value, old_value));
        self
    }

    /// Append one store-side statement
    pub fn add_executable_statement(&mut self, statement: ExecutableStatement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    /// Append one `key=value` or flag token to the locator arguments
    ///
    /// Tokens are trimmed and joined with single spaces; blank tokens are
    /// ignored.
    pub fn add_locator_argument(&mut self, token: &str) -> &mut Self {
        let token = token.trim();
        if token.is_empty() {
            return self;
        }
        if !self.locator_args.is_empty() {
            self.locator_args.push(' ');
        }
        self.locator_args.push_str(token);
        self
    }

    /// Record an edit of one field of the target hypocentre or phase
    ///
    /// Adds the provenance attribute and the matching `edit_hypocentre` /
    /// `edit_phase` statement. For other data types only the attribute is
    /// recorded.
    pub fn record_field_edit(
        &mut self,
        name: impl Into<AttributeName>,
        new_value: Value,
        old_value: Option<Value>,
    ) -> &mut Self {
        let name = name.into();
        let operation = match self.data_type {
            DataType::Hypocentre => Some("edit_hypocentre"),
            DataType::Phase => Some("edit_phase"),
            _ => None,
        };
        if let Some(operation) = operation {
            let stmt = ExecutableStatement::new(operation)
                .param(self.target_id)
                .param(name.as_str())
                .param(new_value.clone());
            self.statements.push(stmt);
        }
        self.add_attribute(name, Some(new_value), old_value)
    }

    /// True iff the envelope has an executable effect
    pub fn is_valid(&self) -> bool {
        !self.statements.is_empty() || !self.locator_args.is_empty()
    }

    /// Fail with `NotDispatchable` unless `is_valid()`
    pub fn ensure_dispatchable(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SeisCatError::NotDispatchable {
                command_type: self.command_type.to_string(),
                target_id: self.target_id,
            })
        }
    }

    pub fn to_system_command(&self) -> SystemCommand {
        SystemCommand {
            command_type: self.command_type.clone(),
            data_type: self.data_type.clone(),
            id: self.target_id,
            sql_function_array: if self.statements.is_empty() {
                None
            } else {
                Some(self.statements.clone())
            },
            locator_arg_str: self.locator_args.clone(),
        }
    }

    pub fn to_provenance_record(&self) -> ProvenanceRecord {
        ProvenanceRecord {
            command_type: self.command_type.clone(),
            data_type: self.data_type.clone(),
            id: self.target_id,
            agency: self.agency.clone(),
            attribute_array: if self.attributes.is_empty() {
                None
            } else {
                Some(self.attributes.clone())
            },
        }
    }

    pub fn command_type(&self) -> &CommandType {
        &self.command_type
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn target_id(&self) -> i64 {
        self.target_id
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn attributes(&self) -> &[AttributeRecord] {
        &self.attributes
    }

    pub fn statements(&self) -> &[ExecutableStatement] {
        &self.statements
    }

    pub fn locator_arguments(&self) -> &str {
        &self.locator_args
    }

    /// Validation warnings raised while building, in order
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    // ===== Analyst actions =====

    /// Make `hypid` the prime hypocentre of `evid`
    pub fn set_prime(evid: i64, hypid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(CommandType::SetPrime, DataType::Hypocentre, hypid, agency);
        env.add_executable_statement(ExecutableStatement::new("set_prime").param(evid).param(hypid));
        env.add_attribute(AttributeName::Prime, Some(Value::from(hypid)), None);
        env
    }

    pub fn banish_event(evid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(CommandType::SeisEventBanish, DataType::SeisEvent, evid, agency);
        env.add_executable_statement(ExecutableStatement::new("banish_event").param(evid));
        env
    }

    pub fn unbanish_event(evid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(
            CommandType::SeisEventUnbanish,
            DataType::SeisEvent,
            evid,
            agency,
        );
        env.add_executable_statement(ExecutableStatement::new("unbanish_event").param(evid));
        env
    }

    /// Move a hypocentre from one event to another
    pub fn move_hypocentre(
        hypid: i64,
        from_evid: i64,
        to_evid: i64,
        agency: impl Into<String>,
    ) -> Self {
        let mut env = Self::new(CommandType::MoveHypocentre, DataType::Hypocentre, hypid, agency);
        env.add_executable_statement(
            ExecutableStatement::new("move_hypocentre")
                .param(hypid)
                .param(to_evid),
        );
        env.add_attribute(
            AttributeName::Evid,
            Some(Value::from(to_evid)),
            Some(Value::from(from_evid)),
        );
        env
    }

    pub fn delete_hypocentre(hypid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(
            CommandType::DeleteHypocentre,
            DataType::Hypocentre,
            hypid,
            agency,
        );
        env.add_executable_statement(ExecutableStatement::new("delete_hypocentre").param(hypid));
        env
    }

    /// Split a hypocentre out into a new event of its own
    pub fn create_event(hypid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(CommandType::CreateEvent, DataType::Hypocentre, hypid, agency);
        env.add_executable_statement(ExecutableStatement::new("create_event").param(hypid));
        env
    }

    /// Start a hypocentre edit; fields are added with `record_field_edit`
    pub fn hypocentre_edit(hypid: i64, agency: impl Into<String>) -> Self {
        Self::new(CommandType::HypocentreEdit, DataType::Hypocentre, hypid, agency)
    }

    /// Start a phase edit; fields are added with `record_field_edit`
    pub fn phase_edit(phid: i64, agency: impl Into<String>) -> Self {
        Self::new(CommandType::PhaseEdit, DataType::Phase, phid, agency)
    }

    /// Start a relocation of `evid`; locator options are added with
    /// `add_locator_argument`
    pub fn relocate(evid: i64, agency: impl Into<String>) -> Self {
        Self::new(CommandType::SeisEventRelocate, DataType::SeisEvent, evid, agency)
    }

    pub fn assess(evid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(CommandType::Assess, DataType::SeisEvent, evid, agency);
        env.add_executable_statement(ExecutableStatement::new("assess_event").param(evid));
        env
    }

    pub fn commit(evid: i64, agency: impl Into<String>) -> Self {
        let mut env = Self::new(CommandType::Commit, DataType::SeisEvent, evid, agency);
        env.add_executable_statement(ExecutableStatement::new("commit_event").param(evid));
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_command_echoes_constructor_arguments() {
        for ct in CommandType::KNOWN {
            for dt in DataType::KNOWN {
                let env = CommandEnvelope::new(ct.clone(), dt.clone(), 4242, "ISC");
                let sys = env.to_system_command();

                assert_eq!(&sys.command_type, ct);
                assert_eq!(&sys.data_type, dt);
                assert_eq!(sys.id, 4242);
                assert!(env.warnings().is_empty());
            }
        }
    }

    #[test]
    fn test_fresh_envelope_is_not_valid() {
        let env = CommandEnvelope::new("hypocentreedit", "hypocentre", 1, "ISC");
        assert!(!env.is_valid());
        assert!(env.ensure_dispatchable().is_err());
    }

    #[test]
    fn test_one_statement_makes_envelope_valid() {
        let mut env = CommandEnvelope::new("commit", "seisevent", 1, "ISC");
        env.add_executable_statement(ExecutableStatement::new("commit_event").param(1));
        assert!(env.is_valid());
    }

    #[test]
    fn test_one_locator_argument_makes_envelope_valid() {
        let mut env = CommandEnvelope::relocate(1, "ISC");
        env.add_locator_argument("fix_depth=10");
        assert!(env.is_valid());
    }

    #[test]
    fn test_provenance_alone_is_not_valid() {
        let mut env = CommandEnvelope::relocate(1, "ISC");
        env.add_attribute("depth", Some(json!(5)), None);
        env.add_locator_argument("   ");
        assert!(!env.is_valid());
    }

    #[test]
    fn test_locator_arguments_joined_with_single_spaces() {
        let mut env = CommandEnvelope::relocate(1, "ISC");
        env.add_locator_argument("a")
            .add_locator_argument("b")
            .add_locator_argument("c");
        assert_eq!(env.locator_arguments(), "a b c");
    }

    #[test]
    fn test_unrecognized_values_warn_but_construct() {
        let mut env = CommandEnvelope::new("relocateall", "origin", 7, "ISC");
        env.add_attribute("colour", Some(json!("red")), None);

        let fields: Vec<_> = env.warnings().iter().map(|w| w.field).collect();
        assert_eq!(fields, vec!["commandType", "dataType", "attribute"]);
        assert_eq!(env.to_system_command().command_type.as_str(), "relocateall");
        assert_eq!(env.attributes().len(), 1);
    }

    #[test]
    fn test_empty_halves_are_null() {
        let env = CommandEnvelope::new("assess", "seisevent", 3, "ISC");
        assert!(env.to_system_command().sql_function_array.is_none());
        assert!(env.to_provenance_record().attribute_array.is_none());
    }

    #[test]
    fn test_record_field_edit_on_hypocentre() {
        let mut env = CommandEnvelope::hypocentre_edit(2001, "ISC");
        env.record_field_edit("depth", json!(33), Some(json!(10)));

        let stmt = &env.statements()[0];
        assert_eq!(stmt.name, "edit_hypocentre");
        assert_eq!(stmt.params, vec![json!(2001), json!("depth"), json!(33)]);

        let attr = &env.attributes()[0];
        assert_eq!(attr.name, AttributeName::Depth);
        assert_eq!(attr.new_value, Some(json!(33)));
        assert_eq!(attr.old_value, Some(json!(10)));
    }

    #[test]
    fn test_record_field_edit_on_phase_uses_phase_statement() {
        let mut env = CommandEnvelope::phase_edit(77, "ISC");
        env.record_field_edit("phase", json!("Pn"), Some(json!("P")));
        assert_eq!(env.statements()[0].name, "edit_phase");
    }

    #[test]
    fn test_move_hypocentre_records_old_and_new_event() {
        let env = CommandEnvelope::move_hypocentre(2001, 100, 200, "NEIC");
        let attr = &env.attributes()[0];

        assert_eq!(attr.name, AttributeName::Evid);
        assert_eq!(attr.old_value, Some(json!(100)));
        assert_eq!(attr.new_value, Some(json!(200)));
        assert_eq!(
            env.statements()[0],
            ExecutableStatement::new("move_hypocentre").param(2001).param(200)
        );
    }
}
