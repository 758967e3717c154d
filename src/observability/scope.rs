//! Operation scopes for automatic begin/complete logging
//!
//! Each lifecycle operation opens a scope on entry. The scope logs
//! `{name}_BEGIN` immediately, `{name}_COMPLETE` on success and
//! `{name}_FAILED` on failure; a scope dropped without either logs
//! `{name}_INCOMPLETE` at WARN.

use std::cell::Cell;

use super::logger::Logger;

/// A scope that brackets one operation in the log stream.
pub struct OpScope<'a> {
    name: &'a str,
    closed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
}

impl<'a> OpScope<'a> {
    /// Open a scope; logs `{name}_BEGIN` with the given fields.
    pub fn new(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        let field_refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, *v)).collect();
        Logger::info(&format!("{}_BEGIN", name), &field_refs);

        Self {
            name,
            closed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    /// Close the scope as successful; logs `{name}_COMPLETE`.
    pub fn complete(self) {
        self.closed.set(true);
        let field_refs: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        Logger::info(&format!("{}_COMPLETE", self.name), &field_refs);
    }

    /// Close the scope as failed; logs `{name}_FAILED` with the reason.
    pub fn fail(self, reason: &str) {
        self.closed.set(true);
        let mut field_refs: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        field_refs.push(("reason", reason));
        Logger::error(&format!("{}_FAILED", self.name), &field_refs);
    }
}

impl Drop for OpScope<'_> {
    fn drop(&mut self) {
        if !self.closed.get() {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
