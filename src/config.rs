//! Parser configuration
//!
//! Decoding itself is never optional: every record is read field by field and any
//! inconsistency aborts the parse. [`ParserConfig`] only controls the checks layered on top of
//! that and the resource limits applied to hostile input.

/// Options controlling how documents are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum depth of records nested as class members. Deeper input fails with
    /// [`crate::Error::RecursionLimit`].
    pub max_nesting_depth: usize,

    /// Check after decoding that every `MemberReference` resolves to a record of the document.
    pub verify_references: bool,

    /// Accept bytes following the `MessageEnd` record of a bare document. They are never
    /// decoded; envelopes keep them as their trailer regardless of this setting.
    pub allow_trailing_data: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            verify_references: false,
            allow_trailing_data: true,
        }
    }
}

impl ParserConfig {
    /// Reject unresolved references and trailing data.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_nesting_depth: 64,
            verify_references: true,
            allow_trailing_data: false,
        }
    }

    /// Allow deeply nested graphs and skip all optional checks.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            max_nesting_depth: 1024,
            verify_references: false,
            allow_trailing_data: true,
        }
    }
}
