//! The variable environment (spec.md §3 "Environment", §4.4).

use crate::error::WispError;
use crate::value::Value;
use smallvec::SmallVec;
use smartstring::alias::String as SmartStr;

/// Keep a handful of variables inline before spilling to the heap — the
/// same inline-capacity trick `rhai::scope::Scope` uses for its own
/// parallel name/value arrays (`SCOPE_ENTRIES_INLINED` in `scope.rs`).
const SCOPE_ENTRIES_INLINED: usize = 8;

/// The name → value table threaded through evaluation.
///
/// Persists for the life of the interpreter session (spec.md §3
/// "Lifecycle"); a fresh command's lexer/parser/arena/output buffer are
/// all discarded at the end of the cycle, but the `Scope` that evaluation
/// wrote into survives to the next one.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    names: SmallVec<[SmartStr; SCOPE_ENTRIES_INLINED]>,
    values: SmallVec<[Value; SCOPE_ENTRIES_INLINED]>,
    capacity: Option<usize>,
    /// Reserved for nested scopes; spec.md §4.4 notes parent traversal is
    /// "not yet exercised" by any evaluator code path. No constructor
    /// populates this today.
    parent: Option<Box<Scope>>,
}

impl Scope {
    /// An empty scope with no capacity limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty scope that rejects writes once it holds `capacity`
    /// variables (spec.md §6's `MAX_NUM_VAR`).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Create-or-update: overwrites the value if `name` already exists in
    /// this scope, otherwise appends a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`WispError::runtime`] if this scope has a configured
    /// capacity and is full.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), WispError> {
        if let Some(i) = self.position_of(name) {
            self.values[i] = value;
            return Ok(());
        }
        if let Some(cap) = self.capacity {
            if self.names.len() >= cap {
                return Err(WispError::runtime(
                    "maximum number of variables exceeded",
                    crate::token::Position::NONE,
                ));
            }
        }
        self.names.push(SmartStr::from(name));
        self.values.push(value);
        Ok(())
    }

    /// Local lookup only — parent traversal is reserved, not exercised
    /// (spec.md §4.4).
    #[must_use]
    pub fn read(&self, name: &str) -> Option<&Value> {
        self.position_of(name).map(|i| &self.values[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
