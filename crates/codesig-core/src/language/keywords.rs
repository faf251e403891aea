//! Keyword tables with per-keyword capability sets.

/// What a keyword may be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Built-in type name such as `int`.
    Type,
    ClassModifier,
    FieldModifier,
    MethodModifier,
    ParameterModifier,
    /// Introduces a declaration block (`class`, `interface`, ...).
    Block,
    /// Introduces a base-type list (`extends`, `implements`).
    Inheritance,
    Operator,
    Literal,
}

/// Sorted keyword → capabilities table for one language.
#[derive(Debug)]
pub struct KeywordTable {
    entries: &'static [(&'static str, &'static [Capability])],
}

impl KeywordTable {
    /// `entries` must be sorted by keyword.
    pub const fn new(entries: &'static [(&'static str, &'static [Capability])]) -> Self {
        Self { entries }
    }

    fn capabilities(&self, word: &str) -> Option<&'static [Capability]> {
        self.entries
            .binary_search_by(|(keyword, _)| (*keyword).cmp(word))
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.capabilities(word).is_some()
    }

    pub fn has(&self, word: &str, capability: Capability) -> bool {
        self.capabilities(word)
            .is_some_and(|caps| caps.contains(&capability))
    }

    pub fn is_type(&self, word: &str) -> bool {
        self.has(word, Capability::Type)
    }

    pub fn is_class_modifier(&self, word: &str) -> bool {
        self.has(word, Capability::ClassModifier)
    }

    pub fn is_field_modifier(&self, word: &str) -> bool {
        self.has(word, Capability::FieldModifier)
    }

    pub fn is_method_modifier(&self, word: &str) -> bool {
        self.has(word, Capability::MethodModifier)
    }

    pub fn is_parameter_modifier(&self, word: &str) -> bool {
        self.has(word, Capability::ParameterModifier)
    }

    pub fn is_block_keyword(&self, word: &str) -> bool {
        self.has(word, Capability::Block)
    }

    pub fn is_inheritance(&self, word: &str) -> bool {
        self.has(word, Capability::Inheritance)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(keyword, _)| *keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Capability::*;

    static TABLE: KeywordTable = KeywordTable::new(
        &[
            ("abstract", &[ClassModifier, MethodModifier]),
            ("class", &[Block]),
            ("int", &[Type]),
            ("return", &[]),
        ],
    );

    #[test]
    fn test_lookup() {
        assert!(TABLE.is_keyword("return"));
        assert!(!TABLE.is_keyword("Return"));
        assert!(TABLE.is_class_modifier("abstract"));
        assert!(TABLE.is_method_modifier("abstract"));
        assert!(!TABLE.is_field_modifier("abstract"));
        assert!(TABLE.is_block_keyword("class"));
        assert!(TABLE.is_type("int"));
        assert!(!TABLE.is_type("class"));
    }
}
