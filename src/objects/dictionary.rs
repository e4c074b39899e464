//! DICTIONARY object

use indexmap::{IndexMap, IndexSet};

use crate::io::dxf::CodePair;
use crate::item::Pointer;
use crate::record::push_handle;
use crate::types::DxfVersion;

/// Named references to other objects. Objects a dictionary points to are
/// owned by it; a dictionary may even contain itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    pub entries: IndexMap<String, Pointer>,
    /// Keys whose value is a hard-owner `360` pointer; the rest are `350`
    pub hard_owned: IndexSet<String>,
    /// Hard owner flag (code 280); new entries default to hard ownership
    pub is_hard_owner: bool,
    /// Duplicate record cloning flag (code 281)
    pub duplicate_cloning: i16,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            entries: IndexMap::new(),
            hard_owned: IndexSet::new(),
            is_hard_owner: false,
            duplicate_cloning: 1,
        }
    }

    /// Add or replace an entry. It is hard owned when the dictionary is.
    pub fn insert(&mut self, key: impl Into<String>, value: Pointer) -> Option<Pointer> {
        let hard = self.is_hard_owner;
        self.insert_entry(key.into(), value, hard)
    }

    /// Add or replace an entry written as a `360` hard-owner pointer.
    pub fn insert_hard(&mut self, key: impl Into<String>, value: Pointer) -> Option<Pointer> {
        self.insert_entry(key.into(), value, true)
    }

    fn insert_entry(&mut self, key: String, value: Pointer, hard: bool) -> Option<Pointer> {
        if hard {
            self.hard_owned.insert(key.clone());
        } else {
            self.hard_owned.shift_remove(&key);
        }
        self.entries.insert(key, value)
    }

    pub fn is_hard_owned(&self, key: &str) -> bool {
        self.hard_owned.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&Pointer> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn try_set_pair(&mut self, pair: &CodePair, pending_key: &mut Option<String>) -> bool {
        match pair.code {
            280 => self.is_hard_owner = pair.bool_value(),
            281 => self.duplicate_cloning = pair.short_value(),
            3 => *pending_key = Some(pair.string_value()),
            350 | 360 => {
                let Some(key) = pending_key.take() else {
                    tracing::warn!(offset = pair.offset, "dictionary value without a key");
                    return false;
                };
                self.insert_entry(key, Pointer::new(pair.handle_value()), pair.code == 360);
            }
            _ => return false,
        }
        true
    }

    pub(crate) fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion) {
        pairs.push(CodePair::string(100, "AcDbDictionary"));
        if version >= DxfVersion::AC1015 && self.is_hard_owner {
            pairs.push(CodePair::short(280, 1));
        }
        pairs.push(CodePair::short(281, self.duplicate_cloning));
        for (key, pointer) in &self.entries {
            let value_code = if self.is_hard_owned(key) { 360 } else { 350 };
            pairs.push(CodePair::string(3, key.as_str()));
            push_handle(pairs, value_code, pointer.handle);
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Handle;

    fn entry_codes(pairs: &[CodePair]) -> Vec<i32> {
        pairs.iter().filter(|p| p.code == 350 || p.code == 360).map(|p| p.code).collect()
    }

    #[test]
    fn test_mixed_ownership_is_kept_per_entry() {
        let mut dictionary = Dictionary::new();
        let mut key = None;
        for pair in [
            CodePair::string(3, "A"),
            CodePair::string(350, "D"),
            CodePair::string(3, "B"),
            CodePair::string(360, "E"),
        ] {
            assert!(dictionary.try_set_pair(&pair, &mut key));
        }
        assert!(!dictionary.is_hard_owned("A"));
        assert!(dictionary.is_hard_owned("B"));
        assert!(!dictionary.is_hard_owner);

        let mut pairs = Vec::new();
        dictionary.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert_eq!(entry_codes(&pairs), vec![350, 360]);
        assert!(!pairs.iter().any(|p| p.code == 280));
    }

    #[test]
    fn test_hard_owner_flag_applies_to_new_entries() {
        let mut dictionary = Dictionary::new();
        dictionary.insert("SOFT", Pointer::new(Handle::new(0x10)));
        dictionary.is_hard_owner = true;
        dictionary.insert("HARD", Pointer::new(Handle::new(0x11)));

        let mut pairs = Vec::new();
        dictionary.add_value_pairs(&mut pairs, DxfVersion::AC1015);
        assert_eq!(entry_codes(&pairs), vec![350, 360]);
        assert!(pairs.contains(&CodePair::short(280, 1)));
    }
}
