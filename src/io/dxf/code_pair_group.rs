//! Application-defined `102` groups

use super::code_pair::CodePair;

/// One entry inside a [`CodePairGroup`].
#[derive(Debug, Clone, PartialEq)]
pub enum CodePairGroupItem {
    Pair(CodePair),
    Group(CodePairGroup),
}

/// A `{NAME ... }` block introduced by code 102.
///
/// Groups nest. A group without a name is a singleton wrapper around one
/// loose pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodePairGroup {
    pub name: Option<String>,
    pub items: Vec<CodePairGroupItem>,
}

impl CodePairGroup {
    pub fn new(name: impl Into<String>) -> Self {
        CodePairGroup {
            name: Some(name.into()),
            items: Vec::new(),
        }
    }

    pub fn singleton(pair: CodePair) -> Self {
        CodePairGroup {
            name: None,
            items: vec![CodePairGroupItem::Pair(pair)],
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.name.is_none()
    }

    pub fn add_pair(&mut self, pair: CodePair) {
        self.items.push(CodePairGroupItem::Pair(pair));
    }

    pub fn add_group(&mut self, group: CodePairGroup) {
        self.items.push(CodePairGroupItem::Group(group));
    }

    /// Direct pair children, skipping nested groups.
    pub fn pairs(&self) -> impl Iterator<Item = &CodePair> {
        self.items.iter().filter_map(|item| match item {
            CodePairGroupItem::Pair(pair) => Some(pair),
            CodePairGroupItem::Group(_) => None,
        })
    }

    /// Visit every pair, nested groups included.
    pub fn for_each_pair_mut<F: FnMut(&mut CodePair)>(&mut self, f: &mut F) {
        for item in &mut self.items {
            match item {
                CodePairGroupItem::Pair(pair) => f(pair),
                CodePairGroupItem::Group(group) => group.for_each_pair_mut(f),
            }
        }
    }

    /// Serialize back to `102 {NAME`, the items, and `102 }`.
    pub fn add_value_pairs(&self, pairs: &mut Vec<CodePair>) {
        match &self.name {
            Some(name) => {
                pairs.push(CodePair::string(102, format!("{{{}", name)));
                for item in &self.items {
                    match item {
                        CodePairGroupItem::Pair(pair) => pairs.push(pair.clone()),
                        CodePairGroupItem::Group(group) => group.add_value_pairs(pairs),
                    }
                }
                pairs.push(CodePair::string(102, "}"));
            }
            None => {
                for item in &self.items {
                    match item {
                        CodePairGroupItem::Pair(pair) => pairs.push(pair.clone()),
                        CodePairGroupItem::Group(group) => group.add_value_pairs(pairs),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_group_serialization() {
        let mut inner = CodePairGroup::new("INNER");
        inner.add_pair(CodePair::string(1, "x"));
        let mut outer = CodePairGroup::new("ACAD_REACTORS");
        outer.add_pair(CodePair::string(330, "1A"));
        outer.add_group(inner);

        let mut pairs = Vec::new();
        outer.add_value_pairs(&mut pairs);
        let values: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            values,
            ["[102/{ACAD_REACTORS]", "[330/1A]", "[102/{INNER]", "[1/x]", "[102/}]", "[102/}]"]
        );
    }

    #[test]
    fn test_singleton() {
        let group = CodePairGroup::singleton(CodePair::short(70, 1));
        assert!(group.is_singleton());
        let mut pairs = Vec::new();
        group.add_value_pairs(&mut pairs);
        assert_eq!(pairs, vec![CodePair::short(70, 1)]);
    }
}
