// Unique identifiers for visual objects

use rustc_hash::{FxHashMap, FxHashSet};

/// Hands out `prefix1`, `prefix2`, ... per prefix, skipping names used by
/// the program itself so generated identifiers never collide with them
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    counters: FxHashMap<String, usize>,
    reserved: FxHashSet<String>,
}

impl NameGenerator {
    pub fn new(reserved: FxHashSet<String>) -> Self {
        NameGenerator {
            counters: FxHashMap::default(),
            reserved,
        }
    }

    pub fn generate(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let name = format!("{prefix}{counter}");
            if !self.reserved.contains(&name) {
                return name;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_per_prefix() {
        let mut names = NameGenerator::default();
        assert_eq!(names.generate("stack"), "stack1");
        assert_eq!(names.generate("stack"), "stack2");
        assert_eq!(names.generate("rectangle"), "rectangle1");
    }

    #[test]
    fn reserved_names_are_skipped() {
        let reserved = ["stack1".to_string()].into_iter().collect();
        let mut names = NameGenerator::new(reserved);
        assert_eq!(names.generate("stack"), "stack2");
    }
}
