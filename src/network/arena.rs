//! Id allocation and automatic naming

use std::collections::BTreeMap;

/// Pool of reusable integer ids
///
/// Free ids are kept as disjoint intervals, so that allocation always returns the
/// smallest free id and arbitrary ids can be reserved cheaply.
#[derive(Debug, Clone)]
pub struct IdPool {
    /// Free intervals, start -> end (exclusive). The last interval is unbounded.
    free: BTreeMap<usize, usize>,
}

impl Default for IdPool {
    fn default() -> Self {
        Self::new()
    }
}

impl IdPool {
    /// Create a pool with every id available
    pub fn new() -> IdPool {
        let mut free = BTreeMap::new();
        free.insert(0, usize::MAX);
        IdPool { free }
    }

    /// Make every id available again
    pub fn clear(&mut self) {
        *self = IdPool::new();
    }

    /// Take the smallest available id
    pub fn alloc(&mut self) -> usize {
        let (&start, &end) = self
            .free
            .iter()
            .next()
            .expect("The last interval of the pool is unbounded");
        self.free.remove(&start);
        if start + 1 < end {
            self.free.insert(start + 1, end);
        }
        start
    }

    /// Returns true if the id is currently allocated
    pub fn is_used(&self, id: usize) -> bool {
        match self.free.range(..=id).next_back() {
            Some((_, &end)) => id >= end,
            None => true,
        }
    }

    /// Take a specific id. Returns false if it was already in use
    pub fn reserve(&mut self, id: usize) -> bool {
        let Some((&start, &end)) = self.free.range(..=id).next_back() else {
            return false;
        };
        if id >= end {
            return false;
        }
        self.free.remove(&start);
        if start < id {
            self.free.insert(start, id);
        }
        if let Some(next) = id.checked_add(1).filter(|&next| next < end) {
            self.free.insert(next, end);
        }
        true
    }

    /// Give back an id
    pub fn free(&mut self, id: usize) {
        assert!(self.is_used(id), "Id {} is not allocated", id);
        let next = id.checked_add(1).expect("The largest id is never allocated");
        let mut start = id;
        let mut end = next;
        if let Some((&s, &e)) = self.free.range(..id).next_back() {
            if e == id {
                start = s;
                self.free.remove(&s);
            }
        }
        if let Some(e) = self.free.remove(&next) {
            end = e;
        }
        self.free.insert(start, end);
    }

    /// One more than the largest allocated id, or 0 if no id is allocated
    pub fn bound(&self) -> usize {
        match self.free.iter().next_back() {
            Some((&start, _)) => start,
            None => 0,
        }
    }
}

/// Generator of automatic names of the form `{prefix}{number}{suffix}`
///
/// Every name in use should be registered with [`NameGen::add`], so that generated
/// names never collide with user names that happen to follow the same pattern.
#[derive(Debug, Clone)]
pub struct NameGen {
    prefix: String,
    suffix: String,
    pool: IdPool,
}

impl Default for NameGen {
    fn default() -> Self {
        NameGen::new("[", "]")
    }
}

impl NameGen {
    /// Create a generator with the given naming pattern
    pub fn new(prefix: &str, suffix: &str) -> NameGen {
        NameGen {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
            pool: IdPool::new(),
        }
    }

    /// Prefix of generated names
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Suffix of generated names
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Change the naming pattern, forgetting every registered name
    pub fn change_rule(&mut self, prefix: &str, suffix: &str) {
        self.prefix = prefix.to_owned();
        self.suffix = suffix.to_owned();
        self.pool.clear();
    }

    /// Forget every registered name
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Number embedded in the name, if it follows the pattern
    fn number(&self, name: &str) -> Option<usize> {
        let digits = name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Only the canonical spelling can be produced by the generator
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        // The largest value is the bound of the unbounded interval, never an id
        digits.parse().ok().filter(|&n| n != usize::MAX)
    }

    /// Register a name in use
    pub fn add(&mut self, name: &str) {
        if let Some(n) = self.number(name) {
            self.pool.reserve(n);
        }
    }

    /// Unregister a name
    pub fn erase(&mut self, name: &str) {
        if let Some(n) = self.number(name) {
            if self.pool.is_used(n) {
                self.pool.free(n);
            }
        }
    }

    /// Generate a fresh name; it is registered immediately
    pub fn new_name(&mut self) -> String {
        let n = self.pool.alloc();
        format!("{}{}{}", self.prefix, n, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::{IdPool, NameGen};

    #[test]
    fn test_pool_smallest_first() {
        let mut pool = IdPool::new();
        assert_eq!(pool.alloc(), 0);
        assert_eq!(pool.alloc(), 1);
        assert_eq!(pool.alloc(), 2);
        assert_eq!(pool.bound(), 3);
        pool.free(1);
        assert!(!pool.is_used(1));
        assert_eq!(pool.alloc(), 1);
        pool.free(0);
        pool.free(2);
        assert_eq!(pool.bound(), 2);
        pool.free(1);
        assert_eq!(pool.bound(), 0);
        assert_eq!(pool.alloc(), 0);
    }

    #[test]
    fn test_pool_reserve() {
        let mut pool = IdPool::new();
        assert!(pool.reserve(5));
        assert!(!pool.reserve(5));
        assert!(pool.is_used(5));
        assert!(!pool.is_used(4));
        for i in 0..5 {
            assert_eq!(pool.alloc(), i);
        }
        assert_eq!(pool.alloc(), 6);
        pool.free(5);
        assert_eq!(pool.alloc(), 5);
    }

    #[test]
    #[should_panic]
    fn test_pool_double_free() {
        let mut pool = IdPool::new();
        let i = pool.alloc();
        pool.free(i);
        pool.free(i);
    }

    #[test]
    fn test_names() {
        let mut gen = NameGen::default();
        gen.add("[0]");
        gen.add("[2]");
        gen.add("[03]");
        gen.add("foo");
        assert_eq!(gen.new_name(), "[1]");
        assert_eq!(gen.new_name(), "[3]");
        gen.erase("[0]");
        assert_eq!(gen.new_name(), "[0]");
        gen.change_rule("n", "");
        assert_eq!(gen.new_name(), "n0");
        gen.add("n1");
        assert_eq!(gen.new_name(), "n2");
    }

    #[test]
    fn test_names_out_of_range() {
        let mut gen = NameGen::default();
        let max = format!("[{}]", usize::MAX);
        gen.add(&max);
        gen.add("[99999999999999999999999]");
        gen.erase(&max);
        gen.erase("[99999999999999999999999]");
        assert_eq!(gen.new_name(), "[0]");
        let mut pool = IdPool::new();
        assert!(!pool.reserve(usize::MAX));
        assert!(pool.is_used(usize::MAX));
    }
}
