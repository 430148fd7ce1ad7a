/// Links of one slot in a [`NodeList`]
#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
    linked: bool,
}

/// Doubly-linked list of node slots
///
/// Insertion and removal are constant time. The links are stored per slot, so a
/// slot can belong to several lists at once (a role list and the list of all nodes).
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct NodeList {
    links: Vec<Link>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl NodeList {
    /// Number of slots in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the slot is in the list
    pub fn contains(&self, slot: usize) -> bool {
        self.links.get(slot).map_or(false, |l| l.linked)
    }

    /// Append a slot at the end
    pub fn push_back(&mut self, slot: usize) {
        if slot >= self.links.len() {
            self.links.resize(slot + 1, Link::default());
        }
        assert!(!self.links[slot].linked, "Slot {} is already linked", slot);
        self.links[slot] = Link {
            prev: self.tail,
            next: None,
            linked: true,
        };
        match self.tail {
            Some(t) => self.links[t].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Unlink a slot
    pub fn remove(&mut self, slot: usize) {
        assert!(self.contains(slot), "Slot {} is not linked", slot);
        let Link { prev, next, .. } = self.links[slot];
        match prev {
            Some(p) => self.links[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.links[n].prev = prev,
            None => self.tail = prev,
        }
        self.links[slot] = Link::default();
        self.len -= 1;
    }

    /// Remove every slot
    pub fn clear(&mut self) {
        *self = NodeList::default();
    }

    /// Iterate over the slots in insertion order
    pub fn iter(&self) -> NodeListIter<'_> {
        NodeListIter {
            list: self,
            cur: self.head,
        }
    }
}

/// Iterator over the slots of a [`NodeList`]
pub struct NodeListIter<'a> {
    list: &'a NodeList,
    cur: Option<usize>,
}

impl<'a> Iterator for NodeListIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let ret = self.cur?;
        self.cur = self.list.links[ret].next;
        Some(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::NodeList;

    #[test]
    fn test_insert_remove() {
        let mut l = NodeList::default();
        for i in [3, 1, 4, 7] {
            l.push_back(i);
        }
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![3, 1, 4, 7]);
        l.remove(4);
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![3, 1, 7]);
        l.remove(3);
        l.remove(7);
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(l.len(), 1);
        assert!(l.contains(1));
        assert!(!l.contains(3));
        l.push_back(3);
        assert_eq!(l.iter().collect::<Vec<_>>(), vec![1, 3]);
        l.clear();
        assert!(l.is_empty());
        assert_eq!(l.iter().count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_double_insert() {
        let mut l = NodeList::default();
        l.push_back(2);
        l.push_back(2);
    }
}
