use fnv::FnvHashSet;

/// Opaque reference to anything a chain can attach to or be owned by
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Handle {
    _value: u32,
}

impl Handle {
    fn new(index: u32) -> Handle {
        Handle {
            _value: index,
        }
    }

    pub fn get_index(self) -> u32 {
        self._value
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(out, "{}", self._value)
    }
}

pub struct Manager {
    data:  FnvHashSet<Handle>,
    index: u32,
}

impl Manager {
    pub fn new(hint: usize) -> Manager {
        let mut data = FnvHashSet::default();
        data.reserve(hint);

        Manager {
            data,
            index: 0,
        }
    }

    pub fn add(&mut self) -> Handle {
        if self.data.len() == u32::MAX as usize {
            panic!("Out of space for new entities!");
        }

        // Skip handles still in use after wrapping
        while self.check(Handle::new(self.index)) {
            self.index = self.index.wrapping_add(1);
        }

        let handle = Handle::new(self.index);
        self.data.insert(handle);

        // Offset for next time
        self.index = self.index.wrapping_add(1);

        handle
    }

    pub fn check(&self, handle: Handle) -> bool {
        self.data.contains(&handle)
    }

    // Idempotent--but access a handle after remove() at your own risk!
    pub fn remove(&mut self, handle: Handle) {
        self.data.remove(&handle);
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove() {
        let mut entities = Manager::new(4);

        let first = entities.add();
        let second = entities.add();

        assert!(first != second);
        assert!(entities.check(first));
        assert_eq!(entities.count(), 2);

        entities.remove(first);
        entities.remove(first);

        assert!(!entities.check(first));
        assert!(entities.check(second));
        assert_eq!(entities.count(), 1);

        // Handles are not immediately recycled
        let third = entities.add();
        assert!(third != first);
    }
}
