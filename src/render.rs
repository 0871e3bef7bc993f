use fnv::FnvHashMap;

use crate::alg;
use crate::entity;

/// Instanced mesh renderer: one transform per drawn copy, grouped by owner
pub trait Sink {
    /// Returns the index of the new instance
    fn add_instance(
        &mut self,
        owner: entity::Handle,
        transform: alg::Transform,
    ) -> usize;

    fn clear_instances(&mut self, owner: entity::Handle);
    fn instance_count(&self, owner: entity::Handle) -> usize;

    /// Out-of-range indices are ignored
    fn update_instance(
        &mut self,
        owner: entity::Handle,
        index: usize,
        transform: alg::Transform,
    );
}

/// CPU-side instance buffers, ready for upload by the host renderer
pub struct Instances {
    data: FnvHashMap<entity::Handle, Vec<alg::Transform>>,
    dirty: bool,
}

impl Instances {
    pub fn new(hint: usize) -> Instances {
        let mut data = FnvHashMap::default();
        data.reserve(hint);

        Instances {
            data,
            dirty: false,
        }
    }

    pub fn get(&self, owner: entity::Handle) -> &[alg::Transform] {
        match self.data.get(&owner) {
            Some(transforms) => transforms.as_slice(),
            None => &[],
        }
    }

    /// Model matrices for every instance of an owner
    pub fn matrices(&self, owner: entity::Handle) -> Vec<alg::Mat> {
        self.get(owner).iter()
            .map(|transform| transform.to_mat())
            .collect()
    }

    /// Returns true once after any change, then resets
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Sink for Instances {
    fn add_instance(
        &mut self,
        owner: entity::Handle,
        transform: alg::Transform,
    ) -> usize {
        let transforms = self.data.entry(owner).or_insert_with(Vec::new);
        transforms.push(transform);
        self.dirty = true;

        transforms.len() - 1
    }

    fn clear_instances(&mut self, owner: entity::Handle) {
        if self.data.remove(&owner).is_some() {
            self.dirty = true;
        }
    }

    fn instance_count(&self, owner: entity::Handle) -> usize {
        self.get(owner).len()
    }

    fn update_instance(
        &mut self,
        owner: entity::Handle,
        index: usize,
        transform: alg::Transform,
    ) {
        if let Some(slot) = self.data.get_mut(&owner)
            .and_then(|transforms| transforms.get_mut(index))
        {
            *slot = transform;
            self.dirty = true;
        }
    }
}
