use fnv::FnvHashMap;

use crate::alg;
use crate::entity;
use crate::components;

// Data layout assumes that almost all entities will have this component
pub struct Manager {
    positions:    Vec<alg::Vec3>,
    orientations: Vec<alg::Quat>,
    scales:       Vec<alg::Vec3>,
    registered:   Vec<bool>,

    // Named attachment points, in local space
    sockets: FnvHashMap<(entity::Handle, String), alg::Vec3>,
}

impl components::Component for Manager {
    fn register(&mut self, entity: entity::Handle) {
        debug_assert!(self.positions.len() == self.orientations.len());
        debug_assert!(self.orientations.len() == self.scales.len());

        let i = entity.get_index() as usize;

        // Resize array to fit new entity
        while i >= self.positions.len() {
            self.positions.push(alg::Vec3::zero());
            self.orientations.push(alg::Quat::id());
            self.scales.push(alg::Vec3::one());
            self.registered.push(false);
        }

        self.registered[i] = true;
    }

    fn count(&self) -> usize {
        self.registered.iter()
            .filter(|registered| **registered)
            .count()
    }
}

impl Manager {
    pub fn new(hint: usize) -> Manager {
        Manager {
            positions:    Vec::with_capacity(hint),
            orientations: Vec::with_capacity(hint),
            scales:       Vec::with_capacity(hint),
            registered:   Vec::with_capacity(hint),
            sockets:      FnvHashMap::default(),
        }
    }

    pub fn check(&self, entity: entity::Handle) -> bool {
        let i = entity.get_index() as usize;
        i < self.registered.len() && self.registered[i]
    }

    /// Drops the entity's transform and sockets
    pub fn remove(&mut self, entity: entity::Handle) {
        let i = entity.get_index() as usize;

        if i < self.registered.len() {
            self.registered[i] = false;
            self.positions[i] = alg::Vec3::zero();
            self.orientations[i] = alg::Quat::id();
            self.scales[i] = alg::Vec3::one();
        }

        self.sockets.retain(|key, _| key.0 != entity);
    }

    pub fn set(
        &mut self,
        entity:      entity::Handle,
        position:    alg::Vec3,
        orientation: alg::Quat,
        scale:       alg::Vec3,
    ) {
        let i = entity.get_index() as usize;
        debug_assert!(i < self.positions.len());

        self.positions[i] = position;
        self.orientations[i] = orientation;
        self.scales[i] = scale;
    }

    pub fn set_position(&mut self, entity: entity::Handle, position: alg::Vec3) {
        let i = entity.get_index() as usize;
        debug_assert!(i < self.positions.len());

        self.positions[i] = position;
    }

    pub fn set_orientation(
        &mut self,
        entity: entity::Handle,
        orientation: alg::Quat,
    ) {
        let i = entity.get_index() as usize;
        debug_assert!(i < self.orientations.len());

        self.orientations[i] = orientation;
    }

    /// Returns `None` for entities without a transform
    pub fn get(&self, entity: entity::Handle) -> Option<alg::Transform> {
        if !self.check(entity) {
            return None;
        }

        let i = entity.get_index() as usize;

        Some(
            alg::Transform::new(
                self.positions[i],
                self.orientations[i],
                self.scales[i],
            )
        )
    }

    pub fn position(&self, entity: entity::Handle) -> Option<alg::Vec3> {
        self.get(entity).map(|transform| transform.position)
    }

    /// Local space to world space
    pub fn transform_position(
        &self,
        entity: entity::Handle,
        local: alg::Vec3,
    ) -> Option<alg::Vec3> {
        self.get(entity).map(|transform| transform.transform_position(local))
    }

    pub fn add_socket(
        &mut self,
        entity: entity::Handle,
        name: &str,
        local: alg::Vec3,
    ) {
        self.sockets.insert((entity, name.to_string()), local);
    }

    /// World-space socket location; `None` if either is missing
    pub fn socket_location(
        &self,
        entity: entity::Handle,
        name: &str,
    ) -> Option<alg::Vec3> {
        let local = self.sockets.get(&(entity, name.to_string()))?;
        self.transform_position(entity, *local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;

    #[test]
    fn register_set_get() {
        let mut entities = entity::Manager::new(2);
        let first = entities.add();
        let missing = entities.add();

        let mut transforms = Manager::new(1);
        transforms.register(first);

        assert_eq!(transforms.count(), 1);
        assert!(transforms.get(first) == Some(alg::Transform::id()));
        assert!(transforms.get(missing).is_none());

        transforms.set_position(first, alg::Vec3::new(1., 2., 3.));
        assert!(transforms.position(first) == Some(alg::Vec3::new(1., 2., 3.)));

        transforms.remove(first);
        assert!(transforms.get(first).is_none());
        assert_eq!(transforms.count(), 0);
    }

    #[test]
    fn socket_follows_transform() {
        let mut entities = entity::Manager::new(1);
        let hand = entities.add();

        let mut transforms = Manager::new(1);
        transforms.register(hand);
        transforms.add_socket(hand, "grip", alg::Vec3::new(10., 0., 0.));

        transforms.set(
            hand,
            alg::Vec3::new(0., 0., 100.),
            alg::Rotator::new(0., 90., 0.).to_quat(),
            alg::Vec3::one(),
        );

        let grip = transforms.socket_location(hand, "grip").unwrap();
        assert!((grip - alg::Vec3::new(0., 10., 100.)).is_nearly_zero(0.001));

        assert!(transforms.socket_location(hand, "missing").is_none());
    }
}
