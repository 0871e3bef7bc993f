pub mod transform;
pub mod chain;

use crate::entity;

pub trait Component {
    fn register(&mut self, entity: entity::Handle);
    fn count(&self) -> usize;
}

pub struct Container {
    pub transforms: transform::Manager,
    pub chains:     chain::Manager,
}

impl Container {
    pub fn new(hint: usize) -> Container {
        Container {
            transforms: transform::Manager::new(hint),
            chains:     chain::Manager::new(hint),
        }
    }
}
