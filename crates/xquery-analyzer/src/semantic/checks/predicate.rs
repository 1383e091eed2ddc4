/// Predicate nesting depth, never below zero
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PredicateDepth {
    level: u32,
}

impl PredicateDepth {
    pub fn reset(&mut self) {
        self.level = 0;
    }

    pub fn enter(&mut self) {
        self.level += 1;
    }

    pub fn exit(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn in_predicate(&self) -> bool {
        self.level > 0
    }
}
