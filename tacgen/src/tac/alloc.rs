//! Temp and label allocation

use super::{Label, Temp};

/// Hands out temps and labels for one compilation run.
///
/// Both counters are monotonic and shared by every function of the run, so
/// no two pieces ever mention the same temp or label.
#[derive(Debug, Default)]
pub struct Allocator {
    temp_counter: u32,
    label_counter: u32,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh temporary
    pub fn new_temp(&mut self) -> Temp {
        let temp = Temp(self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    /// Generate a fresh label
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.label_counter);
        self.label_counter += 1;
        label
    }

    pub fn temps_allocated(&self) -> u32 {
        self.temp_counter
    }

    pub fn labels_allocated(&self) -> u32 {
        self.label_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent_and_monotonic() {
        let mut alloc = Allocator::new();
        assert_eq!(alloc.new_temp(), Temp(0));
        assert_eq!(alloc.new_label(), Label(0));
        assert_eq!(alloc.new_temp(), Temp(1));
        assert_eq!(alloc.new_temp(), Temp(2));
        assert_eq!(alloc.new_label(), Label(1));
        assert_eq!(alloc.temps_allocated(), 3);
        assert_eq!(alloc.labels_allocated(), 2);
    }
}
