/// Page-fault bookkeeping for one MMU. Only grows, and only on a miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    fault_order: Vec<usize>,
}

impl SimulationStats {
    pub fn new() -> Self {
        SimulationStats::default()
    }

    pub(crate) fn record_fault(&mut self, page: usize) {
        self.fault_order.push(page);
    }

    pub fn fault_count(&self) -> usize {
        self.fault_order.len()
    }

    /// Faulting pages in the order the faults happened.
    pub fn fault_order(&self) -> &[usize] {
        &self.fault_order
    }

    /// The fault order as `"0, 1, 2"`.
    pub fn reference_string(&self) -> String {
        self.fault_order
            .iter()
            .map(|page| page.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_follows_order() {
        let mut stats = SimulationStats::new();
        assert_eq!(stats.fault_count(), 0);
        assert_eq!(stats.reference_string(), "");

        stats.record_fault(3);
        stats.record_fault(0);
        stats.record_fault(3);

        assert_eq!(stats.fault_count(), 3);
        assert_eq!(stats.fault_order(), &[3, 0, 3]);
        assert_eq!(stats.reference_string(), "3, 0, 3");
    }
}
