//! Running accumulators for a projection

/// Savings and cash-flow position at a point in the projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionState {
    /// Current projection year (1-indexed once advanced)
    pub year: u32,

    /// Sum of annual savings through the current year
    pub cumulative_savings: f64,

    /// Net cash position, starting at minus the initial investment
    pub cash_flow: f64,

    /// First year the cash position reached zero
    pub payback_period: Option<u32>,
}

impl ProjectionState {
    /// Initialize state at time zero
    pub fn new(initial_investment: f64) -> Self {
        Self {
            year: 0,
            cumulative_savings: 0.0,
            cash_flow: -initial_investment,
            payback_period: None,
        }
    }

    /// Advance to next year
    pub fn advance_year(&mut self) {
        self.year += 1;
    }

    /// Record a year's savings.
    ///
    /// `cost_addback` is whatever ongoing cost was already netted out of
    /// `annual_savings`; the cash position tracks the gross improvement against
    /// the initial investment.
    pub fn record(&mut self, annual_savings: f64, cost_addback: f64) {
        self.cumulative_savings += annual_savings;
        self.cash_flow += annual_savings + cost_addback;

        if self.payback_period.is_none() && self.cash_flow >= 0.0 {
            self.payback_period = Some(self.year);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payback_set_once() {
        let mut state = ProjectionState::new(10.0);

        state.advance_year();
        state.record(6.0, 0.0);
        assert_eq!(state.payback_period, None);

        state.advance_year();
        state.record(6.0, 0.0);
        assert_eq!(state.payback_period, Some(2));

        // Falling back below zero does not move the payback year
        state.advance_year();
        state.record(-20.0, 0.0);
        assert!(state.cash_flow < 0.0);
        state.advance_year();
        state.record(30.0, 0.0);
        assert_eq!(state.payback_period, Some(2));
    }

    #[test]
    fn test_cost_addback_only_affects_cash_flow() {
        let mut state = ProjectionState::new(5.0);
        state.advance_year();
        state.record(4.0, 1.0);
        assert_eq!(state.cumulative_savings, 4.0);
        assert_eq!(state.cash_flow, 0.0);
        assert_eq!(state.payback_period, Some(1));
    }
}
