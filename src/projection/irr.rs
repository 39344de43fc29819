//! Internal Rate of Return (IRR) calculation
//!
//! Used to express the investment's net cash flows as an annual return

/// Calculate the annual IRR of a series of yearly cash flows
/// using the Newton-Raphson method.
///
/// # Arguments
/// * `cashflows` - Cash flows at t = 0, 1, 2, ... years (positive = inflow, negative = outflow)
///
/// # Returns
/// * `Option<f64>` - Annual IRR as a decimal (e.g., 0.05 for 5%), or None if no solution found
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Some(0.0);
    }

    // IRR only exists with at least one sign change
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.10;
    let tolerance = 1e-10;
    let max_iterations = 1000;
    let npv_tolerance = 1e-8 * cashflows.iter().fold(1.0_f64, |m, cf| m.max(cf.abs()));

    for _ in 0..max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            return calculate_irr_bisection(cashflows);
        }

        // Keep the rate within a range where discounting is defined
        let new_rate = (rate - npv / dnpv).clamp(MIN_RATE, MAX_RATE);

        if (new_rate - rate).abs() < tolerance {
            // A step pinned at a bound is not a root
            if npv_at_rate(cashflows, new_rate).abs() <= npv_tolerance {
                return Some(new_rate);
            }
            return calculate_irr_bisection(cashflows);
        }

        rate = new_rate;
    }

    calculate_irr_bisection(cashflows)
}

/// Search bounds: -99% to 10,000% a year
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 100.0;

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

/// Fallback IRR calculation using bisection method
fn calculate_irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;
    let tolerance = 1e-10;
    let max_iterations = 1000;

    let npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < tolerance || (high - low) / 2.0 < tolerance {
            return Some(mid);
        }

        if npv_mid * npv_at_rate(cashflows, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    None
}

/// Calculate NPV at a given annual rate
fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Invest 1000, receive 1100 a year later
        let irr = calculate_irr(&[-1000.0, 1100.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_level_annuity() {
        // 5 payments of 1 against 4.3295 invested is about 5%
        let cashflows = [-4.329_476_67, 1.0, 1.0, 1.0, 1.0, 1.0];
        let irr = calculate_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, 0.05, epsilon = 1e-6);
        assert_abs_diff_eq!(npv_at_rate(&cashflows, irr), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_no_sign_change() {
        assert!(calculate_irr(&[-5.0, -1.0, -1.0]).is_none());
        assert!(calculate_irr(&[5.0, 1.0]).is_none());
        assert!(calculate_irr(&[]).is_none());
    }

    #[test]
    fn test_rate_above_search_window() {
        // Near-zero outlay against large returns: the true rate is far above 10,000%
        let cashflows = [-0.01, 25.25, 26.5, 27.8];
        assert!(npv_at_rate(&cashflows, MAX_RATE) > 0.1);
        assert!(calculate_irr(&cashflows).is_none());
    }

    #[test]
    fn test_rate_below_search_window() {
        // Losing 99.5% of the outlay is below the -99% floor
        let cashflows = [-100.0, 0.5];
        assert!(npv_at_rate(&cashflows, MIN_RATE) < -1.0);
        assert!(calculate_irr(&cashflows).is_none());
    }

    #[test]
    fn test_rate_near_window_edges_still_found() {
        let irr = calculate_irr(&[-100.0, 2.0]).unwrap();
        assert_abs_diff_eq!(irr, -0.98, epsilon = 1e-8);

        let irr = calculate_irr(&[-1.0, 51.0]).unwrap();
        assert_abs_diff_eq!(irr, 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_all_zero() {
        assert_eq!(calculate_irr(&[0.0, 0.0, 0.0]), Some(0.0));
    }
}
