//! General functions related to finance.
use crate::units::{
    Dimensionless, Money, MoneyPerSquareFootPerYear, MoneyPerYear, PerYear, SquareFeet,
};

/// Calculates the capital recovery factor (CRF) for a given amortization period and interest rate.
///
/// The CRF is the fraction of a capital cost which must be repaid each year so that the loan is
/// paid off, with interest, at the end of the period: r / (1 - (1 + r)^-n).
///
/// If the interest rate is zero, this is simply 1/n. A period of zero years is treated as paying
/// off the whole capital cost in a single year, so the factor is one regardless of interest rate.
pub fn capital_recovery_factor(period: u32, interest_rate: Dimensionless) -> PerYear {
    if period == 0 {
        return PerYear(1.0);
    }
    if interest_rate == Dimensionless(0.0) {
        return PerYear(1.0 / f64::from(period));
    }

    let discount = (Dimensionless(1.0) + interest_rate).powf(-f64::from(period));
    PerYear((interest_rate / (Dimensionless(1.0) - discount)).value())
}

/// Calculates the fixed yearly payment which repays `principal` over `period` years
pub fn annual_payment(principal: Money, period: u32, interest_rate: Dimensionless) -> MoneyPerYear {
    principal * capital_recovery_factor(period, interest_rate)
}

/// Calculates the yearly cost of a capital expenditure per unit of floor area.
///
/// The area must be positive. This is checked when typologies are loaded.
pub fn amortized_cost_per_area(
    principal: Money,
    period: u32,
    interest_rate: Dimensionless,
    area: SquareFeet,
) -> MoneyPerSquareFootPerYear {
    annual_payment(principal, period, interest_rate) / area
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.05, 1.0)] // Edge case: period==0
    #[case(0, 0.0, 1.0)]
    #[case(10, 0.0, 0.1)] // Other edge case: interest_rate==0
    #[case(10, 0.05, 0.1295045749654567)]
    #[case(5, 0.03, 0.2183545714005762)]
    #[case(30_000, 0.03, 0.03)] // Long periods tend to the interest rate
    #[case(3_000_000_000, 0.03, 0.03)]
    #[case(u32::MAX, 0.05, 0.05)]
    fn test_capital_recovery_factor(
        #[case] period: u32,
        #[case] interest_rate: f64,
        #[case] expected: f64,
    ) {
        let result = capital_recovery_factor(period, Dimensionless(interest_rate));
        assert_approx_eq!(f64, result.0, expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(50_000.0, 20, 0.03, 3360.785379842954)]
    #[case(1000.0, 10, 0.05, 129.5045749654567)]
    #[case(2000.0, 20, 0.0, 100.0)] // Zero interest rate
    #[case(1000.0, 0, 0.05, 1000.0)] // Zero period: paid off in one year
    #[case(0.0, 20, 0.03, 0.0)]
    fn test_annual_payment(
        #[case] principal: f64,
        #[case] period: u32,
        #[case] interest_rate: f64,
        #[case] expected: f64,
    ) {
        let result = annual_payment(Money(principal), period, Dimensionless(interest_rate));
        assert_approx_eq!(MoneyPerYear, result, MoneyPerYear(expected), epsilon = 1e-8);
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(20)]
    #[case(40)]
    fn test_annual_payment_zero_interest(#[case] period: u32) {
        let principal = Money(12_345.0);
        let result = annual_payment(principal, period, Dimensionless(0.0));
        assert_approx_eq!(
            MoneyPerYear,
            result,
            MoneyPerYear(principal.value() / period as f64)
        );
    }

    #[test]
    fn test_amortized_cost_per_area() {
        let result = amortized_cost_per_area(
            Money(50_000.0),
            20,
            Dimensionless(0.03),
            SquareFeet(10_000.0),
        );
        assert_approx_eq!(
            MoneyPerSquareFootPerYear,
            result,
            MoneyPerSquareFootPerYear(0.336_078_537_984_295_4),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_amortized_cost_decreases_with_period() {
        let cost = |period| {
            amortized_cost_per_area(
                Money(50_000.0),
                period,
                Dimensionless(0.03),
                SquareFeet(10_000.0),
            )
        };
        for period in 1..40 {
            assert!(cost(period + 1) < cost(period));
        }
    }

    #[test]
    fn test_amortized_cost_very_long_period() {
        // Only the interest is paid each year
        let result = amortized_cost_per_area(
            Money(50_000.0),
            3_000_000_000,
            Dimensionless(0.03),
            SquareFeet(10_000.0),
        );
        assert_approx_eq!(
            MoneyPerSquareFootPerYear,
            result,
            MoneyPerSquareFootPerYear(0.15),
            epsilon = 1e-10
        );
    }
}
