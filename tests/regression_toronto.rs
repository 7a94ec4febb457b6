//! A regression test for the "toronto" example
use regression::run_regression_test;

#[test]
fn test_regression_toronto() {
    run_regression_test("toronto");
}
