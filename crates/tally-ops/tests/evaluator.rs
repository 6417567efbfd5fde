use tally_ops::{evaluate, CalcError, Operation};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn add_matches_closed_form() {
    assert_eq!(evaluate(Operation::Add, 2.0, 3.0).unwrap(), 5.0);
    assert_eq!(evaluate(Operation::Add, -1.5, 0.5).unwrap(), -1.0);
}

#[test]
fn subtract_matches_closed_form() {
    assert_eq!(evaluate(Operation::Subtract, 10.0, 4.0).unwrap(), 6.0);
    assert_eq!(evaluate(Operation::Subtract, 4.0, 10.0).unwrap(), -6.0);
}

#[test]
fn multiply_matches_closed_form() {
    assert_eq!(evaluate(Operation::Multiply, 6.0, 7.0).unwrap(), 42.0);
    assert_eq!(evaluate(Operation::Multiply, -3.0, 2.5).unwrap(), -7.5);
}

#[test]
fn divide_matches_closed_form() {
    assert_eq!(evaluate(Operation::Divide, 10.0, 4.0).unwrap(), 2.5);
}

#[test]
fn divide_by_zero_is_rejected() {
    assert_eq!(
        evaluate(Operation::Divide, 1.0, 0.0).unwrap_err(),
        CalcError::DivisionByZero
    );
}

#[test]
fn power_matches_closed_form() {
    assert_close(evaluate(Operation::Power, 2.0, 10.0).unwrap(), 1024.0);
    assert_close(evaluate(Operation::Power, 9.0, 0.5).unwrap(), 3.0);
}

#[test]
fn power_overflow_is_invalid_argument() {
    let err = evaluate(Operation::Power, 10.0, 1000.0).unwrap_err();
    assert!(matches!(err, CalcError::InvalidArgument(_)));
}

#[test]
fn root_matches_closed_form() {
    assert_close(evaluate(Operation::Root, 27.0, 3.0).unwrap(), 3.0);
    assert_close(evaluate(Operation::Root, 16.0, 4.0).unwrap(), 2.0);
}

#[test]
fn zeroth_root_is_invalid_argument() {
    let err = evaluate(Operation::Root, 8.0, 0.0).unwrap_err();
    assert!(matches!(err, CalcError::InvalidArgument(_)));
}

#[test]
fn even_root_of_negative_is_invalid_argument() {
    let err = evaluate(Operation::Root, -16.0, 2.0).unwrap_err();
    assert!(matches!(err, CalcError::InvalidArgument(_)));
}

#[test]
fn modulus_matches_closed_form() {
    assert_eq!(evaluate(Operation::Modulus, 10.0, 3.0).unwrap(), 1.0);
}

#[test]
fn modulus_by_zero_is_rejected() {
    assert_eq!(
        evaluate(Operation::Modulus, 10.0, 0.0).unwrap_err(),
        CalcError::DivisionByZero
    );
}

#[test]
fn int_divide_floors_the_quotient() {
    assert_eq!(evaluate(Operation::IntDivide, 7.0, 2.0).unwrap(), 3.0);
    assert_eq!(evaluate(Operation::IntDivide, -7.0, 2.0).unwrap(), -4.0);
}

#[test]
fn int_divide_by_zero_is_rejected() {
    assert_eq!(
        evaluate(Operation::IntDivide, 7.0, 0.0).unwrap_err(),
        CalcError::DivisionByZero
    );
}

#[test]
fn percent_matches_closed_form() {
    assert_eq!(evaluate(Operation::Percent, 25.0, 200.0).unwrap(), 12.5);
}

#[test]
fn percent_with_zero_denominator_is_rejected() {
    assert_eq!(
        evaluate(Operation::Percent, 25.0, 0.0).unwrap_err(),
        CalcError::DivisionByZero
    );
}

#[test]
fn abs_diff_matches_closed_form() {
    assert_eq!(evaluate(Operation::AbsDiff, 3.0, 10.0).unwrap(), 7.0);
    assert_eq!(evaluate(Operation::AbsDiff, 10.0, 3.0).unwrap(), 7.0);
}

#[test]
fn evaluation_is_deterministic() {
    for op in Operation::all() {
        let first = evaluate(*op, 9.0, 3.0).unwrap();
        let second = evaluate(*op, 9.0, 3.0).unwrap();
        assert_eq!(first, second, "{op} must be deterministic");
    }
}
