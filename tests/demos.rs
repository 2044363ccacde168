//! The bundled demo programs keep working end to end.

use parseon::{run, CancelFlag, QueueInput};

fn exec(source: &str) -> Vec<String> {
    run(source, QueueInput::empty(), CancelFlag::new()).expect("demo failed")
}

#[test]
fn test_hello_demo() {
    let output = exec(include_str!("../demos/hello.eng"));
    assert_eq!(output, vec!["Hello, World!", "Welcome to Parseon!", "Hello Developer"]);
}

#[test]
fn test_factorial_demo() {
    let output = exec(include_str!("../demos/factorial.eng"));
    assert_eq!(output, vec!["120", "Factorial calculated!"]);
}

#[test]
fn test_fibonacci_demo() {
    let output = exec(include_str!("../demos/fibonacci.eng"));
    assert_eq!(output, vec!["0", "1", "1", "2", "3", "5", "8", "13", "21", "34"]);
}

#[test]
fn test_gcd_demo() {
    let output = exec(include_str!("../demos/gcd.eng"));
    assert_eq!(output, vec!["Finding GCD of", "48", "and", "18", "GCD:", "6"]);
}

#[test]
fn test_prime_demo() {
    let output = exec(include_str!("../demos/prime.eng"));
    assert_eq!(output, vec!["17", "is prime"]);
}

#[test]
fn test_grades_demo() {
    let output = exec(include_str!("../demos/grades.eng"));
    assert_eq!(output, vec!["Grade: B"]);
}

#[test]
fn test_math_demo() {
    let output = exec(include_str!("../demos/math.eng"));
    assert_eq!(output, vec!["30", "200", "12", "256", "15", "2"]);
}
