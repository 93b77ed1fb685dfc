//! Number-theory helpers shared by operators, combos, bosses and relics.
//!
//! Functions that produce a number return `f64::NAN` outside their domain so
//! they can be used directly as operator implementations.

/// Largest argument accepted by [`factorial`].
pub const FACTORIAL_CAP: f64 = 12.0;
/// Largest argument accepted by [`triangular`] and [`rectangular`].
pub const FIGURATE_CAP: f64 = 100.0;

/// Rounds half up (`-2.5` rounds to `-2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds half up to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    round_half_up(value * scale) / scale
}

pub fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

pub fn factorial(n: f64) -> f64 {
    if n < 0.0 || !is_integer(n) || n > FACTORIAL_CAP {
        return f64::NAN;
    }
    (2..=n as u64).fold(1.0, |acc, i| acc * i as f64)
}

pub fn triangular(n: f64) -> f64 {
    if n < 0.0 || !is_integer(n) || n > FIGURATE_CAP {
        return f64::NAN;
    }
    n * (n + 1.0) / 2.0
}

pub fn rectangular(n: f64) -> f64 {
    if n < 0.0 || !is_integer(n) || n > FIGURATE_CAP {
        return f64::NAN;
    }
    n * (n + 1.0)
}

pub fn is_prime(n: f64) -> bool {
    if n < 2.0 || !is_integer(n) {
        return false;
    }
    let n = n as u64;
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Palindrome test on the digits of `|floor(n)|`; single digits do not count.
pub fn is_palindrome(n: f64) -> bool {
    if !n.is_finite() {
        return false;
    }
    let digits = format!("{}", n.floor().abs());
    digits.len() > 1 && digits.chars().eq(digits.chars().rev())
}

pub fn is_perfect_square(n: f64) -> bool {
    if n < 0.0 || !n.is_finite() {
        return false;
    }
    let root = n.sqrt();
    root.floor() == root
}

/// `n` is Fibonacci iff `5n² + 4` or `5n² - 4` is a perfect square.
pub fn is_fibonacci(n: f64) -> bool {
    if n < 0.0 || !is_integer(n) {
        return false;
    }
    let base = 5.0 * n * n;
    is_perfect_square(base + 4.0) || is_perfect_square(base - 4.0)
}

pub fn is_power_of_two(n: f64) -> bool {
    if n <= 0.0 || !is_integer(n) || n > u64::MAX as f64 {
        return false;
    }
    (n as u64).is_power_of_two()
}

/// Closest prime to `n`, preferring the lower one on ties.
pub fn nearest_prime(n: u32) -> u32 {
    if is_prime(f64::from(n)) {
        return n;
    }
    let mut distance = 1;
    loop {
        if let Some(lower) = n.checked_sub(distance)
            && lower >= 2
            && is_prime(f64::from(lower))
        {
            return lower;
        }
        let upper = n.saturating_add(distance);
        if is_prime(f64::from(upper)) {
            return upper;
        }
        distance += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_matches_half_up_semantics() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_to(0.1 + 0.2, 3), 0.3);
        assert_eq!(round_to(1.23456, 2), 1.23);
    }

    #[test]
    fn factorial_is_capped_at_twelve() {
        assert_eq!(factorial(0.0), 1.0);
        assert_eq!(factorial(5.0), 120.0);
        assert_eq!(factorial(12.0), 479_001_600.0);
        assert!(factorial(13.0).is_nan());
        assert!(factorial(2.5).is_nan());
        assert!(factorial(-1.0).is_nan());
    }

    #[test]
    fn figurate_numbers() {
        assert_eq!(triangular(4.0), 10.0);
        assert_eq!(rectangular(4.0), 20.0);
        assert!(triangular(101.0).is_nan());
        assert!(rectangular(0.5).is_nan());
    }

    #[test]
    fn primes() {
        let primes: Vec<u32> = (0..30).filter(|n| is_prime(f64::from(*n))).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(!is_prime(7.5));
    }

    #[test]
    fn palindromes_need_two_digits() {
        assert!(is_palindrome(121.0));
        assert!(is_palindrome(-44.0));
        assert!(is_palindrome(33.7));
        assert!(!is_palindrome(7.0));
        assert!(!is_palindrome(12.0));
    }

    #[test]
    fn fibonacci_and_squares() {
        assert!(is_fibonacci(8.0));
        assert!(is_fibonacci(1.0));
        assert!(!is_fibonacci(4.0));
        assert!(is_perfect_square(49.0));
        assert!(!is_perfect_square(50.0));
        assert!(!is_perfect_square(-4.0));
    }

    #[test]
    fn powers_of_two() {
        assert!(is_power_of_two(64.0));
        assert!(!is_power_of_two(0.0));
        assert!(!is_power_of_two(6.0));
        assert!(!is_power_of_two(2.5));
    }

    #[test]
    fn nearest_prime_prefers_lower_on_tie() {
        assert_eq!(nearest_prime(13), 13);
        assert_eq!(nearest_prime(12), 11);
        assert_eq!(nearest_prime(9), 7);
        assert_eq!(nearest_prime(0), 2);
    }
}
