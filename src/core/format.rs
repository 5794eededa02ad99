//! pt-BR display strings: `.` groups thousands, `,` separates decimals.
//!
//! Rounding works on the shortest round-trip decimal form of the value and
//! goes half away from zero, so `1.005` shows as `1,01`.

const CURRENCY_SYMBOL: &str = "R$";
const SYMBOL_SPACE: char = '\u{a0}';
const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// `1234.5` -> `"R$ 1.234,50"` (with a no-break space after the symbol).
pub fn format_currency(value: f64) -> String {
    format!(
        "{}{CURRENCY_SYMBOL}{SYMBOL_SPACE}{}",
        sign(value),
        format_magnitude(value, 0, 2, 2)
    )
}

/// Digits as shown inside a money input: `10000.0` -> `"10.000,00"`.
pub fn format_number_input(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    format!("{}{}", sign(value), format_magnitude(value, 0, 2, 2))
}

/// `value` is already on the 0-100 scale: `12.5` -> `"12,5%"`.
pub fn format_percentage(value: f64) -> String {
    let fraction = value / 100.0;
    format!("{}{}%", sign(fraction), format_magnitude(fraction, 2, 1, 2))
}

/// A money field shows nothing while its value is zero.
pub fn format_money_field(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        format_number_input(value)
    }
}

fn sign(value: f64) -> &'static str {
    if value.is_sign_negative() && !value.is_nan() {
        "-"
    } else {
        ""
    }
}

/// Unsigned rendering of `value * 10^shift` with between `min_fraction` and
/// `max_fraction` decimals.
fn format_magnitude(value: f64, shift: usize, min_fraction: usize, max_fraction: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return "∞".to_string();
    }

    let (int_digits, frac_digits) = shifted_digits(value.abs(), shift);
    let (int_digits, mut frac_digits) = round_half_away(&int_digits, &frac_digits, max_fraction);
    while frac_digits.len() > min_fraction && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let mut out = group_thousands(&int_digits);
    if !frac_digits.is_empty() {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(&frac_digits);
    }
    out
}

/// Splits the shortest decimal form of `value` into integer and fraction
/// digits after moving the decimal point `shift` places to the right.
fn shifted_digits(value: f64, shift: usize) -> (String, String) {
    // `Display` for f64 never switches to exponent notation.
    let text = value.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut int_digits = int_part.to_string();
    let mut frac_digits = frac_part.to_string();
    for _ in 0..shift {
        if frac_digits.is_empty() {
            int_digits.push('0');
        } else {
            int_digits.push(frac_digits.remove(0));
        }
    }

    let trimmed = int_digits.trim_start_matches('0');
    let int_digits = if trimmed.is_empty() { "0" } else { trimmed };
    (int_digits.to_string(), frac_digits)
}

fn round_half_away(int_digits: &str, frac_digits: &str, places: usize) -> (String, String) {
    let round_up = frac_digits
        .as_bytes()
        .get(places)
        .is_some_and(|digit| *digit >= b'5');

    let mut digits: Vec<u8> = int_digits.bytes().collect();
    digits.extend(frac_digits.bytes().take(places));
    while digits.len() < int_digits.len() + places {
        digits.push(b'0');
    }

    if round_up {
        let mut index = digits.len();
        loop {
            if index == 0 {
                digits.insert(0, b'1');
                break;
            }
            index -= 1;
            if digits[index] == b'9' {
                digits[index] = b'0';
            } else {
                digits[index] += 1;
                break;
            }
        }
    }

    let split = digits.len() - places;
    let frac = String::from_utf8_lossy(&digits[split..]).into_owned();
    let int = String::from_utf8_lossy(&digits[..split]).into_owned();
    (int, frac)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }
    out
}
