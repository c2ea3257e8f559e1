use std::fmt;

/// Amounts are integers in the smallest currency unit (diram).
/// 100 diram = 1 somoni, so 50.00 somoni = 5000.
pub type Money = i64;

/// Format an amount as whole units with two decimals.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_money(amount: Money) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse "50", "50.5" or "50.05" into the smallest unit.
/// Digits past the second decimal place are truncated.
pub fn parse_money(input: &str) -> Result<Money, ParseMoneyError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, fraction_str) = digits.split_once('.').unwrap_or((digits, ""));
    if fraction_str.contains('.') || (units_str.is_empty() && fraction_str.is_empty()) {
        return Err(ParseMoneyError::InvalidFormat);
    }

    if !fraction_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseMoneyError::InvalidFormat);
    }

    let units: Money = if units_str.is_empty() {
        0
    } else {
        parse_digits(units_str)?
    };

    let fraction: Money = match fraction_str.len() {
        0 => 0,
        1 => parse_digits(fraction_str)? * 10,
        _ => parse_digits(&fraction_str[..2])?,
    };

    let amount = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(fraction))
        .ok_or(ParseMoneyError::Overflow)?;
    Ok(if negative { -amount } else { amount })
}

fn parse_digits(s: &str) -> Result<Money, ParseMoneyError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseMoneyError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseMoneyError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoneyError::InvalidFormat => write!(f, "invalid money format"),
            ParseMoneyError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseMoneyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0), "0.00");
        assert_eq!(format_money(7), "0.07");
        assert_eq!(format_money(250_000), "2500.00");
        assert_eq!(format_money(-1999), "-19.99");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("100"), Ok(10_000));
        assert_eq!(parse_money("0.5"), Ok(50));
        assert_eq!(parse_money(".25"), Ok(25));
        assert_eq!(parse_money("19.999"), Ok(1999));
        assert_eq!(parse_money(" 3.10 "), Ok(310));
        assert_eq!(parse_money("-2"), Ok(-200));
    }

    #[test]
    fn test_parse_money_rejects_garbage() {
        assert_eq!(parse_money(""), Err(ParseMoneyError::InvalidFormat));
        assert_eq!(parse_money("1.2.3"), Err(ParseMoneyError::InvalidFormat));
        assert_eq!(parse_money("12a"), Err(ParseMoneyError::InvalidFormat));
        assert_eq!(parse_money("+5"), Err(ParseMoneyError::InvalidFormat));
        assert_eq!(parse_money("1.€"), Err(ParseMoneyError::InvalidFormat));
        assert_eq!(
            parse_money("99999999999999999999"),
            Err(ParseMoneyError::Overflow)
        );
    }
}
