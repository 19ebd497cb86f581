/// Format an amount with thousands separators: 1,234.56
pub fn money(val: f64) -> String {
    let cents = (val.abs() * 100.0).round() as i64;
    let (int_part, dec_part) = (cents / 100, cents % 100);

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if val < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}{grouped}.{dec_part:02}")
}

/// Signed variant with an explicit '+' on inflows, for register output.
pub fn signed_money(val: f64) -> String {
    if val > 0.0 {
        format!("+{}", money(val))
    } else {
        money(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "1,234.56");
        assert_eq!(money(-500.0), "-500.00");
        assert_eq!(money(0.0), "0.00");
        assert_eq!(money(1000000.99), "1,000,000.99");
        assert_eq!(money(42.1), "42.10");
    }

    #[test]
    fn test_money_rounds_half_cents() {
        assert_eq!(money(0.005), "0.01");
        assert_eq!(money(-0.001), "0.00");
    }

    #[test]
    fn test_signed_money() {
        assert_eq!(signed_money(200.0), "+200.00");
        assert_eq!(signed_money(-50.0), "-50.00");
        assert_eq!(signed_money(0.0), "0.00");
    }
}
