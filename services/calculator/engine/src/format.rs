/// Renders `value` as the shortest decimal string that parses back to the
/// same `f64`. Integral values carry no fractional part and `-0` becomes `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use crate::expression::{plain_number, tokenize, Token};

    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.5), "-12.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(std::f64::consts::PI), "3.141592653589793");
        assert_eq!(format_number(1e21), "1000000000000000000000");
        assert_eq!(format_number(1.5e-7), "0.00000015");
    }

    #[test]
    fn test_formatted_values_reparse() -> Result<(), Box<dyn std::error::Error>> {
        for &value in &[
            1.0 / 3.0,
            std::f64::consts::E,
            123456789.125,
            2f64.powi(60),
            5e-324,
            f64::MAX,
        ] {
            assert_eq!(tokenize(&format_number(value))?, vec![Token::Number(value)]);
            assert_eq!(plain_number(&format_number(-value)), Some(-value));
        }
        Ok(())
    }
}
