//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// `12.50 lb`
pub fn format_lb(lb: f64) -> String {
    format!("{lb:.2} lb")
}

/// `5.670 kg`
pub fn format_kg(kg: f64) -> String {
    format!("{kg:.3} kg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_fixed_precision() {
        assert_eq!(format_lb(12.5), "12.50 lb");
        assert_eq!(format_kg(5.67), "5.670 kg");
        assert_eq!(pad_left("7", 3), "  7");
    }
}
