// src/utils/mod.rs
use log::info;

pub fn setup_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("hyper", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}

/// Parses a caller-supplied decimal amount string.
///
/// Returns `None` for empty input, non-numeric input, NaN/infinite values and
/// anything not strictly positive. Amounts cross the public API as strings so
/// callers never feed us pre-rounded floats.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}

/// Formats a token amount back into a decimal string, trimming trailing
/// zeros so `99.70000` renders as `99.7`.
pub fn format_amount(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Formats a USD cost the way quotes display fees, e.g. `$2.50`.
/// An empty cost sum produces `-0.0`, which must still render as `$0.00`.
pub fn format_usd(value: f64) -> String {
    format!("${:.2}", value + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_amount_rejects_invalid_input() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn parse_amount_accepts_decimals() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 0.5 "), Some(0.5));
    }

    #[test]
    fn format_amount_trims_trailing_zeros() {
        assert_eq!(format_amount(99.7), "99.7");
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(0.123456789), "0.123457");
    }

    #[test]
    fn format_usd_rounds_to_cents() {
        assert_eq!(format_usd(2.499), "$2.50");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn format_usd_collapses_negative_zero() {
        // empty Iterator::<f64>::sum() yields -0.0
        let empty_sum: f64 = std::iter::empty::<f64>().sum();
        assert_eq!(format_usd(empty_sum), "$0.00");
        assert_eq!(format_usd(-0.0), "$0.00");
    }
}
