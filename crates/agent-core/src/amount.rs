//! ============================================================================
//! Amount Conversion - Display Units <-> Base Units
//! ============================================================================
//! Converts user-facing decimal amount strings ("100", "1.5") to integer
//! base-unit strings using the per-token decimal exponent, and back.
//! All arithmetic is on digit strings and u128 — no floating point, so the
//! conversion is exact for any amount representable within the token's
//! precision. Fractional digits beyond the exponent are truncated silently.
//! ============================================================================

use crate::error::AgentError;

/// Convert a decimal amount string to an integer base-unit string.
///
/// `"100"` with 9 decimals => `"100000000000"`; `"1.5"` with 6 decimals
/// => `"1500000"`. Digits past the exponent are dropped.
pub fn to_base_units(amount: &str, decimals: u32) -> Result<String, AgentError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AgentError::InvalidPayload("empty amount".into()));
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(AgentError::InvalidPayload(format!(
            "invalid amount '{amount}'"
        )));
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AgentError::InvalidPayload(format!(
            "invalid amount '{amount}'"
        )));
    }

    // Truncate the fraction to the token's precision, then right-pad.
    let frac = &frac[..frac.len().min(decimals as usize)];
    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(frac);
    for _ in frac.len()..decimals as usize {
        digits.push('0');
    }

    let value: u128 = digits.parse().map_err(|_| {
        AgentError::InvalidPayload(format!("amount '{amount}' out of range"))
    })?;
    Ok(value.to_string())
}

/// Render a base-unit amount back to a display string, trimming trailing
/// fractional zeros. `1500000` with 6 decimals => `"1.5"`.
pub fn format_base_units(value: u128, decimals: u32) -> String {
    let divisor = 10u128.pow(decimals);
    let whole = value / divisor;
    let frac = value % divisor;
    if frac == 0 {
        return whole.to_string();
    }
    let frac_str = format!("{:0width$}", frac, width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{whole}.{trimmed}")
}

/// Parse a base-unit string into a u128.
pub fn parse_base_units(s: &str) -> Result<u128, AgentError> {
    s.trim()
        .parse()
        .map_err(|_| AgentError::InvalidPayload(format!("invalid base-unit amount '{s}'")))
}
