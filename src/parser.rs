use crate::{
    constant::{ADDRESS_BITS, CLOCK_PERIOD_US, DELAY_BITS, HEX_PREFIX, IMMEDIATE_BITS, REGISTER_BITS},
    data::{AssemblyError, AssemblyErrorCode},
};

fn invalid(reason: String) -> AssemblyError {
    AssemblyError::new(AssemblyErrorCode::InvalidOperand, reason)
}

fn field_max(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

fn check_width(value: u64, bits: u32, what: &str, raw: &str) -> Result<u64, AssemblyError> {
    if value > field_max(bits) {
        return Err(invalid(format!(
            "{what} [ {raw} ] does not fit in {bits} bits"
        )));
    }
    Ok(value)
}

pub fn has_hex_prefix(raw: &str) -> bool {
    raw.len() > HEX_PREFIX.len()
        && raw
            .get(..HEX_PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(HEX_PREFIX))
}

/// Parses a base 16 literal, with or without a `0x` prefix.
pub fn parse_hex(raw: &str) -> Result<u64, AssemblyError> {
    let digits = if has_hex_prefix(raw) {
        &raw[HEX_PREFIX.len()..]
    } else {
        raw
    };
    match u64::from_str_radix(digits, 16) {
        Ok(value) => Ok(value),
        Err(err) => Err(invalid(format!(
            "[ {raw} ] is an invalid hex literal :: [ {err} ]"
        ))),
    }
}

pub fn parse_decimal(raw: &str) -> Result<u64, AssemblyError> {
    match raw.parse::<u64>() {
        Ok(value) => Ok(value),
        Err(err) => Err(invalid(format!(
            "[ {raw} ] is an invalid decimal literal :: [ {err} ]"
        ))),
    }
}

pub fn parse_register(raw: &str) -> Result<u8, AssemblyError> {
    let value = check_width(parse_decimal(raw)?, REGISTER_BITS, "register", raw)?;
    Ok(value as u8)
}

pub fn parse_address_literal(raw: &str) -> Result<u32, AssemblyError> {
    let value = check_width(parse_hex(raw)?, ADDRESS_BITS, "address", raw)?;
    Ok(value as u32)
}

pub fn check_address(address: u64, raw: &str) -> Result<u32, AssemblyError> {
    Ok(check_width(address, ADDRESS_BITS, "address", raw)? as u32)
}

pub fn parse_immediate(raw: &str) -> Result<u64, AssemblyError> {
    check_width(parse_decimal(raw)?, IMMEDIATE_BITS, "immediate", raw)
}

/// Converts a duration in microseconds to sequencer clock cycles, rounding down.
/// The duration may be any expression `meval` accepts, e.g. `2*50` or `12.5`.
pub fn parse_delay(raw: &str) -> Result<u64, AssemblyError> {
    let duration = match meval::eval_str(raw) {
        Ok(d) => d,
        Err(err) => {
            return Err(invalid(format!(
                "[ {raw} ] is an invalid duration :: [ {err} ]"
            )))
        }
    };
    if !duration.is_finite() || duration < 0.0 {
        return Err(invalid(format!(
            "duration [ {raw} ] must be a finite non-negative number of microseconds"
        )));
    }
    let cycles = (duration / CLOCK_PERIOD_US).floor();
    if cycles > field_max(DELAY_BITS) as f64 {
        return Err(invalid(format!(
            "duration [ {raw} ] exceeds the {DELAY_BITS} bit delay counter"
        )));
    }
    Ok(cycles as u64)
}
