use bigdecimal::BigDecimal;

/// Amounts are stored as `NUMERIC(14, 2)`.
pub const MAX_SCALE: i64 = 2;
pub const MAX_INTEGER_DIGITS: u32 = 12;

/// True when the amount can be stored without rounding or overflow.
pub fn fits_storage(amount: &BigDecimal) -> bool {
    let limit = BigDecimal::from(10_i64.pow(MAX_INTEGER_DIGITS));
    amount.with_scale(MAX_SCALE) == *amount && amount.abs() < limit
}
