//! Write-off input validation and defaults.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::CoreError;

/// Maximum length of an invoice number.
pub const MAX_INVOICE_NUMBER_LENGTH: usize = 255;

/// `repair_cost` is stored as `NUMERIC(12, 2)`.
pub const COST_MAX_SCALE: u32 = 2;

/// Largest cost that fits ten integer digits.
pub fn max_cost() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Caller-supplied write-off details.
#[derive(Debug, Clone, Default)]
pub struct WriteOffInput {
    pub invoice_number: String,
    pub repair_cost: Option<Decimal>,
    pub description: Option<String>,
    pub date_to_service: Option<NaiveDate>,
    pub date_written_off: Option<NaiveDate>,
}

/// Write-off details after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWriteOff {
    pub invoice_number: String,
    pub repair_cost: Decimal,
    pub description: String,
    pub date_to_service: NaiveDate,
    pub date_written_off: NaiveDate,
}

/// Validate the input and fill in defaults.
///
/// Cost defaults to zero and description to an empty string. The write-off
/// date defaults to `today`; the service date defaults to the earlier of the
/// write-off date and `today`, so a backdated write-off alone is accepted.
pub fn resolve_write_off(
    input: &WriteOffInput,
    today: NaiveDate,
) -> Result<ResolvedWriteOff, CoreError> {
    let invoice_number = input.invoice_number.trim();
    if invoice_number.is_empty() {
        return Err(CoreError::Validation(
            "Invoice number must not be empty".to_string(),
        ));
    }
    if invoice_number.chars().count() > MAX_INVOICE_NUMBER_LENGTH {
        return Err(CoreError::Validation(format!(
            "Invoice number exceeds maximum length of {MAX_INVOICE_NUMBER_LENGTH} characters"
        )));
    }

    let repair_cost = input.repair_cost.unwrap_or(Decimal::ZERO);
    if repair_cost.is_sign_negative() && !repair_cost.is_zero() {
        return Err(CoreError::Validation(format!(
            "Repair cost must not be negative (got {repair_cost})"
        )));
    }
    if repair_cost.scale() > COST_MAX_SCALE && repair_cost.normalize().scale() > COST_MAX_SCALE {
        return Err(CoreError::Validation(format!(
            "Repair cost allows at most {COST_MAX_SCALE} decimal places (got {repair_cost})"
        )));
    }
    if repair_cost > max_cost() {
        return Err(CoreError::Validation(format!(
            "Repair cost exceeds maximum of {} (got {repair_cost})",
            max_cost()
        )));
    }

    let date_written_off = input.date_written_off.unwrap_or(today);
    let date_to_service = input
        .date_to_service
        .unwrap_or_else(|| date_written_off.min(today));
    if date_written_off < date_to_service {
        return Err(CoreError::Validation(format!(
            "Write-off date {date_written_off} is earlier than service date {date_to_service}"
        )));
    }

    Ok(ResolvedWriteOff {
        invoice_number: invoice_number.to_string(),
        repair_cost,
        description: input.description.clone().unwrap_or_default(),
        date_to_service,
        date_written_off,
    })
}
