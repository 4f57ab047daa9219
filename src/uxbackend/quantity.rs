//! Kubernetes quantity validation for onboarding quotas

use crate::error::{Error, Result};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

const FORMAT_ERROR: &str =
    "quantities must match the regular expression '^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$'";
const SUFFIX_ERROR: &str = "unable to parse quantity's suffix";

const BINARY_SI: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const DECIMAL_SI: [&str; 9] = ["n", "u", "m", "k", "M", "G", "T", "P", "E"];

/// Validate `raw` as a Kubernetes quantity
///
/// Accepts `<sign?><number><suffix>` where the number may carry a fractional
/// part and the suffix is binary SI, decimal SI, or a decimal exponent. The
/// input is kept verbatim on success.
pub fn parse_quantity(raw: &str) -> Result<Quantity> {
    if raw.is_empty() {
        return Err(Error::InvalidQuota(FORMAT_ERROR.to_string()));
    }

    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let number_len = unsigned
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(number_len);

    if !is_number(number) {
        return Err(Error::InvalidQuota(FORMAT_ERROR.to_string()));
    }
    if !is_suffix(suffix) {
        return Err(Error::InvalidQuota(SUFFIX_ERROR.to_string()));
    }

    Ok(Quantity(raw.to_string()))
}

/// `digits`, `digits.digits`, `digits.` or `.digits`
fn is_number(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    match fraction {
        None => !whole.is_empty() && digits(whole),
        Some(frac) => !(whole.is_empty() && frac.is_empty()) && digits(whole) && digits(frac),
    }
}

fn is_suffix(s: &str) -> bool {
    if s.is_empty() || BINARY_SI.contains(&s) || DECIMAL_SI.contains(&s) {
        return true;
    }
    match s.strip_prefix(['e', 'E']) {
        Some(exponent) => {
            let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !exponent.is_empty() && exponent.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
