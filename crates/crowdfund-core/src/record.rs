//! Raw campaign records as returned by the contract boundary
//!
//! The same campaign can arrive as a positional tuple
//! (`[id, title, description, category, creator, goal, pledged, endAt, claimed]`)
//! or as an object keyed by field name. Numbers can be JSON numbers, decimal
//! strings, `0x` hex strings, or big-number objects (`{"hex": "0x.."}`).
//!
//! Every accessor here is total: a missing or unusable field yields `None`
//! from the coercion helpers and a default from the typed accessors.

use std::fmt;

use serde_json::Value;

use crate::units::{normalize_amount, WeiAmount};

/// The nine fields of a campaign record, in positional order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignField {
    Id,
    Title,
    Description,
    Category,
    Creator,
    Goal,
    Pledged,
    EndAt,
    Claimed,
}

impl CampaignField {
    pub const ALL: [CampaignField; 9] = [
        CampaignField::Id,
        CampaignField::Title,
        CampaignField::Description,
        CampaignField::Category,
        CampaignField::Creator,
        CampaignField::Goal,
        CampaignField::Pledged,
        CampaignField::EndAt,
        CampaignField::Claimed,
    ];

    /// Index in the tuple form
    pub fn position(self) -> usize {
        self as usize
    }

    /// Key in the object form (ABI output name)
    pub fn name(self) -> &'static str {
        match self {
            CampaignField::Id => "id",
            CampaignField::Title => "title",
            CampaignField::Description => "description",
            CampaignField::Category => "category",
            CampaignField::Creator => "creator",
            CampaignField::Goal => "goal",
            CampaignField::Pledged => "pledged",
            CampaignField::EndAt => "endAt",
            CampaignField::Claimed => "claimed",
        }
    }
}

/// A wei amount together with the sign the record carried.
///
/// Negative amounts are not expected from the contract, but the sign is
/// kept so the ether value reflects what was actually read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedAmount {
    pub negative: bool,
    pub magnitude: WeiAmount,
}

impl SignedAmount {
    /// Ether value with the sign applied
    pub fn to_ether(&self) -> f64 {
        normalize_amount(&self.to_string())
    }

    /// The exact amount, or zero for negative values
    pub fn non_negative(&self) -> WeiAmount {
        if self.negative {
            WeiAmount::zero()
        } else {
            self.magnitude.clone()
        }
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.magnitude.is_zero() {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

/// Which representation a raw record uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    Positional,
    Named,
    Unrecognized,
}

/// Borrowed view over one raw campaign record
#[derive(Debug, Clone, Copy)]
pub struct RawCampaignRecord<'a> {
    value: &'a Value,
}

impl<'a> RawCampaignRecord<'a> {
    pub fn new(value: &'a Value) -> Self {
        RawCampaignRecord { value }
    }

    pub fn shape(&self) -> RecordShape {
        match self.value {
            Value::Array(_) => RecordShape::Positional,
            Value::Object(_) => RecordShape::Named,
            _ => RecordShape::Unrecognized,
        }
    }

    /// Look a field up by position for tuples, by name for objects.
    ///
    /// Objects without the named key fall back to a positional key
    /// (`"0"`, `"1"`, …). `null` counts as absent.
    pub fn field(&self, field: CampaignField) -> Option<&'a Value> {
        let found = match self.value {
            Value::Array(items) => items.get(field.position()),
            Value::Object(map) => map
                .get(field.name())
                .or_else(|| map.get(&field.position().to_string())),
            _ => None,
        };
        found.filter(|v| !v.is_null())
    }

    pub fn text(&self, field: CampaignField) -> String {
        self.coerce(field, coerce_text).unwrap_or_default()
    }

    pub fn integer(&self, field: CampaignField) -> u64 {
        self.coerce(field, coerce_u64).unwrap_or(0)
    }

    pub fn amount(&self, field: CampaignField) -> WeiAmount {
        self.coerce(field, coerce_amount).unwrap_or_default()
    }

    pub fn signed_amount(&self, field: CampaignField) -> SignedAmount {
        self.coerce(field, coerce_signed_amount).unwrap_or_default()
    }

    pub fn flag(&self, field: CampaignField) -> bool {
        self.coerce(field, coerce_bool).unwrap_or(false)
    }

    fn coerce<T>(&self, field: CampaignField, convert: fn(&Value) -> Option<T>) -> Option<T> {
        match self.field(field) {
            Some(value) => {
                let converted = convert(value);
                if converted.is_none() {
                    tracing::debug!(field = field.name(), %value, "unusable field, using default");
                }
                converted
            }
            None => {
                tracing::trace!(field = field.name(), "missing field, using default");
                None
            }
        }
    }
}

// ── Coercions ─────────────────────────────────────────────

/// Text fields: strings verbatim, scalars by their display form.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer amounts of any width: numbers, decimal or hex strings, and
/// big-number objects. Negative or fractional values are rejected.
pub fn coerce_amount(value: &Value) -> Option<WeiAmount> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Some(WeiAmount::from(u));
            }
            // arbitrary_precision keeps the literal text of big integers
            WeiAmount::parse(&n.to_string()).or_else(|| {
                let f = n.as_f64()?;
                if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
                    WeiAmount::parse(&format!("{:.0}", f))
                } else {
                    None
                }
            })
        }
        Value::String(s) => WeiAmount::parse(s),
        Value::Object(_) => big_number_hex(value).and_then(WeiAmount::parse),
        _ => None,
    }
}

/// Like [`coerce_amount`], but a leading `-` on a number or string is kept
/// as a sign instead of rejecting the value.
pub fn coerce_signed_amount(value: &Value) -> Option<SignedAmount> {
    let unsigned = |magnitude: WeiAmount| SignedAmount {
        negative: false,
        magnitude,
    };
    let negated = |magnitude: WeiAmount| SignedAmount {
        negative: true,
        magnitude,
    };

    match value {
        Value::String(s) => match s.trim().strip_prefix('-') {
            Some(rest) => WeiAmount::parse(rest).map(negated),
            None => WeiAmount::parse(s).map(unsigned),
        },
        Value::Number(n) if n.as_f64().is_some_and(|f| f < 0.0) => {
            let text = n.to_string();
            let rest = text.trim_start_matches('-');
            WeiAmount::parse(rest)
                .or_else(|| {
                    let f = n.as_f64()?.abs();
                    if f.is_finite() && f.fract() == 0.0 {
                        WeiAmount::parse(&format!("{:.0}", f))
                    } else {
                        None
                    }
                })
                .map(negated)
        }
        _ => coerce_amount(value).map(unsigned),
    }
}

/// The hex text of a big-number object (`{"hex": ..}` or `{"_hex": ..}`)
pub fn big_number_hex(value: &Value) -> Option<&str> {
    let map = value.as_object()?;
    map.get("hex")
        .or_else(|| map.get("_hex"))
        .and_then(Value::as_str)
}

/// True for big-number objects, which stand in for a single number
pub fn is_big_number(value: &Value) -> bool {
    big_number_hex(value).is_some()
}

/// Small integers (ids, timestamps). Values that do not fit `u64` are rejected.
pub fn coerce_u64(value: &Value) -> Option<u64> {
    coerce_amount(value)?
        .to_u128()
        .and_then(|v| u64::try_from(v).ok())
}

/// Flags: booleans, non-zero numbers, and the strings `"true"` / `"1"`.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(s.trim().eq_ignore_ascii_case("true") || s.trim() == "1"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positions_follow_abi_order() {
        let names: Vec<&str> = CampaignField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "id",
                "title",
                "description",
                "category",
                "creator",
                "goal",
                "pledged",
                "endAt",
                "claimed"
            ]
        );
        assert_eq!(CampaignField::EndAt.position(), 7);
    }

    #[test]
    fn test_shape_detection() {
        assert_eq!(RawCampaignRecord::new(&json!([1])).shape(), RecordShape::Positional);
        assert_eq!(RawCampaignRecord::new(&json!({"id": 1})).shape(), RecordShape::Named);
        assert_eq!(RawCampaignRecord::new(&json!(7)).shape(), RecordShape::Unrecognized);
    }

    #[test]
    fn test_field_lookup_by_shape() {
        let tuple = json!([3, "Title"]);
        let named = json!({"id": 3, "title": "Title"});
        let keyed = json!({"0": 3, "1": "Title"});
        for raw in [&tuple, &named, &keyed] {
            let record = RawCampaignRecord::new(raw);
            assert_eq!(record.integer(CampaignField::Id), 3);
            assert_eq!(record.text(CampaignField::Title), "Title");
            assert_eq!(record.field(CampaignField::Goal), None);
        }
    }

    #[test]
    fn test_null_is_absent() {
        let raw = json!({"title": null, "claimed": null});
        let record = RawCampaignRecord::new(&raw);
        assert_eq!(record.text(CampaignField::Title), "");
        assert!(!record.flag(CampaignField::Claimed));
    }

    #[test]
    fn test_coerce_amount_variants() {
        assert_eq!(coerce_amount(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(
            coerce_amount(&json!("5000000000000000000000")).unwrap().as_str(),
            "5000000000000000000000"
        );
        assert_eq!(
            coerce_amount(&json!({"type": "BigNumber", "hex": "0x0de0b6b3a7640000"}))
                .unwrap()
                .as_str(),
            "1000000000000000000"
        );
        assert_eq!(coerce_amount(&json!({"_hex": "0x10"})).unwrap().as_str(), "16");
        assert_eq!(coerce_amount(&json!(2.0e3)).unwrap().as_str(), "2000");
        assert_eq!(coerce_amount(&json!(-5)), None);
        assert_eq!(coerce_amount(&json!(1.5)), None);
        assert_eq!(coerce_amount(&json!("ten")), None);
        assert_eq!(coerce_amount(&json!(true)), None);
    }

    #[test]
    fn test_coerce_signed_amount_keeps_sign() {
        let negative = coerce_signed_amount(&json!("-1500000000000000000")).unwrap();
        assert!(negative.negative);
        assert_eq!(negative.to_string(), "-1500000000000000000");
        assert_eq!(negative.to_ether(), -1.5);
        assert!(negative.non_negative().is_zero());

        let number = coerce_signed_amount(&json!(-3)).unwrap();
        assert_eq!(number.to_string(), "-3");

        let positive = coerce_signed_amount(&json!({"hex": "0x10"})).unwrap();
        assert!(!positive.negative);
        assert_eq!(positive.non_negative().as_str(), "16");

        assert_eq!(coerce_signed_amount(&json!("-abc")), None);
        assert_eq!(coerce_signed_amount(&json!(-1.5)), None);
        assert_eq!(coerce_signed_amount(&json!("-0")).unwrap().to_string(), "0");
    }

    #[test]
    fn test_big_number_detection() {
        assert!(is_big_number(&json!({"type": "BigNumber", "hex": "0x01"})));
        assert!(is_big_number(&json!({"_hex": "0x01"})));
        assert!(!is_big_number(&json!({"id": 1, "title": "x"})));
        assert!(!is_big_number(&json!([1])));
    }

    #[test]
    fn test_big_json_number_stays_exact() {
        let raw: Value = serde_json::from_str("[0,\"\",\"\",\"\",\"\",123456789012345678901234567890]").unwrap();
        let record = RawCampaignRecord::new(&raw);
        assert_eq!(
            record.amount(CampaignField::Goal).as_str(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_coerce_u64_range() {
        assert_eq!(coerce_u64(&json!("1999999999")), Some(1_999_999_999));
        assert_eq!(coerce_u64(&json!("0x10")), Some(16));
        assert_eq!(coerce_u64(&json!("18446744073709551616")), None);
    }

    #[test]
    fn test_coerce_text_and_bool() {
        assert_eq!(coerce_text(&json!(12)), Some("12".into()));
        assert_eq!(coerce_text(&json!(false)), Some("false".into()));
        assert_eq!(coerce_text(&json!([1])), None);
        assert_eq!(coerce_bool(&json!(1)), Some(true));
        assert_eq!(coerce_bool(&json!(0)), Some(false));
        assert_eq!(coerce_bool(&json!("TRUE")), Some(true));
        assert_eq!(coerce_bool(&json!("no")), Some(false));
        assert_eq!(coerce_bool(&json!({})), None);
    }
}
