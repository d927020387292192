//! Typed field records for each document type.
//!
//! The LLM is asked for a particular JSON shape but nothing guarantees it
//! follows it. Every field here deserializes leniently: numbers may arrive as
//! strings ("Rp 15.000"), text may arrive as numbers, lists may be null or
//! contain junk. What can't be coerced becomes the field's default.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::DocumentType;

/// A monetary amount or quantity. Whole values serialize as JSON integers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Amount(pub f64);

impl Amount {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
            serializer.serialize_i64(v as i64)
        } else if v.is_finite() {
            serializer.serialize_f64(v)
        } else {
            serializer.serialize_i64(0)
        }
    }
}

fn one() -> Amount {
    Amount(1.0)
}

// ---------------------------------------------------------------------------
// Receipt

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptFields {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub store_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<ReceiptItem>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default = "one", deserialize_with = "lenient::quantity")]
    pub quantity: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: Amount,
}

// ---------------------------------------------------------------------------
// Invoice

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFields {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub invoice_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub invoice_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub seller_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub seller_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub buyer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub buyer_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub subtotal: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub tax: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: Amount,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub payment_terms: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notes: Option<String>,
}

/// Line item shared by invoices and purchase orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub quantity: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub unit_price: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub amount: Option<Amount>,
}

// ---------------------------------------------------------------------------
// Purchase order

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderFields {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub po_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub po_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub delivery_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub buyer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub buyer_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub supplier_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub supplier_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub subtotal: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub tax: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: Amount,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub payment_terms: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Bank statement

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankStatementFields {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub account_holder: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub bank_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub statement_period: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub opening_balance: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub closing_balance: Amount,
    #[serde(default, deserialize_with = "lenient::list")]
    pub transactions: Vec<BankTransaction>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_debit: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_credit: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub debit: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub credit: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub balance: Option<Amount>,
}

// ---------------------------------------------------------------------------
// Stock card

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCardFields {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub item_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub item_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub warehouse: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub opening_stock: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub closing_stock: Amount,
    #[serde(default, deserialize_with = "lenient::list")]
    pub movements: Vec<StockMovement>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_in: Amount,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_out: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub quantity_in: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub quantity_out: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub balance: Option<Amount>,
}

// ---------------------------------------------------------------------------
// Contract

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFields {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contract_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub contract_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub effective_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub parties: Vec<ContractParty>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub contract_value: Amount,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub payment_terms: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub key_terms: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub governing_law: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractParty {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub address: Option<String>,
}

// ---------------------------------------------------------------------------

/// Extracted fields for one document, serialized as the bare record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedDocument {
    Receipt(ReceiptFields),
    Invoice(InvoiceFields),
    PurchaseOrder(PurchaseOrderFields),
    BankStatement(BankStatementFields),
    StockCard(StockCardFields),
    Contract(ContractFields),
}

impl ParsedDocument {
    /// The empty record returned when extraction fails: null fields, empty lists, zero totals.
    pub fn placeholder(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Receipt => Self::Receipt(ReceiptFields::default()),
            DocumentType::Invoice => Self::Invoice(InvoiceFields::default()),
            DocumentType::PurchaseOrder => Self::PurchaseOrder(PurchaseOrderFields::default()),
            DocumentType::BankStatement => Self::BankStatement(BankStatementFields::default()),
            DocumentType::StockCard => Self::StockCard(StockCardFields::default()),
            DocumentType::Contract => Self::Contract(ContractFields::default()),
        }
    }

    /// Coerce an untrusted JSON value into the record for `doc_type`.
    pub fn from_value(doc_type: DocumentType, value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom(format!(
                "expected a JSON object for {}, got {}",
                doc_type,
                json_kind(&value)
            )));
        }

        Ok(match doc_type {
            DocumentType::Receipt => Self::Receipt(serde_json::from_value(value)?),
            DocumentType::Invoice => Self::Invoice(serde_json::from_value(value)?),
            DocumentType::PurchaseOrder => Self::PurchaseOrder(serde_json::from_value(value)?),
            DocumentType::BankStatement => Self::BankStatement(serde_json::from_value(value)?),
            DocumentType::StockCard => Self::StockCard(serde_json::from_value(value)?),
            DocumentType::Contract => Self::Contract(serde_json::from_value(value)?),
        })
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::Receipt(_) => DocumentType::Receipt,
            Self::Invoice(_) => DocumentType::Invoice,
            Self::PurchaseOrder(_) => DocumentType::PurchaseOrder,
            Self::BankStatement(_) => DocumentType::BankStatement,
            Self::StockCard(_) => DocumentType::StockCard,
            Self::Contract(_) => DocumentType::Contract,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Forgiving `deserialize_with` helpers.
mod lenient {
    use once_cell::sync::Lazy;
    use regex::Regex;
    use serde::de::{DeserializeOwned, Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    use super::Amount;

    static CURRENCY_PREFIX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(rp\.?|idr|usd|\$)\s*").expect("valid regex"));
    static TRAILING_DASH: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[.,]-$").expect("valid regex"));
    static GROUPED: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^-?\d{1,3}([.,]\d{3})+$").expect("valid regex"));
    static DOT_GROUPED_DECIMAL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+,\d{1,2}$").expect("valid regex"));
    static COMMA_GROUPED_DECIMAL: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^-?\d{1,3}(,\d{3})+\.\d{1,2}$").expect("valid regex"));

    /// Parse numbers the way they show up on Indonesian documents:
    /// `15.000` and `15,000` are fifteen thousand, `1.234,50` has a decimal comma.
    pub(super) fn parse_number(raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        let without_prefix = CURRENCY_PREFIX.replace(trimmed, "");
        let without_dash = TRAILING_DASH.replace(without_prefix.trim(), "");
        let compact: String = without_dash.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.is_empty() {
            return None;
        }

        let normalized = if GROUPED.is_match(&compact) {
            compact.replace(['.', ','], "")
        } else if DOT_GROUPED_DECIMAL.is_match(&compact) {
            compact.replace('.', "").replace(',', ".")
        } else if COMMA_GROUPED_DECIMAL.is_match(&compact) {
            compact.replace(',', "")
        } else if compact.matches(',').count() == 1 && !compact.contains('.') {
            compact.replace(',', ".")
        } else {
            compact
        };

        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn number_from(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    fn text_from(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Amount(number_from(&value).unwrap_or(0.0)))
    }

    pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Amount(number_from(&value).unwrap_or(1.0)))
    }

    pub fn opt_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Amount>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(number_from(&value).map(Amount))
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(text_from(&value))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        text_from(&value).ok_or_else(|| D::Error::custom("expected non-empty text"))
    }

    pub fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items.iter().filter_map(text_from).collect(),
            other => text_from(&other).into_iter().collect(),
        })
    }

    /// A list of records; entries that don't fit the record are dropped.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
