use std::collections::HashMap;

use serde::Serialize;

/// The logical accounting fields a spreadsheet column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Date,
    VoucherNumber,
    PartyName,
    PartyGstNo,
    StockItemName,
    Quantity,
    Unit,
    Rate,
    Amount,
    GodownName,
    BatchName,
    Narration,
}

impl FieldKey {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::Date => "Date",
            FieldKey::VoucherNumber => "Voucher No",
            FieldKey::PartyName => "Party Name",
            FieldKey::PartyGstNo => "Party GST",
            FieldKey::StockItemName => "Stock Item",
            FieldKey::Quantity => "Quantity",
            FieldKey::Unit => "Unit",
            FieldKey::Rate => "Rate",
            FieldKey::Amount => "Amount",
            FieldKey::GodownName => "Godown",
            FieldKey::BatchName => "Batch",
            FieldKey::Narration => "Narration",
        }
    }

    /// Fields a voucher cannot reasonably be built without. Only used to
    /// warn the user when the heuristic left one of them unmapped.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FieldKey::Date
                | FieldKey::VoucherNumber
                | FieldKey::PartyName
                | FieldKey::StockItemName
                | FieldKey::Quantity
                | FieldKey::Rate
                | FieldKey::Amount
        )
    }
}

/// Field to 0-based column index. A missing key means "no column assigned,
/// use the field default". Two fields may point at the same column.
pub type ColumnMapping = HashMap<FieldKey, usize>;

/// Substring patterns per field, in matching priority order. Both the entry
/// order and the pattern order are part of the mapping contract.
pub const FIELD_CATALOG: &[(FieldKey, &[&str])] = &[
    (FieldKey::Date, &["date", "dt", "voucher date", "invoice date", "bill date"]),
    (FieldKey::VoucherNumber, &["voucher", "invoice", "bill", "number", "no", "vch no", "inv no", "vch"]),
    (FieldKey::PartyName, &["party", "customer", "vendor", "supplier", "buyer", "name", "ledger", "account"]),
    (FieldKey::PartyGstNo, &["gst", "gstin", "gst no", "tax no"]),
    (FieldKey::StockItemName, &["item", "stock", "product", "goods", "material", "description", "particular"]),
    (FieldKey::Quantity, &["qty", "quantity", "units", "nos", "pcs"]),
    (FieldKey::Unit, &["unit", "uom", "measure"]),
    (FieldKey::Rate, &["rate", "price", "unit price", "mrp", "per"]),
    (FieldKey::Amount, &["amount", "value", "total", "net amount", "net"]),
    (FieldKey::GodownName, &["godown", "warehouse", "location", "store"]),
    (FieldKey::BatchName, &["batch", "lot", "batch no"]),
    (FieldKey::Narration, &["narration", "remarks", "description", "notes", "comment"]),
];

/// Guesses a field-to-column mapping from the header row.
///
/// For each catalog field, headers are scanned by increasing column index
/// and the first header that matches any pattern wins; a later column never
/// overrides it, even if a more specific pattern would match there. A match
/// is a substring test in either direction between the lower-cased header
/// and the pattern. Fields with no matching header are left out.
pub fn map_columns(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();

    for (field, patterns) in FIELD_CATALOG {
        'headers: for (index, header) in headers.iter().enumerate() {
            let header = header.to_lowercase();
            for pattern in *patterns {
                if header.contains(pattern) || pattern.contains(header.as_str()) {
                    mapping.insert(*field, index);
                    break 'headers;
                }
            }
        }
    }

    mapping
}

/// Required fields the heuristic could not place.
pub fn unmapped_required(mapping: &ColumnMapping) -> Vec<FieldKey> {
    FIELD_CATALOG
        .iter()
        .map(|(field, _)| *field)
        .filter(|field| field.is_required() && !mapping.contains_key(field))
        .collect()
}
