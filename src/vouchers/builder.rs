use log::debug;
use rand::rngs::ThreadRng;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use super::dates;
use super::ids::IdGenerator;
use super::mapping::{ColumnMapping, FieldKey};
use super::{Cell, RunConfig};

// Base offsets for the internal record keys Tally expects to be unique
// and increasing within an import file.
const ALTER_ID_BASE: u64 = 12_317;
const MASTER_ID_BASE: u64 = 1_740;
const VOUCHER_KEY_BASE: u64 = 197_469_711_368_200;
const VOUCHER_RETAIN_KEY_BASE: u64 = 6_957;

// The import schema wants this exact byte sequence, control character
// included, wherever a GST class or form type is "not applicable".
const NOT_APPLICABLE: &str = "\u{0004} Not Applicable";

/// The complete import payload: one voucher per input row, in input order.
#[derive(Debug, Serialize)]
pub struct OutputDocument {
    pub tallymessage: Vec<Value>,
}

/// Builds fully-populated voucher records from mapped spreadsheet rows.
pub struct VoucherBuilder<R: Rng> {
    ids: IdGenerator<R>,
}

impl VoucherBuilder<ThreadRng> {
    pub fn new() -> VoucherBuilder<ThreadRng> {
        VoucherBuilder { ids: IdGenerator::new() }
    }
}

impl Default for VoucherBuilder<ThreadRng> {
    fn default() -> Self {
        VoucherBuilder::new()
    }
}

impl<R: Rng> VoucherBuilder<R> {
    /// Builder with an injected identifier source, for reproducible runs.
    pub fn with_ids(ids: IdGenerator<R>) -> VoucherBuilder<R> {
        VoucherBuilder { ids }
    }

    /// Converts every row into a voucher record. Malformed cells never fail
    /// the run: unparsable numbers become 0 and unparsable dates degrade to
    /// the lossy fallback of [`dates::normalize`].
    pub fn build(&mut self, rows: &[Vec<Cell>], mapping: &ColumnMapping, config: &RunConfig) -> OutputDocument {
        let tallymessage = rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.build_voucher(index, row, mapping, config))
            .collect();

        OutputDocument { tallymessage }
    }

    fn build_voucher(&mut self, index: usize, row: &[Cell], mapping: &ColumnMapping, config: &RunConfig) -> Value {
        let resolve = |field: FieldKey| -> Option<&Cell> {
            mapping
                .get(&field)
                .and_then(|column| row.get(*column))
                .filter(|cell| !cell.is_falsy())
        };

        let date = dates::normalize(resolve(FieldKey::Date).unwrap_or(&Cell::Empty));
        let voucher_number = resolve(FieldKey::VoucherNumber)
            .map(Cell::as_text)
            .unwrap_or_else(|| format!("VCH-{}", index + 1));
        let party_name = text_or(resolve(FieldKey::PartyName), "Cash");
        let stock_item = text_or(resolve(FieldKey::StockItemName), "Default Item");
        let quantity = numeric(resolve(FieldKey::Quantity), FieldKey::Quantity).unwrap_or(Decimal::ZERO);
        let unit = text_or(resolve(FieldKey::Unit), "Nos.");
        let rate = numeric(resolve(FieldKey::Rate), FieldKey::Rate).unwrap_or(Decimal::ZERO);
        // A zero or unparsable amount falls back to the derived value.
        let amount = numeric(resolve(FieldKey::Amount), FieldKey::Amount)
            .filter(|a| !a.is_zero())
            .unwrap_or_else(|| quantity * rate);
        let godown = text_or(resolve(FieldKey::GodownName), config.default_godown());
        let batch = text_or(resolve(FieldKey::BatchName), "Primary Batch");
        let party_gst = resolve(FieldKey::PartyGstNo).map(Cell::as_text).unwrap_or_default();

        let amount_2dp = format!("{:.2}", amount);
        let negated_2dp = format!("{:.2}", -amount);
        let qty_2dp = format!(" {:.2} {}", quantity, unit);
        let rate_per_unit = format!("{:.2}/{}", rate, unit);

        let guid = self.ids.generate();
        let remote_id = self.ids.remote_id(index);
        let vch_type = config.voucher_type().as_str();
        let sequence = index as u64;

        json!({
            "metadata": {
                "type": "Voucher",
                "remoteid": remote_id,
                "vchkey": format!("{guid}:00000008"),
                "vchtype": vch_type,
                "action": "Create",
                "objview": "Invoice Voucher View"
            },
            "oldauditentryids": old_audit_entry_ids(),
            "date": &date,
            "vchstatusdate": &date,
            "guid": guid,
            "enteredby": "admin",
            "objectupdateaction": "Alter",
            "vouchertypename": vch_type,
            "partyname": &party_name,
            "partyledgername": &party_name,
            "vouchernumber": voucher_number,
            "basicbuyername": &party_name,
            "basicbasepartyname": &party_name,
            "numberingstyle": "Manual",
            "cstformissuetype": NOT_APPLICABLE,
            "cstformrecvtype": NOT_APPLICABLE,
            "fbtpaymenttype": "Default",
            "persistedview": "Invoice Voucher View",
            "vchstatustaxadjustment": "Default",
            "vchstatusvouchertype": vch_type,
            "basicbuyerssalestaxno": party_gst,
            "basicduedateofpymt": "Cash",
            "vchgstclass": NOT_APPLICABLE,
            "vouchertypeorigname": vch_type,
            "diffactualqty": false,
            "ismstfromsync": false,
            "isdeleted": false,
            "issecurityonwhenentered": true,
            "asoriginal": false,
            "audited": false,
            "iscommonparty": false,
            "forjobcosting": false,
            "isoptional": false,
            "effectivedate": &date,
            "useforexcise": false,
            "isforjobworkin": false,
            "allowconsumption": false,
            "useforinterest": false,
            "useforgainloss": false,
            "useforgodowntransfer": false,
            "useforcompound": false,
            "useforservicetax": false,
            "isreversechargeapplicable": false,
            "issystem": false,
            "isfetchedonly": false,
            "isgstoverridden": false,
            "iscancelled": false,
            "isonhold": false,
            "issummary": false,
            "isecommercesupply": false,
            "isboenotapplicable": false,
            "isgstsecsevenapplicable": false,
            "ignoreeinvvalidation": false,
            "cmpgstisothterritoryassessee": false,
            "partygstisothterritoryassessee": false,
            "irnjsonexported": false,
            "irncancelled": false,
            "ignoregstconflictinmig": false,
            "isopbaltransaction": false,
            "ignoregstformatvalidation": false,
            "iseligibleforitc": true,
            "ignoregstoptionaluncertain": false,
            "updatesummaryvalues": false,
            "isewaybillapplicable": false,
            "isdeletedretained": false,
            "isnull": false,
            "isexcisevoucher": false,
            "excisetaxoverride": false,
            "usefortaxunittransfer": false,
            "isexer1nopoverwrite": false,
            "isexf2nopoverwrite": false,
            "isexer3nopoverwrite": false,
            "ignoreposvalidation": false,
            "exciseopening": false,
            "useforfinalproduction": false,
            "istdsoverridden": false,
            "istcsoverridden": false,
            "istdstcscashvch": false,
            "includeadvpymtvch": false,
            "issubworkscontract": false,
            "isvatoverridden": false,
            "ignoreorigvchdate": false,
            "isvatpaidatcustoms": false,
            "isdeclaredtocustoms": false,
            "vatadvancepayment": false,
            "vatadvpay": false,
            "iscstdelcaredgoodssales": false,
            "isvatrestaxinv": false,
            "isservicetaxoverridden": false,
            "isisdvoucher": false,
            "isexciseoverridden": false,
            "isexcisesupplyvch": false,
            "gstnotexported": false,
            "ignoregstinvalidation": false,
            "isgstrefund": false,
            "ovrdnewaybillapplicability": false,
            "isvatprincipalaccount": false,
            "vchstatusisvchnumused": false,
            "vchgststatusisincluded": false,
            "vchgststatusisuncertain": false,
            "vchgststatusisexcluded": false,
            "vchgststatusisapplicable": false,
            "vchgststatusisgstr2breconciled": false,
            "vchgststatusisgstr2bonlyinportal": false,
            "vchgststatusisgstr2bonlyinbooks": false,
            "vchgststatusisgstr2bmismatch": false,
            "vchgststatusisgstr2bindiffperiod": false,
            "vchgststatusisreteffdateoverrdn": false,
            "vchgststatusisoverrdn": false,
            "vchgststatusisstatindiffdate": false,
            "vchgststatusisretindiffdate": false,
            "vchgststatusmainsectionexcluded": false,
            "vchgststatusisbranchtransferout": false,
            "vchgststatusissystemsummary": false,
            "vchstatusisunregisteredrcm": false,
            "vchstatusisoptional": false,
            "vchstatusiscancelled": false,
            "vchstatusisdeleted": false,
            "vchstatusisopeningbalance": false,
            "vchstatusisfetchedonly": false,
            "vchgststatusisoptionaluncertain": false,
            "vchstatusisreacceptforhsndone": false,
            "vchstatusisreaccephsnsixonedone": false,
            "paymentlinkhasmultiref": false,
            "isshippingwithinstate": false,
            "isoverseastouristtrans": false,
            "isdesignatedzoneparty": false,
            "hascashflow": false,
            "ispostdated": false,
            "usetrackingnumber": false,
            "isinvoice": true,
            "mfgjournal": false,
            "hasdiscounts": false,
            "aspayslip": false,
            "iscostcentre": false,
            "isstxnonrealizedvch": false,
            "isexcisemanufactureron": false,
            "isblankcheque": false,
            "isvoid": false,
            "orderlinestatus": false,
            "vatisagnstcancsales": false,
            "vatispurcexempted": false,
            "isvatrestaxinvoice": false,
            "vatisassesablecalcvch": false,
            "isvatdutypaid": true,
            "isdeliverysameasconsignee": false,
            "isdispatchsameasconsignor": false,
            "isdeletedvchretained": false,
            "vchonlyaddlinfoupdated": false,
            "changevchmode": false,
            "resetirnqrcode": false,
            "alterid": (ALTER_ID_BASE + sequence).to_string(),
            "masterid": (MASTER_ID_BASE + sequence).to_string(),
            "voucherkey": (VOUCHER_KEY_BASE + sequence).to_string(),
            "voucherretainkey": (VOUCHER_RETAIN_KEY_BASE + sequence).to_string(),
            "vouchernumberseries": "Default",
            "allinventoryentries": [{
                "stockitemname": stock_item,
                "isdeemedpositive": false,
                "isgstassessablevalueoverridden": false,
                "strdisgstapplicable": false,
                "contentnegispos": false,
                "islastdeemedpositive": false,
                "isautonegate": false,
                "iscustomsclearance": false,
                "istrackcomponent": false,
                "istrackproduction": false,
                "isprimaryitem": false,
                "isscrap": false,
                "rate": rate_per_unit,
                "amount": &amount_2dp,
                "actualqty": &qty_2dp,
                "billedqty": &qty_2dp,
                "batchallocations": [{
                    "godownname": godown,
                    "batchname": batch,
                    "indentno": NOT_APPLICABLE,
                    "orderno": NOT_APPLICABLE,
                    "trackingnumber": NOT_APPLICABLE,
                    "dynamiccstiscleared": false,
                    "amount": &amount_2dp,
                    "actualqty": &qty_2dp,
                    "billedqty": &qty_2dp
                }],
                "accountingallocations": [{
                    "oldauditentryids": old_audit_entry_ids(),
                    "ledgername": config.sales_ledger(),
                    "gstclass": NOT_APPLICABLE,
                    "isdeemedpositive": false,
                    "ledgerfromitem": false,
                    "removezeroentries": false,
                    "ispartyledger": false,
                    "gstoverridden": false,
                    "isgstassessablevalueoverridden": false,
                    "strdisgstapplicable": false,
                    "strdgstispartyledger": false,
                    "strdgstisdutyledger": false,
                    "contentnegispos": false,
                    "islastdeemedpositive": false,
                    "iscapvattaxaltered": false,
                    "iscapvatnotclaimed": false,
                    "amount": &amount_2dp
                }]
            }],
            "ledgerentries": [{
                "oldauditentryids": old_audit_entry_ids(),
                "ledgername": &party_name,
                "gstclass": NOT_APPLICABLE,
                "isdeemedpositive": true,
                "ledgerfromitem": false,
                "removezeroentries": false,
                "ispartyledger": true,
                "gstoverridden": false,
                "isgstassessablevalueoverridden": false,
                "strdisgstapplicable": false,
                "strdgstispartyledger": false,
                "strdgstisdutyledger": false,
                "contentnegispos": false,
                "islastdeemedpositive": true,
                "iscapvattaxaltered": false,
                "iscapvatnotclaimed": false,
                "amount": negated_2dp
            }]
        })
    }
}

fn old_audit_entry_ids() -> Value {
    json!([{ "metadata": true, "type": "Number" }, "-1"])
}

fn text_or(cell: Option<&Cell>, default: &str) -> String {
    cell.map(Cell::as_text).unwrap_or_else(|| default.to_string())
}

fn numeric(cell: Option<&Cell>, field: FieldKey) -> Option<Decimal> {
    let cell = cell?;
    let parsed = cell.to_decimal();
    if parsed.is_none() {
        debug!("unparsable {} cell, using default, value={:?}", field.label(), cell);
    }
    parsed
}
