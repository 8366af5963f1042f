use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use super::builder::VoucherBuilder;
use super::ids::IdGenerator;
use super::mapping::{ColumnMapping, FieldKey};
use super::{Cell, RunConfig, VoucherType};

fn seeded_builder() -> VoucherBuilder<StdRng> {
    VoucherBuilder::with_ids(IdGenerator::from_rng(StdRng::seed_from_u64(1)))
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn mapping(pairs: &[(FieldKey, usize)]) -> ColumnMapping {
    pairs.iter().copied().collect()
}

#[test]
fn test_one_record_per_row_in_input_order() {
    let rows = vec![vec![text("first")], vec![text("second")], vec![text("third")]];
    let mapping = mapping(&[(FieldKey::StockItemName, 0)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    assert_eq!(document.tallymessage.len(), 3);
    for (index, voucher) in document.tallymessage.iter().enumerate() {
        // The voucher number default carries the 1-based row position.
        assert_eq!(voucher["vouchernumber"], json!(format!("VCH-{}", index + 1)));
    }
    assert_eq!(document.tallymessage[1]["allinventoryentries"][0]["stockitemname"], json!("second"));
}

#[test]
fn test_amount_defaults_to_quantity_times_rate() {
    let rows = vec![vec![text("100"), text("50")]];
    let mapping = mapping(&[(FieldKey::Quantity, 0), (FieldKey::Rate, 1)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    let entry = &document.tallymessage[0]["allinventoryentries"][0];
    assert_eq!(entry["amount"], json!("5000.00"));
    assert_eq!(entry["actualqty"], json!(" 100.00 Nos."));
    assert_eq!(entry["billedqty"], json!(" 100.00 Nos."));
    assert_eq!(entry["rate"], json!("50.00/Nos."));
    assert_eq!(entry["batchallocations"][0]["amount"], json!("5000.00"));
    assert_eq!(entry["accountingallocations"][0]["amount"], json!("5000.00"));
}

#[test]
fn test_ledger_entry_balances_item_entry() {
    let rows = vec![vec![text("1234.5")]];
    let mapping = mapping(&[(FieldKey::Amount, 0)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    let voucher = &document.tallymessage[0];
    assert_eq!(voucher["allinventoryentries"][0]["amount"], json!("1234.50"));
    assert_eq!(voucher["ledgerentries"][0]["amount"], json!("-1234.50"));
    assert_eq!(voucher["ledgerentries"][0]["ispartyledger"], json!(true));
    assert_eq!(voucher["ledgerentries"][0]["isdeemedpositive"], json!(true));
}

#[test]
fn test_mapped_amount_overrides_derived_amount() {
    let rows = vec![vec![text("10"), text("5"), text("999")]];
    let mapping = mapping(&[(FieldKey::Quantity, 0), (FieldKey::Rate, 1), (FieldKey::Amount, 2)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    assert_eq!(document.tallymessage[0]["allinventoryentries"][0]["amount"], json!("999.00"));
}

#[test]
fn test_field_defaults_for_an_unmapped_row() {
    let rows = vec![vec![text("anything")]];

    let document = seeded_builder().build(&rows, &ColumnMapping::new(), &RunConfig::default());

    let voucher = &document.tallymessage[0];
    assert_eq!(voucher["date"], json!(""));
    assert_eq!(voucher["vouchernumber"], json!("VCH-1"));
    assert_eq!(voucher["partyname"], json!("Cash"));
    assert_eq!(voucher["partyledgername"], json!("Cash"));
    assert_eq!(voucher["basicbuyername"], json!("Cash"));
    assert_eq!(voucher["basicbasepartyname"], json!("Cash"));
    assert_eq!(voucher["basicbuyerssalestaxno"], json!(""));
    assert_eq!(voucher["ledgerentries"][0]["ledgername"], json!("Cash"));

    let entry = &voucher["allinventoryentries"][0];
    assert_eq!(entry["stockitemname"], json!("Default Item"));
    assert_eq!(entry["rate"], json!("0.00/Nos."));
    assert_eq!(entry["actualqty"], json!(" 0.00 Nos."));
    assert_eq!(entry["batchallocations"][0]["godownname"], json!("Main Location"));
    assert_eq!(entry["batchallocations"][0]["batchname"], json!("Primary Batch"));
    assert_eq!(entry["accountingallocations"][0]["ledgername"], json!("Sales"));
}

#[test]
fn test_unparsable_numbers_fall_back_to_zero() {
    let rows = vec![vec![text("ten"), text("fifty")]];
    let mapping = mapping(&[(FieldKey::Quantity, 0), (FieldKey::Rate, 1)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    let entry = &document.tallymessage[0]["allinventoryentries"][0];
    assert_eq!(entry["amount"], json!("0.00"));
    assert_eq!(entry["actualqty"], json!(" 0.00 Nos."));
}

#[test]
fn test_normalized_date_fills_every_date_field() {
    let rows = vec![vec![text("2023-01-15")]];
    let mapping = mapping(&[(FieldKey::Date, 0)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    let voucher = &document.tallymessage[0];
    assert_eq!(voucher["date"], json!("20230115"));
    assert_eq!(voucher["vchstatusdate"], json!("20230115"));
    assert_eq!(voucher["effectivedate"], json!("20230115"));
}

#[test]
fn test_voucher_type_threads_through_the_record() {
    let config = RunConfig::new(VoucherType::Purchase, "Godown A".to_string(), "Purchases".to_string());
    let rows = vec![vec![text("x")]];

    let document = seeded_builder().build(&rows, &ColumnMapping::new(), &config);

    let voucher = &document.tallymessage[0];
    assert_eq!(voucher["metadata"]["vchtype"], json!("Purchase"));
    assert_eq!(voucher["vouchertypename"], json!("Purchase"));
    assert_eq!(voucher["vchstatusvouchertype"], json!("Purchase"));
    assert_eq!(voucher["vouchertypeorigname"], json!("Purchase"));
    assert_eq!(
        voucher["allinventoryentries"][0]["batchallocations"][0]["godownname"],
        json!("Godown A")
    );
    assert_eq!(
        voucher["allinventoryentries"][0]["accountingallocations"][0]["ledgername"],
        json!("Purchases")
    );
}

#[test]
fn test_schema_constants_are_emitted_verbatim() {
    let rows = vec![vec![text("x")]];

    let document = seeded_builder().build(&rows, &ColumnMapping::new(), &RunConfig::default());

    let voucher = &document.tallymessage[0];
    assert_eq!(voucher["numberingstyle"], json!("Manual"));
    assert_eq!(voucher["vchgstclass"], json!("\u{0004} Not Applicable"));
    assert_eq!(voucher["cstformissuetype"], json!("\u{0004} Not Applicable"));
    assert_eq!(voucher["persistedview"], json!("Invoice Voucher View"));
    assert_eq!(voucher["metadata"]["objview"], json!("Invoice Voucher View"));
    assert_eq!(voucher["metadata"]["action"], json!("Create"));
    assert_eq!(voucher["enteredby"], json!("admin"));
    assert_eq!(voucher["basicduedateofpymt"], json!("Cash"));
    assert_eq!(voucher["vouchernumberseries"], json!("Default"));
    assert_eq!(voucher["isinvoice"], json!(true));
    assert_eq!(voucher["iseligibleforitc"], json!(true));
    assert_eq!(voucher["isvatdutypaid"], json!(true));
    assert_eq!(voucher["issecurityonwhenentered"], json!(true));
    assert_eq!(voucher["isdeleted"], json!(false));
    assert_eq!(
        voucher["oldauditentryids"],
        json!([{ "metadata": true, "type": "Number" }, "-1"])
    );
}

#[test]
fn test_internal_keys_increase_with_row_index() {
    let rows = vec![vec![text("a")], vec![text("b")]];

    let document = seeded_builder().build(&rows, &ColumnMapping::new(), &RunConfig::default());

    let first = &document.tallymessage[0];
    let second = &document.tallymessage[1];
    assert_eq!(first["alterid"], json!("12317"));
    assert_eq!(second["alterid"], json!("12318"));
    assert_eq!(first["masterid"], json!("1740"));
    assert_eq!(second["masterid"], json!("1741"));
    assert_eq!(first["voucherkey"], json!("197469711368200"));
    assert_eq!(second["voucherkey"], json!("197469711368201"));
    assert_eq!(first["voucherretainkey"], json!("6957"));
    assert_eq!(second["voucherretainkey"], json!("6958"));
}

#[test]
fn test_identifier_wiring() {
    let rows = vec![vec![text("a")], vec![text("b")]];

    let document = seeded_builder().build(&rows, &ColumnMapping::new(), &RunConfig::default());

    let first = &document.tallymessage[0];
    let guid = first["guid"].as_str().unwrap();
    assert_eq!(guid.len(), 36);
    assert_eq!(
        first["metadata"]["vchkey"].as_str().unwrap(),
        format!("{guid}:00000008")
    );

    let first_remote = first["metadata"]["remoteid"].as_str().unwrap();
    let second_remote = document.tallymessage[1]["metadata"]["remoteid"].as_str().unwrap();
    assert!(first_remote.ends_with("-00000001"));
    assert!(second_remote.ends_with("-00000002"));
    assert_ne!(first_remote, second_remote);
}

#[test]
fn test_numeric_zero_cells_use_defaults() {
    // Zero counts as "empty" for defaulting, like the original template's
    // truthiness rules: a zero amount falls back to quantity * rate.
    let rows = vec![vec![text("4"), text("25"), Cell::Number(0.0)]];
    let mapping = mapping(&[(FieldKey::Quantity, 0), (FieldKey::Rate, 1), (FieldKey::Amount, 2)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    assert_eq!(document.tallymessage[0]["allinventoryentries"][0]["amount"], json!("100.00"));
}

#[test]
fn test_row_shorter_than_mapping_uses_defaults() {
    let rows = vec![vec![text("Widget")]];
    let mapping = mapping(&[(FieldKey::StockItemName, 0), (FieldKey::PartyName, 5)]);

    let document = seeded_builder().build(&rows, &mapping, &RunConfig::default());

    let voucher = &document.tallymessage[0];
    assert_eq!(voucher["partyname"], json!("Cash"));
    assert_eq!(voucher["allinventoryentries"][0]["stockitemname"], json!("Widget"));
}

#[test]
fn test_empty_input_produces_empty_document() {
    let document = seeded_builder().build(&[], &ColumnMapping::new(), &RunConfig::default());

    assert!(document.tallymessage.is_empty());
}
