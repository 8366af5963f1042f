use anyhow::Result;
use log::warn;
use std::env;

use tallybridge::data;
use tallybridge::vouchers::builder::VoucherBuilder;
use tallybridge::vouchers::mapping;
use tallybridge::vouchers::{RunConfig, VoucherType};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 5 {
        eprintln!("Usage: cargo run -- <input_file> [voucher_type] [default_godown] [sales_ledger]");
        std::process::exit(1);
    }

    let voucher_type = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => VoucherType::Sales,
    };
    let default_godown = args.get(3).cloned().unwrap_or_else(|| "Main Location".to_string());
    let sales_ledger = args.get(4).cloned().unwrap_or_else(|| "Sales".to_string());
    let config = RunConfig::new(voucher_type, default_godown, sales_ledger);

    let sheet = data::read_sheet(&args[1])?;
    let column_mapping = mapping::map_columns(&sheet.headers);
    for field in mapping::unmapped_required(&column_mapping) {
        warn!("no column matched required field '{}', defaults will be used", field.label());
    }

    let mut builder = VoucherBuilder::new();
    let document = builder.build(&sheet.rows, &column_mapping, &config);
    if document.tallymessage.is_empty() {
        warn!("conversion produced zero records");
    }

    data::export_json(std::io::stdout().lock(), &document)?;

    Ok(())
}
