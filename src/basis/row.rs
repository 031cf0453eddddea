use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;
use wheelbasis_derive::CsvSchema;

/// Column metadata generated by `#[derive(CsvSchema)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One line of a brokerage activity export.
///
/// Every column is looked up by header name. A column missing from the
/// export, or a short line, reads as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, CsvSchema)]
pub struct TransactionRow {
    /// Ticker symbol (e.g. IBIT, MARA, SOFI)
    #[serde(rename = "Symbol", default)]
    pub symbol: String,
    /// Execution state, only "Filled" rows count
    #[serde(rename = "Status", default)]
    pub status: String,
    /// Trade description, matched against "call" and "put"
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Signed share or contract count, negative for sells
    #[serde(rename = "Quantity", default)]
    pub quantity: String,
    /// Fill price, annotated "cr" for credits and "db" for debits
    #[serde(rename = "Price", default)]
    pub price: String,
    /// Order time, displayed only
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    /// Broker order number, displayed only
    #[serde(rename = "Order #", default)]
    pub order_number: Option<String>,
}

impl TransactionRow {
    pub fn symbol(&self) -> &str {
        self.symbol.trim()
    }

    pub fn is_filled(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("filled")
    }

    /// Price magnitude with currency symbols, separators and annotations
    /// stripped. `None` unless the remainder is a positive decimal.
    pub fn price_magnitude(&self) -> Option<Decimal> {
        let digits: String = self
            .price
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        Decimal::from_str(&digits)
            .ok()
            .filter(|value| *value > Decimal::ZERO)
    }

    /// Signed quantity, `None` when the field holds no parseable number.
    pub fn signed_quantity(&self) -> Option<Decimal> {
        let digits: String = self
            .quantity
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
            .collect();
        Decimal::from_str(&digits).ok()
    }
}

/// Read activity rows from CSV with a header line.
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<TransactionRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let mut record = record?;
        // short lines pad out to the header width so absent trailing
        // fields deserialize as empty strings
        record.truncate(headers.len());
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record.deserialize::<TransactionRow>(Some(&headers))?);
    }
    log::info!("Read {} csv records", rows.len());
    Ok(rows)
}

/// Distinct non-empty symbols in first-seen order.
pub fn tickers(rows: &[TransactionRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(TransactionRow::symbol)
        .filter(|symbol| !symbol.is_empty())
        .filter(|symbol| seen.insert(*symbol))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn priced(price: &str) -> TransactionRow {
        TransactionRow {
            price: price.to_string(),
            ..Default::default()
        }
    }

    fn quantity(quantity: &str) -> TransactionRow {
        TransactionRow {
            quantity: quantity.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_csv_by_header_name() {
        let csv_data = "\
Symbol,Status,MarketOrFill,Price,TIF,Time,Description,Quantity,Order #
IBIT,Filled,Market,$50.00,Day,1/2/25,Bought 100 BTO,100,1001
IBIT,Cancelled,Limit,1.50 cr,GTC,1/3/25,Sold 1 Call,-1,1002";

        let rows = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "IBIT");
        assert_eq!(rows[0].price, "$50.00");
        assert_eq!(rows[0].quantity, "100");
        assert_eq!(rows[0].order_number.as_deref(), Some("1001"));
        assert_eq!(rows[1].status, "Cancelled");
        assert_eq!(rows[1].description, "Sold 1 Call");
    }

    #[test]
    fn missing_columns_and_short_lines_read_as_empty() {
        let csv_data = "\
Symbol,Status,Description
IBIT,Filled
MARA,Filled,Bought 100 BTO,extra";

        let rows = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "");
        assert_eq!(rows[0].price, "");
        assert_eq!(rows[0].quantity, "");
        assert_eq!(rows[0].time, None);
        assert_eq!(rows[1].description, "Bought 100 BTO");
    }

    #[test]
    fn header_whitespace_is_ignored() {
        let csv_data = " Symbol , Status ,Price\nSOFI,Filled,$9.10";
        let rows = read_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(rows[0].symbol, "SOFI");
        assert!(rows[0].is_filled());
    }

    #[test]
    fn tickers_are_distinct_in_first_seen_order() {
        let rows: Vec<_> = ["MARA", "IBIT", "", "MARA", " SOFI ", "IBIT"]
            .iter()
            .map(|s| TransactionRow {
                symbol: s.to_string(),
                ..Default::default()
            })
            .collect();
        assert_eq!(tickers(&rows), vec!["MARA", "IBIT", "SOFI"]);
    }

    #[test]
    fn filled_status_is_normalized() {
        for status in ["Filled", "FILLED", "  filled "] {
            let row = TransactionRow {
                status: status.to_string(),
                ..Default::default()
            };
            assert!(row.is_filled(), "{status:?}");
        }
        for status in ["Cancelled", "Working", "Partially Filled", ""] {
            let row = TransactionRow {
                status: status.to_string(),
                ..Default::default()
            };
            assert!(!row.is_filled(), "{status:?}");
        }
    }

    #[test]
    fn price_magnitude_strips_symbols_and_markers() {
        assert_eq!(priced("$50.00").price_magnitude(), Some(dec!(50.00)));
        assert_eq!(priced("1.50 cr").price_magnitude(), Some(dec!(1.50)));
        assert_eq!(priced(" $1,234.5 db ").price_magnitude(), Some(dec!(1234.5)));
    }

    #[test]
    fn price_magnitude_rejects_malformed_and_zero() {
        assert_eq!(priced("").price_magnitude(), None);
        assert_eq!(priced("n/a").price_magnitude(), None);
        assert_eq!(priced("1.2.3").price_magnitude(), None);
        assert_eq!(priced("$0.00").price_magnitude(), None);
    }

    #[test]
    fn signed_quantity_keeps_sign() {
        assert_eq!(quantity("100").signed_quantity(), Some(dec!(100)));
        assert_eq!(quantity("-100").signed_quantity(), Some(dec!(-100)));
        assert_eq!(quantity("1,000").signed_quantity(), Some(dec!(1000)));
        assert_eq!(quantity("100.0").signed_quantity(), Some(dec!(100)));
        assert_eq!(quantity("").signed_quantity(), None);
    }

    #[test]
    fn csv_fields_follow_serde_names() {
        let names: Vec<_> = TransactionRow::csv_fields().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["Symbol", "Status", "Description", "Quantity", "Price", "Time", "Order #"]
        );
        assert!(TransactionRow::csv_fields()[0].required);
        assert!(!TransactionRow::csv_fields()[5].required);
        assert_eq!(
            TransactionRow::csv_header(),
            "Symbol,Status,Description,Quantity,Price,Time,Order #"
        );
    }
}
