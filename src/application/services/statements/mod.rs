//! Annual giving-statement assembly and PDF rendering.
//!
//! Aggregation and rendering share one arithmetic path: fund subtotals and
//! the grand total are computed from the same line items that get printed.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use rust_decimal::Decimal;

use crate::application::ports::giving_repository::StatementLineRow;

const DISCLAIMER: &str =
    "No goods or services were provided in exchange for these contributions.";

#[derive(Debug, Clone)]
pub struct StatementDocument {
    pub church_name: String,
    pub household_name: String,
    pub address_lines: Vec<String>,
    pub year: i32,
    pub lines: Vec<StatementLineRow>,
    pub fund_subtotals: Vec<(String, Decimal)>,
    pub total: Decimal,
}

/// Builds the statement from deductible line items, deriving per-fund
/// subtotals (in first-seen fund order) and the grand total.
pub fn build_document(
    church_name: &str,
    household_name: &str,
    address_lines: Vec<String>,
    year: i32,
    lines: Vec<StatementLineRow>,
) -> StatementDocument {
    let mut fund_subtotals: Vec<(String, Decimal)> = Vec::new();
    for line in &lines {
        match fund_subtotals.iter_mut().find(|(f, _)| *f == line.fund_name) {
            Some((_, sum)) => *sum += line.amount,
            None => fund_subtotals.push((line.fund_name.clone(), line.amount)),
        }
    }
    let total = lines.iter().map(|l| l.amount).sum();
    StatementDocument {
        church_name: church_name.to_string(),
        household_name: household_name.to_string(),
        address_lines,
        year,
        lines,
        fund_subtotals,
        total,
    }
}

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_H: f32 = 6.0;
const LINES_PER_PAGE: usize = 38;

/// Renders the statement to a single-column A4 PDF using builtin Helvetica
/// fonts. Line items paginate; the totals block lands after the last item.
pub fn render_pdf(doc: &StatementDocument) -> anyhow::Result<Vec<u8>> {
    let title = format!("{} Giving Statement {}", doc.church_name, doc.year);
    let (pdf, page1, layer1) = PdfDocument::new(&title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let font = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("pdf font: {e}"))?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("pdf font: {e}"))?;

    let mut layer = pdf.get_page(page1).get_layer(layer1);
    let mut y = PAGE_H - MARGIN;

    let put = |layer: &printpdf::PdfLayerReference,
                   y: f32,
                   size: f32,
                   f: &IndirectFontRef,
                   text: &str| {
        layer.use_text(text, size, Mm(MARGIN), Mm(y), f);
    };

    put(&layer, y, 16.0, &bold, &doc.church_name);
    y -= LINE_H * 1.5;
    put(
        &layer,
        y,
        12.0,
        &bold,
        &format!("{} Annual Giving Statement", doc.year),
    );
    y -= LINE_H * 2.0;
    put(&layer, y, 11.0, &font, &doc.household_name);
    y -= LINE_H;
    for addr in &doc.address_lines {
        put(&layer, y, 10.0, &font, addr);
        y -= LINE_H;
    }
    y -= LINE_H;

    put(&layer, y, 10.0, &bold, "Date        Fund                      Given by                  Amount");
    y -= LINE_H;

    let mut lines_on_page = 0usize;
    for line in &doc.lines {
        if lines_on_page >= LINES_PER_PAGE {
            let (page, l) = pdf.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            layer = pdf.get_page(page).get_layer(l);
            y = PAGE_H - MARGIN;
            lines_on_page = 0;
        }
        let text = format!(
            "{}  {:<24}  {:<24}  {:>10.2}",
            line.received_on.format("%Y-%m-%d"),
            truncate(&line.fund_name, 24),
            truncate(&line.member_name, 24),
            line.amount
        );
        put(&layer, y, 9.0, &font, &text);
        y -= LINE_H;
        lines_on_page += 1;
    }

    y -= LINE_H;
    for (fund, subtotal) in &doc.fund_subtotals {
        if lines_on_page >= LINES_PER_PAGE {
            let (page, l) = pdf.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            layer = pdf.get_page(page).get_layer(l);
            y = PAGE_H - MARGIN;
            lines_on_page = 0;
        }
        put(
            &layer,
            y,
            10.0,
            &font,
            &format!("{:<24} subtotal  {:>10.2}", truncate(fund, 24), subtotal),
        );
        y -= LINE_H;
        lines_on_page += 1;
    }
    put(
        &layer,
        y,
        12.0,
        &bold,
        &format!("Total deductible giving: {:.2}", doc.total),
    );
    y -= LINE_H * 2.0;
    put(&layer, y, 9.0, &font, DISCLAIMER);

    let bytes = pdf
        .save_to_bytes()
        .map_err(|e| anyhow::anyhow!("pdf save: {e}"))?;
    Ok(bytes)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn line(date: &str, fund: &str, amount: Decimal) -> StatementLineRow {
        StatementLineRow {
            received_on: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            fund_name: fund.to_string(),
            member_name: "Ann Smith".to_string(),
            amount,
        }
    }

    #[test]
    fn subtotals_preserve_fund_order_and_sum_to_total() {
        let doc = build_document(
            "Grace Chapel",
            "Smith Family",
            vec![],
            2024,
            vec![
                line("2024-01-07", "General Fund", dec!(100.00)),
                line("2024-02-04", "Missions", dec!(25.50)),
                line("2024-03-03", "General Fund", dec!(74.50)),
            ],
        );
        assert_eq!(doc.fund_subtotals.len(), 2);
        assert_eq!(doc.fund_subtotals[0], ("General Fund".to_string(), dec!(174.50)));
        assert_eq!(doc.fund_subtotals[1], ("Missions".to_string(), dec!(25.50)));
        assert_eq!(doc.total, dec!(200.00));
        let subtotal_sum: Decimal = doc.fund_subtotals.iter().map(|(_, s)| *s).sum();
        assert_eq!(subtotal_sum, doc.total);
    }

    #[test]
    fn empty_statement_totals_zero() {
        let doc = build_document("Grace Chapel", "Smith Family", vec![], 2024, vec![]);
        assert_eq!(doc.total, Decimal::ZERO);
        assert!(doc.fund_subtotals.is_empty());
    }

    #[test]
    fn renders_a_pdf_with_many_lines() {
        let lines: Vec<StatementLineRow> = (0..100)
            .map(|i| {
                line(
                    "2024-06-02",
                    if i % 2 == 0 { "General Fund" } else { "Missions" },
                    dec!(10.00),
                )
            })
            .collect();
        let doc = build_document(
            "Grace Chapel",
            "Smith Family",
            vec!["12 Main St".to_string()],
            2024,
            lines,
        );
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
