//! SpreadsheetML workbook export
//!
//! Emits the Excel 2003 XML workbook format: a plain-text format Excel
//! and LibreOffice both open natively, with no binary container. The
//! workbook carries a register overview sheet plus one detail sheet per
//! exported record showing its full BOQ schedule.

use std::collections::HashSet;

use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tapline_boq::{item_amount, master_schedule, RowKind};
use tapline_domain::{BoqItemValues, ConnectionRecord, Totals, TrackedColumn};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Workbook is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Nothing to export: no records selected")]
    NoRecords,
}

const SS_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";

/// Sheet names may not contain `: \ / ? * [ ]` and are limited to 31
/// characters; offending characters become underscores.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '_',
            other => other,
        })
        .collect();
    let cleaned = if cleaned.is_empty() {
        "Record".to_string()
    } else {
        cleaned
    };
    cleaned.chars().take(31).collect()
}

/// Build the workbook for the given records and return it as XML text.
///
/// The first sheet is the register overview; each record then gets a
/// detail sheet named after its reference code. Duplicate or colliding
/// sheet names get a numeric suffix.
pub fn export_workbook(records: &[&ConnectionRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::PI(BytesPI::new(
        "mso-application progid=\"Excel.Sheet\"",
    )))?;

    let mut workbook = BytesStart::new("Workbook");
    workbook.push_attribute(("xmlns", SS_NS));
    workbook.push_attribute(("xmlns:ss", SS_NS));
    workbook.push_attribute(("xmlns:o", "urn:schemas-microsoft-com:office:office"));
    workbook.push_attribute(("xmlns:x", "urn:schemas-microsoft-com:office:excel"));
    writer.write_event(Event::Start(workbook))?;

    write_styles(&mut writer)?;
    write_register_sheet(&mut writer, records)?;

    let mut used_names = HashSet::new();
    used_names.insert("Master Register".to_string());
    for record in records {
        let name = unique_sheet_name(&record.reference, &mut used_names);
        write_record_sheet(&mut writer, record, &name)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Workbook")))?;

    info!(sheets = records.len() + 1, "built export workbook");
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Default filename for a workbook exported now.
pub fn workbook_file_name() -> String {
    format!(
        "tapline_register_{}.xml",
        chrono::Utc::now().format("%Y-%m-%d")
    )
}

fn unique_sheet_name(reference: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(reference);
    let mut candidate = base.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        let suffix = format!(" ({n})");
        let keep = 31usize.saturating_sub(suffix.chars().count());
        candidate = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    candidate
}

fn write_styles(writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("Styles")))?;

    // hdr: bold on grey, for column header rows
    style(writer, "hdr", |w| {
        let mut font = BytesStart::new("Font");
        font.push_attribute(("ss:Bold", "1"));
        w.write_event(Event::Empty(font))?;
        let mut interior = BytesStart::new("Interior");
        interior.push_attribute(("ss:Color", "#D9D9D9"));
        interior.push_attribute(("ss:Pattern", "Solid"));
        w.write_event(Event::Empty(interior))
    })?;

    // sec: bold, for schedule section and group rows
    style(writer, "sec", |w| {
        let mut font = BytesStart::new("Font");
        font.push_attribute(("ss:Bold", "1"));
        w.write_event(Event::Empty(font))?;
        let mut interior = BytesStart::new("Interior");
        interior.push_attribute(("ss:Color", "#F2F2F2"));
        interior.push_attribute(("ss:Pattern", "Solid"));
        w.write_event(Event::Empty(interior))
    })?;

    // num: thousands-grouped currency cells
    style(writer, "num", |w| {
        let mut fmt = BytesStart::new("NumberFormat");
        fmt.push_attribute(("ss:Format", "#,##0.00"));
        w.write_event(Event::Empty(fmt))
    })?;

    // tot: bold currency, for totals rows
    style(writer, "tot", |w| {
        let mut font = BytesStart::new("Font");
        font.push_attribute(("ss:Bold", "1"));
        w.write_event(Event::Empty(font))?;
        let mut fmt = BytesStart::new("NumberFormat");
        fmt.push_attribute(("ss:Format", "#,##0.00"));
        w.write_event(Event::Empty(fmt))
    })?;

    writer.write_event(Event::End(BytesEnd::new("Styles")))
}

fn style(
    writer: &mut Writer<Vec<u8>>,
    id: &str,
    body: impl FnOnce(&mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error>,
) -> Result<(), quick_xml::Error> {
    let mut el = BytesStart::new("Style");
    el.push_attribute(("ss:ID", id));
    writer.write_event(Event::Start(el))?;
    body(writer)?;
    writer.write_event(Event::End(BytesEnd::new("Style")))
}

fn open_sheet(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), quick_xml::Error> {
    let mut sheet = BytesStart::new("Worksheet");
    sheet.push_attribute(("ss:Name", name));
    writer.write_event(Event::Start(sheet))?;
    writer.write_event(Event::Start(BytesStart::new("Table")))
}

fn close_sheet(writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::End(BytesEnd::new("Table")))?;
    writer.write_event(Event::End(BytesEnd::new("Worksheet")))
}

fn open_row(writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("Row")))
}

fn close_row(writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::End(BytesEnd::new("Row")))
}

fn text_cell(
    writer: &mut Writer<Vec<u8>>,
    style_id: Option<&str>,
    text: &str,
) -> Result<(), quick_xml::Error> {
    cell(writer, style_id, "String", text)
}

fn number_cell(
    writer: &mut Writer<Vec<u8>>,
    style_id: Option<&str>,
    value: f64,
) -> Result<(), quick_xml::Error> {
    cell(writer, style_id, "Number", &format!("{value}"))
}

fn cell(
    writer: &mut Writer<Vec<u8>>,
    style_id: Option<&str>,
    data_type: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    let mut cell = BytesStart::new("Cell");
    if let Some(id) = style_id {
        cell.push_attribute(("ss:StyleID", id));
    }
    writer.write_event(Event::Start(cell))?;
    let mut data = BytesStart::new("Data");
    data.push_attribute(("ss:Type", data_type));
    writer.write_event(Event::Start(data))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("Data")))?;
    writer.write_event(Event::End(BytesEnd::new("Cell")))
}

const REGISTER_HEADERS: [&str; 14] = [
    "List",
    "Reference",
    "Stakeholder",
    "Phone",
    "Address",
    "Location",
    "Survey Date",
    "Feasibility",
    "Works Status",
    "Overbudget Status",
    "Estimate (Rs)",
    "Over Budget (Rs)",
    "Claimed (Rs)",
    "Certified (Rs)",
];

fn write_register_sheet(
    writer: &mut Writer<Vec<u8>>,
    records: &[&ConnectionRecord],
) -> Result<(), quick_xml::Error> {
    open_sheet(writer, "Master Register")?;

    open_row(writer)?;
    for header in REGISTER_HEADERS {
        text_cell(writer, Some("hdr"), header)?;
    }
    close_row(writer)?;

    let mut portfolio = Totals::default();
    for record in records {
        portfolio.accumulate(&record.totals);
        open_row(writer)?;
        text_cell(writer, None, &record.list_no)?;
        text_cell(writer, None, &record.reference)?;
        text_cell(writer, None, &record.stakeholder())?;
        text_cell(writer, None, &record.phone1)?;
        text_cell(writer, None, &record.address)?;
        text_cell(writer, None, &record.location)?;
        text_cell(writer, None, &record.survey_date)?;
        text_cell(writer, None, record.feasible.label())?;
        text_cell(writer, None, record.works_status.label())?;
        text_cell(writer, None, record.overbudget_status.label())?;
        for column in TrackedColumn::ALL {
            number_cell(writer, Some("num"), record.totals.get(column))?;
        }
        close_row(writer)?;
    }

    // Portfolio totals under the register
    open_row(writer)?;
    text_cell(writer, Some("tot"), "TOTAL")?;
    for _ in 0..9 {
        text_cell(writer, None, "")?;
    }
    for column in TrackedColumn::ALL {
        number_cell(writer, Some("tot"), portfolio.get(column))?;
    }
    close_row(writer)?;

    close_sheet(writer)
}

const SCHEDULE_HEADERS: [&str; 12] = [
    "Bill",
    "Description",
    "Unit",
    "Rate (Rs)",
    "Est Qty",
    "Est Amt",
    "Over Qty",
    "Over Amt",
    "Claim Qty",
    "Claim Amt",
    "Cert Qty",
    "Cert Amt",
];

fn write_record_sheet(
    writer: &mut Writer<Vec<u8>>,
    record: &ConnectionRecord,
    sheet_name: &str,
) -> Result<(), quick_xml::Error> {
    open_sheet(writer, sheet_name)?;

    open_row(writer)?;
    text_cell(writer, Some("sec"), &record.reference)?;
    text_cell(writer, None, &record.stakeholder())?;
    text_cell(writer, None, &record.address)?;
    close_row(writer)?;

    open_row(writer)?;
    for header in SCHEDULE_HEADERS {
        text_cell(writer, Some("hdr"), header)?;
    }
    close_row(writer)?;

    let empty = BoqItemValues::default();
    for master in master_schedule() {
        open_row(writer)?;
        match master.kind {
            RowKind::Item => {
                let values = record.boq.get(master.bill).unwrap_or(&empty);
                text_cell(writer, None, master.bill)?;
                text_cell(writer, None, master.description)?;
                text_cell(writer, None, master.unit)?;
                number_cell(writer, Some("num"), master.rate.unwrap_or(0.0))?;
                for column in TrackedColumn::ALL {
                    number_cell(writer, None, values.value(column))?;
                    number_cell(
                        writer,
                        Some("num"),
                        item_amount(master.bill, values, column),
                    )?;
                }
            }
            _ => {
                text_cell(writer, Some("sec"), master.bill)?;
                text_cell(writer, Some("sec"), master.description)?;
            }
        }
        close_row(writer)?;
    }

    open_row(writer)?;
    text_cell(writer, Some("tot"), "TOTAL")?;
    for _ in 0..3 {
        text_cell(writer, None, "")?;
    }
    for column in TrackedColumn::ALL {
        text_cell(writer, None, "")?;
        number_cell(writer, Some("tot"), record.totals.get(column))?;
    }
    close_row(writer)?;

    close_sheet(writer)
}
