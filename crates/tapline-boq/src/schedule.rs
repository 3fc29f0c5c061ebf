//! Static BOQ master schedule
//!
//! Reference data defining the universe of billable items and their unit
//! rates. Immutable at runtime: quantities recorded against a connection
//! always resolve their rates here, never from the record itself.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The four sections of the framework schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Public,
    Private,
    Reinstatement,
    Dayworks,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Public,
        Section::Private,
        Section::Reinstatement,
        Section::Dayworks,
    ];

    pub fn code(&self) -> char {
        match self {
            Section::Public => 'A',
            Section::Private => 'B',
            Section::Reinstatement => 'C',
            Section::Dayworks => 'D',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Public => "A: Public",
            Section::Private => "B: Private",
            Section::Reinstatement => "C: Reinstatement",
            Section::Dayworks => "D: Dayworks",
        }
    }
}

/// How a schedule row participates in the bill.
///
/// Only `Item` rows carry a rate and contribute to totals; the others are
/// grouping and labeling for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Section,
    Group,
    Subsection,
    Item,
    Note,
}

/// One row of the master schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct BoqMasterItem {
    pub section: Section,
    pub bill: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub rate: Option<f64>,
    pub kind: RowKind,
}

impl BoqMasterItem {
    /// Whether quantities against this row are billable.
    pub fn is_billable(&self) -> bool {
        self.kind == RowKind::Item && self.rate.is_some()
    }

    /// Display text for the rate column, `-` for unrated rows.
    pub fn rate_label(&self) -> String {
        match self.rate {
            Some(rate) => tapline_domain::format_amount(rate),
            None => "-".to_string(),
        }
    }
}

const fn row(
    section: Section,
    bill: &'static str,
    description: &'static str,
    unit: &'static str,
    rate: Option<f64>,
    kind: RowKind,
) -> BoqMasterItem {
    BoqMasterItem {
        section,
        bill,
        description,
        unit,
        rate,
        kind,
    }
}

const fn item(
    section: Section,
    bill: &'static str,
    description: &'static str,
    unit: &'static str,
    rate: f64,
) -> BoqMasterItem {
    row(section, bill, description, unit, Some(rate), RowKind::Item)
}

const fn heading(
    section: Section,
    bill: &'static str,
    description: &'static str,
    kind: RowKind,
) -> BoqMasterItem {
    row(section, bill, description, "Nil", None, kind)
}

/// The full master schedule, in presentation order.
pub fn master_schedule() -> &'static [BoqMasterItem] {
    static SCHEDULE: OnceLock<Vec<BoqMasterItem>> = OnceLock::new();
    SCHEDULE.get_or_init(build_schedule)
}

/// Look up a schedule row by bill code.
pub fn find_item(bill: &str) -> Option<&'static BoqMasterItem> {
    master_schedule().iter().find(|m| m.bill == bill)
}

/// Rows of one section whose bill code or description contains the search
/// term, case-insensitively. An empty term matches everything.
pub fn filter_schedule(section: Section, search: &str) -> Vec<&'static BoqMasterItem> {
    let needle = search.to_lowercase();
    master_schedule()
        .iter()
        .filter(|m| {
            m.section == section
                && (needle.is_empty()
                    || m.description.to_lowercase().contains(&needle)
                    || m.bill.to_lowercase().contains(&needle))
        })
        .collect()
}

fn build_schedule() -> Vec<BoqMasterItem> {
    use RowKind::{Group, Note, Subsection};
    use Section::{Dayworks, Private, Public, Reinstatement};

    vec![
        // Section A: works on the public road up to the property boundary
        heading(Public, "A", "HOUSE CONNECTION WORKS - PUBLIC ROAD", RowKind::Section),
        heading(Public, "A1", "Excavation and earthworks", Group),
        item(Public, "A1.1", "Excavate trench in unpaved ground, depth not exceeding 1.5m, and backfill", "m", 385.0),
        item(Public, "A1.2", "Excavate trench in paved carriageway including saw cutting, depth not exceeding 1.5m, and backfill", "m", 720.0),
        item(Public, "A1.3", "Extra over trench excavation for rock encountered", "m3", 1650.0),
        item(Public, "A1.4", "Hand excavation adjacent to existing services", "m3", 925.0),
        heading(Public, "A1.N1", "Note: trench depths measured from finished road level", Note),
        heading(Public, "A2", "Pipework and fittings", Group),
        heading(Public, "A2.1", "Polyethylene service pipe, PN16", Subsection),
        item(Public, "A2.1.1", "Supply and lay 20mm HDPE service pipe including marker tape", "m", 145.0),
        item(Public, "A2.1.2", "Supply and lay 25mm HDPE service pipe including marker tape", "m", 175.0),
        item(Public, "A2.1.3", "Supply and lay 32mm HDPE service pipe including marker tape", "m", 230.0),
        heading(Public, "A2.2", "Connections to main", Subsection),
        item(Public, "A2.2.1", "Tapping saddle on existing main up to DN160 including ferrule", "nr", 1850.0),
        item(Public, "A2.2.2", "Under-pressure tapping on existing main above DN160", "nr", 3200.0),
        item(Public, "A2.2.3", "Ductile iron sleeve crossing under carriageway", "m", 890.0),
        heading(Public, "A3", "Chambers and boundary fittings", Group),
        item(Public, "A3.1", "Precast concrete meter chamber 450x450mm with lockable cover", "nr", 2750.0),
        item(Public, "A3.2", "Stop tap and meter manifold assembly in chamber", "nr", 1430.0),
        item(Public, "A3.3", "Relocate existing meter chamber to boundary", "nr", 1980.0),

        // Section B: works inside the customer's premises
        heading(Private, "B", "HOUSE CONNECTION WORKS - PRIVATE PREMISES", RowKind::Section),
        heading(Private, "B1", "Excavation within premises", Group),
        item(Private, "B1.1", "Excavate trench in garden ground and backfill", "m", 310.0),
        item(Private, "B1.2", "Excavate trench through concrete yard including reinstatement", "m", 685.0),
        heading(Private, "B2", "Internal pipework", Group),
        item(Private, "B2.1", "Supply and lay 20mm HDPE pipe from boundary to dwelling", "m", 135.0),
        item(Private, "B2.2", "Rising pipework fixed to wall including clips", "m", 160.0),
        item(Private, "B2.3", "First tap point including stop valve", "nr", 640.0),
        heading(Private, "B2.N1", "Note: internal plumbing beyond the first tap point is excluded", Note),

        // Section C: surface reinstatement
        heading(Reinstatement, "C", "REINSTATEMENT OF SURFACES", RowKind::Section),
        item(Reinstatement, "C1", "Reinstate asphaltic concrete carriageway 50mm on 150mm crusher run", "m2", 1240.0),
        item(Reinstatement, "C2", "Reinstate concrete footpath 100mm thick", "m2", 860.0),
        item(Reinstatement, "C3", "Reinstate interlocking paving blocks on sand bed", "m2", 540.0),
        item(Reinstatement, "C4", "Reinstate grass verge including topsoil", "m2", 180.0),
        heading(Reinstatement, "C.N1", "Note: reinstatement measured over trench width plus 150mm each side", Note),

        // Section D: dayworks for items not covered by measured rates
        heading(Dayworks, "D", "DAYWORKS", RowKind::Section),
        heading(Dayworks, "D1", "Labour", Group),
        item(Dayworks, "D1.1", "Skilled pipe layer", "hr", 210.0),
        item(Dayworks, "D1.2", "Unskilled labourer", "hr", 125.0),
        heading(Dayworks, "D2", "Plant", Group),
        item(Dayworks, "D2.1", "Mini excavator including operator", "hr", 980.0),
        item(Dayworks, "D2.2", "Road saw including operator", "hr", 450.0),
        item(Dayworks, "D2.3", "Dewatering pump", "hr", 260.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_covers_all_sections() {
        for section in Section::ALL {
            assert!(
                master_schedule().iter().any(|m| m.section == section),
                "no rows in section {:?}",
                section
            );
        }
    }

    #[test]
    fn bill_codes_are_unique() {
        let schedule = master_schedule();
        for (i, a) in schedule.iter().enumerate() {
            for b in &schedule[i + 1..] {
                assert_ne!(a.bill, b.bill, "duplicate bill code {}", a.bill);
            }
        }
    }

    #[test]
    fn only_item_rows_are_billable() {
        for row in master_schedule() {
            match row.kind {
                RowKind::Item => {
                    assert!(row.rate.is_some(), "item {} has no rate", row.bill)
                }
                _ => assert!(!row.is_billable()),
            }
        }
    }

    #[test]
    fn find_item_by_bill_code() {
        let saddle = find_item("A2.2.1").unwrap();
        assert_eq!(saddle.unit, "nr");
        assert_eq!(saddle.rate, Some(1850.0));
        assert!(find_item("Z9").is_none());
    }

    #[test]
    fn filter_matches_bill_and_description() {
        let hits = filter_schedule(Section::Public, "saddle");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].bill, "A2.2.1");

        let by_code = filter_schedule(Section::Dayworks, "d2.1");
        assert_eq!(by_code.len(), 1);

        let all_public = filter_schedule(Section::Public, "");
        assert!(all_public.len() > 10);
        assert!(all_public.iter().all(|m| m.section == Section::Public));
    }

    #[test]
    fn rate_label_formats() {
        assert_eq!(find_item("A1.1").unwrap().rate_label(), "385.00");
        let section_row = master_schedule()
            .iter()
            .find(|m| m.kind == RowKind::Section)
            .unwrap();
        assert_eq!(section_row.rate_label(), "-");
    }
}
