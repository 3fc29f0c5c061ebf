//! End-to-end register workflow tests
//!
//! Exercise the paths a field office actually runs: bulk CSV intake,
//! quantity entry, multi-view sync, backup exchange between offices, and
//! the final workbook export.

use std::sync::Arc;

use tapline_collab::LocalBus;
use tapline_domain::{Role, TrackedColumn, User};
use tapline_store::{
    backup_to_json, export_backup, export_workbook, import_backup, import_csv, JsonFileCache,
    RecordFilter, RecordStore, Synchronizer,
};

fn engineer() -> User {
    User::new("alice", Role::Engineer)
}

fn surveyor() -> User {
    User::new("bob", Role::Surveyor)
}

// === Intake to export ===

#[test]
fn csv_intake_quantities_and_export() {
    let csv = "Reference,Surname,Name,Phone,Address,Location\n\
               HC/101,Ramsamy,Devi,5712 3456,12 Royal Rd,Curepipe\n\
               HC/102,Beeharry,Anil,5798 0001,4 Lake Ln,Vacoas\n";
    let import = import_csv(csv, "List 7").unwrap();
    assert_eq!(import.records.len(), 2);

    let mut store = RecordStore::new();
    store.insert_batch(import.records);

    // Trench plus tapping saddle for the first connection.
    let eval = store
        .record_quantity("HC/101", "A1.1", TrackedColumn::Estimate, "8+4", &engineer())
        .unwrap();
    assert_eq!(eval.value, 12.0);
    store
        .record_quantity("HC/101", "A2.2.1", TrackedColumn::Estimate, "1", &engineer())
        .unwrap();

    let rec = store.by_reference("HC/101").unwrap();
    assert_eq!(rec.totals.est, 12.0 * 385.0 + 1850.0);

    let xml = export_workbook(&store.referenced_records()).unwrap();
    assert!(xml.contains("ss:Name=\"Master Register\""));
    assert!(xml.contains("ss:Name=\"HC_101\""));
    assert!(xml.contains("ss:Name=\"HC_102\""));
}

#[test]
fn register_filtering_after_intake() {
    let csv = "Reference,Surname,Address\n\
               HC/1,Ramsamy,12 Royal Rd\n\
               HC/2,Beeharry,4 Lake Ln\n";
    let mut store = RecordStore::new();
    store.insert_batch(import_csv(csv, "List 1").unwrap().records);
    store.insert_batch(import_csv("Reference,Surname\nHC/3,Ramdin\n", "List 2").unwrap().records);

    let hits = store.filter(&RecordFilter {
        search: "ram".into(),
        ..RecordFilter::default()
    });
    assert_eq!(hits.len(), 2);
    assert_eq!(store.batch_lists(), ["List 1", "List 2"]);
}

// === Two views over one bus ===

#[test]
fn two_views_converge_through_broadcast() {
    let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let mut office = Synchronizer::new(JsonFileCache::new(dir_a.path()), bus.clone());
    let mut site = Synchronizer::new(JsonFileCache::new(dir_b.path()), bus.clone());
    office.login(engineer()).unwrap();
    office.finish_login_sync(None).unwrap();
    site.login(surveyor()).unwrap();
    site.finish_login_sync(None).unwrap();

    // The office creates a record; the site view picks it up and adds a
    // measured quantity; the office sees the quantity come back.
    let user = engineer();
    let id = office.store_mut().create("List 3", &user);
    office
        .store_mut()
        .update_with(&id, &user, "modified reference of", |r| {
            r.reference = "HC/55".into();
        })
        .unwrap();
    office.broadcast_update().unwrap();

    assert!(site.poll() >= 1);
    let measured = surveyor();
    site.store_mut()
        .record_quantity("HC/55", "C1", TrackedColumn::Claim, "2.5x4", &measured)
        .unwrap();
    site.broadcast_update().unwrap();

    assert!(office.poll() >= 1);
    let rec = office.store().by_reference("HC/55").unwrap();
    assert_eq!(rec.totals.claim, 10.0 * 1240.0);
    assert_eq!(rec.last_modified_by.as_deref(), Some("bob"));

    // Presence: the site's ping shows up in the office roster.
    site.ping().unwrap();
    office.poll();
    let online = office.session().roster().online_users();
    assert!(online.iter().any(|u| u.username == "bob"));
}

// === Backup exchange between offices ===

#[test]
fn backup_round_trip_between_workspaces() {
    let mut head_office = RecordStore::new();
    let user = engineer();
    let id = head_office.create("List 1", &user);
    head_office
        .update_with(&id, &user, "modified reference of", |r| {
            r.reference = "HC/1".into();
        })
        .unwrap();
    head_office
        .record_quantity("HC/1", "B2.3", TrackedColumn::Estimate, "2", &user)
        .unwrap();

    let backup = export_backup(&head_office.to_state(), &user.username);
    let json = backup_to_json(&backup).unwrap();

    // The regional office has its own record plus a stale copy of HC/1.
    let mut regional = RecordStore::new();
    let local_id = regional.create("List 2", &engineer());
    let mut state = regional.to_state();
    state.records.push(head_office.to_state().records[0].clone());
    state.records[1].totals = Default::default();

    import_backup(&mut state, &json).unwrap();
    assert_eq!(state.records.len(), 2);
    // The backup revision of HC/1 wins the merge.
    let merged = state.records.iter().find(|r| r.reference == "HC/1").unwrap();
    assert_eq!(merged.totals.est, 2.0 * 640.0);
    assert!(state.records.iter().any(|r| r.id == local_id));
}
