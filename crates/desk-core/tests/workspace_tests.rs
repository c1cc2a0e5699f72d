use desk_core::{DeskConfig, DeskError, Role, Workspace};
use desk_filter::FilterCriteria;
use desk_model::{ArticleId, ArticleStatus, CompanyId, TagId};
use desk_reconcile::ReconcileState;
use desk_store::TagAction;
use desk_test_utils::{ACME, DATASET_JSON};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::Duration;

fn dataset_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DATASET_JSON.as_bytes()).unwrap();
    file
}

fn config_file(dataset: &std::path::Path, role: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "dataset_path = {:?}\ndefault_company = \"acme\"\nrole = \"{role}\"\nsearch_debounce_ms = 150",
        dataset.display().to_string()
    )
    .unwrap();
    file
}

#[tokio::test]
async fn config_to_bulk_apply_end_to_end() {
    let dataset = dataset_file();
    let config = DeskConfig::load(config_file(dataset.path(), "editor").path()).unwrap();
    let workspace = Workspace::from_config(&config).unwrap();
    assert_eq!(workspace.search_debouncer().delay(), Duration::from_millis(150));

    let desk = workspace.company(config.default_company.as_ref().unwrap()).unwrap();
    let login = desk.filter(&FilterCriteria::new().with_search("login")).unwrap();
    let ids: Vec<ArticleId> = login.iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![ArticleId::from("a1"), ArticleId::from("a2")]);

    let mut session = desk.open_reconcile(&ids).unwrap();
    let pending = session.select(&TagId::from("t1")).unwrap().unwrap();
    assert_eq!(pending.action, TagAction::Add);

    let outcome = session.confirm().await.unwrap();
    assert_eq!(outcome.updated_ids, vec![ArticleId::from("a2")]);
    assert_eq!(session.state(), ReconcileState::PresenceComputed);

    // the store is shared, so a fresh filter sees the new tag
    let tagged = desk.filter(&FilterCriteria::new().with_tag("t1")).unwrap();
    assert_eq!(tagged.len(), 2);
}

#[test]
fn viewer_config_is_read_only() {
    let dataset = dataset_file();
    let config = DeskConfig::load(config_file(dataset.path(), "viewer").path()).unwrap();
    assert_eq!(config.role, Role::Viewer);

    let workspace = Workspace::from_config(&config).unwrap();
    let desk = workspace.company(&CompanyId::from(ACME)).unwrap();

    let visible = desk
        .filter(&FilterCriteria::new().with_status(ArticleStatus::Production))
        .unwrap();
    assert_eq!(visible.len(), 2);
    assert!(matches!(
        desk.open_reconcile(&[ArticleId::from("a1")]),
        Err(DeskError::Forbidden { role: Role::Viewer, .. })
    ));
}

#[test]
fn missing_dataset_is_reported() {
    assert!(matches!(
        Workspace::from_config(&DeskConfig::default()),
        Err(DeskError::NoDataset)
    ));

    let config = DeskConfig::default().with_dataset("/nonexistent/desk.json");
    assert!(matches!(Workspace::from_config(&config), Err(DeskError::Store(_))));
}
