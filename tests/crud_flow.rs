use anyhow::Result;
use entity::{Employee, EmployeeDraft};
use platform_store::{EmployeeStore, StoreError};
use std::path::Path;
use uuid::Uuid;

fn draft(name: &str, department: &str, salary: f64, age: u32) -> EmployeeDraft {
    EmployeeDraft {
        name: name.into(),
        email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
        department: department.into(),
        salary,
        age,
    }
}

fn read_file(path: &Path) -> Result<Vec<Employee>> {
    Ok(serde_json::from_slice(&std::fs::read(path)?)?)
}

#[tokio::test]
async fn full_crud_walk_keeps_file_and_store_in_agreement() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("hr/employees.json");
    let store = EmployeeStore::new(&path);

    // The collection does not exist until the first add.
    assert!(matches!(
        store.list().await,
        Err(StoreError::FileMissing { .. })
    ));

    let (ada, total) = store.add(draft("Ada Lovelace", "Engineering", 92_500.0, 36)).await?;
    assert_eq!(total, 1);
    assert_eq!(read_file(&path)?, vec![ada.clone()]);

    let (grace, total) = store.add(draft("Grace Hopper", "Research", 99_000.0, 45)).await?;
    assert_eq!(total, 2);
    assert_eq!(read_file(&path)?, vec![ada.clone(), grace.clone()]);

    // Update overwrites every field of the targeted record; its neighbour
    // stays byte-for-byte identical on disk.
    let (updated, total) = store
        .update(ada.id, draft("Ada King", "Mathematics", 105_000.0, 37))
        .await?;
    assert_eq!(total, 2);
    assert_eq!(updated.id, ada.id);
    assert_eq!(updated.name, "Ada King");
    assert_eq!(read_file(&path)?, vec![updated.clone(), grace.clone()]);

    // A well-formed but absent id changes nothing.
    let before = std::fs::read(&path)?;
    assert!(matches!(
        store.remove(Uuid::new_v4()).await,
        Err(StoreError::UnknownEmployee { .. })
    ));
    assert_eq!(std::fs::read(&path)?, before);

    let (removed, remaining) = store.remove(updated.id).await?;
    assert_eq!(removed, updated);
    assert_eq!(remaining, 1);
    assert_eq!(read_file(&path)?, vec![grace]);

    Ok(())
}

#[tokio::test]
async fn store_reads_collections_written_by_hand() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("employees.json");

    // The on-disk format is a plain JSON array of employee objects, so a
    // file produced by another writer loads as-is.
    let id = Uuid::new_v4();
    std::fs::write(
        &path,
        format!(
            r#"[{{"id":"{id}","name":"Alan Turing","email":"alan@example.test","department":"Research","salary":88000.0,"age":41}}]"#
        ),
    )?;

    let store = EmployeeStore::new(&path);
    let employees = store.list().await?;
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id, id);
    assert_eq!(employees[0].name, "Alan Turing");

    Ok(())
}
