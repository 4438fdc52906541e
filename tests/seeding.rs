mod common;

use anyhow::Result;
use platform_authn::verify_password;
use platform_db::{employees, inspect};
use products_hr::{SeedOutcome, seed::SEED_PASSWORD, seed_directory};

#[tokio::test]
async fn seeding_twice_leaves_three_rows() -> Result<()> {
    let pool = common::empty_pool().await?;

    let first = seed_directory(&pool).await?;
    assert_eq!(
        first,
        SeedOutcome::Seeded {
            emails: vec![
                "sara123@factored.com".to_string(),
                "mariana123@factored.com".to_string(),
                "juana123@factored.com".to_string(),
            ],
        }
    );

    let second = seed_directory(&pool).await?;
    assert_eq!(second, SeedOutcome::Skipped { existing: 3 });
    assert_eq!(employees::count(&pool).await?, 3);
    Ok(())
}

#[tokio::test]
async fn seed_skips_a_directory_with_any_rows() -> Result<()> {
    let pool = common::empty_pool().await?;
    common::insert_raw(&pool, "first@factored.com", serde_json::json!(["Rust"])).await?;

    assert_eq!(seed_directory(&pool).await?, SeedOutcome::Skipped { existing: 1 });
    assert!(employees::find_by_email(&pool, "sara123@factored.com").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn stored_credentials_are_hashed() -> Result<()> {
    let pool = common::seeded_pool().await?;

    let mut salts = Vec::new();
    for employee in employees::list_all(&pool).await? {
        assert_ne!(employee.password_hash, SEED_PASSWORD);
        assert!(employee.password_hash.starts_with("$argon2"));
        assert!(verify_password(SEED_PASSWORD, &employee.password_hash)?);
        assert!(!verify_password("wrong", &employee.password_hash)?);
        salts.push(employee.password_hash);
    }
    salts.sort();
    salts.dedup();
    assert_eq!(salts.len(), 3);
    Ok(())
}

#[tokio::test]
async fn diagnostics_describe_seeded_directory() -> Result<()> {
    let pool = common::seeded_pool().await?;

    let report = inspect(&pool).await?;
    assert!(report.connected);
    assert!(report.has_employees_table());
    assert_eq!(report.employee_count, Some(3));
    assert!(!report.is_empty());
    let columns: Vec<_> = report.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        columns,
        ["id", "name", "email", "password_hash", "avatar", "position", "skills"]
    );
    Ok(())
}
