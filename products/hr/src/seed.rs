use platform_authn::hash_password;
use platform_db::{DbError, DbPool, NewEmployee, employees};
use sea_orm::TransactionTrait;
use tracing::info;

use crate::HrResult;

pub const SEED_PASSWORD: &str = "password123";

/// One sample employee; every seeded login uses [`SEED_PASSWORD`].
#[derive(Clone, Copy, Debug)]
pub struct SeedEmployee {
    pub name: &'static str,
    pub email: &'static str,
    pub avatar: &'static str,
    pub position: &'static str,
    pub skills: &'static [&'static str],
}

pub const SEED_EMPLOYEES: [SeedEmployee; 3] = [
    SeedEmployee {
        name: "Sara Perez",
        email: "sara123@factored.com",
        avatar: "https://api.dicebear.com/9.x/avataaars/svg?seed=Felix",
        position: "Senior Data Scientist",
        skills: &[
            "Python",
            "SQL",
            "Machine Learning",
            "Spark",
            "TensorFlow",
            "AWS",
            "Statistics",
        ],
    },
    SeedEmployee {
        name: "Mariana Garcia",
        email: "mariana123@factored.com",
        avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Michael",
        position: "Data Engineer",
        skills: &[
            "Python",
            "SQL",
            "Spark",
            "Airflow",
            "Docker",
            "Kubernetes",
            "GCP",
        ],
    },
    SeedEmployee {
        name: "Juana Lopez",
        email: "juana123@factored.com",
        avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Emily",
        position: "Machine Learning Engineer",
        skills: &[
            "Python",
            "PyTorch",
            "TensorFlow",
            "MLOps",
            "Docker",
            "FastAPI",
            "Java",
        ],
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table already had rows; nothing was written.
    Skipped { existing: u64 },
    Seeded { emails: Vec<String> },
}

/// Populates an empty directory with the three sample employees.
pub async fn seed_directory(pool: &DbPool) -> HrResult<SeedOutcome> {
    let existing = employees::count(pool).await?;
    if existing > 0 {
        info!(existing, "directory already contains data; skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let txn = pool.begin().await.map_err(DbError::from)?;
    let mut emails = Vec::with_capacity(SEED_EMPLOYEES.len());
    for seed in &SEED_EMPLOYEES {
        let employee = NewEmployee {
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            password_hash: hash_password(SEED_PASSWORD)?,
            avatar: seed.avatar.to_string(),
            position: seed.position.to_string(),
            skills: seed.skills.iter().map(|s| s.to_string()).collect(),
        };
        let inserted = employees::insert(&txn, employee).await?;
        emails.push(inserted.email);
    }
    txn.commit().await.map_err(DbError::from)?;

    info!(count = emails.len(), "seeded directory");
    Ok(SeedOutcome::Seeded { emails })
}
