//! HR vertical slice: the employee directory access layer.
//!
//! Every operation is a single stateless read over the storage model in
//! `platform-db`; results are shaped into [`LoginIdentity`] or
//! [`EmployeeProfile`] before they leave this crate.

mod profile;
pub mod seed;

use platform_authn::{AuthnError, verify_decoy, verify_password};
use platform_db::{DbError, DbPool, employees};
use thiserror::Error;
use tracing::{debug, instrument};

pub use profile::{EmployeeProfile, LoginIdentity, decode_skills};
pub use seed::{SeedOutcome, seed_directory};

#[derive(Debug, Error)]
pub enum HrError {
    /// Unknown email or wrong password; callers cannot tell which.
    #[error("invalid credentials")]
    AuthFailure,
    #[error("employee {0} not found")]
    NotFound(i64),
    #[error("skills of employee {employee_id} are not a list of strings")]
    MalformedSkills {
        employee_id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] DbError),
    #[error(transparent)]
    Credential(#[from] AuthnError),
}

pub type HrResult<T> = Result<T, HrError>;

#[derive(Clone, Debug)]
pub struct HrModule {
    pool: DbPool,
}

impl HrModule {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "hr.authenticate", skip_all)]
    pub async fn authenticate(&self, email: &str, password: &str) -> HrResult<LoginIdentity> {
        let Some(employee) = employees::find_by_email(&self.pool, email).await? else {
            verify_decoy(password);
            debug!("login rejected: unknown email");
            return Err(HrError::AuthFailure);
        };
        if !verify_password(password, &employee.password_hash)? {
            debug!(employee_id = employee.id, "login rejected: password mismatch");
            return Err(HrError::AuthFailure);
        }
        debug!(employee_id = employee.id, "login accepted");
        Ok(LoginIdentity::from(employee))
    }

    #[instrument(name = "hr.profile", skip(self))]
    pub async fn profile(&self, id: i64) -> HrResult<EmployeeProfile> {
        let employee = employees::find_by_id(&self.pool, id)
            .await?
            .ok_or(HrError::NotFound(id))?;
        EmployeeProfile::from_model(employee)
    }

    #[instrument(name = "hr.profiles", skip_all)]
    pub async fn profiles(&self) -> HrResult<Vec<EmployeeProfile>> {
        employees::list_all(&self.pool)
            .await?
            .into_iter()
            .map(EmployeeProfile::from_model)
            .collect()
    }
}
