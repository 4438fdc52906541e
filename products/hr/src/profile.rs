use entity::employees;
use sea_orm::prelude::Json;
use serde::{Deserialize, Serialize};

use crate::{HrError, HrResult};

/// Public view of an employee. Never carries the credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub position: String,
    pub avatar: String,
    pub skills: Vec<String>,
}

impl EmployeeProfile {
    pub fn from_model(model: employees::Model) -> HrResult<Self> {
        let skills = decode_skills(model.id, &model.skills)?;
        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            position: model.position,
            avatar: model.avatar,
            skills,
        })
    }
}

/// Identity returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginIdentity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<employees::Model> for LoginIdentity {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

/// Accepts the skills column in either stored shape: the array itself, or a
/// JSON string holding the encoded array.
pub fn decode_skills(employee_id: i64, raw: &Json) -> HrResult<Vec<String>> {
    let decoded = match raw {
        Json::String(encoded) => serde_json::from_str(encoded),
        other => serde_json::from_value(other.clone()),
    };
    decoded.map_err(|source| HrError::MalformedSkills {
        employee_id,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_array_is_taken_as_is() {
        let skills = decode_skills(1, &json!(["Python", "SQL", "Spark"])).unwrap();
        assert_eq!(skills, ["Python", "SQL", "Spark"]);
    }

    #[test]
    fn encoded_string_is_decoded() {
        let raw = Json::String(r#"["Python","SQL","Spark"]"#.into());
        let skills = decode_skills(1, &raw).unwrap();
        assert_eq!(skills, ["Python", "SQL", "Spark"]);
    }

    #[test]
    fn both_shapes_agree() {
        let list = vec!["Airflow".to_string(), "Docker".to_string()];
        let native = json!(list);
        let encoded = Json::String(serde_json::to_string(&list).unwrap());
        assert_eq!(
            decode_skills(2, &native).unwrap(),
            decode_skills(2, &encoded).unwrap()
        );
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(decode_skills(3, &json!([])).unwrap().is_empty());
    }

    #[test]
    fn non_list_values_are_malformed() {
        for raw in [
            json!({"skills": ["Python"]}),
            json!([1, 2]),
            Json::String("Python, SQL".into()),
            Json::Null,
        ] {
            let err = decode_skills(7, &raw).unwrap_err();
            assert!(matches!(err, HrError::MalformedSkills { employee_id: 7, .. }));
        }
    }

    #[test]
    fn profile_hides_credential() {
        let model = employees::Model {
            id: 4,
            name: "Juana Lopez".into(),
            email: "juana123@factored.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Emily".into(),
            position: "Machine Learning Engineer".into(),
            skills: json!(["Python", "PyTorch"]),
        };
        let profile = EmployeeProfile::from_model(model).unwrap();
        let body = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            body,
            json!({
                "id": 4,
                "name": "Juana Lopez",
                "email": "juana123@factored.com",
                "position": "Machine Learning Engineer",
                "avatar": "https://api.dicebear.com/7.x/avataaars/svg?seed=Emily",
                "skills": ["Python", "PyTorch"],
            })
        );
    }
}
