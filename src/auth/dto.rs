use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::UserProfile;

/// Request body for signup. Profile fields are optional at registration
/// and can stay empty.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub age: Option<i16>,
    pub gender: Option<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned after signup, signin or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicProfile,
}

/// Public part of the account, never includes the password hash.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub age: Option<i16>,
    pub gender: Option<String>,
    pub medical_conditions: Vec<String>,
    pub medications: Vec<String>,
}

impl From<UserProfile> for PublicProfile {
    fn from(u: UserProfile) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            age: u.age,
            gender: u.gender,
            medical_conditions: u.medical_conditions,
            medications: u.medications,
        }
    }
}
