use axum_helpers::KnownFields;
use mongodb::bson::oid::ObjectId;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

/// Avatar given to users who do not supply one.
pub const DEFAULT_AVATAR: &str = "https://cdn-icons-png.flaticon.com/512/149/149071.png";

/// Properties accepted in create and update bodies.
pub const USER_FIELDS: &[&str] = &["username", "email", "location", "avatar", "bio", "DOB"];

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Hex-encoded ObjectId
    #[serde(rename = "_id", alias = "id")]
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    /// Date of birth, free-form
    #[serde(rename = "DOB", default)]
    pub dob: String,
}

/// User as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "DOB", default)]
    pub dob: String,
}

/// DTO for creating a user.
///
/// `email` defaults to an empty string so that a missing email fails both
/// of its rules instead of being skipped.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Numbers and booleans are accepted and stored as text
    #[serde(default, deserialize_with = "scalar_as_string")]
    #[schema(example = "PhenomenalMo")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string_or_empty")]
    #[validate(
        email(message = "email must be an email"),
        length(min = 1, message = "email should not be empty")
    )]
    #[schema(example = "mo123@mail.com")]
    pub email: String,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub bio: Option<String>,
    #[serde(rename = "DOB", default, deserialize_with = "scalar_as_string")]
    #[schema(example = "22/05/1965")]
    pub dob: Option<String>,
}

/// DTO for a partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub bio: Option<String>,
    #[serde(rename = "DOB", default, deserialize_with = "scalar_as_string")]
    pub dob: Option<String>,
}

impl KnownFields for CreateUser {
    const FIELDS: &'static [&'static str] = USER_FIELDS;
}

impl KnownFields for UpdateUser {
    const FIELDS: &'static [&'static str] = USER_FIELDS;
}

/// `{ "users": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// `{ "user": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

/// `{ "newUser": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUserResponse {
    pub new_user: User,
}

/// `{ "updatedUser": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUserResponse {
    pub updated_user: User,
}

impl UserDocument {
    /// Build a new document with a fresh id, filling unset fields with defaults.
    pub fn new(input: CreateUser) -> Self {
        Self {
            id: ObjectId::new(),
            username: input.username.unwrap_or_default(),
            email: input.email,
            location: input.location.unwrap_or_default(),
            avatar: input.avatar.unwrap_or_else(default_avatar),
            bio: input.bio.unwrap_or_default(),
            dob: input.dob.unwrap_or_default(),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            username: doc.username,
            email: doc.email,
            location: doc.location,
            avatar: doc.avatar,
            bio: doc.bio,
            dob: doc.dob,
        }
    }
}

impl User {
    /// Overwrite every field present in `update`.
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(dob) = update.dob {
            self.dob = dob;
        }
    }
}

impl UpdateUser {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Accept a string, number or boolean and keep its text form.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Array(_)) => Err(de::Error::invalid_type(Unexpected::Seq, &"a string")),
        Some(Value::Object(_)) => Err(de::Error::invalid_type(Unexpected::Map, &"a string")),
    }
}

fn scalar_as_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_as_string(deserializer).map(Option::unwrap_or_default)
}
