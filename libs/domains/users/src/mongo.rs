//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, User, UserDocument};
use crate::repository::UserRepository;

/// Default collection name.
pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Repository over the `users` collection of `db`.
    ///
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(&client.database("mydb"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self { collection }
    }

    /// Create the email lookup index. Not unique: duplicate emails are
    /// tolerated by the API.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().name("idx_email".to_string()).build())
            .build();

        self.collection.create_index(email_index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    /// `$set` document with only the fields present in `update`.
    fn build_update(update: &UpdateUser) -> Document {
        let mut set = doc! {};

        let fields = [
            ("username", &update.username),
            ("email", &update.email),
            ("location", &update.location),
            ("avatar", &update.avatar),
            ("bio", &update.bio),
            ("DOB", &update.dob),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                set.insert(key, value.as_str());
            }
        }

        doc! { "$set": set }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(user.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user.map(User::from))
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let document = UserDocument::new(input);

        self.collection.insert_one(&document).await?;

        tracing::info!(user_id = %document.id, "User created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<Option<User>> {
        if input.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, Self::build_update(&input))
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(user_id = %id, "User updated successfully");
        }
        Ok(updated.map(User::from))
    }
}
