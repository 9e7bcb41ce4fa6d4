//! User collection access.

use anyhow::{Context, Result};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

const USERS_COLLECTION: &str = "users";

/// MongoDB error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB error code for a document failing collection validation.
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// A user document as persisted in the `users` collection.
///
/// The password field always holds a bcrypt hash, never the plaintext
/// credential.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default)]
    pub profile_image: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl UserDocument {
    #[must_use]
    pub fn new(full_name: String, email: String, phone: String, password_hash: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            full_name,
            email,
            phone,
            password: password_hash,
            profile_image: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Typed handle over the `users` collection.
#[derive(Clone)]
pub struct UserStore {
    collection: Collection<UserDocument>,
}

impl UserStore {
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }

    /// Create the unique indexes on `email` and `phone`.
    ///
    /// Uniqueness is enforced here, not by application-level coordination:
    /// concurrent duplicate signups race at the store and the loser gets a
    /// duplicate key error.
    /// # Errors
    /// Return error if index creation fails
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique = IndexOptions::builder().unique(true).build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique.clone())
            .build();
        self.collection
            .create_index(email_index)
            .await
            .context("failed to create unique index on email")?;

        let phone_index = IndexModel::builder()
            .keys(doc! { "phone": 1 })
            .options(unique)
            .build();
        self.collection
            .create_index(phone_index)
            .await
            .context("failed to create unique index on phone")?;

        Ok(())
    }

    /// Look up a user by normalized email (login path).
    /// # Errors
    /// Return error if the query fails
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserDocument>> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .context("failed to lookup user by email")
    }

    /// Look up a user matching both email and phone (signup duplicate check).
    /// # Errors
    /// Return error if the query fails
    pub async fn find_by_email_and_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<UserDocument>> {
        self.collection
            .find_one(doc! { "email": email, "phone": phone })
            .await
            .context("failed to lookup user by email and phone")
    }

    /// Insert a new user and return its generated id.
    ///
    /// The raw driver error is preserved so callers can classify duplicate
    /// key and validation failures.
    /// # Errors
    /// Return the driver error when the insert fails
    pub async fn insert(&self, user: &UserDocument) -> Result<ObjectId, mongodb::error::Error> {
        let result = self.collection.insert_one(user).await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            mongodb::error::Error::custom("inserted_id was not an ObjectId".to_string())
        })
    }
}

/// True when the error is a unique index violation (code 11000).
#[must_use]
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    write_error_code(err) == Some(DUPLICATE_KEY)
}

/// True when the error is a collection validation failure (code 121).
#[must_use]
pub fn is_document_validation(err: &mongodb::error::Error) -> bool {
    write_error_code(err) == Some(DOCUMENT_VALIDATION_FAILURE)
}

fn write_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => Some(write_error.code),
        _ => None,
    }
}
