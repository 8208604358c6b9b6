//! User repository.

use std::future::Future;

use jiff::Timestamp;

use crate::model::{NewUser, User, UserGrants};
use crate::{StoreClient, StoreError, StoreResult, TRACING_TARGET_QUERY};

const ENTITY: &str = "user";

/// Repository for user accounts and their role assignments.
///
/// Emails are trimmed and lower-cased both on insert and on lookup.
pub trait UserRepository {
    /// Inserts a new user.
    ///
    /// Fails with [`StoreError::Conflict`] when the email is registered and
    /// with [`StoreError::NotFound`] when an assigned role does not exist.
    fn create_user(&self, new_user: NewUser) -> impl Future<Output = StoreResult<User>> + Send;

    /// Finds a user by its identifier.
    fn find_user_by_id(
        &self,
        user_id: i64,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Finds a user by email address.
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// Checks whether an email address is already registered.
    fn email_exists(&self, email: &str) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Replaces the password hash of a user.
    fn update_password(
        &self,
        user_id: i64,
        password_hash: String,
    ) -> impl Future<Output = StoreResult<User>> + Send;

    /// Records a successful login at the current time.
    fn record_login(&self, user_id: i64) -> impl Future<Output = StoreResult<User>> + Send;

    /// Assigns additional roles to a user.
    ///
    /// Nothing is written when the user or any of the roles does not exist.
    fn assign_user_roles(
        &self,
        user_id: i64,
        role_ids: &[i64],
    ) -> impl Future<Output = StoreResult<User>> + Send;

    /// Removes roles from a user. Ids the user does not hold are ignored.
    fn remove_user_roles(
        &self,
        user_id: i64,
        role_ids: &[i64],
    ) -> impl Future<Output = StoreResult<User>> + Send;

    /// Resolves the role names and distinct permission names of a user.
    ///
    /// Role ids without a row are skipped.
    fn find_user_grants(&self, user_id: i64) -> impl Future<Output = StoreResult<UserGrants>> + Send;
}

#[inline]
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserRepository for StoreClient {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let email = normalize_email(&new_user.email);

        let mut tables = self.write().await;
        if tables.users.values().any(|u| u.email == email) {
            tracing::debug!(target: TRACING_TARGET_QUERY, email = %email, "Duplicate user email");
            return Err(StoreError::conflict(ENTITY, email));
        }

        if let Some(missing) = new_user
            .role_ids
            .iter()
            .find(|id| !tables.roles.contains(**id))
        {
            return Err(StoreError::not_found("role", *missing));
        }

        let now = Timestamp::now();
        let user = User {
            id: tables.users.next_id(),
            email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name.trim().to_owned(),
            enabled: new_user.enabled,
            account_non_locked: new_user.account_non_locked,
            last_login_at: None,
            role_ids: new_user.role_ids,
            created_at: now,
            updated_at: now,
        };

        tables.users.rows.insert(user.id, user.clone());
        tracing::debug!(target: TRACING_TARGET_QUERY, user_id = user.id, "User created");

        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        let tables = self.read().await;
        Ok(tables.users.rows.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = normalize_email(email);
        let tables = self.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let email = normalize_email(email);
        let tables = self.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn update_password(&self, user_id: i64, password_hash: String) -> StoreResult<User> {
        let mut tables = self.write().await;
        let user = tables
            .users
            .rows
            .get_mut(&user_id)
            .ok_or(StoreError::not_found(ENTITY, user_id))?;

        user.password_hash = password_hash;
        user.updated_at = Timestamp::now();
        tracing::debug!(target: TRACING_TARGET_QUERY, user_id, "Password hash replaced");

        Ok(user.clone())
    }

    async fn record_login(&self, user_id: i64) -> StoreResult<User> {
        let mut tables = self.write().await;
        let user = tables
            .users
            .rows
            .get_mut(&user_id)
            .ok_or(StoreError::not_found(ENTITY, user_id))?;

        user.last_login_at = Some(Timestamp::now());
        Ok(user.clone())
    }

    async fn assign_user_roles(&self, user_id: i64, role_ids: &[i64]) -> StoreResult<User> {
        let mut tables = self.write().await;
        if !tables.users.contains(user_id) {
            return Err(StoreError::not_found(ENTITY, user_id));
        }
        if let Some(missing) = role_ids.iter().find(|id| !tables.roles.contains(**id)) {
            return Err(StoreError::not_found("role", *missing));
        }

        let user = tables
            .users
            .rows
            .get_mut(&user_id)
            .ok_or(StoreError::not_found(ENTITY, user_id))?;
        user.role_ids.extend(role_ids.iter().copied());
        user.updated_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            user_id,
            assigned = role_ids.len(),
            "Roles assigned to user",
        );

        Ok(user.clone())
    }

    async fn remove_user_roles(&self, user_id: i64, role_ids: &[i64]) -> StoreResult<User> {
        let mut tables = self.write().await;
        let user = tables
            .users
            .rows
            .get_mut(&user_id)
            .ok_or(StoreError::not_found(ENTITY, user_id))?;

        user.role_ids.retain(|id| !role_ids.contains(id));
        user.updated_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            user_id,
            removed = role_ids.len(),
            "Roles removed from user",
        );

        Ok(user.clone())
    }

    async fn find_user_grants(&self, user_id: i64) -> StoreResult<UserGrants> {
        let tables = self.read().await;
        let user = tables
            .users
            .rows
            .get(&user_id)
            .ok_or(StoreError::not_found(ENTITY, user_id))?;

        let mut grants = UserGrants::default();
        for role in user.role_ids.iter().filter_map(|id| tables.roles.rows.get(id)) {
            grants.roles.push(role.name.clone());

            let names = role
                .permission_ids
                .iter()
                .filter_map(|id| tables.permissions.rows.get(id))
                .map(|p| &p.name);
            for name in names {
                if !grants.permissions.contains(name) {
                    grants.permissions.push(name.clone());
                }
            }
        }

        Ok(grants)
    }
}
