use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, LOWER($3), $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| account_conflict_or_internal(error, "create user"))?;

        Ok(UserRecord::from(row))
    }
}
