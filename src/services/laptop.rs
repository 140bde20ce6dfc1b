use crate::errors::ApiError;
use crate::models::dtos::laptop::{DuplicateProbeDto, LaptopSubmissionDto, StatsDto};
use crate::models::{ConflictReport, IdentityField, LaptopEntity};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct LaptopService {
    pool: SqlitePool,
}

impl LaptopService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Duplicate validator. Runs all three identity lookups in fixed order
    /// and aggregates every violation, never short-circuiting on the first.
    /// `exclude` removes one record (the one being updated) from the
    /// lookups so a record does not conflict with its own stored values.
    pub async fn find_conflicts(
        &self,
        candidate: &LaptopSubmissionDto,
        exclude: Option<&Uuid>,
    ) -> Result<ConflictReport, ApiError> {
        let mut report = ConflictReport::default();
        for field in IdentityField::ALL {
            if self
                .identity_taken(field, candidate.identity_value(field), exclude)
                .await?
            {
                report.mark(field);
            }
        }
        Ok(report)
    }

    /// Pre-flight probe; same lookups as the validator, boolean answers.
    pub async fn probe_duplicates(
        &self,
        candidate: &LaptopSubmissionDto,
    ) -> Result<DuplicateProbeDto, ApiError> {
        Ok(DuplicateProbeDto {
            student_id_exists: self
                .identity_taken(IdentityField::StudentId, &candidate.student_id, None)
                .await?,
            serial_number_exists: self
                .identity_taken(IdentityField::SerialNumber, &candidate.serial_number, None)
                .await?,
            mac_address_exists: self
                .identity_taken(IdentityField::MacAddress, &candidate.mac_address, None)
                .await?,
        })
    }

    async fn identity_taken(
        &self,
        field: IdentityField,
        value: &str,
        exclude: Option<&Uuid>,
    ) -> Result<bool, sqlx::Error> {
        // Exact string equality, no normalization.
        let sql = format!(
            "SELECT 1 FROM laptops WHERE {} = ?1 AND (?2 IS NULL OR id <> ?2) LIMIT 1",
            field.column()
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .bind(exclude.copied())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn register(&self, candidate: LaptopSubmissionDto) -> Result<LaptopEntity, ApiError> {
        let report = self.find_conflicts(&candidate, None).await?;
        if !report.is_empty() {
            return Err(ApiError::Conflict(report));
        }
        let now = Utc::now();
        let entity = LaptopEntity {
            id: Uuid::new_v4(),
            student_name: candidate.student_name,
            student_id: candidate.student_id,
            phone: candidate.phone,
            email: candidate.email,
            serial_number: candidate.serial_number,
            mac_address: candidate.mac_address,
            operating_system: candidate.operating_system,
            laptop_brand: candidate.laptop_brand,
            anti_virus_installed: candidate.anti_virus_installed,
            verified: false,
            created_at: now,
            updated_at: now,
        };
        let result = sqlx::query(
            "INSERT INTO laptops (id, student_name, student_id, phone, email, serial_number, \
             mac_address, operating_system, laptop_brand, anti_virus_installed, verified, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(entity.id)
        .bind(&entity.student_name)
        .bind(&entity.student_id)
        .bind(&entity.phone)
        .bind(&entity.email)
        .bind(&entity.serial_number)
        .bind(&entity.mac_address)
        .bind(&entity.operating_system)
        .bind(&entity.laptop_brand)
        .bind(entity.anti_virus_installed)
        .bind(entity.verified)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .execute(&self.pool)
        .await;
        match result {
            Ok(_) => Ok(entity),
            Err(err) => Err(map_unique_violation(err)),
        }
    }

    pub async fn list(&self) -> Result<Vec<LaptopEntity>, ApiError> {
        let items = sqlx::query_as::<_, LaptopEntity>("SELECT * FROM laptops ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Option<LaptopEntity>, ApiError> {
        let item = sqlx::query_as::<_, LaptopEntity>("SELECT * FROM laptops WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// Full-replace update: every mutable field is overwritten from the
    /// submission; `verified` and `created_at` are untouched.
    pub async fn update(
        &self,
        id: &Uuid,
        fields: LaptopSubmissionDto,
    ) -> Result<LaptopEntity, ApiError> {
        let Some(existing) = self.get(id).await? else {
            return Err(ApiError::ResourceNotFound);
        };
        let report = self.find_conflicts(&fields, Some(id)).await?;
        if !report.is_empty() {
            return Err(ApiError::Conflict(report));
        }
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE laptops SET student_name = ?2, student_id = ?3, phone = ?4, email = ?5, \
             serial_number = ?6, mac_address = ?7, operating_system = ?8, laptop_brand = ?9, \
             anti_virus_installed = ?10, updated_at = ?11 WHERE id = ?1",
        )
        .bind(id)
        .bind(&fields.student_name)
        .bind(&fields.student_id)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.serial_number)
        .bind(&fields.mac_address)
        .bind(&fields.operating_system)
        .bind(&fields.laptop_brand)
        .bind(fields.anti_virus_installed)
        .bind(now)
        .execute(&self.pool)
        .await;
        match result {
            Ok(_) => Ok(LaptopEntity {
                id: existing.id,
                student_name: fields.student_name,
                student_id: fields.student_id,
                phone: fields.phone,
                email: fields.email,
                serial_number: fields.serial_number,
                mac_address: fields.mac_address,
                operating_system: fields.operating_system,
                laptop_brand: fields.laptop_brand,
                anti_virus_installed: fields.anti_virus_installed,
                verified: existing.verified,
                created_at: existing.created_at,
                updated_at: now,
            }),
            Err(err) => Err(map_unique_violation(err)),
        }
    }

    /// Idempotent: verifying an already verified record succeeds again.
    pub async fn verify(&self, id: &Uuid) -> Result<LaptopEntity, ApiError> {
        let entity = sqlx::query_as::<_, LaptopEntity>(
            "UPDATE laptops SET verified = 1, updated_at = ?2 WHERE id = ?1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        entity.ok_or(ApiError::ResourceNotFound)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM laptops WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::ResourceNotFound);
        }
        Ok(())
    }

    /// Case-insensitive substring match on the student name; an empty or
    /// absent query lists everything.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<LaptopEntity>, ApiError> {
        let Some(query) = query.map(str::trim).filter(|it| !it.is_empty()) else {
            return self.list().await;
        };
        let pattern = format!("%{}%", escape_like(query));
        let items = sqlx::query_as::<_, LaptopEntity>(
            "SELECT * FROM laptops WHERE student_name LIKE ?1 ESCAPE '\\' ORDER BY rowid",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn stats(&self) -> Result<StatsDto, ApiError> {
        let (total, verified): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(verified = 1), 0) FROM laptops")
                .fetch_one(&self.pool)
                .await?;
        Ok(StatsDto {
            total,
            verified,
            not_verified: total - verified,
        })
    }
}

/// Translate a lost check-then-insert race into the same field-level
/// conflict the validator would have produced. SQLite names the rejecting
/// index in its message, e.g. "UNIQUE constraint failed: laptops.student_id".
pub(crate) fn unique_violation_field(err: &sqlx::Error) -> Option<IdentityField> {
    let sqlx::Error::Database(db) = err else {
        return None;
    };
    if !db.is_unique_violation() {
        return None;
    }
    let message = db.message().to_string();
    IdentityField::ALL
        .into_iter()
        .find(|field| message.contains(field.column()))
}

fn map_unique_violation(err: sqlx::Error) -> ApiError {
    match unique_violation_field(&err) {
        Some(field) => ApiError::Conflict(ConflictReport::single(field)),
        None => err.into(),
    }
}

/// Treat LIKE wildcards in user input literally.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn service() -> LaptopService {
        // A pooled ":memory:" database is per-connection; cap the pool at
        // one so every query sees the migrated schema.
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::server::MIGRATOR.run(&pool).await.unwrap();
        LaptopService::new(pool)
    }

    fn submission(student_id: &str, serial: &str, mac: &str) -> LaptopSubmissionDto {
        LaptopSubmissionDto {
            student_name: "Abel Tesfaye".to_string(),
            student_id: student_id.to_string(),
            phone: "0911-000-000".to_string(),
            email: "abel@example.com".to_string(),
            serial_number: serial.to_string(),
            mac_address: mac.to_string(),
            operating_system: "Windows 11".to_string(),
            laptop_brand: "Lenovo".to_string(),
            anti_virus_installed: false,
        }
    }

    #[tokio::test]
    async fn register_assigns_defaults_and_counts() {
        let service = service().await;
        let entity = service.register(submission("S1", "SN1", "M1")).await.unwrap();
        assert!(!entity.verified);
        assert_eq!(entity.created_at, entity.updated_at);
        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.verified, 0);
        assert_eq!(stats.not_verified, 1);
        let stored = service.get(&entity.id).await.unwrap().unwrap();
        assert_eq!(stored.student_id, "S1");
    }

    #[tokio::test]
    async fn register_reports_only_matching_fields() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let err = service
            .register(submission("S1", "SN2", "M2"))
            .await
            .unwrap_err();
        let ApiError::Conflict(report) = err else {
            panic!("expected a conflict");
        };
        assert_eq!(
            report.student_id,
            Some("This student already has a registered laptop")
        );
        assert_eq!(report.serial_number, None);
        assert_eq!(report.mac_address, None);
    }

    #[tokio::test]
    async fn register_aggregates_every_conflict() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let err = service
            .register(submission("S1", "SN1", "M2"))
            .await
            .unwrap_err();
        let ApiError::Conflict(report) = err else {
            panic!("expected a conflict");
        };
        assert!(report.student_id.is_some());
        assert_eq!(report.serial_number, Some("This laptop is already registered"));
        assert_eq!(report.mac_address, None);
    }

    #[tokio::test]
    async fn rejected_submission_is_not_persisted() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let _ = service.register(submission("S1", "SN1", "M1")).await;
        assert_eq!(service.stats().await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn duplicate_check_is_exact_match() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        // No case or whitespace normalization on identity fields.
        let report = service
            .find_conflicts(&submission("s1", " SN1", "m1"), None)
            .await
            .unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn probe_answers_all_three_fields() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let probe = service
            .probe_duplicates(&submission("S1", "SN2", "M1"))
            .await
            .unwrap();
        assert_eq!(
            probe,
            DuplicateProbeDto {
                student_id_exists: true,
                serial_number_exists: false,
                mac_address_exists: true,
            }
        );
    }

    #[tokio::test]
    async fn update_excludes_own_record() {
        let service = service().await;
        let entity = service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let mut fields = submission("S1", "SN1", "M1");
        fields.laptop_brand = "Dell".to_string();
        let updated = service.update(&entity.id, fields).await.unwrap();
        assert_eq!(updated.laptop_brand, "Dell");
        assert_eq!(updated.created_at, entity.created_at);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn update_cannot_take_anothers_identity() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let second = service.register(submission("S2", "SN2", "M2")).await.unwrap();
        let err = service
            .update(&second.id, submission("S2", "SN1", "M2"))
            .await
            .unwrap_err();
        let ApiError::Conflict(report) = err else {
            panic!("expected a conflict");
        };
        assert_eq!(report.serial_number, Some("This laptop is already registered"));
        assert_eq!(report.student_id, None);
    }

    #[tokio::test]
    async fn update_missing_record_is_not_found() {
        let service = service().await;
        let err = service
            .update(&Uuid::new_v4(), submission("S1", "SN1", "M1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ResourceNotFound));
    }

    #[tokio::test]
    async fn verify_is_idempotent() {
        let service = service().await;
        let entity = service.register(submission("S1", "SN1", "M1")).await.unwrap();
        let first = service.verify(&entity.id).await.unwrap();
        assert!(first.verified);
        let second = service.verify(&entity.id).await.unwrap();
        assert!(second.verified);
        assert!(matches!(
            service.verify(&Uuid::new_v4()).await.unwrap_err(),
            ApiError::ResourceNotFound
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_gone() {
        let service = service().await;
        let entity = service.register(submission("S1", "SN1", "M1")).await.unwrap();
        service.delete(&entity.id).await.unwrap();
        assert!(service.get(&entity.id).await.unwrap().is_none());
        assert!(matches!(
            service.delete(&entity.id).await.unwrap_err(),
            ApiError::ResourceNotFound
        ));
    }

    #[tokio::test]
    async fn search_empty_query_lists_all() {
        let service = service().await;
        service.register(submission("S1", "SN1", "M1")).await.unwrap();
        service.register(submission("S2", "SN2", "M2")).await.unwrap();
        assert_eq!(service.search(None).await.unwrap().len(), 2);
        assert_eq!(service.search(Some("")).await.unwrap().len(), 2);
        assert_eq!(service.search(Some("   ")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_matches_substring_case_insensitively() {
        let service = service().await;
        let mut first = submission("S1", "SN1", "M1");
        first.student_name = "Abel Tesfaye".to_string();
        service.register(first).await.unwrap();
        let mut second = submission("S2", "SN2", "M2");
        second.student_name = "Marta Bekele".to_string();
        service.register(second).await.unwrap();

        let hits = service.search(Some("tesfa")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].student_name, "Abel Tesfaye");
        // LIKE wildcards in the query must not act as wildcards.
        assert!(service.search(Some("%")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stats_partitions_by_verified_flag() {
        let service = service().await;
        let first = service.register(submission("S1", "SN1", "M1")).await.unwrap();
        service.register(submission("S2", "SN2", "M2")).await.unwrap();
        service.register(submission("S3", "SN3", "M3")).await.unwrap();
        service.verify(&first.id).await.unwrap();
        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.not_verified, 2);
        assert_eq!(stats.verified + stats.not_verified, stats.total);
    }

    #[tokio::test]
    async fn lost_insert_race_maps_to_field_conflict() {
        let service = service().await;
        let entity = service.register(submission("S1", "SN1", "M1")).await.unwrap();
        // Bypass the validator the way a concurrent writer would.
        let err = sqlx::query(
            "INSERT INTO laptops (id, student_name, student_id, phone, email, serial_number, \
             mac_address, operating_system, laptop_brand, anti_virus_installed, verified, \
             created_at, updated_at) \
             VALUES (?1, '', ?2, '', '', 'SN9', 'M9', '', '', 0, 0, ?3, ?3)",
        )
        .bind(Uuid::new_v4())
        .bind(&entity.student_id)
        .bind(Utc::now())
        .execute(&service.pool)
        .await
        .unwrap_err();
        assert_eq!(unique_violation_field(&err), Some(IdentityField::StudentId));
    }
}
