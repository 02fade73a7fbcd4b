//! Database service for wifi-billing-service.

use crate::error::AppError;
use crate::models::{
    Bill, BillCostUpdate, Member, MemberUpdate, NewBill, NewMember, NewPayment, Payment,
    PaymentUpdate,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "wifi-billing-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Member Operations
    // -------------------------------------------------------------------------

    /// Create a new member.
    #[instrument(skip(self, input), fields(member_name = %input.name))]
    pub async fn create_member(&self, input: &NewMember) -> Result<Member, AppError> {
        let member_id = Uuid::new_v4();
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (id, name, contact, status, join_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, contact, status, join_date, created_at, updated_at
            "#,
        )
        .bind(member_id)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(input.status.as_str())
        .bind(input.join_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create member: {}", e)))?;

        info!(member_id = %member.id, status = %member.status, "Member created");

        Ok(member)
    }

    /// Get a member by ID.
    #[instrument(skip(self), fields(member_id = %member_id))]
    pub async fn get_member(&self, member_id: Uuid) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, contact, status, join_date, created_at, updated_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get member: {}", e)))?;

        Ok(member)
    }

    /// List all members, newest first.
    #[instrument(skip(self))]
    pub async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, contact, status, join_date, created_at, updated_at
            FROM members
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list members: {}", e)))?;

        Ok(members)
    }

    /// List members that participate in bill splitting.
    #[instrument(skip(self))]
    pub async fn list_active_members(&self) -> Result<Vec<Member>, AppError> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, contact, status, join_date, created_at, updated_at
            FROM members
            WHERE status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list active members: {}", e))
        })?;

        Ok(members)
    }

    /// Count members that participate in bill splitting.
    #[instrument(skip(self))]
    pub async fn count_active_members(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to count active members: {}",
                        e
                    ))
                })?;

        Ok(count)
    }

    /// Update a member. Returns None if the member does not exist.
    #[instrument(skip(self, input), fields(member_id = %member_id))]
    pub async fn update_member(
        &self,
        member_id: Uuid,
        input: &MemberUpdate,
    ) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET name = $2, contact = $3, status = $4, join_date = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, contact, status, join_date, created_at, updated_at
            "#,
        )
        .bind(member_id)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(input.status.as_str())
        .bind(input.join_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update member: {}", e)))?;

        Ok(member)
    }

    /// Delete a member. Dependent payments are removed by cascade.
    #[instrument(skip(self), fields(member_id = %member_id))]
    pub async fn delete_member(&self, member_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete member: {}", e))
            })?;

        if result.rows_affected() > 0 {
            info!(member_id = %member_id, "Member deleted");
        }

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Bill Operations
    // -------------------------------------------------------------------------

    /// Create a new bill. The UNIQUE constraint on the period guarantees at
    /// most one bill per month, also under concurrent creation.
    #[instrument(skip(self, input), fields(period = %input.period))]
    pub async fn create_bill(&self, input: &NewBill) -> Result<Bill, AppError> {
        let bill_id = Uuid::new_v4();
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (id, period, total_cost, per_person_share, status, due_date)
            VALUES ($1, $2, $3, $4, 'open', $5)
            RETURNING id, period, total_cost, per_person_share, status, due_date, created_at, updated_at
            "#,
        )
        .bind(bill_id)
        .bind(&input.period)
        .bind(input.total_cost)
        .bind(input.per_person_share)
        .bind(input.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A bill for period '{}' already exists",
                    input.period
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create bill: {}", e)),
        })?;

        info!(
            bill_id = %bill.id,
            total_cost = %bill.total_cost,
            per_person_share = %bill.per_person_share,
            "Bill created"
        );

        Ok(bill)
    }

    /// Get a bill by ID.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn get_bill(&self, bill_id: Uuid) -> Result<Option<Bill>, AppError> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, period, total_cost, per_person_share, status, due_date, created_at, updated_at
            FROM bills
            WHERE id = $1
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get bill: {}", e)))?;

        Ok(bill)
    }

    /// Get the bill for a billing period, if one exists.
    #[instrument(skip(self), fields(period = %period))]
    pub async fn get_bill_by_period(&self, period: &str) -> Result<Option<Bill>, AppError> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, period, total_cost, per_person_share, status, due_date, created_at, updated_at
            FROM bills
            WHERE period = $1
            "#,
        )
        .bind(period)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get bill by period: {}", e))
        })?;

        Ok(bill)
    }

    /// List all bills, most recent period first.
    #[instrument(skip(self))]
    pub async fn list_bills(&self) -> Result<Vec<Bill>, AppError> {
        let bills = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, period, total_cost, per_person_share, status, due_date, created_at, updated_at
            FROM bills
            ORDER BY period DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list bills: {}", e)))?;

        Ok(bills)
    }

    /// Update a bill's cost, recomputed share, and due date.
    #[instrument(skip(self, input), fields(bill_id = %bill_id))]
    pub async fn update_bill_costs(
        &self,
        bill_id: Uuid,
        input: &BillCostUpdate,
    ) -> Result<Option<Bill>, AppError> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            UPDATE bills
            SET total_cost = $2, per_person_share = $3, due_date = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, period, total_cost, per_person_share, status, due_date, created_at, updated_at
            "#,
        )
        .bind(bill_id)
        .bind(input.total_cost)
        .bind(input.per_person_share)
        .bind(input.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update bill: {}", e)))?;

        Ok(bill)
    }

    /// Close a bill. Idempotent: closing an already-closed bill leaves it
    /// closed. There is no reopen.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn close_bill(&self, bill_id: Uuid) -> Result<Option<Bill>, AppError> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            UPDATE bills
            SET status = 'closed', updated_at = NOW()
            WHERE id = $1
            RETURNING id, period, total_cost, per_person_share, status, due_date, created_at, updated_at
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to close bill: {}", e)))?;

        if let Some(ref bill) = bill {
            info!(bill_id = %bill.id, period = %bill.period, "Bill closed");
        }

        Ok(bill)
    }

    /// Delete a bill. Dependent payments are removed by cascade.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn delete_bill(&self, bill_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(bill_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete bill: {}", e)))?;

        if result.rows_affected() > 0 {
            info!(bill_id = %bill_id, "Bill deleted");
        }

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Payment Operations
    // -------------------------------------------------------------------------

    /// Record a payment.
    #[instrument(
        skip(self, input),
        fields(member_id = %input.member_id, bill_id = %input.bill_id, amount = %input.amount)
    )]
    pub async fn create_payment(&self, input: &NewPayment) -> Result<Payment, AppError> {
        let payment_id = Uuid::new_v4();
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, member_id, bill_id, amount, period, payment_date, surplus)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, member_id, bill_id, amount, period, payment_date, surplus, created_at, updated_at
            "#,
        )
        .bind(payment_id)
        .bind(input.member_id)
        .bind(input.bill_id)
        .bind(input.amount)
        .bind(&input.period)
        .bind(input.payment_date)
        .bind(input.surplus)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::BadRequest(anyhow::anyhow!(
                    "Payment references an unknown member or bill"
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create payment: {}", e)),
        })?;

        info!(
            payment_id = %payment.id,
            surplus = %payment.surplus,
            "Payment recorded"
        );

        Ok(payment)
    }

    /// Get a payment by ID.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, member_id, bill_id, amount, period, payment_date, surplus, created_at, updated_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payment: {}", e)))?;

        Ok(payment)
    }

    /// List all payments, newest first.
    #[instrument(skip(self))]
    pub async fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, member_id, bill_id, amount, period, payment_date, surplus, created_at, updated_at
            FROM payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list payments: {}", e)))?;

        Ok(payments)
    }

    /// List all payments recorded against a bill.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn list_payments_for_bill(&self, bill_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, member_id, bill_id, amount, period, payment_date, surplus, created_at, updated_at
            FROM payments
            WHERE bill_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list bill payments: {}", e))
        })?;

        Ok(payments)
    }

    /// Update a payment. Returns None if the payment does not exist.
    #[instrument(skip(self, input), fields(payment_id = %payment_id))]
    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        input: &PaymentUpdate,
    ) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET member_id = $2, bill_id = $3, amount = $4, period = $5,
                payment_date = $6, surplus = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, member_id, bill_id, amount, period, payment_date, surplus, created_at, updated_at
            "#,
        )
        .bind(payment_id)
        .bind(input.member_id)
        .bind(input.bill_id)
        .bind(input.amount)
        .bind(&input.period)
        .bind(input.payment_date)
        .bind(input.surplus)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::BadRequest(anyhow::anyhow!(
                    "Payment references an unknown member or bill"
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update payment: {}", e)),
        })?;

        Ok(payment)
    }

    /// Delete a payment. No cascading effects beyond removal.
    #[instrument(skip(self), fields(payment_id = %payment_id))]
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(payment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete payment: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}
