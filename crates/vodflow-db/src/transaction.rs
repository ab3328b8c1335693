//! Database transaction utilities

use sqlx::{PgPool, Postgres, Transaction};
use std::ops::{Deref, DerefMut};

/// A transaction wrapper that rolls back unless explicitly committed.
///
/// sqlx transactions already roll back on drop; this wrapper adds a warning
/// log when that happens outside an error path, which usually means a missing
/// `commit` call.
pub struct TransactionGuard<'a> {
    transaction: Option<Transaction<'a, Postgres>>,
}

impl<'a> TransactionGuard<'a> {
    pub async fn begin(pool: &'a PgPool) -> Result<Self, sqlx::Error> {
        let transaction = pool.begin().await?;
        Ok(Self {
            transaction: Some(transaction),
        })
    }

    /// Commit the transaction. Consumes the guard.
    pub async fn commit(mut self) -> Result<(), sqlx::Error> {
        if let Some(tx) = self.transaction.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Roll back the transaction. Consumes the guard.
    pub async fn rollback(mut self) -> Result<(), sqlx::Error> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

impl<'a> Deref for TransactionGuard<'a> {
    type Target = Transaction<'a, Postgres>;

    fn deref(&self) -> &Self::Target {
        self.transaction
            .as_ref()
            .expect("Transaction was already committed or rolled back")
    }
}

impl<'a> DerefMut for TransactionGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.transaction
            .as_mut()
            .expect("Transaction was already committed or rolled back")
    }
}

impl<'a> Drop for TransactionGuard<'a> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::debug!("Transaction dropped without explicit commit - rolling back");
        }
    }
}
