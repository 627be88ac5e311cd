use sqlx::{Postgres, Transaction};

use crate::database::get_pool;
use crate::error::AppError;

#[derive(Debug)]
pub struct DatabaseTransaction;

impl DatabaseTransaction {
    /// Run a closure inside a single transaction; commit on Ok, roll back on
    /// Err. Every remittance run goes through here so a failure leaves no
    /// partially settled units behind.
    pub async fn run<T, F>(f: F) -> Result<T, AppError>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'_, Postgres>,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<T, AppError>> + Send + 'a>,
        >,
        T: Send,
    {
        let pool = get_pool();
        let mut tx = pool.begin().await.map_err(AppError::from)?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}
