//! Data migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Copy product/modifier-group links between databases
//! pos-cli migrate product-modifier-groups \
//!     --source-url postgres://... --dest-url postgres://...
//! ```
//!
//! # Environment Variables
//!
//! - `SOURCE_DATABASE_URL` - database the links are read from
//! - `DEST_DATABASE_URL` - database the links are written to
//!
//! Flags take precedence over the environment.
//!
//! Rows are copied one at a time and keyed on `("productId",
//! "modifierGroupId")`, so re-running after a failure only re-attempts rows
//! that are already there, harmlessly. The first failing row stops the run.

use kebab_pos_core::ProductModifierGroup;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub const SOURCE_ENV: &str = "SOURCE_DATABASE_URL";
pub const DEST_ENV: &str = "DEST_DATABASE_URL";

const SELECT_LINKS: &str = r#"
    SELECT "productId", "modifierGroupId" FROM "ProductModifierGroup"
    ORDER BY "productId", "modifierGroupId"
"#;

const INSERT_LINK: &str = r#"
    INSERT INTO "ProductModifierGroup" ("productId", "modifierGroupId")
    VALUES ($1, $2)
    ON CONFLICT ("productId", "modifierGroupId") DO NOTHING
"#;

/// Errors that can occur during a migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Neither the flag nor the environment variable was given.
    #[error("Missing database URL: pass {flag} or set {env}")]
    MissingUrl {
        flag: &'static str,
        env: &'static str,
    },

    /// Connecting or reading failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row could not be written; the run stopped there.
    #[error(
        "Failed to link product {product_id} to modifier group {modifier_group_id}: {source}"
    )]
    Row {
        product_id: String,
        modifier_group_id: String,
        #[source]
        source: sqlx::Error,
    },
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Links read from the source.
    pub found: usize,
    /// Links that were not already in the destination.
    pub inserted: u64,
}

/// Pick the flag value if given, else the environment value.
///
/// # Errors
///
/// Returns [`MigrationError::MissingUrl`] if neither is set.
pub fn resolve_url(
    flag_value: Option<String>,
    env_value: Option<String>,
    flag: &'static str,
    env: &'static str,
) -> Result<SecretString, MigrationError> {
    flag_value
        .or(env_value)
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
        .ok_or(MigrationError::MissingUrl { flag, env })
}

/// Connect to both databases and copy every product/modifier-group link.
///
/// # Errors
///
/// Returns error if a URL is missing, a connection fails, or a row cannot
/// be written.
pub async fn product_modifier_groups(
    source_url: Option<String>,
    dest_url: Option<String>,
) -> Result<MigrationReport, MigrationError> {
    dotenvy::dotenv().ok();

    let source_url = resolve_url(
        source_url,
        std::env::var(SOURCE_ENV).ok(),
        "--source-url",
        SOURCE_ENV,
    )?;
    let dest_url = resolve_url(
        dest_url,
        std::env::var(DEST_ENV).ok(),
        "--dest-url",
        DEST_ENV,
    )?;

    tracing::info!("Connecting to source database...");
    let source = connect(&source_url).await?;
    tracing::info!("Connecting to destination database...");
    let dest = connect(&dest_url).await?;

    let result = copy_links(&source, &dest).await;

    source.close().await;
    dest.close().await;
    result
}

async fn connect(url: &SecretString) -> Result<PgPool, MigrationError> {
    Ok(PgPoolOptions::new()
        .max_connections(1)
        .connect(url.expose_secret())
        .await?)
}

/// Copy every link from `source` into `dest`, sequentially, in key order.
///
/// # Errors
///
/// Returns error if the source cannot be read or a row cannot be written.
pub async fn copy_links(source: &PgPool, dest: &PgPool) -> Result<MigrationReport, MigrationError> {
    tracing::info!("Migrating ProductModifierGroup relationships...");

    let links: Vec<ProductModifierGroup> = sqlx::query_as(SELECT_LINKS).fetch_all(source).await?;
    tracing::info!(count = links.len(), "Found product-modifierGroup relationships");

    if links.is_empty() {
        tracing::info!("No relationships to migrate");
        return Ok(MigrationReport {
            found: 0,
            inserted: 0,
        });
    }

    let mut inserted = 0;
    for link in &links {
        let result = sqlx::query(INSERT_LINK)
            .bind(&link.product_id)
            .bind(&link.modifier_group_id)
            .execute(dest)
            .await
            .map_err(|source| {
                tracing::error!(
                    relation = "ProductModifierGroup",
                    product_id = %link.product_id,
                    modifier_group_id = %link.modifier_group_id,
                    error = %source,
                    "Migration failed"
                );
                MigrationError::Row {
                    product_id: link.product_id.to_string(),
                    modifier_group_id: link.modifier_group_id.to_string(),
                    source,
                }
            })?;

        inserted += result.rows_affected();
        tracing::info!(
            product_id = %link.product_id,
            modifier_group_id = %link.modifier_group_id,
            "Linked product to modifier group"
        );
    }

    tracing::info!(
        found = links.len(),
        inserted,
        "ProductModifierGroup relationships migrated successfully"
    );
    Ok(MigrationReport {
        found: links.len(),
        inserted,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_env() {
        let url = resolve_url(
            Some("postgres://flag".to_string()),
            Some("postgres://env".to_string()),
            "--source-url",
            SOURCE_ENV,
        )
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://flag");
    }

    #[test]
    fn test_env_fallback() {
        let url = resolve_url(None, Some("postgres://env".to_string()), "--dest-url", DEST_ENV)
            .unwrap();
        assert_eq!(url.expose_secret(), "postgres://env");
    }

    #[test]
    fn test_missing_url() {
        let err = resolve_url(None, Some(String::new()), "--dest-url", DEST_ENV).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing database URL: pass --dest-url or set DEST_DATABASE_URL"
        );
    }
}
