//! Schema bootstrap
//!
//! `CREATE TABLE IF NOT EXISTS` statements run before every ingestion. No
//! migrations: the schema is append-only and a fresh database comes up in
//! one pass.

use sqlx::MySqlPool;

use crate::error::Result;

/// Book and dimension tables, in dependency-free creation order.
const BOOK_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS books (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        natural_key VARCHAR(500) NOT NULL,
        title TEXT,
        title_long TEXT,
        isbn10 TEXT NULL,
        isbn13 TEXT NULL,
        dewey_decimal TEXT,
        binding TEXT,
        publisher_id BIGINT UNSIGNED,
        language_id BIGINT UNSIGNED,
        date_published TEXT,
        edition TEXT,
        pages BIGINT,
        dimensions TEXT,
        overview TEXT,
        image TEXT,
        msrp TEXT,
        excerpt TEXT,
        synopsis TEXT,
        related_type TEXT,
        UNIQUE (natural_key)
    )",
    "CREATE TABLE IF NOT EXISTS publishers (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(500),
        UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS languages (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(500),
        UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS authors (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(500),
        UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS subjects (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(500),
        UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS author_book (
        author_id BIGINT UNSIGNED,
        book_id BIGINT UNSIGNED
    )",
    "CREATE TABLE IF NOT EXISTS book_subject (
        book_id BIGINT UNSIGNED,
        subject_id BIGINT UNSIGNED
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        text TEXT,
        book_id BIGINT UNSIGNED
    )",
    "CREATE TABLE IF NOT EXISTS other_isbns (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        isbn TEXT,
        binding TEXT,
        book_id BIGINT UNSIGNED
    )",
    "CREATE TABLE IF NOT EXISTS industry_identifiers (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        type TEXT,
        identifier TEXT,
        book_id BIGINT UNSIGNED
    )",
];

const PROGRESS_TABLES: &[&str] = &["CREATE TABLE IF NOT EXISTS completed_terms (term TEXT)"];

/// Create the catalog tables in the books database.
pub async fn create_book_tables(pool: &MySqlPool) -> Result<()> {
    for statement in BOOK_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Create the journal table in the progress database.
pub async fn create_progress_tables(pool: &MySqlPool) -> Result<()> {
    for statement in PROGRESS_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
