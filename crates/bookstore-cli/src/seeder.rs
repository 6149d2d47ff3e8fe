//! Fake catalogue data for development databases.

use std::time::Instant;

use anyhow::{Context, bail};
use bookstore_db::PgPool;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::address::en::CountryName;
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use uuid::Uuid;

const GENRES: &[&str] = &[
    "Fiction",
    "Fantasy",
    "Science Fiction",
    "Mystery",
    "Biography",
    "History",
    "Poetry",
    "Romance",
    "Horror",
    "Philosophy",
    "Travel",
    "Children",
];

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub authors: usize,
    pub categories: usize,
    pub books: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            authors: 20,
            categories: 8,
            books: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorSeed {
    pub name: String,
    pub biography: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookSeed {
    pub title: String,
    pub publication_date: NaiveDate,
    pub price: f64,
    pub quantity: i32,
    pub author_id: Uuid,
    pub category_id: Uuid,
}

pub fn generate_authors(count: usize) -> Vec<AuthorSeed> {
    (0..count)
        .map(|_| AuthorSeed {
            name: Name().fake(),
            biography: Sentence(8..20).fake(),
            nationality: CountryName().fake(),
        })
        .collect()
}

/// Genre names, cycling with a numeric suffix once the list runs out.
pub fn generate_category_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let genre = GENRES[i % GENRES.len()];
            match i / GENRES.len() {
                0 => genre.to_string(),
                round => format!("{genre} {}", round + 1),
            }
        })
        .collect()
}

pub fn generate_books(count: usize, author_ids: &[Uuid], category_ids: &[Uuid]) -> Vec<BookSeed> {
    if author_ids.is_empty() || category_ids.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let days_ago: i64 = (0..365 * 80).fake();
            let publication_date = chrono::Utc::now().date_naive() - chrono::Duration::days(days_ago);
            let cents: i64 = (299..9999).fake();

            BookSeed {
                title: CatchPhrase().fake(),
                publication_date,
                price: cents as f64 / 100.0,
                quantity: (0..200).fake(),
                author_id: author_ids[(0..author_ids.len()).fake::<usize>()],
                category_id: category_ids[(0..category_ids.len()).fake::<usize>()],
            }
        })
        .collect()
}

async fn first_admin(db: &PgPool) -> anyhow::Result<Uuid> {
    let admin: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM users WHERE role = 'admin' ORDER BY created_at LIMIT 1",
    )
    .fetch_optional(db)
    .await?;

    match admin {
        Some(id) => Ok(id),
        None => bail!("No admin account found. Run `create-admin` first."),
    }
}

/// Seeds authors, categories and books in one transaction. Books are
/// credited to the oldest admin account.
pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let creator = first_admin(db).await?;

    let mut tx = db.begin().await?;

    println!("✍️  Seeding {} authors...", config.authors);
    let mut author_ids = Vec::with_capacity(config.authors);
    for author in generate_authors(config.authors) {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO authors (name, biography, nationality) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&author.name)
        .bind(&author.biography)
        .bind(&author.nationality)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert author")?;
        author_ids.push(id);
    }

    println!("🏷️  Seeding {} categories...", config.categories);
    let mut category_ids = Vec::with_capacity(config.categories);
    for name in generate_category_names(config.categories) {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO categories (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(&name)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert category")?;
        category_ids.push(id);
    }

    println!("📚 Seeding {} books...", config.books);
    for book in generate_books(config.books, &author_ids, &category_ids) {
        sqlx::query(
            "INSERT INTO books (title, publication_date, price, quantity, user_id, author_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&book.title)
        .bind(book.publication_date)
        .bind(book.price)
        .bind(book.quantity)
        .bind(creator)
        .bind(book.author_id)
        .bind(book.category_id)
        .execute(&mut *tx)
        .await
        .context("Failed to insert book")?;
    }

    tx.commit().await?;
    println!("   ✓ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Removes every book, author and category. Users are kept.
pub async fn clear_catalogue(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query("TRUNCATE book_covers, books, authors, categories")
        .execute(db)
        .await
        .context("Failed to clear catalogue")?;
    Ok(())
}
