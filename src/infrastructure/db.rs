use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    // Every in-memory connection is its own database; keep the pool at one
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    db.execute(Statement::from_string(
        backend,
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    // Create users table
    db.execute(Statement::from_string(
        backend,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            city TEXT,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create books table
    db.execute(Statement::from_string(
        backend,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            isbn TEXT NOT NULL UNIQUE,
            cover_url TEXT,
            created_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create copies table
    db.execute(Statement::from_string(
        backend,
        r#"
        CREATE TABLE IF NOT EXISTS copies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            owner_id INTEGER NOT NULL,
            condition TEXT NOT NULL DEFAULT 'OK'
                CHECK (condition IN ('OK', 'USED', 'WORN')),
            status TEXT NOT NULL DEFAULT 'AVAILABLE'
                CHECK (status IN ('AVAILABLE', 'REQUESTED', 'RESERVED', 'BORROWED')),
            location TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id),
            FOREIGN KEY (owner_id) REFERENCES users(id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create requests table
    db.execute(Statement::from_string(
        backend,
        r#"
        CREATE TABLE IF NOT EXISTS requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            copy_id INTEGER NOT NULL,
            requester_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'ACCEPTED', 'DELIVERED', 'COMPLETED', 'RESERVED')),
            message TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (copy_id) REFERENCES copies(id) ON DELETE CASCADE,
            FOREIGN KEY (requester_id) REFERENCES users(id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create messages table
    db.execute(Statement::from_string(
        backend,
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            request_id INTEGER NOT NULL,
            sender_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (request_id) REFERENCES requests(id) ON DELETE CASCADE,
            FOREIGN KEY (sender_id) REFERENCES users(id)
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Indexes for the lifecycle lookups
    for index in [
        "CREATE INDEX IF NOT EXISTS idx_copies_status ON copies(status)",
        "CREATE INDEX IF NOT EXISTS idx_copies_owner ON copies(owner_id)",
        "CREATE INDEX IF NOT EXISTS idx_requests_copy ON requests(copy_id)",
        "CREATE INDEX IF NOT EXISTS idx_requests_requester ON requests(requester_id)",
        "CREATE INDEX IF NOT EXISTS idx_messages_request ON messages(request_id, created_at)",
    ] {
        db.execute(Statement::from_string(backend, index.to_owned()))
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        run_migrations(&db).await.expect("Second run should succeed");
    }

    #[tokio::test]
    async fn test_status_column_rejects_unknown_values() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let backend = db.get_database_backend();

        db.execute(Statement::from_string(
            backend,
            "INSERT INTO users (name, email, created_at) VALUES ('a', 'a@x', 'now')".to_owned(),
        ))
        .await
        .unwrap();
        db.execute(Statement::from_string(
            backend,
            "INSERT INTO books (title, author, isbn, created_at) VALUES ('t', 'a', '1', 'now')"
                .to_owned(),
        ))
        .await
        .unwrap();

        let result = db
            .execute(Statement::from_string(
                backend,
                "INSERT INTO copies (book_id, owner_id, status, location, created_at) \
                 VALUES (1, 1, 'LOST', 'Almada', 'now')"
                    .to_owned(),
            ))
            .await;
        assert!(result.is_err());
    }
}
