use crate::models::{BookCondition, CopyStatus, book, copy, user};
use sea_orm::*;

/// Insert two neighbours and a few lendable copies. Safe to run twice.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = crate::utils::now_rfc3339();

    // 1. Create Users
    let users = [
        ("Rogerio Svaldo", "rogeriosvaldo@test.com", "Almada"),
        ("Carmina Silva", "carmina@test.com", "Almada"),
    ];

    for (name, email, city) in users {
        let u = user::ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            city: Set(Some(city.to_owned())),
            created_at: Set(now.clone()),
            ..Default::default()
        };
        user::Entity::insert(u)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(user::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    let Some(owner) = user::Entity::find()
        .filter(user::Column::Email.eq("rogeriosvaldo@test.com"))
        .one(db)
        .await?
    else {
        return Ok(());
    };

    // 2. Create Books, each with one copy owned by the first user
    let books = [
        ("The Lost World", "Arthur Conan Doyle", "9780123456789", BookCondition::Used),
        ("Sphere", "Michael Crichton", "9780060541453", BookCondition::Ok),
        ("Dune", "Frank Herbert", "9780441013593", BookCondition::Worn),
    ];

    for (title, author, isbn, condition) in books {
        if book::Entity::find()
            .filter(book::Column::Isbn.eq(isbn))
            .one(db)
            .await?
            .is_some()
        {
            continue;
        }

        let saved = book::ActiveModel {
            title: Set(title.to_owned()),
            author: Set(author.to_owned()),
            isbn: Set(isbn.to_owned()),
            cover_url: Set(None),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        copy::ActiveModel {
            book_id: Set(saved.id),
            owner_id: Set(owner.id),
            condition: Set(condition),
            status: Set(CopyStatus::Available),
            location: Set("Almada".to_owned()),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
