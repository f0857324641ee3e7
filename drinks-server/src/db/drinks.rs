use super::{RepoError, RepoResult};
use crate::models::{Drink, NewDrink, RecipePart};
use log::info;
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: Json<Vec<RecipePart>>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

/// Maps a unique-constraint violation on `title` to `RepoError::Duplicate`
fn map_unique(err: sqlx::Error, title: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Duplicate(title.to_string())
        }
        _ => RepoError::Database(err),
    }
}

/// All drinks ordered by id
pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Drink>> {
    let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Drink::from).collect())
}

pub async fn find(pool: &SqlitePool, id: i64) -> RepoResult<Option<Drink>> {
    let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Drink::from))
}

/// Insert a drink and return it with its assigned id
pub async fn insert(pool: &SqlitePool, drink: &NewDrink) -> RepoResult<Drink> {
    let row = sqlx::query_as::<_, DrinkRow>(
        "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
    )
    .bind(&drink.title)
    .bind(Json(&drink.recipe))
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique(e, &drink.title))?;
    Ok(row.into())
}

/// Overwrite title and recipe of an existing drink.
///
/// Returns `None` when no drink has the given id.
pub async fn update(pool: &SqlitePool, drink: &Drink) -> RepoResult<Option<Drink>> {
    let row = sqlx::query_as::<_, DrinkRow>(
        "UPDATE drinks SET title = ?, recipe = ? WHERE id = ? RETURNING id, title, recipe",
    )
    .bind(&drink.title)
    .bind(Json(&drink.recipe))
    .bind(drink.id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_unique(e, &drink.title))?;
    Ok(row.map(Drink::from))
}

/// Returns whether a drink was deleted
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Drop every drink, restart the id sequence and seed a single "water" drink
pub async fn reset_with_seed(pool: &SqlitePool) -> RepoResult<Drink> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM drinks").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'drinks'")
        .execute(&mut *tx)
        .await?;

    let recipe = vec![RecipePart {
        color: "blue".to_string(),
        name: "water".to_string(),
        parts: 1,
    }];
    let row = sqlx::query_as::<_, DrinkRow>(
        "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
    )
    .bind("water")
    .bind(Json(&recipe))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Drinks table reset and seeded");
    Ok(row.into())
}
