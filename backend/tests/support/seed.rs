//! Seed rows the application never writes itself.
//!
//! Accounts are provisioned by the authentication layer, so suites insert
//! them directly with `postgres`. Reference data goes through the CSV
//! import so it follows the same path as production loads.

use postgres::{Client, NoTls};
use recipe_backend::domain::UserId;

use super::format_postgres_error;

pub const INGREDIENTS_CSV: &str = "\
flour,g
milk,ml
eggs,pcs
sugar,g
";

pub const TAGS_CSV: &str = "\
Breakfast,breakfast
Dinner,dinner
Dessert,dessert
";

/// Insert a user with `username` and return its id.
pub fn insert_user(url: &str, username: &str) -> UserId {
    let id = UserId::random();
    let mut client = Client::connect(url, NoTls)
        .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
    client
        .execute(
            "INSERT INTO users (id, username) VALUES ($1, $2)",
            &[id.as_uuid(), &username],
        )
        .unwrap_or_else(|err| panic!("insert user: {}", format_postgres_error(&err)));
    id
}

/// Count rows of `table` matching `user_id`.
pub fn count_rows_for_user(url: &str, table: &str, column: &str, user_id: &UserId) -> i64 {
    let mut client = Client::connect(url, NoTls)
        .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)));
    let sql = format!("SELECT count(*) FROM {table} WHERE {column} = $1");
    let row = client
        .query_one(sql.as_str(), &[user_id.as_uuid()])
        .unwrap_or_else(|err| panic!("count rows: {}", format_postgres_error(&err)));
    row.get(0)
}
