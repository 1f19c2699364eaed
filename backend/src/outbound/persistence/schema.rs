//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Users provisioned by the authentication layer.
    users (id) {
        id -> Uuid,
        /// Public name shown next to recipes; unique.
        username -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient reference data.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Tag reference data. Both `name` and `slug` are unique.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    /// Recipes.
    recipes (id) {
        id -> Uuid,
        author_id -> Uuid,
        name -> Varchar,
        text -> Text,
        image -> Text,
        /// Minutes, constrained to 1..=1440.
        cooking_time -> Int4,
        /// Unique short-link token, assigned on first request.
        short_link -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe to tag links.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Uuid,
        tag_id -> Int8,
    }
}

diesel::table! {
    /// Recipe ingredient lines. The unit is copied from the ingredient when
    /// the line is written.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Int8,
        measurement_unit -> Varchar,
        /// Constrained to 1..=1000.
        amount -> Int4,
    }
}

diesel::table! {
    /// Favorite recipes per user.
    favorites (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shopping cart recipes per user.
    cart_entries (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follower to author subscriptions; a check constraint forbids
    /// self-subscription.
    subscriptions (follower_id, author_id) {
        follower_id -> Uuid,
        author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(cart_entries -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    ingredients,
    tags,
    recipes,
    recipe_tags,
    recipe_ingredients,
    favorites,
    cart_entries,
    subscriptions,
);
