use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "snippets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub short_id: String,
    pub title: Option<String>,
    /// Ciphertext (base64) when a content nonce is present, plaintext otherwise.
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub content_nonce: Option<String>,
    pub language: String,
    pub theme: Option<String>,
    pub created_at: DateTimeUtc,
    pub expires_at: Option<DateTimeUtc>,
    pub view_limit: Option<i64>,
    pub view_count: i64,
    pub owner_code_hash: Option<String>,
    pub edit_code_hash: Option<String>,
    pub delete_code_hash: Option<String>,
    pub password_hash: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
