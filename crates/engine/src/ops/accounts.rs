use sea_orm::{TransactionTrait, prelude::*, sea_query::OnConflict};

use crate::{
    Account, EngineError, ResultEngine, accounts,
    util::{normalize_optional_text, normalize_required_id},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates the account or refreshes its profile fields.
    ///
    /// Called whenever the identity provider hands over a fresh profile for a
    /// principal.
    pub async fn upsert_account(&self, account: Account) -> ResultEngine<()> {
        let account = Account {
            id: normalize_required_id(&account.id, "account")?,
            email: account.email.trim().to_string(),
            name: account.name.trim().to_string(),
            picture: normalize_optional_text(account.picture.as_deref()),
        };

        with_tx!(self, |db_tx| {
            accounts::Entity::insert(accounts::ActiveModel::from(&account))
                .on_conflict(
                    OnConflict::column(accounts::Column::Id)
                        .update_columns([
                            accounts::Column::Email,
                            accounts::Column::Name,
                            accounts::Column::Picture,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            tracing::debug!(account_id = %account.id, "account upserted");
            Ok::<_, EngineError>(())
        })
    }

    /// Returns the profile stored for `account_id`.
    pub async fn account(&self, account_id: &str) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            accounts::Entity::find_by_id(account_id.to_string())
                .one(&db_tx)
                .await?
                .map(Account::from)
                .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))
        })
    }
}
