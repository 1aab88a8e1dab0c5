//! Account endpoints.

use crate::error::CoinbaseError;
use crate::increment::to_increment;
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::{ACCOUNTS, ACCOUNTS_LIMIT};
use crate::rest::request::RequestDescriptor;
use crate::rest::types::{Account, AccountsResponse, CurrencyBalance};

impl CoinbaseRestClient {
    /// List brokerage accounts (up to 250).
    pub async fn get_accounts(&self) -> Result<Vec<Account>, CoinbaseError> {
        let request = RequestDescriptor::get(ACCOUNTS).with_params(&[("limit", ACCOUNTS_LIMIT)])?;
        let response: AccountsResponse = self.execute(&request).await?;
        Ok(response.accounts)
    }

    /// Balance of the account holding `currency`.
    ///
    /// `total` is `available + hold` floored to `increment` (e.g. `"0.01"`
    /// for USD).
    pub async fn get_currency_account(
        &self,
        currency: &str,
        increment: &str,
    ) -> Result<CurrencyBalance, CoinbaseError> {
        let accounts = self.get_accounts().await?;
        currency_balance(&accounts, currency, increment)
    }
}

/// Summarize the account for `currency` out of `accounts`.
pub fn currency_balance(
    accounts: &[Account],
    currency: &str,
    increment: &str,
) -> Result<CurrencyBalance, CoinbaseError> {
    let account = accounts
        .iter()
        .find(|account| account.currency == currency)
        .ok_or_else(|| CoinbaseError::NotFound(format!("Could not find {currency} account")))?;

    let available = account.available_balance.value.clone();
    let hold = account.hold.value.clone();
    let total = to_increment(increment, available.to_f64()? + hold.to_f64()?)?;

    Ok(CurrencyBalance {
        available,
        hold,
        total,
    })
}
