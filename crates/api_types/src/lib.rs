//! Request and response bodies of the HTTP API.
//!
//! Amounts travel as decimal strings with at most two fractional digits
//! (`"12.34"`).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub email: String,
        pub name: String,
        pub picture: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: String,
        pub email: String,
        pub name: String,
        pub picture: Option<String>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantNew {
        pub id: String,
        pub fractional_share: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        /// Defaults to the caller.
        pub payer: Option<String>,
        pub amount: String,
        pub timestamp: DateTime<FixedOffset>,
        pub split_type: String,
        pub participants: Vec<ParticipantNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub payer: String,
        pub timestamp: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantView {
        pub id: String,
        pub dollar_share: String,
        pub fractional_share: Option<i32>,
        pub name: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub amount: String,
        pub timestamp: DateTime<FixedOffset>,
        pub payer: String,
        pub split_type: String,
        pub participants: Vec<ParticipantView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}
