use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Canonical transaction record as the remote API returns it.
    ///
    /// The server assigns `id`; clients never invent one.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: String,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Non-negative; serialized as a decimal string in JSON.
        pub amount: Decimal,
        pub description: String,
        /// Service type the sale was rung up against, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub service_id: Option<String>,
    }

    /// Request body for `POST /transactions`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: Decimal,
        pub description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub service_id: Option<String>,
    }

    /// Partial patch for `PUT /transactions/{id}`; absent fields are unchanged.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<DateTime<FixedOffset>>,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Decimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub service_id: Option<String>,
    }
}

pub mod service {
    use super::*;

    /// A sellable service with its preset price.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ServiceType {
        pub id: String,
        pub name: String,
        /// Serialized as a decimal string in JSON.
        pub default_price: Decimal,
    }

    /// Request body for `POST /services`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ServiceTypeNew {
        pub name: String,
        pub default_price: Decimal,
    }

    /// Partial patch for `PUT /services/{id}`; absent fields are unchanged.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ServiceTypeUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub default_price: Option<Decimal>,
    }
}

pub mod auth {
    use super::*;

    /// User record as the identity provider returns it.
    ///
    /// Only the known fields are named; everything else is carried through
    /// untouched in `extra`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: String,
        pub name: String,
        pub email: String,
        #[serde(flatten)]
        pub extra: serde_json::Map<String, serde_json::Value>,
    }

    /// Body of `GET /api/auth/get-session`. The provider answers `null` when
    /// no valid session exists, so callers decode `Option<SessionInfo>`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SessionInfo {
        pub user: User,
        /// Raw session record (token metadata, expiry); not interpreted here.
        #[serde(default)]
        pub session: serde_json::Value,
    }

    /// Request body for `POST /api/auth/sign-in/email`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SignInEmail {
        pub email: String,
        pub password: String,
    }

    /// Request body for `POST /api/auth/sign-up/email`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SignUpEmail {
        pub email: String,
        pub password: String,
        pub name: String,
    }
}
