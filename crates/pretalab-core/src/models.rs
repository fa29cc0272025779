//! Record models and their schemas

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ValidationErrors;
use crate::id::RecordId;
use crate::schema::{self, messages, Body};
use crate::types::{RecordKind, TransactionType};

/// Current time at the millisecond precision timestamps are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render a timestamp as `2024-07-01T12:00:00.000Z`
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// A schema-validated document with a store-generated identity
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> RecordId;

    fn created_at(&self) -> DateTime<Utc>;

    /// Validate `body` and build a record with the given identity and timestamps
    fn build(
        id: RecordId,
        body: &Body,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors>;

    /// The client-settable fields, as a body
    fn fields(&self) -> Body;

    /// A new record from a create request
    fn from_body(body: &Body, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        Self::build(RecordId::generate(), body, now, now)
    }

    /// Merge the supplied fields over this record, then re-validate the result.
    /// Identity and creation time never change.
    fn merged(&self, patch: &Body, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let mut fields = self.fields();
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        Self::build(self.id(), &fields, self.created_at(), now)
    }
}

fn into_body(value: Value) -> Body {
    match value {
        Value::Object(map) => map,
        _ => Body::new(),
    }
}

// ==================== Task ====================

/// A to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub title: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Record for Task {
    const KIND: RecordKind = RecordKind::Task;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(
        id: RecordId,
        body: &Body,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let title = schema::required_string(body, "title", messages::TASK_TITLE_REQUIRED);
        let completed = schema::optional_bool(body, "completed", messages::TASK_COMPLETED_INVALID)
            .map(|value| value.unwrap_or(false));

        match (title, completed) {
            (Ok(title), Ok(completed)) => Ok(Task {
                id,
                title,
                completed,
                created_at,
                updated_at,
            }),
            (title, completed) => Err(ValidationErrors::from_failures([
                title.err(),
                completed.err(),
            ])),
        }
    }

    fn fields(&self) -> Body {
        into_body(json!({
            "title": self.title,
            "completed": self.completed,
        }))
    }
}

// ==================== Transaction ====================

/// A financial transaction: positive amounts are inflows, negative outflows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub description: String,
    pub amount: f64,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Record for Transaction {
    const KIND: RecordKind = RecordKind::Transaction;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(
        id: RecordId,
        body: &Body,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        let description = schema::required_string(
            body,
            "description",
            messages::TRANSACTION_DESCRIPTION_REQUIRED,
        );
        let amount = schema::required_number(
            body,
            "amount",
            messages::TRANSACTION_AMOUNT_REQUIRED,
            messages::TRANSACTION_AMOUNT_INVALID,
        );
        let date = schema::required_date(
            body,
            "date",
            messages::TRANSACTION_DATE_REQUIRED,
            messages::TRANSACTION_DATE_INVALID,
        );
        let kind = schema::required_enum(
            body,
            "type",
            messages::TRANSACTION_TYPE_REQUIRED,
            messages::transaction_type_invalid,
        );
        let category = schema::required_string(
            body,
            "category",
            messages::TRANSACTION_CATEGORY_REQUIRED,
        );

        match (description, amount, date, kind, category) {
            (Ok(description), Ok(amount), Ok(date), Ok(kind), Ok(category)) => Ok(Transaction {
                id,
                description,
                amount,
                date,
                kind,
                category,
                created_at,
                updated_at,
            }),
            (description, amount, date, kind, category) => {
                Err(ValidationErrors::from_failures([
                    description.err(),
                    amount.err(),
                    date.err(),
                    kind.err(),
                    category.err(),
                ]))
            }
        }
    }

    fn fields(&self) -> Body {
        into_body(json!({
            "description": self.description,
            "amount": self.amount,
            "date": format_timestamp(&self.date),
            "type": self.kind.as_str(),
            "category": self.category,
        }))
    }
}
