//! Basic types shared by the record models

use serde::{Deserialize, Serialize};

/// The two record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Task,
    Transaction,
}

impl RecordKind {
    /// Model name used in validation messages
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Task => "Task",
            RecordKind::Transaction => "Transaction",
        }
    }

    /// Collection name in the document store
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Task => "tasks",
            RecordKind::Transaction => "transactions",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in
    Income,
    /// Money out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    // Exact match only: the stored value must be one of the two literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("Income".parse::<TransactionType>().is_err());
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_transaction_type_serde() {
        assert_eq!(serde_json::to_string(&TransactionType::Expense).unwrap(), "\"expense\"");
        let parsed: TransactionType = serde_json::from_str("\"income\"").unwrap();
        assert_eq!(parsed, TransactionType::Income);
    }

    #[test]
    fn test_record_kind_names() {
        assert_eq!(RecordKind::Task.name(), "Task");
        assert_eq!(RecordKind::Transaction.collection(), "transactions");
    }
}
