use crate::error::{PennyError, Result};

/// Closed set of account kinds. Anything else is rejected at the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Cash,
    Bank,
    CreditCard,
    Wallet,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "cash",
            AccountType::Bank => "bank",
            AccountType::CreditCard => "credit_card",
            AccountType::Wallet => "wallet",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "cash" => Ok(AccountType::Cash),
            "bank" => Ok(AccountType::Bank),
            "credit_card" => Ok(AccountType::CreditCard),
            "wallet" => Ok(AccountType::Wallet),
            other => Err(PennyError::Validation(format!(
                "unknown account type '{other}' (expected cash, bank, credit_card, wallet)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(PennyError::Validation(format!(
                "unknown category type '{other}' (expected income, expense)"
            ))),
        }
    }
}

/// Transaction kind. Transfer legs are only ever written by
/// `ledger::post_transfer`; direct posts must be income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnType {
    Income,
    Expense,
    Transfer,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Income => "income",
            TxnType::Expense => "expense",
            TxnType::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TxnType::Income),
            "expense" => Ok(TxnType::Expense),
            "transfer" => Ok(TxnType::Transfer),
            other => Err(PennyError::Validation(format!(
                "unknown transaction type '{other}' (expected income, expense, transfer)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(PennyError::Validation(format!(
                "unknown frequency '{other}' (expected weekly, monthly, yearly)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            other => Err(PennyError::Validation(format!(
                "unknown budget period '{other}' (expected weekly, monthly)"
            ))),
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
    pub active: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub emoji: Option<String>,
    pub category_type: String,
}

/// A posted ledger row. Amounts are stored positive; the effective sign
/// comes from `txn_type` and, for transfer legs, the side of the link row.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub amount: f64,
    pub txn_type: String,
    pub date: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Bill {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub due_date: String,
    pub repeat_freq: String,
    pub account_id: i64,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub frequency: String,
    pub next_due_date: String,
    pub last_posted_date: Option<String>,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub active: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Goal {
    pub id: i64,
    pub category_id: i64,
    pub target_amount: f64,
    pub deadline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_roundtrip() {
        for s in ["cash", "bank", "credit_card", "wallet"] {
            assert_eq!(AccountType::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_unknown_account_type_rejected() {
        let err = AccountType::parse("brokerage").unwrap_err();
        assert!(matches!(err, PennyError::Validation(_)));
    }

    #[test]
    fn test_txn_type_parse() {
        assert_eq!(TxnType::parse("transfer").unwrap(), TxnType::Transfer);
        assert!(TxnType::parse("refund").is_err());
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!(Frequency::parse("monthly").unwrap(), Frequency::Monthly);
        assert!(Frequency::parse("daily").is_err());
    }

    #[test]
    fn test_budget_period_excludes_yearly() {
        assert!(BudgetPeriod::parse("yearly").is_err());
    }
}
