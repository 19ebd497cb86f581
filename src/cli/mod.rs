pub mod accounts;
pub mod bills;
pub mod budget;
pub mod categories;
pub mod goals;
pub mod init;
pub mod post;
pub mod reconcile;
pub mod remind;
pub mod report;
pub mod subs;
pub mod tag;
pub mod transfer;

use clap::{Parser, Subcommand};

pub(crate) fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[derive(Parser)]
#[command(name = "penny", about = "Personal finance ledger: accounts, transfers, recurring bills, reminders.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Penny: choose a data directory and initialize the database.
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Post an income or expense transaction.
    Post {
        /// Account name
        #[arg(long)]
        account: String,
        /// Category name
        #[arg(long)]
        category: Option<String>,
        /// Amount (always positive; sign comes from --type)
        #[arg(long)]
        amount: f64,
        /// Transaction type: income or expense
        #[arg(long = "type", default_value = "expense")]
        txn_type: String,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Short description
        #[arg(long)]
        description: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move money between two accounts.
    Transfer {
        /// Source account name
        #[arg(long)]
        from: String,
        /// Destination account name
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: f64,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Manage recurring bills.
    Bills {
        #[command(subcommand)]
        command: BillsCommands,
    },
    /// Manage subscriptions.
    Subs {
        #[command(subcommand)]
        command: SubsCommands,
    },
    /// Log a reminder for a bill; prints whether it was new or a duplicate.
    Remind {
        /// Bill ID (shown in `penny bills list`)
        bill_id: i64,
        /// Reminder date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Message that was (or would be) dispatched
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Set a spending cap for a category.
    Budget {
        /// Category name
        #[arg(long)]
        category: String,
        #[arg(long)]
        amount: f64,
        /// Period: weekly or monthly
        #[arg(long, default_value = "monthly")]
        period: String,
    },
    /// Manage saving goals.
    Goals {
        #[command(subcommand)]
        command: GoalsCommands,
    },
    /// Manage transaction tags.
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Recompute an account's balance from its history and repair the cache.
    Reconcile {
        /// Account name
        account: String,
    },
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account name, e.g. 'Checking'
        name: String,
        /// Account type: cash, bank, credit_card, wallet
        #[arg(long = "type")]
        account_type: String,
        /// Opening balance (posted as a transaction)
        #[arg(long, default_value = "0")]
        balance: f64,
    },
    /// List all accounts with cached balances.
    List,
    /// Deactivate an account; its history is kept.
    Deactivate {
        /// Account name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category.
    Add {
        name: String,
        /// Category type: income or expense
        #[arg(long = "type")]
        category_type: String,
        #[arg(long)]
        emoji: Option<String>,
    },
    /// List all categories.
    List,
}

#[derive(Subcommand)]
pub enum BillsCommands {
    /// Add a recurring bill.
    Add {
        name: String,
        #[arg(long)]
        amount: f64,
        /// First due date: YYYY-MM-DD
        #[arg(long)]
        due: String,
        /// Repeat frequency: weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        freq: String,
        /// Account the bill is paid from
        #[arg(long)]
        account: String,
    },
    /// List all bills.
    List,
    /// Pay a bill's current cycle and advance its due date.
    Pay {
        /// Bill ID (shown in `penny bills list`)
        id: i64,
        /// Payment date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show bills due soon.
    Due {
        /// Look-ahead window in days
        #[arg(long, default_value = "7")]
        days: u64,
    },
}

#[derive(Subcommand)]
pub enum SubsCommands {
    /// Add a subscription.
    Add {
        name: String,
        /// Frequency: weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        freq: String,
        /// Next renewal date: YYYY-MM-DD
        #[arg(long = "next-due")]
        next_due: String,
        /// Account the charge lands on
        #[arg(long)]
        account: String,
        /// Expense category for the charges
        #[arg(long)]
        category: Option<String>,
    },
    /// List all subscriptions.
    List,
    /// Post a renewal charge and roll the schedule forward.
    Advance {
        /// Subscription ID (shown in `penny subs list`)
        id: i64,
        /// Amount actually charged this cycle
        #[arg(long)]
        amount: f64,
        /// Charge date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Cancel a subscription (keeps its history).
    Cancel {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Transaction register, newest first.
    Register {
        /// Filter by account name
        #[arg(long)]
        account: Option<String>,
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: Option<String>,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// Spending by category.
    Spending {
        #[arg(long = "from")]
        from_date: Option<String>,
        #[arg(long = "to")]
        to_date: Option<String>,
    },
    /// All account balances, cached vs derived.
    Balances,
    /// Budget caps vs actual spend for the current period.
    Budgets {
        /// Reference date: YYYY-MM-DD (default: today)
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum GoalsCommands {
    /// Add a saving goal for a category.
    Add {
        /// Category name
        #[arg(long)]
        category: String,
        /// Target amount
        #[arg(long)]
        amount: f64,
        /// Optional deadline: YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List all goals.
    List,
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// Create a tag (no-op if it exists).
    Add {
        name: String,
    },
    /// Apply a tag to a transaction by ID.
    Apply {
        /// Transaction ID (shown in `penny report register`)
        transaction_id: i64,
        /// Tag name (created if missing)
        tag: String,
    },
}
