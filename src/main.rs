mod cli;
mod db;
mod error;
mod fmt;
mod ledger;
mod models;
mod reports;
mod schedule;
mod settings;

use clap::Parser;

use cli::{
    AccountsCommands, BillsCommands, CategoriesCommands, Cli, Commands, GoalsCommands,
    ReportCommands, SubsCommands, TagCommands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add {
                name,
                account_type,
                balance,
            } => cli::accounts::add(&name, &account_type, balance),
            AccountsCommands::List => cli::accounts::list(),
            AccountsCommands::Deactivate { name } => cli::accounts::deactivate(&name),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add {
                name,
                category_type,
                emoji,
            } => cli::categories::add(&name, &category_type, emoji.as_deref()),
            CategoriesCommands::List => cli::categories::list(),
        },
        Commands::Post {
            account,
            category,
            amount,
            txn_type,
            date,
            description,
            notes,
        } => cli::post::run(
            &account,
            category.as_deref(),
            amount,
            &txn_type,
            date,
            description.as_deref(),
            notes.as_deref(),
        ),
        Commands::Transfer {
            from,
            to,
            amount,
            date,
            description,
        } => cli::transfer::run(&from, &to, amount, date, description.as_deref()),
        Commands::Bills { command } => match command {
            BillsCommands::Add {
                name,
                amount,
                due,
                freq,
                account,
            } => cli::bills::add(&name, amount, &due, &freq, &account),
            BillsCommands::List => cli::bills::list(),
            BillsCommands::Pay { id, date } => cli::bills::pay(id, date),
            BillsCommands::Due { days } => cli::bills::due(days),
        },
        Commands::Subs { command } => match command {
            SubsCommands::Add {
                name,
                freq,
                next_due,
                account,
                category,
            } => cli::subs::add(&name, &freq, &next_due, &account, category.as_deref()),
            SubsCommands::List => cli::subs::list(),
            SubsCommands::Advance { id, amount, date } => cli::subs::advance(id, amount, date),
            SubsCommands::Cancel { id } => cli::subs::cancel(id),
        },
        Commands::Remind {
            bill_id,
            date,
            message,
        } => cli::remind::run(bill_id, date, &message),
        Commands::Report { command } => match command {
            ReportCommands::Register {
                account,
                from_date,
                to_date,
            } => cli::report::register(account, from_date, to_date),
            ReportCommands::Spending { from_date, to_date } => {
                cli::report::spending(from_date, to_date)
            }
            ReportCommands::Balances => cli::report::balances(),
            ReportCommands::Budgets { as_of } => cli::report::budgets(as_of),
        },
        Commands::Budget {
            category,
            amount,
            period,
        } => cli::budget::set(&category, amount, &period),
        Commands::Goals { command } => match command {
            GoalsCommands::Add {
                category,
                amount,
                deadline,
            } => cli::goals::add(&category, amount, deadline.as_deref()),
            GoalsCommands::List => cli::goals::list(),
        },
        Commands::Tag { command } => match command {
            TagCommands::Add { name } => cli::tag::add(&name),
            TagCommands::Apply {
                transaction_id,
                tag,
            } => cli::tag::apply(transaction_id, &tag),
        },
        Commands::Reconcile { account } => cli::reconcile::run(&account),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
