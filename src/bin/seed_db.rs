use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{Category, NewExpense, create_expense, initialize_db};

/// A utility for creating a database of sample expenses for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to create, ending today.
    #[arg(long, short, default_value_t = 30)]
    days: i64,
}

/// Expenses that repeat through the seeded period: (description, amount, category, every n days).
const SAMPLE_EXPENSES: [(&str, f64, Category, i64); 8] = [
    ("Flat white", 5.50, Category::Food, 1),
    ("Groceries", 84.37, Category::Food, 7),
    ("Bus fare", 2.60, Category::Transportation, 2),
    ("Petrol", 71.20, Category::Transportation, 10),
    ("Rent", 650.00, Category::Rent, 14),
    ("Power bill", 142.85, Category::UtilitiesBills, 30),
    ("Movie tickets", 32.00, Category::Entertainment, 9),
    ("Pharmacy", 18.99, Category::Health, 12),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample expenses for the last {} days...", args.days);

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for days_ago in 0..args.days {
        let date = today - Duration::days(days_ago);

        for (description, amount, category, period) in SAMPLE_EXPENSES {
            if days_ago % period == 0 {
                create_expense(NewExpense::new(description, amount, category, date), &conn)?;
                count += 1;
            }
        }
    }

    println!("Created {count} expenses. Success!");

    Ok(())
}
