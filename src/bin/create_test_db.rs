use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use donalytics::{
    initialize_db,
    revenue::TransactionRecord,
    source::{DonationStatus, create_appeal, create_fund, insert_donation},
};

/// A utility for creating a test database for the REST API server of donalytics.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The number of days of donation history to generate.
const HISTORY_DAYS: i64 = 730;

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

    println!("Creating appeals and funds...");
    let winter = create_appeal("Winter Appeal", &conn)?;
    let schools = create_appeal("Back to School", &conn)?;
    let funds = [
        (Some(winter), create_fund("Emergency Shelter", Some(winter), &conn)?),
        (Some(winter), create_fund("Warm Meals", Some(winter), &conn)?),
        (Some(schools), create_fund("School Supplies", Some(schools), &conn)?),
        (None, create_fund("General Fund", None, &conn)?),
    ];

    println!("Creating donations...");
    let today = OffsetDateTime::now_utc().date();
    let mut donation_count = 0;

    for days_ago in 0..HISTORY_DAYS {
        let date = today - Duration::days(days_ago);
        let (appeal_id, fund_id) = funds[days_ago as usize % funds.len()];

        // A handful of one-time gifts of varying size each day.
        for gift in 0..(days_ago % 4) {
            let amount = 10.0 + ((days_ago * 7 + gift * 13) % 20) as f64 * 5.0;
            let status = if (days_ago + gift) % 17 == 0 {
                DonationStatus::Refunded
            } else {
                DonationStatus::Completed
            };
            let record = TransactionRecord::build(amount, date)
                .appeal_id(appeal_id)
                .fund_id(Some(fund_id));
            insert_donation(&record, status, &conn)?;
            donation_count += 1;
        }

        // Monthly pledges: one series starts every week and renews every 30 days.
        if days_ago % 7 == 0 {
            let record = TransactionRecord::build(25.0, date)
                .recurring(None)
                .appeal_id(appeal_id)
                .fund_id(Some(fund_id));
            insert_donation(&record, DonationStatus::Completed, &conn)?;
            donation_count += 1;
        }

        if days_ago % 30 == 0 {
            for installment in 2..=4 {
                let record = TransactionRecord::build(25.0, date)
                    .recurring(Some(&installment.to_string()))
                    .appeal_id(appeal_id)
                    .fund_id(Some(fund_id));
                insert_donation(&record, DonationStatus::Completed, &conn)?;
                donation_count += 1;
            }
        }
    }

    println!("Created {donation_count} donations.");
    println!("Success!");

    Ok(())
}
