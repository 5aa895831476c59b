//! Customer leaderboard export.
//!
//! Fetches the members of a tagged customer segment, sorted by amount spent
//! on the server, and writes the top [`MAX_LEADERBOARD_ENTRIES`] to a CSV
//! file. Rows keep the order the service returned; nothing is re-sorted here.
//!
//! A member whose amount cannot be parsed is skipped with a warning. The
//! export only fails as a whole when no member survives.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use thiserror::Error;

use crate::clients::graphql::{GraphqlClient, GraphqlError, Variables};
use crate::tasks::Connection;

/// Maximum number of rows written to the leaderboard.
pub const MAX_LEADERBOARD_ENTRIES: usize = 50;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "top_50_customers.csv";

/// Default time budget for the segment query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Segment filter selecting the leaderboard customers.
pub const SEGMENT_QUERY: &str =
    "customer_tags CONTAINS 'task1' AND customer_tags CONTAINS 'level:3'";

/// CSV header row.
pub const CSV_HEADER: [&str; 7] = [
    "Rank",
    "Customer ID",
    "First Name",
    "Last Name",
    "Email",
    "Amount Spent",
    "Currency",
];

const CUSTOMER_SEGMENT_MEMBERS_QUERY: &str = r"
query GetCustomerSegmentMembers($first: Int!, $query: String!, $sortKey: String, $reverse: Boolean!) {
  customerSegmentMembers(first: $first, query: $query, sortKey: $sortKey, reverse: $reverse) {
    edges {
      node {
        id
        firstName
        lastName
        defaultEmailAddress {
          emailAddress
        }
        amountSpent {
          amount
          currencyCode
        }
      }
    }
  }
}
";

/// Settings for [`generate_customer_leaderboard`].
#[derive(Clone, Debug)]
pub struct LeaderboardOptions {
    /// Where the CSV is written. Created or truncated.
    pub output_path: PathBuf,
    /// Time budget for the segment query.
    pub timeout: Duration,
    /// Segment filter expression.
    pub segment_query: String,
}

impl Default for LeaderboardOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            timeout: DEFAULT_TIMEOUT,
            segment_query: SEGMENT_QUERY.to_string(),
        }
    }
}

/// One leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerRecord {
    /// Customer global ID.
    pub id: String,
    /// First name, empty when unknown.
    pub first_name: String,
    /// Last name, empty when unknown.
    pub last_name: String,
    /// Default email address, empty when unknown.
    pub email: String,
    /// Lifetime amount spent.
    pub amount_spent: Decimal,
    /// ISO currency code of `amount_spent`.
    pub currency_code: String,
}

impl CustomerRecord {
    /// Returns the amount spent with exactly two decimal places.
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        let rounded = self
            .amount_spent
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}

/// Summary of a successful export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardReport {
    /// The file that was written.
    pub output_path: PathBuf,
    /// Number of data rows written.
    pub exported: usize,
    /// Number of segment members skipped because their amount was unreadable.
    pub skipped: usize,
}

/// Errors from the leaderboard export.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The segment query failed.
    #[error("failed to fetch customers: GraphQL query failed: {0}")]
    Fetch(#[source] GraphqlError),

    /// The segment query did not finish within its time budget.
    #[error("failed to fetch customers: query timed out after {0:?}")]
    Timeout(Duration),

    /// The response `data` did not have the expected shape.
    #[error("failed to fetch customers: failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    /// No segment member survived decoding.
    #[error("no customers found with required tags")]
    NoCustomers,

    /// The output file could not be created.
    #[error("failed to create CSV file {}: {source}", .path.display())]
    CreateFile {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A row could not be written.
    #[error("failed to write CSV record: {0}")]
    Write(#[source] csv::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentMembersData {
    customer_segment_members: Option<Connection<CustomerNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerNode {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    default_email_address: Option<EmailAddress>,
    amount_spent: Option<MoneyV2>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyV2 {
    amount: Option<String>,
    currency_code: Option<String>,
}

/// Fetches the segment and writes the leaderboard CSV.
///
/// # Errors
///
/// Fails if the query fails or times out, if no member has a readable amount,
/// or if the file cannot be created or written.
pub async fn generate_customer_leaderboard(
    client: &GraphqlClient,
    options: &LeaderboardOptions,
) -> Result<LeaderboardReport, LeaderboardError> {
    let (mut customers, skipped) = fetch_filtered_customers(client, options).await?;

    if customers.is_empty() {
        return Err(LeaderboardError::NoCustomers);
    }

    if customers.len() > MAX_LEADERBOARD_ENTRIES {
        tracing::debug!(
            received = customers.len(),
            "truncating leaderboard to {MAX_LEADERBOARD_ENTRIES} entries"
        );
        customers.truncate(MAX_LEADERBOARD_ENTRIES);
    }

    let exported = export_to_csv(&customers, &options.output_path)?;
    tracing::info!(
        exported,
        skipped,
        path = %options.output_path.display(),
        "exported customer leaderboard"
    );

    Ok(LeaderboardReport {
        output_path: options.output_path.clone(),
        exported,
        skipped,
    })
}

/// Runs the segment query under the configured time budget and decodes it.
///
/// Returns the decoded records in service order and the number of skipped
/// members.
///
/// # Errors
///
/// [`LeaderboardError::Timeout`], [`LeaderboardError::Fetch`] or
/// [`LeaderboardError::Decode`].
pub async fn fetch_filtered_customers(
    client: &GraphqlClient,
    options: &LeaderboardOptions,
) -> Result<(Vec<CustomerRecord>, usize), LeaderboardError> {
    let mut variables = Variables::new();
    variables.insert("first".to_string(), MAX_LEADERBOARD_ENTRIES.into());
    variables.insert("query".to_string(), options.segment_query.clone().into());
    variables.insert("sortKey".to_string(), "amount_spent".into());
    variables.insert("reverse".to_string(), true.into());

    let response = tokio::time::timeout(
        options.timeout,
        client.query(CUSTOMER_SEGMENT_MEMBERS_QUERY, Some(&variables)),
    )
    .await
    .map_err(|_| LeaderboardError::Timeout(options.timeout))?
    .map_err(LeaderboardError::Fetch)?;

    let data: SegmentMembersData = response.data_as().map_err(LeaderboardError::Decode)?;
    Ok(decode_customers(data))
}

fn decode_customers(data: SegmentMembersData) -> (Vec<CustomerRecord>, usize) {
    let edges = data.customer_segment_members.unwrap_or_default().edges;
    let mut skipped = 0;

    let customers = edges
        .into_iter()
        .filter_map(|edge| {
            let record = customer_from_node(edge.node);
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect();

    (customers, skipped)
}

fn customer_from_node(node: CustomerNode) -> Option<CustomerRecord> {
    let Some(MoneyV2 {
        amount: Some(amount),
        currency_code,
    }) = node.amount_spent
    else {
        tracing::warn!(customer = %node.id, "missing amount spent, skipping customer");
        return None;
    };

    let amount_spent = match amount.trim().parse::<Decimal>() {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(
                customer = %node.id,
                %amount,
                "failed to parse amount, skipping customer: {e}"
            );
            return None;
        }
    };

    Some(CustomerRecord {
        id: node.id,
        first_name: node.first_name.unwrap_or_default(),
        last_name: node.last_name.unwrap_or_default(),
        email: node
            .default_email_address
            .and_then(|e| e.email_address)
            .unwrap_or_default(),
        amount_spent,
        currency_code: currency_code.unwrap_or_default(),
    })
}

/// Writes the header and at most [`MAX_LEADERBOARD_ENTRIES`] ranked rows.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns the `csv` error if a row cannot be written or flushed.
pub fn write_leaderboard<W: io::Write>(
    writer: W,
    customers: &[CustomerRecord],
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    let mut written = 0;
    for (index, customer) in customers.iter().take(MAX_LEADERBOARD_ENTRIES).enumerate() {
        let rank = (index + 1).to_string();
        let amount = customer.formatted_amount();
        csv_writer.write_record([
            rank.as_str(),
            customer.id.as_str(),
            customer.first_name.as_str(),
            customer.last_name.as_str(),
            customer.email.as_str(),
            amount.as_str(),
            customer.currency_code.as_str(),
        ])?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

/// Creates (or truncates) `path` and writes the leaderboard to it.
///
/// The file is closed before this returns, on success and on error.
///
/// # Errors
///
/// [`LeaderboardError::CreateFile`] or [`LeaderboardError::Write`].
pub fn export_to_csv(customers: &[CustomerRecord], path: &Path) -> Result<usize, LeaderboardError> {
    let file = File::create(path).map_err(|source| LeaderboardError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;

    write_leaderboard(file, customers).map_err(LeaderboardError::Write)
}
