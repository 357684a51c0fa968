use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use crate::args::BaseArgs;
use crate::http::ApiClient;
use crate::session;
use crate::ui::{print_command_status, with_spinner, CommandStatus};
use crate::utils::pluralize;

pub mod export;
pub mod fetch;
pub mod normalize;
pub mod query;
mod search;

use query::{ActivityType, DateOperator, FilterSet, Substatus, SubstatusOperator};

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Comparison operator for the created-date clause
    #[arg(long, value_enum, default_value_t)]
    date_operator: DateOperator,

    /// Created-date filter start (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Created-date filter end (range operators only)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Filter by case ID
    #[arg(long)]
    case: Option<String>,

    /// Filter by customer ID
    #[arg(long)]
    customer: Option<String>,

    /// Filter by queue ID
    #[arg(long)]
    queue: Option<String>,

    /// Filter by activity type
    #[arg(long = "type", value_enum)]
    activity_type: Option<ActivityType>,

    /// Comparison operator for the substatus clause
    #[arg(long, value_enum, default_value_t)]
    substatus_operator: SubstatusOperator,

    /// Filter by substatus
    #[arg(long, value_enum)]
    substatus: Option<Substatus>,
}

impl SearchArgs {
    fn filters(&self) -> FilterSet {
        FilterSet {
            date_operator: self.date_operator,
            start_date: self.start_date,
            end_date: self.end_date,
            case_id: self.case.clone(),
            customer_id: self.customer.clone(),
            queue_id: self.queue.clone(),
            activity_type: self.activity_type,
            substatus_operator: self.substatus_operator,
            substatus: self.substatus,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    filters: SearchArgs,

    /// Output file path
    #[arg(short, long, default_value = "activities.xlsx")]
    output: PathBuf,
}

pub async fn run_search(base: BaseArgs, args: SearchArgs) -> Result<()> {
    let activities = execute(&base, &args).await?;
    search::run(&activities, base.json)
}

pub async fn run_export(base: BaseArgs, args: ExportArgs) -> Result<()> {
    let activities = execute(&base, &args.filters).await?;
    export::write_workbook(&activities, &args.output)?;
    print_command_status(
        CommandStatus::Success,
        &format!(
            "Exported {} {} to {}",
            activities.len(),
            pluralize(activities.len(), "activity", Some("activities")),
            args.output.display()
        ),
    );
    Ok(())
}

/// Shared search pipeline: validate filters, resolve the session,
/// drive the page loop, and apply the outcome policy (partials are
/// surfaced with a warning; an expired session is fatal).
async fn execute(base: &BaseArgs, args: &SearchArgs) -> Result<Vec<Value>> {
    let filters = args.filters();
    filters.validate()?;

    let ctx = session::resolve(base)?;
    let client = ApiClient::new(&ctx)?;
    let query = filters.to_query();

    let outcome = with_spinner(
        "Searching activities...",
        fetch::fetch_all(&client, &query),
    )
    .await;

    match outcome {
        fetch::SearchOutcome::Complete(activities) => Ok(activities),
        fetch::SearchOutcome::Partial { activities, abort } => {
            print_command_status(
                CommandStatus::Warning,
                &format!(
                    "Search aborted after {} {}: {abort}. Showing partial results.",
                    activities.len(),
                    pluralize(activities.len(), "activity", Some("activities")),
                ),
            );
            Ok(activities)
        }
        fetch::SearchOutcome::SessionExpired => {
            print_command_status(CommandStatus::Error, "Session expired or invalid.");
            bail!("Run `egcli login` to store a fresh session token.")
        }
    }
}
