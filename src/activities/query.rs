use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use clap::ValueEnum;

/// Comparison operator for the created-date clause, in the eGain
/// query syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateOperator {
    #[default]
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Between,
    NotBetween,
}

impl DateOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            DateOperator::Eq => "=",
            DateOperator::Ne => "!=",
            DateOperator::Lt => "<",
            DateOperator::Le => "<=",
            DateOperator::Gt => ">",
            DateOperator::Ge => ">=",
            DateOperator::Between => "=",
            DateOperator::NotBetween => "!=",
        }
    }

    pub fn is_range(self) -> bool {
        matches!(self, DateOperator::Between | DateOperator::NotBetween)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActivityType {
    Email,
    Chat,
    Social,
}

impl ActivityType {
    fn api_value(self) -> &'static str {
        match self {
            ActivityType::Email => "email",
            ActivityType::Chat => "chat",
            ActivityType::Social => "social",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Substatus {
    Open,
    AssignedInProgress,
    CompletedDone,
}

impl Substatus {
    fn api_value(self) -> &'static str {
        match self {
            Substatus::Open => "open",
            Substatus::AssignedInProgress => "assigned:in_progress",
            Substatus::CompletedDone => "completed:done",
        }
    }
}

/// Accepted for parity with the search form; the status clause is
/// presence-only, so this never changes the emitted syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SubstatusOperator {
    #[default]
    Eq,
    Ne,
}

/// One validated set of search filters. Unset fields are excluded from
/// the query entirely, never serialized as empty values.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub date_operator: DateOperator,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub case_id: Option<String>,
    pub customer_id: Option<String>,
    pub queue_id: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub substatus_operator: SubstatusOperator,
    pub substatus: Option<Substatus>,
}

impl FilterSet {
    /// Range operators need both dates; any other date clause needs a
    /// start date. An end date on its own would emit a clause with an
    /// empty date string, so it is rejected here instead.
    pub fn validate(&self) -> Result<()> {
        if self.date_operator.is_range() {
            if self.start_date.is_none() || self.end_date.is_none() {
                bail!(
                    "--date-operator {} requires both --start-date and --end-date",
                    self.date_operator
                        .to_possible_value()
                        .map(|v| v.get_name().to_string())
                        .unwrap_or_default()
                );
            }
        } else if self.end_date.is_some() && self.start_date.is_none() {
            bail!("--end-date requires --start-date (or a range date operator)");
        }
        Ok(())
    }

    fn date_clause(&self) -> Option<String> {
        if self.start_date.is_none() && self.end_date.is_none() {
            return None;
        }

        let op = self.date_operator;
        if op.is_range() {
            let start = iso_instant(self.start_date?);
            let end = iso_instant(self.end_date?);
            return Some(format!("createdDate{}[{start},{end}]", op.symbol()));
        }

        // End date is ignored for non-range operators.
        self.start_date
            .map(|d| format!("createdDate{}{}", op.symbol(), iso_instant(d)))
    }

    /// Assemble the query fragment as an ordered clause list joined
    /// with `&`. Clause order is fixed: date, case, customer, queue,
    /// type, status. Values are not percent-encoded; the bracketed
    /// range syntax must reach the server verbatim.
    pub fn to_query(&self) -> String {
        let mut clauses: Vec<String> = Vec::new();

        if let Some(date) = self.date_clause() {
            clauses.push(date);
        }
        if let Some(case_id) = non_empty(&self.case_id) {
            clauses.push(format!("case={case_id}"));
        }
        if let Some(customer_id) = non_empty(&self.customer_id) {
            clauses.push(format!("customer={customer_id}"));
        }
        if let Some(queue_id) = non_empty(&self.queue_id) {
            clauses.push(format!("queue={queue_id}"));
        }
        if let Some(activity_type) = self.activity_type {
            clauses.push(format!("type={}", activity_type.api_value()));
        }
        if let Some(substatus) = self.substatus {
            clauses.push(format!("status={}", substatus.api_value()));
        }

        clauses.join("&")
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Calendar date to a UTC-midnight RFC3339 instant with milliseconds,
/// e.g. 2024-03-05 -> "2024-03-05T00:00:00.000Z".
fn iso_instant(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
