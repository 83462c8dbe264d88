//! solarops CLI.
//!
//! Every subcommand is one full load -> normalize -> filter -> aggregate ->
//! render pass over the stores; nothing is cached between invocations, so a
//! write made by anyone is visible to the next read.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use solarops::actions::{ActionDraft, ActionFilter, ActionTracker};
use solarops::advisor::Advisor;
use solarops::config::Config;
use solarops::export;
use solarops::focus;
use solarops::goals::{GoalDraft, GoalTracker, ManagerGate, UpsertOutcome, current_value, progress};
use solarops::roster;
use solarops::store::{ActionStatus, CsvStores, GoalMetric, VisitStore};
use solarops::visits::aggregate;
use solarops::visits::filter::{VisitFilter, apply};
use solarops::visits::normalize::normalize;
use solarops::visits::VisitRecord;

#[derive(Parser)]
#[command(
    name = "solarops",
    version,
    about = "Field-visit analytics, team goals, and action planning for solar sales operations."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Inclusive start of the visit-date range (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Inclusive end of the visit-date range (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Two-letter region code; repeat to select several.
    #[arg(long = "region")]
    regions: Vec<String>,
    /// City name; repeat to select several.
    #[arg(long = "city")]
    cities: Vec<String>,
    /// Staff member; repeat to select several.
    #[arg(long = "staff")]
    staff: Vec<String>,
    /// Client profile; a visit matches when any of its profiles is selected.
    #[arg(long = "profile")]
    profiles: Vec<String>,
}

impl FilterArgs {
    fn into_filter(self) -> anyhow::Result<VisitFilter> {
        let date_range = match (self.from, self.to) {
            (Some(from), Some(to)) => {
                if from > to {
                    bail!("--from must not be after --to");
                }
                Some((from, to))
            }
            (None, None) => None,
            _ => bail!("--from and --to must be given together"),
        };
        for profile in &self.profiles {
            if !roster::is_known_profile(profile) {
                bail!(
                    "unknown profile '{profile}': expected one of {}",
                    roster::CLIENT_PROFILES.join(", ")
                );
            }
        }
        Ok(VisitFilter {
            date_range,
            regions: self.regions,
            cities: self.cities,
            staff: self.staff,
            client_profiles: self.profiles,
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Headline metrics, leaderboards, and the monthly series.
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered visit table to a CSV file.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output path; defaults to a date-stamped name in the current dir.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate the weekly-focus message for high-potential clients.
    Focus {
        #[command(flatten)]
        filters: FilterArgs,
        /// How many clients to include.
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Only clients with an invoice at or above this value.
        #[arg(long, default_value = "500")]
        min_invoice: Decimal,
    },
    /// Team goals.
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },
    /// Action plan.
    Action {
        #[command(subcommand)]
        command: ActionCommand,
    },
    /// Ask the AI advisor for a narrative analysis of the filtered data.
    Advise {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Define or replace the goal for one staff member and period.
    Set {
        #[arg(long)]
        staff: String,
        /// "visit_count" or "average_invoice".
        #[arg(long)]
        metric: String,
        #[arg(long)]
        target: Decimal,
        /// Free-text period label, e.g. "Julho/2025".
        #[arg(long)]
        period: String,
        /// Manager credential unlocking goal definition.
        #[arg(long, env = "SOLAROPS_MANAGER_CREDENTIAL", default_value = "")]
        credential: String,
    },
    /// Show every goal with live progress against the filtered data.
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Subcommand)]
enum ActionCommand {
    /// Append one action item derived from a recommendation.
    Add {
        /// The narrative recommendation this action came from.
        #[arg(long, default_value = "")]
        narrative: String,
        #[arg(long)]
        action: String,
        #[arg(long)]
        owner: String,
        /// Due date (YYYY-MM-DD), today or later.
        #[arg(long)]
        due: NaiveDate,
        /// "todo", "in_progress", or "done".
        #[arg(long, default_value = "todo")]
        status: String,
    },
    /// List action items, optionally filtered by owner and status.
    List {
        #[arg(long = "owner")]
        owners: Vec<String>,
        #[arg(long = "status")]
        statuses: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::resolve()?;
    let stores = Arc::new(CsvStores::from_config(&config));

    match cli.command {
        Command::Summary { filters } => {
            let records = filtered_visits(&stores, filters).await?;
            print_summary(&records);
        }
        Command::Export { filters, out } => {
            let records = filtered_visits(&stores, filters).await?;
            if records.is_empty() {
                println!("No rows match the active filters; nothing exported.");
                return Ok(());
            }
            let bytes = export::to_csv_bytes(&records)?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(export::export_filename(Utc::now().date_naive()))
            });
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            println!("Exported {} rows to {}", records.len(), path.display());
        }
        Command::Focus {
            filters,
            top,
            min_invoice,
        } => {
            let records = filtered_visits(&stores, filters).await?;
            let picked = focus::focus_clients(&records, min_invoice, top);
            if picked.is_empty() {
                println!("No clients meet the focus criteria.");
            } else {
                println!("{}", focus::focus_message(&picked, Utc::now().date_naive()));
            }
        }
        Command::Goal { command } => {
            let tracker = GoalTracker::new(stores.clone(), ManagerGate::from_config(&config));
            match command {
                GoalCommand::Set {
                    staff,
                    metric,
                    target,
                    period,
                    credential,
                } => {
                    let Some(metric) = GoalMetric::from_db_value(&metric) else {
                        bail!("unknown metric '{metric}': expected visit_count or average_invoice");
                    };
                    if !roster::is_on_roster(&staff) {
                        bail!("'{staff}' is not on the staff roster");
                    }
                    let draft = GoalDraft {
                        staff_name: staff,
                        metric,
                        target_value: target,
                        period,
                    };
                    match tracker.upsert_goal(&credential, &draft).await {
                        Ok(UpsertOutcome::Saved(goal)) => {
                            println!("Goal saved for {} ({}).", goal.staff_name, goal.period);
                        }
                        Ok(UpsertOutcome::Denied) => {
                            println!("Manager controls are locked.");
                        }
                        Err(message) => bail!(message),
                    }
                }
                GoalCommand::List { filters } => {
                    let records = filtered_visits(&stores, filters).await?;
                    let counts = aggregate::visits_per_staff(&records);
                    let means = aggregate::mean_invoice_per_staff(&records);
                    let goals = tracker.list_goals().await.map_err(anyhow::Error::msg)?;
                    if goals.is_empty() {
                        println!("No goals defined.");
                    }
                    for goal in goals {
                        let current = current_value(&goal, &counts, &means);
                        let ratio = progress(&goal, current);
                        println!(
                            "{} | {} | {} | target {} | current {} | {:.0}%",
                            goal.staff_name,
                            goal.period,
                            goal.metric.as_str(),
                            goal.target_value,
                            current,
                            ratio * 100.0,
                        );
                    }
                }
            }
        }
        Command::Action { command } => {
            let tracker = ActionTracker::new(stores.clone());
            match command {
                ActionCommand::Add {
                    narrative,
                    action,
                    owner,
                    due,
                    status,
                } => {
                    let Some(status) = ActionStatus::from_db_value(&status) else {
                        bail!("unknown status '{status}': expected todo, in_progress, or done");
                    };
                    if !roster::is_on_roster(&owner) {
                        bail!("'{owner}' is not on the staff roster");
                    }
                    let draft = ActionDraft {
                        source_narrative: narrative,
                        specific_action: action,
                        owner,
                        due_date: due,
                        status,
                    };
                    let record = tracker
                        .append_action(&draft, Utc::now())
                        .await
                        .map_err(anyhow::Error::msg)?;
                    println!("Action {} recorded for {}.", record.action_id, record.owner);
                }
                ActionCommand::List { owners, statuses } => {
                    let statuses = statuses
                        .iter()
                        .map(|raw| {
                            ActionStatus::from_db_value(raw).ok_or_else(|| {
                                anyhow::anyhow!(
                                    "unknown status '{raw}': expected todo, in_progress, or done"
                                )
                            })
                        })
                        .collect::<anyhow::Result<Vec<_>>>()?;
                    let filter = ActionFilter { owners, statuses };
                    let actions = tracker
                        .list_actions(&filter)
                        .await
                        .map_err(anyhow::Error::msg)?;
                    if actions.is_empty() {
                        println!("No action items match.");
                    }
                    for item in actions {
                        println!(
                            "{} | {} | {} | due {} | {}",
                            item.action_id,
                            item.owner,
                            item.status.as_str(),
                            item.due_date,
                            item.specific_action,
                        );
                    }
                }
            }
        }
        Command::Advise { filters } => {
            let advisor = Advisor::from_config(&config.advisor);
            if !advisor.is_enabled() {
                println!("AI advisor is disabled. Set GOOGLE_API_KEY to enable it.");
                return Ok(());
            }
            let filter = filters.into_filter()?;
            let rows = stores.load_visits().await?;
            let records = apply(&normalize(&rows), &filter);
            if records.is_empty() {
                println!("No rows match the active filters; nothing to analyze.");
                return Ok(());
            }
            // One request, no retry: a failure is rendered and that is it.
            match advisor.generate_analysis(&records, &filter).await {
                Ok(analysis) => println!("{analysis}"),
                Err(e) => println!("Analysis generation failed: {e}"),
            }
        }
    }

    Ok(())
}

async fn filtered_visits(
    stores: &Arc<CsvStores>,
    filters: FilterArgs,
) -> anyhow::Result<Vec<VisitRecord>> {
    let filter = filters.into_filter()?;
    let rows = stores.load_visits().await?;
    Ok(apply(&normalize(&rows), &filter))
}

fn print_summary(records: &[VisitRecord]) {
    if records.is_empty() {
        println!("No visits match the active filters.");
        return;
    }

    let h = aggregate::headline(records);
    println!("Visits: {}", h.visits);
    println!("Mean invoice: R$ {}", h.mean_invoice);
    println!("Total potential: R$ {}", h.total_invoice.round_dp(2));
    println!(
        "Mappable visits: {}",
        aggregate::geo_points(records).len()
    );

    println!("\nVisits per staff member:");
    for row in aggregate::visits_per_staff(records).into_iter().take(10) {
        println!("  {:<20} {}", row.staff_name, row.visits);
    }

    println!("\nMean invoice per staff member:");
    for row in aggregate::mean_invoice_per_staff(records).into_iter().take(10) {
        println!("  {:<20} R$ {}", row.staff_name, row.amount);
    }

    println!("\nTotal invoice per staff member:");
    for row in aggregate::total_invoice_per_staff(records).into_iter().take(10) {
        println!("  {:<20} R$ {}", row.staff_name, row.amount.round_dp(2));
    }

    println!("\nTop cities by mean invoice:");
    for row in aggregate::top_cities_by_mean_invoice(records, 10) {
        println!("  {:<20} R$ {}", row.city, row.mean_invoice);
    }

    println!("\nMonthly series:");
    for row in aggregate::monthly_summary(records) {
        println!(
            "  {} | {} visits | mean R$ {}",
            row.month_bucket, row.visits, row.mean_invoice
        );
    }
}
