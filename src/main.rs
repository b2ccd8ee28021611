use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use u_squad::config::SquadConfig;
use u_squad::models::{Member, MemberDraft, NEVER_LEADS};
use u_squad::render::render_table;
use u_squad::service::{GenerationOutcome, GenerationService};
use u_squad::store::sqlite::SqliteStore;
use u_squad::store::{HistoryStore, RosterProvider, RosterStore};
use u_squad::week::{monday_of, WeekLabel};

mod cli;

use cli::{Cli, Commands, MemberCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .ok();

    let config = SquadConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("Failed to open {}", cli.db.display()))?;
    let row = config.leader_display_row;
    let mut service = GenerationService::new(config, store.clone(), store);

    match cli.command {
        Commands::Generate { date, label } => {
            let date = date.unwrap_or_else(today);
            let outcome = match label {
                Some(label) => service.generate_and_record(&label, date)?,
                None => service.generate_for_week(date)?,
            };
            print_outcome(&outcome, row);
        }
        Commands::Clone { date, from } => {
            let date = date.unwrap_or_else(today);
            let outcome = match from {
                Some(source) => {
                    let label = WeekLabel::for_date(monday_of(date)).to_string();
                    service.clone_from(&label, date, source)?
                }
                None => service.clone_previous_week(date)?,
            };
            print_outcome(&outcome, row);
        }
        Commands::Show { label } => {
            let history = service
                .history()
                .get_by_label(&label)?
                .with_context(|| format!("No squads stored under '{label}'"))?;
            println!("{} ({})", history.date_label, history.date);
            print!("{}", render_table(&history, row));
        }
        Commands::History => {
            for entry in service.history().list()? {
                let leaders: Vec<String> = entry.leader_ids.iter().map(ToString::to_string).collect();
                println!("{}  {}  leaders: {}", entry.date, entry.date_label, leaders.join(", "));
            }
        }
        Commands::Delete { label } => {
            service.delete_week(&label)?;
            println!("Deleted '{label}'");
        }
        Commands::Log { limit } => {
            for (at, text) in service.history().recent_log(limit)? {
                println!("{at}  {text}");
            }
        }
        Commands::Member { cmd } => member_command(service.roster_mut(), cmd)?,
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_outcome(outcome: &GenerationOutcome, row: usize) {
    let state = if outcome.is_fresh() { "generated" } else { "stored" };
    println!(
        "{} ({}, {state})",
        outcome.history.date_label, outcome.history.date
    );
    print!("{}", render_table(&outcome.history, row));
}

fn member_command(roster: &mut SqliteStore, cmd: MemberCommands) -> Result<()> {
    match cmd {
        MemberCommands::Add {
            name,
            priority,
            enable_date,
            never_lead,
        } => {
            let mut draft = MemberDraft::new(name);
            if let Some(p) = priority {
                draft = draft.with_priority(p);
            }
            if let Some(d) = enable_date {
                draft = draft.with_enable_date(d);
            }
            if never_lead {
                draft = draft.with_enable_date(NEVER_LEADS);
            }
            let member = roster.add_member(draft)?;
            println!("Added {}", describe(&member));
        }
        MemberCommands::List => {
            for member in roster.query(today())? {
                println!("{}", describe(&member));
            }
        }
        MemberCommands::Edit {
            id,
            name,
            priority,
            enable_date,
            never_lead,
            last_led,
        } => {
            let mut member = roster.member(id)?;
            if let Some(name) = name {
                member.name = name;
            }
            if let Some(p) = priority {
                member.priority = p;
            }
            if let Some(d) = enable_date {
                member.enable_date = d;
            }
            if never_lead {
                member = member.never_leads();
            }
            if let Some(d) = last_led {
                member.last_leader_date = Some(d);
            }
            roster.update_member(&member)?;
            println!("Updated {}", describe(&member));
        }
        MemberCommands::Remove { id } => {
            roster.delete_member(id)?;
            println!("Removed member {id}");
        }
    }
    Ok(())
}

fn describe(member: &Member) -> String {
    let enable = if member.enable_date == NEVER_LEADS {
        "never leads".to_string()
    } else if member.enable_date == NaiveDate::MIN {
        "may lead".to_string()
    } else {
        format!("leads after {}", member.enable_date)
    };
    let last = member
        .last_leader_date
        .map_or_else(|| "never led".to_string(), |d| format!("last led {d}"));
    format!(
        "#{} {} (priority {}, {enable}, {last})",
        member.id, member.name, member.priority
    )
}
