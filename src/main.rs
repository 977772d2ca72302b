#![allow(missing_docs)]

//! `auditora` command-line interface.
//!
//! Each invocation loads the session from the data directory, runs one
//! command as the acting user and exits. Mutations are written back before
//! the command returns.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use auditora::catalog::{CatalogProvider, NewStandard};
use auditora::config::Config;
use auditora::ids::{SystemClock, UuidIds};
use auditora::lifecycle::{Annotation, Assignment};
use auditora::logging::{self, LoggingGuard};
use auditora::store::JsonDirStore;
use auditora::summary::{self, PlanFilter};
use auditora::types::{AuditItem, ComplianceState, Criticality, PlanState, RemediationPlan, Role};
use auditora::users::Registration;
use auditora::Session;

#[derive(Parser)]
#[command(name = "auditora")]
#[command(about = "Compliance audits, findings and remediation plans")]
#[command(version)]
struct Cli {
    /// Config file (overrides $AUDITORA_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Email of the acting user (default: first registered user)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and write empty snapshots
    Init,

    /// Register a user
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Auditor, responsable or excelencia
        #[arg(long)]
        role: Role,
        /// Home area
        #[arg(long)]
        area: String,
    },

    /// List registered users
    Users,

    /// Audits and their checklists
    #[command(subcommand)]
    Audit(AuditCommand),

    /// Record findings on checklist items
    #[command(subcommand)]
    Item(ItemCommand),

    /// Remediation plans
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Standards catalog
    #[command(subcommand)]
    Standard(StandardCommand),

    /// Dashboard counters
    Summary,

    /// Show areas, processes and roles
    Catalog,
}

#[derive(Subcommand)]
enum AuditCommand {
    /// Create an audit of an area dated today
    Create {
        /// Audited area
        #[arg(long)]
        area: String,
    },
    /// List audits, most recent first
    List,
    /// Show one audit and its checklist
    Show {
        /// Audit id
        audit_id: String,
    },
}

#[derive(Subcommand)]
enum ItemCommand {
    /// Record SI, NO or NA
    Compliance {
        /// Item id
        item_id: String,
        /// SI, NO or NA
        value: ComplianceState,
    },
    /// Replace the observation text
    Observe {
        /// Item id
        item_id: String,
        /// Observation
        text: String,
    },
    /// Replace the evidence link
    Evidence {
        /// Item id
        item_id: String,
        /// Evidence URL
        url: String,
    },
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Open (or show) the plan of an item
    Open {
        /// Item id
        item_id: String,
    },
    /// Assign responsibles or dates
    Assign(AssignArgs),
    /// Move a plan to another state
    State {
        /// Plan id
        plan_id: String,
        /// New state, e.g. EN_PROCESO
        state: PlanState,
    },
    /// Grant a new close date
    Reprogram {
        /// Plan id
        plan_id: String,
        /// New close date (YYYY-MM-DD)
        until: NaiveDate,
    },
    /// Verify and close a plan
    Verify {
        /// Plan id
        plan_id: String,
    },
    /// Update description, evidence or closure comment
    Note(NoteArgs),
    /// List plans, optionally filtered
    List {
        /// State filter ("(Todos)" for all)
        #[arg(long)]
        state: Option<String>,
        /// Responsible filter ("(Todos)" for all)
        #[arg(long)]
        responsible: Option<String>,
        /// Print the available filter values instead
        #[arg(long)]
        choices: bool,
    },
}

#[derive(Args)]
struct AssignArgs {
    /// Plan id
    plan_id: String,
    /// Responsible area
    #[arg(long)]
    area: Option<String>,
    /// Responsible person
    #[arg(long)]
    responsible: Option<String>,
    /// Planned start (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Planned close (YYYY-MM-DD)
    #[arg(long)]
    close: Option<NaiveDate>,
}

impl AssignArgs {
    fn assignments(self) -> Vec<Assignment> {
        let mut out = Vec::new();
        if let Some(v) = self.area {
            out.push(Assignment::ResponsibleArea(v));
        }
        if let Some(v) = self.responsible {
            out.push(Assignment::ResponsibleAction(v));
        }
        if let Some(d) = self.start {
            out.push(Assignment::StartDate(Some(d)));
        }
        if let Some(d) = self.close {
            out.push(Assignment::CloseDate(Some(d)));
        }
        out
    }
}

#[derive(Args)]
struct NoteArgs {
    /// Plan id
    plan_id: String,
    /// Plan description
    #[arg(long)]
    description: Option<String>,
    /// Evidence URL
    #[arg(long)]
    evidence: Option<String>,
    /// Closure comment
    #[arg(long)]
    closure: Option<String>,
}

impl NoteArgs {
    fn annotations(self) -> Vec<Annotation> {
        let mut out = Vec::new();
        if let Some(v) = self.description {
            out.push(Annotation::Description(v));
        }
        if let Some(v) = self.evidence {
            out.push(Annotation::EvidenceUrl(v));
        }
        if let Some(v) = self.closure {
            out.push(Annotation::ClosureComment(v));
        }
        out
    }
}

#[derive(Subcommand)]
enum StandardCommand {
    /// Add a standard (Excelencia Operacional only)
    Add {
        /// Area
        #[arg(long)]
        area: String,
        /// Process code
        #[arg(long)]
        process: String,
        /// A, B or C
        #[arg(long)]
        criticality: Criticality,
        /// Priority within the tier (default 1)
        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i64>,
        /// Short code
        #[arg(long)]
        code: String,
        /// Name
        #[arg(long)]
        name: String,
        /// Reference document link
        #[arg(long)]
        file_url: Option<String>,
    },
    /// List standards of one area and process
    List {
        /// Area
        #[arg(long)]
        area: String,
        /// Process code
        #[arg(long)]
        process: String,
    },
}

fn main() -> ExitCode {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _guard = init_logging(&config)?;

    let mut session = open_session(&config)?;
    match cli.command {
        Commands::Init => cmd_init(&mut session, &config),
        Commands::Register {
            name,
            email,
            role,
            area,
        } => {
            let user = session.register(Registration {
                name,
                email,
                role,
                area,
            })?;
            println!("{}\t{}\t{}\t{}", user.id, user.email, user.role, user.area);
            Ok(())
        }
        Commands::Users => {
            for user in session.users() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    user.id, user.name, user.email, user.role, user.area
                );
            }
            Ok(())
        }
        Commands::Audit(cmd) => cmd_audit(&mut session, cli.user.as_deref(), cmd),
        Commands::Item(cmd) => cmd_item(&mut session, cli.user.as_deref(), cmd),
        Commands::Plan(cmd) => cmd_plan(&mut session, cli.user.as_deref(), cmd),
        Commands::Standard(cmd) => cmd_standard(&mut session, cli.user.as_deref(), cmd),
        Commands::Summary => {
            let s = session.summary();
            println!("audits\t{}", s.audit_count);
            println!("open observations\t{}", s.open_observation_count);
            println!("open plans\t{}", s.open_plan_count);
            println!("closed plans\t{}", s.closed_plan_count);
            Ok(())
        }
        Commands::Catalog => {
            let provider = session.provider();
            for area in &provider.areas {
                println!("{area}");
                for label in provider.process_labels(area) {
                    println!("  {label}");
                }
            }
            let roles: Vec<&str> = provider.roles.iter().map(Role::as_str).collect();
            println!("roles: {}", roles.join(", "));
            Ok(())
        }
    }
}

fn init_logging(config: &Config) -> Result<Option<LoggingGuard>> {
    if config.logging.file {
        let dir = config.logs_dir()?;
        let guard = logging::init_file(&dir, &config.logging.level)?;
        Ok(Some(guard))
    } else {
        logging::init_cli(&config.logging.level);
        Ok(None)
    }
}

fn open_session(config: &Config) -> Result<Session> {
    let provider = CatalogProvider::load_or_builtin(config.paths.catalog.as_deref())?;
    let data_dir = config.data_dir()?;
    debug!(data_dir = %data_dir.display(), "opening data directory");
    let store = JsonDirStore::open(data_dir).context("failed to open data directory")?;
    Session::load(
        provider,
        Box::new(store),
        Box::new(UuidIds),
        Box::new(SystemClock),
    )
    .context("failed to load session")
}

fn cmd_init(session: &mut Session, config: &Config) -> Result<()> {
    session.save().context("failed to write snapshots")?;
    println!("data directory: {}", config.data_dir()?.display());
    println!("standards: {}", session.standards().len());
    Ok(())
}

fn cmd_audit(session: &mut Session, user: Option<&str>, cmd: AuditCommand) -> Result<()> {
    match cmd {
        AuditCommand::Create { area } => {
            let actor = session.acting_user(user)?;
            let audit = session.create_audit(&actor, &area)?;
            let audit_id = audit.id.clone();
            println!("{}\t{}\t{}", audit.id, audit.date, audit.area);
            for item in session.items_for_audit(&audit_id)? {
                print_item(item);
            }
        }
        AuditCommand::List => {
            for audit in session.recent_audits() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    audit.id,
                    audit.date,
                    audit.area,
                    audit.processes.join(","),
                    audit.auditor
                );
            }
        }
        AuditCommand::Show { audit_id } => {
            let audit = session.audit(&audit_id)?;
            println!("{}\t{}\t{}\t{}", audit.id, audit.date, audit.area, audit.auditor);
            for label in session.provider().process_labels(&audit.area) {
                println!("# {label}");
            }
            for item in session.items_for_audit(&audit_id)? {
                print_item(item);
            }
        }
    }
    Ok(())
}

fn cmd_item(session: &mut Session, user: Option<&str>, cmd: ItemCommand) -> Result<()> {
    let actor = session.acting_user(user)?;
    let item = match cmd {
        ItemCommand::Compliance { item_id, value } => {
            session.set_compliance(&actor, &item_id, value)?
        }
        ItemCommand::Observe { item_id, text } => session.set_observation(&actor, &item_id, &text)?,
        ItemCommand::Evidence { item_id, url } => session.set_evidence_url(&actor, &item_id, &url)?,
    };
    print_item(item);
    Ok(())
}

fn cmd_plan(session: &mut Session, user: Option<&str>, cmd: PlanCommand) -> Result<()> {
    match cmd {
        PlanCommand::Open { item_id } => {
            let actor = session.acting_user(user)?;
            let opened = session.open_plan(&actor, &item_id)?;
            if opened.created {
                println!("created");
            }
            print_plan(opened.plan);
        }
        PlanCommand::Assign(args) => {
            let actor = session.acting_user(user)?;
            let plan_id = args.plan_id.clone();
            let assignments = args.assignments();
            if assignments.is_empty() {
                anyhow::bail!("nothing to assign: pass --area, --responsible, --start or --close");
            }
            for assignment in assignments {
                session.assign_plan(&actor, &plan_id, assignment)?;
            }
            print_plan(session.plan(&plan_id)?);
        }
        PlanCommand::State { plan_id, state } => {
            let actor = session.acting_user(user)?;
            print_plan(session.set_plan_state(&actor, &plan_id, state)?);
        }
        PlanCommand::Reprogram { plan_id, until } => {
            let actor = session.acting_user(user)?;
            print_plan(session.reprogram_plan(&actor, &plan_id, until)?);
        }
        PlanCommand::Verify { plan_id } => {
            let actor = session.acting_user(user)?;
            print_plan(session.verify_plan(&actor, &plan_id)?);
        }
        PlanCommand::Note(args) => {
            let actor = session.acting_user(user)?;
            let plan_id = args.plan_id.clone();
            let annotations = args.annotations();
            if annotations.is_empty() {
                anyhow::bail!("nothing to note: pass --description, --evidence or --closure");
            }
            for annotation in annotations {
                session.annotate_plan(&actor, &plan_id, annotation)?;
            }
            print_plan(session.plan(&plan_id)?);
        }
        PlanCommand::List {
            state,
            responsible,
            choices,
        } => {
            if choices {
                println!("states: {}", summary::state_options().join(", "));
                let mut people = vec![summary::ALL];
                people.extend(session.responsible_options());
                println!("responsibles: {}", people.join(", "));
                return Ok(());
            }
            let filter = PlanFilter::from_choices(state.as_deref(), responsible.as_deref())?;
            for view in session.plan_views(&filter) {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    view.plan.id,
                    view.item_code.unwrap_or("-"),
                    view.criticality.map_or("-", |c| c.as_str()),
                    view.plan.state,
                    view.plan.responsible_action,
                    view.plan.title
                );
            }
        }
    }
    Ok(())
}

fn cmd_standard(session: &mut Session, user: Option<&str>, cmd: StandardCommand) -> Result<()> {
    match cmd {
        StandardCommand::Add {
            area,
            process,
            criticality,
            priority,
            code,
            name,
            file_url,
        } => {
            let actor = session.acting_user(user)?;
            let standard = session.add_standard(
                &actor,
                NewStandard {
                    area,
                    process,
                    criticality,
                    priority,
                    code,
                    name,
                    file_url,
                },
            )?;
            println!("{}\t{}\t{}", standard.id, standard.code, standard.name);
        }
        StandardCommand::List { area, process } => {
            for standard in session.standards().list(&area, &process) {
                println!(
                    "{}\t{}\t{}\t{}",
                    standard.code, standard.criticality, standard.priority, standard.name
                );
            }
        }
    }
    Ok(())
}

fn print_item(item: &AuditItem) {
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        item.id, item.process, item.code, item.criticality, item.compliance, item.name
    );
}

fn print_plan(plan: &RemediationPlan) {
    let fmt_date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_owned(), |d| d.to_string());
    println!("{}\t{}\t{}", plan.id, plan.state, plan.title);
    println!("  responsible: {} / {}", plan.responsible_area, plan.responsible_action);
    println!(
        "  dates: start {} close {} rescheduled {}",
        fmt_date(plan.start_date),
        fmt_date(plan.close_date),
        fmt_date(plan.rescheduled_until)
    );
    if let Some(by) = &plan.verified_by {
        println!("  verified by {by} on {}", fmt_date(plan.verification_date));
    }
}
