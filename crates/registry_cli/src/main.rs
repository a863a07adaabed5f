//! Command-line front end for the student registry.
//!
//! # Responsibility
//! - Map subcommands onto table/form/detail controller actions.
//! - Print field-scoped validation errors the way the form shows them.

use clap::{Args, Parser, Subcommand};
use log::info;
use registry_core::db::open_db;
use registry_core::{
    core_version, init_logging, CapturePoll, DeleteOutcome, Division, Field, FieldChange,
    FixedPathPicker, FormError, FormEvent, Gender, Hobby, RegistryConfig, SlotStudentRepository,
    SqliteSlotStore, StudentId, StudentRepository, TableController, TableError,
};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "student-registry", version, about = "Register, search and manage students")]
struct Cli {
    /// SQLite file holding the registry (overrides STUDENT_REGISTRY_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Storage key the record list lives under (overrides STUDENT_REGISTRY_STORAGE_KEY)
    #[arg(long, global = true)]
    storage_key: Option<String>,

    /// Absolute directory for rolling log files (overrides STUDENT_REGISTRY_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides STUDENT_REGISTRY_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one page of the student table
    List {
        /// Matches full name, email or phone
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Register a new student
    Add(StudentArgs),
    /// Update an existing student; only given fields change
    Edit {
        id: StudentId,
        #[command(flatten)]
        fields: StudentArgs,
        /// Deselect a hobby
        #[arg(long = "remove-hobby")]
        remove_hobbies: Vec<Hobby>,
        /// Remove the profile picture
        #[arg(long)]
        clear_picture: bool,
    },
    /// Show one student's details
    View { id: StudentId },
    /// Delete a student
    Delete {
        id: StudentId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct StudentArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    password: Option<String>,
    /// Date of birth as YYYY-MM-DD
    #[arg(long)]
    dob: Option<String>,
    /// male|female|other
    #[arg(long)]
    gender: Option<Gender>,
    /// Select a hobby (Reading, Gaming, Sports, Traveling); repeatable
    #[arg(long = "hobby")]
    hobbies: Vec<Hobby>,
    /// A|B|C
    #[arg(long)]
    division: Option<Division>,
    /// Image file to use as profile picture
    #[arg(long)]
    picture: Option<PathBuf>,
}

impl StudentArgs {
    fn changes(&self) -> Vec<FieldChange> {
        let text: [(&Option<String>, fn(String) -> FieldChange); 6] = [
            (&self.first_name, FieldChange::FirstName),
            (&self.last_name, FieldChange::LastName),
            (&self.email, FieldChange::Email),
            (&self.phone, FieldChange::Phone),
            (&self.password, FieldChange::Password),
            (&self.dob, FieldChange::DateOfBirth),
        ];
        let mut changes = text
            .into_iter()
            .filter_map(|(value, make)| value.clone().map(make))
            .collect::<Vec<_>>();
        changes.extend(self.gender.map(FieldChange::Gender));
        changes.extend(self.hobbies.iter().map(|hobby| FieldChange::Hobby {
            hobby: *hobby,
            selected: true,
        }));
        changes.extend(self.division.map(FieldChange::Division));
        changes
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = RegistryConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(key) = cli.storage_key {
        config.storage_key = key;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    if let Some(dir) = &config.log_dir {
        init_logging(&config.log_level, dir)?;
        info!(
            "event=cli_start module=cli status=ok version={}",
            core_version()
        );
    }

    let conn = open_db(&config.db_path)?;
    let repo = SlotStudentRepository::with_key(SqliteSlotStore::new(&conn), config.storage_key);
    let mut table = TableController::with_page_size(repo, config.page_size)?;

    match cli.command {
        Command::List { query, page } => list(&mut table, query, page),
        Command::Add(fields) => {
            table.open_add();
            fill_and_submit(&mut table, &fields, &[], false)
        }
        Command::Edit {
            id,
            fields,
            remove_hobbies,
            clear_picture,
        } => {
            table.open_edit(id)?;
            fill_and_submit(&mut table, &fields, &remove_hobbies, clear_picture)
        }
        Command::View { id } => {
            print!("{}", table.open_view(id)?);
            table.close_popup();
            Ok(())
        }
        Command::Delete { id, yes } => {
            let outcome = table.delete(id, |prompt| yes || ask_confirmation(prompt))?;
            match outcome {
                DeleteOutcome::Deleted(id) => println!("Deleted student {id}."),
                DeleteOutcome::Declined => println!("Nothing deleted."),
            }
            Ok(())
        }
    }
}

fn list<R: StudentRepository>(
    table: &mut TableController<R>,
    query: String,
    page: usize,
) -> Result<(), Box<dyn Error>> {
    table.set_query(query);
    while table.page() < page && table.next_page() {}

    let view = table.current_page();
    if view.items.is_empty() {
        println!("No data available");
    } else {
        println!(
            "{:<4} {:<8} {:<16} {:<16} {:<28} {:<11} {:<10} {}",
            "Id", "Profile", "First Name", "Last Name", "Email", "Phone", "DOB", "Division"
        );
        for record in &view.items {
            println!(
                "{:<4} {:<8} {:<16} {:<16} {:<28} {:<11} {:<10} {}",
                record.id,
                if record.profile_picture.is_empty() { "N/A" } else { "yes" },
                record.first_name,
                record.last_name,
                record.email,
                record.phone,
                record.date_of_birth,
                record.division.as_str()
            );
        }
    }
    println!(
        "Page {} of {}  [Prev {}] [Next {}]",
        view.page,
        view.total_pages,
        if view.has_prev() { "enabled" } else { "disabled" },
        if view.has_next() { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn fill_and_submit<R: StudentRepository>(
    table: &mut TableController<R>,
    fields: &StudentArgs,
    remove_hobbies: &[Hobby],
    clear_picture: bool,
) -> Result<(), Box<dyn Error>> {
    let mut changes = fields.changes();
    changes.extend(remove_hobbies.iter().map(|hobby| FieldChange::Hobby {
        hobby: *hobby,
        selected: false,
    }));
    if clear_picture {
        changes.push(FieldChange::ProfilePicture(String::new()));
    }
    for change in changes {
        table.apply_form_change(change)?;
    }

    if let Some(path) = &fields.picture {
        let form = table.form_mut().ok_or(TableError::NoOpenForm)?;
        form.begin_image_capture(&mut FixedPathPicker::new(path.clone()));
        if let CapturePoll::Failed(err) = table.wait_form_capture()? {
            table.close_popup();
            return Err(err.into());
        }
    }

    match table.submit_form() {
        Ok(FormEvent::Created(id)) => {
            println!("Created student {id}.");
            Ok(())
        }
        Ok(FormEvent::Updated(id)) => {
            println!("Updated student {id}.");
            Ok(())
        }
        Err(TableError::Form(FormError::Invalid(errors))) => {
            for field in Field::ALL {
                if let Some(message) = errors.get(field) {
                    eprintln!("  {:<15} {message}", field.name());
                }
            }
            table.close_popup();
            Err(format!("{} field(s) need attention", errors.len()).into())
        }
        Err(err) => Err(err.into()),
    }
}

fn ask_confirmation(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
