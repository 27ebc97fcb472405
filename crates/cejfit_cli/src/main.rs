//! Command-line front end for the CejFIT workout log.
//!
//! # Responsibility
//! - Drive `cejfit_core` the way the desktop UI does: validate input, call the
//!   store, then re-query for display.
//! - Keep output plain and line-oriented for scripting.

use cejfit_core::{
    init_logging_from, parse_rir, parse_unit, today, validate_date, validate_exercise_name,
    validate_weight_reps, CoreConfig, Exercise, ExerciseFields, ExerciseId, Session,
    SessionDraft, SessionId, ValidationError, WeightUnit, WorkoutStore,
};
use clap::{Args, Parser, Subcommand};
use log::warn;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "cejfit")]
#[command(about = "Progressive overload workout log", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercises with their last session date
    Exercises {
        /// Only show exercises whose name, body part, notes or subgroup match
        #[arg(long)]
        search: Option<String>,
    },

    /// Add an exercise to the master list
    AddExercise(ExerciseArgs),

    /// Replace every field of an exercise
    EditExercise {
        id: i64,
        #[command(flatten)]
        fields: ExerciseArgs,
    },

    /// Delete an exercise with all of its sessions
    DeleteExercise { id: i64 },

    /// Log a session: one or more sets like `100x8`, `100x8@2` or `60kgx5@1`
    Log {
        exercise_id: i64,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,

        /// Set as `<weight>[lbs|kg]x<reps>[@rir]`; repeat for more sets
        #[arg(long = "set", required = true)]
        sets: Vec<String>,
    },

    /// Show progress history of an exercise, newest first
    History { exercise_id: i64 },

    /// Show every set of a session
    Sets { session_id: i64 },

    /// Delete a session and its sets
    DeleteSession { id: i64 },

    /// Show the most recent set logged for an exercise
    Last { exercise_id: i64 },
}

#[derive(Args)]
struct ExerciseArgs {
    name: String,
    #[arg(long, default_value = "")]
    body_part: String,
    #[arg(long, default_value = "")]
    equipment: String,
    #[arg(long, default_value = "")]
    notes: String,
    #[arg(long, default_value = "")]
    subgroup: String,
}

impl ExerciseArgs {
    fn to_fields(&self) -> Result<ExerciseFields, ValidationError> {
        let name = validate_exercise_name(&self.name)?;
        Ok(ExerciseFields::new(name)
            .body_part(self.body_part.as_str())
            .equipment(self.equipment.as_str())
            .notes(self.notes.as_str())
            .subgroup(self.subgroup.as_str()))
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

fn run(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => CoreConfig::load_from(path)?,
        None => CoreConfig::load()?,
    };
    if let Err(err) = init_logging_from(&config.logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    let db_path = cli.db.unwrap_or(config.database.path);
    let store = WorkoutStore::initialize(&db_path)?;
    let outcome = execute(&store, cli.command);
    if let Err(err) = store.close() {
        warn!("event=cli_close module=cli status=error error={err}");
    }
    outcome
}

fn execute(store: &WorkoutStore, command: Commands) -> CliResult<()> {
    match command {
        Commands::Exercises { search } => {
            let exercises = match search {
                Some(query) => store.search_exercises(&query)?,
                None => store.list_exercises()?,
            };
            for exercise in &exercises {
                println!("{}", format_exercise(exercise));
            }
        }
        Commands::AddExercise(args) => {
            let id = store.add_exercise(&args.to_fields()?)?;
            println!("added exercise {id}");
        }
        Commands::EditExercise { id, fields } => {
            let id = require_exercise(store, id)?.id;
            store.update_exercise(id, &fields.to_fields()?)?;
            println!("updated exercise {id}");
        }
        Commands::DeleteExercise { id } => {
            let exercise = require_exercise(store, id)?;
            store.delete_exercise(exercise.id)?;
            println!("deleted exercise {}", exercise.id);
        }
        Commands::Log {
            exercise_id,
            date,
            notes,
            sets,
        } => {
            let exercise = require_exercise(store, exercise_id)?;
            let date = match date {
                Some(value) => validate_date(&value)?,
                None => today(),
            };
            let mut draft = SessionDraft::new(date).with_notes(notes);
            for spec in &sets {
                let (weight, reps, rir, unit) = parse_set_spec(spec)?;
                draft.push_set(weight, reps, rir, unit);
            }

            if let Some(previous) = store.last_set_for(exercise.id)? {
                println!(
                    "previous: {} {} x {}{}",
                    previous.weight,
                    previous.unit,
                    previous.reps,
                    format_rir(previous.rir)
                );
            }
            let session_id = store.save_session(exercise.id, &draft)?;
            println!(
                "saved session {session_id} for {} on {date} with {} set(s)",
                exercise.display_label(),
                draft.len()
            );
        }
        Commands::History { exercise_id } => {
            let exercise = require_exercise(store, exercise_id)?;
            println!("{}", exercise.display_label());
            for summary in store.session_history(exercise.id)? {
                let headline = summary
                    .first_set
                    .as_ref()
                    .map(|set| {
                        format!("{} {} x {}{}", set.weight, set.unit, set.reps, format_rir(set.rir))
                    })
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>5}  {}  {}  sets={}  {}",
                    summary.session.id.0,
                    summary.session.date,
                    headline,
                    summary.set_count,
                    summary.session.notes.as_deref().unwrap_or("")
                );
            }
        }
        Commands::Sets { session_id } => {
            for set in store.list_sets(SessionId(session_id))? {
                println!("{set}");
            }
        }
        Commands::DeleteSession { id } => {
            let session = require_session(store, id)?;
            store.delete_session(session.id)?;
            println!("deleted session {}", session.id);
        }
        Commands::Last { exercise_id } => {
            let exercise = require_exercise(store, exercise_id)?;
            match store.last_set_for(exercise.id)? {
                Some(last) => println!(
                    "{} {} x {}{}",
                    last.weight,
                    last.unit,
                    last.reps,
                    format_rir(last.rir)
                ),
                None => println!("no sets logged yet"),
            }
        }
    }
    Ok(())
}

fn require_exercise(store: &WorkoutStore, id: i64) -> CliResult<Exercise> {
    store
        .get_exercise(ExerciseId(id))?
        .ok_or_else(|| format!("no exercise with id {id}").into())
}

fn require_session(store: &WorkoutStore, id: i64) -> CliResult<Session> {
    store
        .get_session(SessionId(id))?
        .ok_or_else(|| format!("no session with id {id}").into())
}

fn format_exercise(exercise: &Exercise) -> String {
    let last = exercise
        .last_session
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>4}  {}  [{}]  equipment={}  subgroup={}  last={}",
        exercise.id.0,
        exercise.name,
        exercise.body_part.as_deref().unwrap_or("-"),
        exercise.equipment.as_deref().unwrap_or("-"),
        exercise.subgroup.as_deref().unwrap_or("-"),
        last
    )
}

fn format_rir(rir: Option<u32>) -> String {
    rir.map(|value| format!(" @{value} RIR")).unwrap_or_default()
}

/// Parses `<weight>[lbs|kg]x<reps>[@rir]`, e.g. `100x8`, `60kgx5@1`.
fn parse_set_spec(spec: &str) -> Result<(f64, u32, Option<u32>, WeightUnit), ValidationError> {
    let invalid = || ValidationError::InvalidNumeric {
        field: "set",
        input: spec.to_string(),
    };

    let lowered = spec.trim().to_ascii_lowercase();
    let (weight_part, rest) = lowered.split_once('x').ok_or_else(invalid)?;
    let (reps_part, rir_part) = rest.split_once('@').unwrap_or((rest, ""));

    let (weight_text, unit_text) = ["kg", "lbs"]
        .into_iter()
        .find_map(|unit| weight_part.strip_suffix(unit).map(|weight| (weight, unit)))
        .unwrap_or((weight_part, ""));

    let (weight, reps) = validate_weight_reps(weight_text, reps_part)?;
    let rir = parse_rir(rir_part)?;
    let unit = parse_unit(unit_text)?;
    Ok((weight, reps, rir, unit))
}
