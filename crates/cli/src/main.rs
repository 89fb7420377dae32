use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use symptom_core::{
    constants::{DEFAULT_DATASET_PATH, DISCLAIMER},
    ConditionMatcher, ConditionTable, DatasetSource, FallbackTopic, MatchOutcome,
};

#[derive(Parser)]
#[command(name = "symptom")]
#[command(about = "Symptom checker CLI")]
struct Cli {
    /// Condition table CSV (defaults to $SYMPTOMS_CSV, then symptoms.csv)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match comma-separated symptoms against the condition table
    Analyze {
        /// Symptoms, e.g. "fever, headache"
        symptoms: String,
    },
    /// List distinct conditions and their treatments
    Conditions,
    /// Show dataset statistics
    Stats,
    /// Print the canned chat reply for a message
    Fallback {
        /// Chat message
        message: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let dataset = cli
        .dataset
        .or_else(|| std::env::var("SYMPTOMS_CSV").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

    match cli.command {
        Some(Commands::Analyze { symptoms }) => {
            match matcher(&dataset).match_symptoms(&symptoms) {
                Ok(MatchOutcome::Matches {
                    symptoms_entered,
                    matches,
                }) => {
                    let entered: Vec<&str> = symptoms_entered.iter().map(|s| s.as_str()).collect();
                    println!("Symptoms entered: {}", entered.join(", "));
                    for (rank, m) in matches.iter().enumerate() {
                        println!(
                            "{}. {} ({}/{} symptoms matched) - treatment: {}",
                            rank + 1,
                            m.diagnosis,
                            m.match_score,
                            m.total_symptoms,
                            m.treatment
                        );
                    }
                    println!("{DISCLAIMER}");
                }
                Ok(MatchOutcome::NoMatch { search_url, .. }) => {
                    println!("No matching conditions found. Try: {search_url}");
                }
                Err(e) => eprintln!("Error analysing symptoms: {}", e.user_message()),
            }
        }
        Some(Commands::Conditions) => {
            let conditions = matcher(&dataset).list_conditions();
            if conditions.is_empty() {
                println!("No conditions found.");
            } else {
                for c in conditions {
                    println!("{}: {}", c.diagnosis, c.treatment);
                }
            }
        }
        Some(Commands::Stats) => {
            let matcher = matcher(&dataset);
            let stats = matcher.stats();
            match matcher.table().source() {
                DatasetSource::File(path) => println!("Dataset: {}", path.display()),
                DatasetSource::BuiltIn => println!("Dataset: built-in"),
            }
            println!("Total records: {}", stats.total_records);
            println!("Unique conditions: {}", stats.distinct_diagnoses);
            println!("Sample symptoms: {}", stats.sample_symptoms.join(", "));
        }
        Some(Commands::Fallback { message }) => {
            let topic = FallbackTopic::select(&message);
            println!("[{topic:?}]");
            println!("{}", topic.script());
        }
        None => {
            println!("Use 'symptom --help' for commands");
        }
    }

    Ok(())
}

fn matcher(dataset: &std::path::Path) -> ConditionMatcher {
    ConditionMatcher::new(Arc::new(ConditionTable::load_or_builtin(dataset)))
}
